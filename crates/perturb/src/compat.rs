//! Structural compatibility between a center field and a member field.

use std::collections::BTreeSet;

use boreas_field::Field;

use crate::error::PerturbError;

/// MARS keys that legitimately differ between center and member fields.
pub const SKIP_KEYS: [&str; 7] = [
    "class",
    "stream",
    "type",
    "number",
    "expver",
    "_leg_number",
    "anoffset",
];

fn display_or_unset(value: Option<&str>) -> String {
    value.unwrap_or("<unset>").to_string()
}

/// Verifies that `center` and `member` describe the same grid cell and time.
///
/// Checks the grid descriptor, geographic area, grid shape, valid timestamp,
/// and every shared MARS key outside [`SKIP_KEYS`]. Returns on the first
/// violation with both offending values; has no side effects.
pub fn check_compatible(center: &Field, member: &Field) -> Result<(), PerturbError> {
    if center.grid() != member.grid() {
        return Err(PerturbError::GridMismatch {
            center: center.grid().to_string(),
            member: member.grid().to_string(),
        });
    }
    if center.area() != member.area() {
        return Err(PerturbError::AreaMismatch {
            center: center.area().to_string(),
            member: member.area().to_string(),
        });
    }
    if center.shape() != member.shape() {
        return Err(PerturbError::ShapeMismatch {
            center: center.shape().to_vec(),
            member: member.shape().to_vec(),
        });
    }

    // valid_datetime lives outside the MARS key set.
    if center.valid_datetime() != member.valid_datetime() {
        return Err(PerturbError::TimeMismatch {
            center: display_or_unset(center.valid_datetime()),
            member: display_or_unset(member.valid_datetime()),
        });
    }

    let keys: BTreeSet<&str> = center
        .as_mars()
        .iter()
        .chain(member.as_mars().iter())
        .map(|(k, _)| k)
        .collect();
    for key in keys {
        if SKIP_KEYS.contains(&key) {
            continue;
        }
        let c = center.as_mars().get(key);
        let m = member.as_mars().get(key);
        if c != m {
            return Err(PerturbError::KeyMismatch {
                key: key.to_string(),
                center: display_or_unset(c),
                member: display_or_unset(m),
            });
        }
    }

    Ok(())
}
