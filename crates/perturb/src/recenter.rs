//! The recentering transform.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use ndarray::ArrayD;
use tempfile::TempPath;
use tracing::{debug, error, info};

use boreas_field::FieldCollection;
use boreas_io::{FieldWriter, read_fields};

use crate::compat::check_compatible;
use crate::config::RecenterConfig;
use crate::error::PerturbError;
use crate::result::{FieldSetHandle, RecenterOutput};

/// Composite ordering key aligning center fields with their ensemble blocks.
const ORDER_KEYS: [&str; 7] = [
    "param",
    "level",
    "valid_datetime",
    "date",
    "time",
    "step",
    "number",
];

fn format_identity(canonical: &[(String, String)]) -> String {
    canonical
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Recenters every ensemble member around the center field.
///
/// Both collections are sorted by (param, level, valid_datetime, date, time,
/// step, number); the i-th center field then corresponds to the member block
/// at `i * n_numbers .. (i + 1) * n_numbers`, where `n_numbers` is the count
/// of distinct ensemble numbers. For each block the per-gridpoint ensemble
/// mean `m` is computed and each member `e` is rewritten as
///
/// ```text
/// x = c - m + e
/// ```
///
/// so the block's mean becomes the center value `c` while each member keeps
/// its deviation from the mean. Parameters in the configured clip set are
/// clamped to non-negative values before writing. Each output field inherits
/// the metadata of the member it was derived from.
///
/// With `config.output()` set, the result is persisted there and
/// [`RecenterOutput::Path`] returned; otherwise the run writes to an
/// anonymous temp file, reopens it, and returns
/// [`RecenterOutput::Collection`] holding the backing file alive.
///
/// # Errors
///
/// Returns [`PerturbError`] on empty inputs, members without an ensemble
/// number, member counts that are not an exact multiple of the center
/// count, structural disagreement between a center field and a member,
/// duplicated ensemble fields, post-run count inconsistencies, and sink
/// failures. All errors abort the run; none are recoverable.
#[tracing::instrument(skip_all)]
pub fn compute_perturbations(
    members: &FieldCollection,
    center: &FieldCollection,
    config: &RecenterConfig,
) -> Result<RecenterOutput, PerturbError> {
    if members.is_empty() {
        return Err(PerturbError::EmptyInput {
            collection: "members",
        });
    }
    if center.is_empty() {
        return Err(PerturbError::EmptyInput {
            collection: "center",
        });
    }

    let numbers = members.unique_values("number");
    if numbers.has_missing() {
        return Err(PerturbError::UnsetMemberNumber {
            count: numbers.missing(),
        });
    }
    let n_numbers = numbers.len();

    info!(members = members.len(), center = center.len(), "ordering fields");
    let members = members.order_by(&ORDER_KEYS);
    let center = center.order_by(&ORDER_KEYS);

    if center.len() * n_numbers != members.len() {
        error!(
            center = center.len(),
            n_numbers,
            members = members.len(),
            "inconsistent field counts"
        );
        for f in &members {
            error!(field = %f, "member");
        }
        for f in &center {
            error!(field = %f, "center");
        }
        return Err(PerturbError::CountMismatch {
            center: center.len(),
            n_numbers,
            members: members.len(),
        });
    }

    // With an explicit output no temp file is created at all.
    let (path, tmp): (PathBuf, Option<TempPath>) = match config.output() {
        Some(p) => (p.to_path_buf(), None),
        None => {
            let file = tempfile::Builder::new()
                .prefix("boreas-recenter-")
                .suffix(".parquet")
                .tempfile()
                .map_err(|e| PerturbError::TempFile {
                    reason: e.to_string(),
                })?;
            let tmp_path = file.into_temp_path();
            (tmp_path.to_path_buf(), Some(tmp_path))
        }
    };

    let mut out = FieldWriter::create(&path);
    let mut seen: HashSet<Vec<(String, String)>> = HashSet::new();

    for (i, center_field) in center.iter().enumerate() {
        let param = center_field.metadata("param").unwrap_or_default();
        let center_np = center_field.values();

        // Load the ensemble block, checking each member against the center.
        let mut block: Vec<&ArrayD<f64>> = Vec::with_capacity(n_numbers);
        for j in 0..n_numbers {
            let member_field = &members[i * n_numbers + j];
            check_compatible(center_field, member_field)?;

            let identity = member_field.as_mars().canonical();
            if !seen.insert(identity.clone()) {
                return Err(PerturbError::DuplicateField {
                    identity: format_identity(&identity),
                });
            }
            block.push(member_field.values());
        }

        // Per-gridpoint mean across the ensemble dimension.
        let mut mean = ArrayD::<f64>::zeros(center_np.raw_dim());
        for values in &block {
            mean += *values;
        }
        mean /= n_numbers as f64;

        for j in 0..n_numbers {
            let template = &members[i * n_numbers + j];
            let ensemble_np = template.values();
            if ensemble_np.shape() != center_np.shape() || mean.shape() != center_np.shape() {
                return Err(PerturbError::ShapeMismatch {
                    center: center_np.shape().to_vec(),
                    member: ensemble_np.shape().to_vec(),
                });
            }

            let mut x = center_np - &mean + ensemble_np;
            if config.is_clipped(param) {
                x.mapv_inplace(|v| v.max(0.0));
            }
            out.write(&x, template);
        }
        debug!(index = i, param, n_numbers, "center field recentered");
    }

    if seen.len() != members.len() {
        return Err(PerturbError::SeenCountMismatch {
            seen: seen.len(),
            members: members.len(),
        });
    }

    let path = out.close()?;
    info!(path = %path.display(), fields = members.len(), "output finalized");

    match tmp {
        None => Ok(RecenterOutput::Path(path)),
        Some(tmp_path) => {
            let fields = read_fields(&path)?;
            if fields.len() != members.len() {
                return Err(PerturbError::ReopenedLengthMismatch {
                    expected: members.len(),
                    got: fields.len(),
                });
            }
            Ok(RecenterOutput::Collection(FieldSetHandle::new(
                fields,
                Arc::new(tmp_path),
            )))
        }
    }
}
