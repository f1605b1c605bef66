//! Error types for the boreas-perturb crate.

use boreas_io::IoError;

/// Error type for all fallible operations in the boreas-perturb crate.
///
/// Every variant is fatal: the run aborts on the first violation and no
/// partial output is returned. Structural variants carry both offending
/// values so the caller can log or propagate a precise diagnostic.
#[derive(Debug, thiserror::Error)]
pub enum PerturbError {
    /// Returned when an input collection has no fields.
    #[error("input collection '{collection}' is empty")]
    EmptyInput {
        /// Which collection was empty (`members` or `center`).
        collection: &'static str,
    },

    /// Returned when one or more member fields lack an ensemble number.
    #[error("{count} member field(s) have no ensemble number")]
    UnsetMemberNumber {
        /// How many member fields lack the `number` key.
        count: usize,
    },

    /// Returned when the member count is not center count times the
    /// number of distinct ensemble numbers.
    #[error("inconsistent number of fields: {center} * {n_numbers} != {members}")]
    CountMismatch {
        /// Number of center fields.
        center: usize,
        /// Number of distinct ensemble numbers.
        n_numbers: usize,
        /// Number of member fields.
        members: usize,
    },

    /// Returned when a center/member pair disagree on the grid descriptor.
    #[error("grid mismatch: center '{center}' vs member '{member}'")]
    GridMismatch {
        /// Center field's grid descriptor.
        center: String,
        /// Member field's grid descriptor.
        member: String,
    },

    /// Returned when a center/member pair disagree on the geographic area.
    #[error("area mismatch: center '{center}' vs member '{member}'")]
    AreaMismatch {
        /// Center field's area descriptor.
        center: String,
        /// Member field's area descriptor.
        member: String,
    },

    /// Returned when a center/member pair disagree on the grid shape.
    #[error("shape mismatch: center {center:?} vs member {member:?}")]
    ShapeMismatch {
        /// Center field's shape.
        center: Vec<usize>,
        /// Member field's shape.
        member: Vec<usize>,
    },

    /// Returned when a center/member pair disagree on the valid timestamp.
    #[error("valid_datetime mismatch: center '{center}' vs member '{member}'")]
    TimeMismatch {
        /// Center field's valid timestamp.
        center: String,
        /// Member field's valid timestamp.
        member: String,
    },

    /// Returned when a shared, non-excluded MARS key differs between a
    /// center field and a member field.
    #[error("mars key '{key}' mismatch: center '{center}' vs member '{member}'")]
    KeyMismatch {
        /// The disagreeing key.
        key: String,
        /// Center field's value.
        center: String,
        /// Member field's value.
        member: String,
    },

    /// Returned when the same ensemble field appears twice in one run.
    #[error("duplicate ensemble field: {identity}")]
    DuplicateField {
        /// Canonical MARS identity of the repeated field.
        identity: String,
    },

    /// Returned when the number of processed ensemble fields does not
    /// match the member count after the run.
    #[error("processed {seen} ensemble field(s), expected {members}")]
    SeenCountMismatch {
        /// Number of distinct ensemble fields processed.
        seen: usize,
        /// Number of member fields supplied.
        members: usize,
    },

    /// Returned when the reopened output does not contain one field per
    /// input member.
    #[error("reopened output has {got} field(s), expected {expected}")]
    ReopenedLengthMismatch {
        /// Expected field count.
        expected: usize,
        /// Actual field count after reopening.
        got: usize,
    },

    /// Returned when the anonymous output temp file cannot be created.
    #[error("temp file error: {reason}")]
    TempFile {
        /// Description of the failure.
        reason: String,
    },

    /// Wrapped error from the boreas-io crate.
    #[error(transparent)]
    Io(#[from] IoError),
}
