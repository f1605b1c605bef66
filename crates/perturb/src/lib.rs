//! Ensemble recentering for the boreas forecast toolkit.
//!
//! Given a deterministic "center" forecast field set and the matching
//! ensemble "member" field sets, this crate replaces the ensemble mean with
//! the center value while preserving each member's spread:
//!
//! ```text
//! x = center - mean(ensemble) + member
//! ```
//!
//! Physically non-negative variables (humidity, precipitation, soil water)
//! are clipped to zero after recentering. See [`compute_perturbations`] for
//! the full contract.

mod compat;
mod config;
mod error;
mod recenter;
mod result;

pub use compat::{SKIP_KEYS, check_compatible};
pub use config::{CLIP_VARIABLES, RecenterConfig};
pub use error::PerturbError;
pub use recenter::compute_perturbations;
pub use result::{FieldSetHandle, RecenterOutput};
