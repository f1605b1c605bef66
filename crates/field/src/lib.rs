//! # boreas-field
//!
//! Data model for gridded meteorological fields: a [`Field`] is one variable
//! snapshot (numeric grid plus archival metadata), a [`FieldCollection`] is an
//! ordered sequence of fields supporting sorting and distinct-value queries,
//! and [`MarsKeys`] is the archival key/value metadata attached to each field.

mod collection;
mod field;
mod mars;

pub use collection::{FieldCollection, UniqueValues};
pub use field::Field;
pub use mars::MarsKeys;
