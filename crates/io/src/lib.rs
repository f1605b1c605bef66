//! # boreas-io
//!
//! Parquet-backed storage for gridded fields. [`FieldWriter`] is the output
//! sink: it appends recentered grids using an existing field as the metadata
//! template and finalizes the file on close. [`read_fields`] reopens a
//! finalized file as an in-memory [`boreas_field::FieldCollection`].

mod error;
mod reader;
mod schema;
mod writer;

pub use error::IoError;
pub use reader::read_fields;
pub use writer::FieldWriter;
