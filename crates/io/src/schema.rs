//! Arrow schema of the field store.

use arrow::datatypes::{DataType, Field as ArrowField, Schema};

/// Column names of the field store, in schema order.
pub(crate) const COLUMNS: [&str; 6] = ["mars", "valid_datetime", "grid", "area", "shape", "values"];

/// Builds the Arrow schema for a field-store file.
///
/// One row per field: the MARS key set and grid shape are JSON-encoded
/// strings, the grid values a `List<Float64>`. Only `valid_datetime` is
/// nullable.
pub(crate) fn build_schema() -> Schema {
    Schema::new(vec![
        ArrowField::new("mars", DataType::Utf8, false),
        ArrowField::new("valid_datetime", DataType::Utf8, true),
        ArrowField::new("grid", DataType::Utf8, false),
        ArrowField::new("area", DataType::Utf8, false),
        ArrowField::new("shape", DataType::Utf8, false),
        ArrowField::new("values", DataType::new_list(DataType::Float64, true), false),
    ])
}
