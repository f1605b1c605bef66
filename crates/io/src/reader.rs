//! Reopening a finalized field-store file.

use std::path::Path;

use arrow::array::{Array, AsArray, RecordBatch};
use arrow::datatypes::Float64Type;
use ndarray::{ArrayD, IxDyn};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use tracing::debug;

use boreas_field::{Field, FieldCollection, MarsKeys};

use crate::error::IoError;
use crate::schema::COLUMNS;

/// Reads a field-store file back into an in-memory collection.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if `path` does not exist,
/// [`IoError::Schema`] if the columns do not match the field-store layout,
/// and [`IoError::MalformedRecord`] if a row cannot be decoded.
pub fn read_fields(path: &Path) -> Result<FieldCollection, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| IoError::Parquet {
        reason: format!("cannot open {}: {e}", path.display()),
    })?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut collection = FieldCollection::new();
    let mut row = 0usize;
    for batch in reader {
        let batch = batch?;
        validate_schema(&batch)?;
        decode_batch(&batch, &mut row, &mut collection)?;
    }

    debug!(path = %path.display(), n = collection.len(), "field store reopened");
    Ok(collection)
}

/// Checks that a batch carries exactly the field-store columns, in order.
fn validate_schema(batch: &RecordBatch) -> Result<(), IoError> {
    let schema = batch.schema();
    if schema.fields().len() != COLUMNS.len() {
        return Err(IoError::Schema {
            reason: format!(
                "expected {} columns, got {}",
                COLUMNS.len(),
                schema.fields().len()
            ),
        });
    }
    for (field, expected) in schema.fields().iter().zip(COLUMNS) {
        if field.name() != expected {
            return Err(IoError::Schema {
                reason: format!("expected column '{expected}', got '{}'", field.name()),
            });
        }
    }
    Ok(())
}

/// Decodes every row of a batch, appending to `collection`.
fn decode_batch(
    batch: &RecordBatch,
    row: &mut usize,
    collection: &mut FieldCollection,
) -> Result<(), IoError> {
    let mars_col = batch.column(0).as_string::<i32>();
    let valid_col = batch.column(1).as_string::<i32>();
    let grid_col = batch.column(2).as_string::<i32>();
    let area_col = batch.column(3).as_string::<i32>();
    let shape_col = batch.column(4).as_string::<i32>();
    let values_col = batch.column(5).as_list::<i32>();

    for i in 0..batch.num_rows() {
        let mars: MarsKeys =
            serde_json::from_str(mars_col.value(i)).map_err(|e| IoError::MalformedRecord {
                row: *row,
                reason: format!("mars keys: {e}"),
            })?;
        let shape: Vec<usize> =
            serde_json::from_str(shape_col.value(i)).map_err(|e| IoError::MalformedRecord {
                row: *row,
                reason: format!("shape: {e}"),
            })?;

        let list = values_col.value(i);
        let floats = list.as_primitive::<Float64Type>();
        if floats.null_count() > 0 {
            return Err(IoError::MalformedRecord {
                row: *row,
                reason: "null grid values".to_string(),
            });
        }
        let values = ArrayD::from_shape_vec(IxDyn(&shape), floats.values().to_vec()).map_err(
            |e| IoError::MalformedRecord {
                row: *row,
                reason: format!("shape {shape:?} does not fit {} values: {e}", floats.len()),
            },
        )?;

        let mut field = Field::new(values)
            .with_mars(mars)
            .with_grid(grid_col.value(i))
            .with_area(area_col.value(i));
        if !valid_col.is_null(i) {
            field = field.with_valid_datetime(valid_col.value(i));
        }
        collection.push(field);
        *row += 1;
    }
    Ok(())
}
