//! The field-store output sink.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, ListBuilder, RecordBatch, StringBuilder};
use ndarray::ArrayD;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use tracing::debug;

use boreas_field::Field;

use crate::error::IoError;
use crate::schema::build_schema;

/// Appends gridded values to a Parquet field-store file.
///
/// Each [`FieldWriter::write`] call takes a numeric grid and a template
/// field; the stored record carries the template's full metadata with the
/// new grid as payload. Nothing touches disk until [`FieldWriter::close`],
/// which consumes the writer, so a half-written file cannot be reopened.
#[derive(Debug)]
pub struct FieldWriter {
    path: PathBuf,
    pending: Vec<Field>,
}

impl FieldWriter {
    /// Creates a sink that will write to `path` on close.
    pub fn create(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pending: Vec::new(),
        }
    }

    /// Returns the destination path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of fields written so far.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns whether nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Appends one field: `values` as payload, `template`'s metadata.
    pub fn write(&mut self, values: &ArrayD<f64>, template: &Field) {
        self.pending.push(Field::from_template(template, values.clone()));
    }

    /// Finalizes the file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`] if metadata serialization, batch construction,
    /// file creation, or Parquet finalization fails.
    pub fn close(self) -> Result<PathBuf, IoError> {
        let schema = Arc::new(build_schema());
        let batch = fields_to_record_batch(&self.pending, schema.clone())?;

        let file = std::fs::File::create(&self.path).map_err(|e| IoError::Parquet {
            reason: format!("cannot create {}: {e}", self.path.display()),
        })?;
        let props = WriterProperties::builder().build();
        let mut writer = ArrowWriter::try_new(file, schema, Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        debug!(path = %self.path.display(), n = self.pending.len(), "field store closed");
        Ok(self.path)
    }
}

/// Converts buffered fields into a single Arrow record batch.
fn fields_to_record_batch(
    fields: &[Field],
    schema: Arc<arrow::datatypes::Schema>,
) -> Result<RecordBatch, IoError> {
    let mut mars = StringBuilder::new();
    let mut valid_datetime = StringBuilder::new();
    let mut grid = StringBuilder::new();
    let mut area = StringBuilder::new();
    let mut shape = StringBuilder::new();
    let mut values = ListBuilder::new(Float64Builder::new());

    for (row, field) in fields.iter().enumerate() {
        let mars_json =
            serde_json::to_string(field.as_mars()).map_err(|e| IoError::MalformedRecord {
                row,
                reason: format!("mars keys: {e}"),
            })?;
        let shape_json =
            serde_json::to_string(field.shape()).map_err(|e| IoError::MalformedRecord {
                row,
                reason: format!("shape: {e}"),
            })?;

        mars.append_value(mars_json);
        valid_datetime.append_option(field.valid_datetime());
        grid.append_value(field.grid());
        area.append_value(field.area());
        shape.append_value(shape_json);
        for v in field.values().iter() {
            values.values().append_value(*v);
        }
        values.append(true);
    }

    let columns: Vec<ArrayRef> = vec![
        Arc::new(mars.finish()),
        Arc::new(valid_datetime.finish()),
        Arc::new(grid.finish()),
        Arc::new(area.finish()),
        Arc::new(shape.finish()),
        Arc::new(values.finish()),
    ];

    RecordBatch::try_new(schema, columns).map_err(|e| IoError::Arrow {
        reason: e.to_string(),
    })
}
