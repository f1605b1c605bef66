//! # boreas-dataset
//!
//! Thin outer API over the field store: resolve a dataset name through
//! registered search paths, open it, and hand back a checked [`Dataset`]
//! that remembers how it was opened.

mod error;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

use tracing::info;

use boreas_field::FieldCollection;
use boreas_io::read_fields;

pub use error::DatasetError;

/// Process-wide dataset search paths, in registration order.
fn registry() -> &'static Mutex<Vec<PathBuf>> {
    static REGISTRY: OnceLock<Mutex<Vec<PathBuf>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(Vec::new()))
}

/// Registers a directory to be searched by [`open_dataset`].
pub fn add_dataset_path(dir: impl Into<PathBuf>) {
    let dir = dir.into();
    let mut paths = registry().lock().unwrap_or_else(PoisonError::into_inner);
    if !paths.contains(&dir) {
        paths.push(dir);
    }
}

/// Returns the registered search paths, in registration order.
pub fn dataset_paths() -> Vec<PathBuf> {
    registry()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Resolves `name` to a file: first as a literal path, then under each
/// registered directory, with and without the `.parquet` extension.
fn resolve(name: &str) -> Option<PathBuf> {
    let literal = Path::new(name);
    if literal.is_file() {
        return Some(literal.to_path_buf());
    }
    for dir in dataset_paths() {
        for candidate in [dir.join(name), dir.join(format!("{name}.parquet"))] {
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}

/// An opened field dataset with its provenance.
#[derive(Debug, Clone)]
pub struct Dataset {
    fields: FieldCollection,
    path: PathBuf,
    /// The name the caller opened the dataset with.
    request: String,
}

impl Dataset {
    /// Returns the fields.
    pub fn fields(&self) -> &FieldCollection {
        &self.fields
    }

    /// Returns the resolved on-disk path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the original open request, for provenance.
    pub fn request(&self) -> &str {
        &self.request
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the dataset holds no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns all fields valid at `date`.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::MissingDate`] when no field matches.
    pub fn select_date(&self, date: &str) -> Result<FieldCollection, DatasetError> {
        let selected: Vec<_> = self
            .fields
            .iter()
            .filter(|f| f.valid_datetime() == Some(date))
            .cloned()
            .collect();
        if selected.is_empty() {
            return Err(DatasetError::MissingDate {
                date: date.to_string(),
            });
        }
        Ok(selected.into())
    }

    /// Post-open self-check: the dataset must be non-empty and every field
    /// must carry a valid timestamp.
    fn check(&self) -> Result<(), DatasetError> {
        if self.fields.is_empty() {
            return Err(DatasetError::Empty {
                path: self.path.clone(),
            });
        }
        for (index, field) in self.fields.iter().enumerate() {
            if field.valid_datetime().is_none() {
                return Err(DatasetError::MissingTimestamp {
                    path: self.path.clone(),
                    index,
                });
            }
        }
        Ok(())
    }
}

/// Opens a dataset by name or path.
///
/// The name is resolved against the registered search paths, the file is
/// read into memory, the original request is attached for provenance, and
/// the self-check runs before the dataset is returned.
///
/// # Errors
///
/// Returns [`DatasetError::NotFound`] if resolution fails,
/// [`DatasetError::Io`] if the file cannot be read, and the self-check
/// errors for empty or timestamp-less datasets.
pub fn open_dataset(name: &str) -> Result<Dataset, DatasetError> {
    let path = resolve(name).ok_or_else(|| DatasetError::NotFound {
        name: name.to_string(),
    })?;
    let fields = read_fields(&path)?;
    info!(name, path = %path.display(), n = fields.len(), "dataset opened");

    let ds = Dataset {
        fields,
        path,
        request: name.to_string(),
    };
    ds.check()?;
    Ok(ds)
}
