//! Output variants of a recentering run.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempPath;

use boreas_field::{Field, FieldCollection};

/// An in-memory field collection backed by a temporary file.
///
/// The handle owns a reference to the temp path; the backing file is
/// deleted when the last clone of the handle is dropped.
#[derive(Clone)]
pub struct FieldSetHandle {
    fields: FieldCollection,
    tmp: Arc<TempPath>,
}

impl FieldSetHandle {
    pub(crate) fn new(fields: FieldCollection, tmp: Arc<TempPath>) -> Self {
        Self { fields, tmp }
    }

    /// Returns the recentered fields.
    pub fn fields(&self) -> &FieldCollection {
        &self.fields
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns whether the handle holds no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the path of the backing temp file.
    ///
    /// Valid only as long as some clone of this handle is alive.
    pub fn backing_path(&self) -> &Path {
        &self.tmp
    }
}

impl fmt::Debug for FieldSetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSetHandle")
            .field("len", &self.fields.len())
            .finish_non_exhaustive()
    }
}

impl<'a> IntoIterator for &'a FieldSetHandle {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// What a recentering run produced.
///
/// With an explicit output path the data is persisted there and the path
/// returned; otherwise the fields are reopened from an anonymous temp file
/// and returned as a live [`FieldSetHandle`].
#[derive(Debug)]
pub enum RecenterOutput {
    /// Data written to the caller-supplied path.
    Path(PathBuf),
    /// Data reopened as an in-memory collection over a temp file.
    Collection(FieldSetHandle),
}

impl RecenterOutput {
    /// Returns the output path, if the run wrote to an explicit destination.
    pub fn path(&self) -> Option<&Path> {
        match self {
            RecenterOutput::Path(p) => Some(p),
            RecenterOutput::Collection(_) => None,
        }
    }

    /// Returns the collection handle, if the run used an anonymous output.
    pub fn collection(&self) -> Option<&FieldSetHandle> {
        match self {
            RecenterOutput::Path(_) => None,
            RecenterOutput::Collection(h) => Some(h),
        }
    }

    /// Consumes the output, returning the collection handle if present.
    pub fn into_collection(self) -> Option<FieldSetHandle> {
        match self {
            RecenterOutput::Path(_) => None,
            RecenterOutput::Collection(h) => Some(h),
        }
    }
}
