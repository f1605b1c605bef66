//! A single gridded variable snapshot.

use std::fmt;

use ndarray::ArrayD;

use crate::mars::MarsKeys;

/// One gridded meteorological variable snapshot.
///
/// A field couples a numeric grid (2D or flattened) with the archival
/// metadata identifying it: the MARS key set, a valid timestamp (kept
/// outside the MARS keys), and the grid/area descriptors of the underlying
/// geometry. Fields are immutable once built; derived fields are produced
/// with [`Field::from_template`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    mars: MarsKeys,
    valid_datetime: Option<String>,
    grid: String,
    area: String,
    values: ArrayD<f64>,
}

impl Field {
    /// Creates a field from its numeric grid, with empty metadata.
    pub fn new(values: ArrayD<f64>) -> Self {
        Self {
            mars: MarsKeys::new(),
            valid_datetime: None,
            grid: String::new(),
            area: String::new(),
            values,
        }
    }

    /// Creates a field carrying `template`'s full metadata with a new grid.
    pub fn from_template(template: &Field, values: ArrayD<f64>) -> Self {
        Self {
            mars: template.mars.clone(),
            valid_datetime: template.valid_datetime.clone(),
            grid: template.grid.clone(),
            area: template.area.clone(),
            values,
        }
    }

    /// Sets one MARS key.
    pub fn with_mars_key(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.mars.insert(name, value);
        self
    }

    /// Replaces the whole MARS key set.
    pub fn with_mars(mut self, mars: MarsKeys) -> Self {
        self.mars = mars;
        self
    }

    /// Sets the valid timestamp.
    pub fn with_valid_datetime(mut self, valid_datetime: impl Into<String>) -> Self {
        self.valid_datetime = Some(valid_datetime.into());
        self
    }

    /// Sets the grid descriptor.
    pub fn with_grid(mut self, grid: impl Into<String>) -> Self {
        self.grid = grid.into();
        self
    }

    /// Sets the geographic area descriptor.
    pub fn with_area(mut self, area: impl Into<String>) -> Self {
        self.area = area.into();
        self
    }

    /// Returns the metadata value for `name`.
    ///
    /// `valid_datetime` is resolved from the timestamp slot; every other
    /// name is looked up in the MARS key set.
    pub fn metadata(&self, name: &str) -> Option<&str> {
        match name {
            "valid_datetime" => self.valid_datetime.as_deref(),
            _ => self.mars.get(name),
        }
    }

    /// Returns the MARS key set.
    pub fn as_mars(&self) -> &MarsKeys {
        &self.mars
    }

    /// Returns the valid timestamp, if set.
    pub fn valid_datetime(&self) -> Option<&str> {
        self.valid_datetime.as_deref()
    }

    /// Returns the grid descriptor.
    pub fn grid(&self) -> &str {
        &self.grid
    }

    /// Returns the geographic area descriptor.
    pub fn area(&self) -> &str {
        &self.area
    }

    /// Returns the numeric grid.
    pub fn values(&self) -> &ArrayD<f64> {
        &self.values
    }

    /// Returns the grid shape.
    pub fn shape(&self) -> &[usize] {
        self.values.shape()
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field(")?;
        let mut first = true;
        for (k, v) in self.mars.iter() {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{k}={v}")?;
            first = false;
        }
        if let Some(dt) = &self.valid_datetime {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "valid_datetime={dt}")?;
        }
        write!(f, ")")
    }
}
