//! Configuration for the recentering run.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Variables clipped to non-negative values by default.
///
/// Humidity, precipitation-type, and soil-water variables are physically
/// non-negative; recentering can push individual gridpoints below zero.
pub const CLIP_VARIABLES: [&str; 9] = [
    "q", "cp", "lsp", "tp", "sf", "swl4", "swl3", "swl2", "swl1",
];

/// Configuration for [`compute_perturbations`](crate::compute_perturbations).
#[derive(Debug, Clone)]
pub struct RecenterConfig {
    /// Parameter names whose recentered values are clamped to `>= 0`.
    clip_variables: BTreeSet<String>,
    /// Explicit output path (None = anonymous temp file, reopened and
    /// returned as an in-memory collection handle).
    output: Option<PathBuf>,
}

impl RecenterConfig {
    /// Creates a configuration with the default clip set and no explicit
    /// output path.
    pub fn new() -> Self {
        Self {
            clip_variables: CLIP_VARIABLES.iter().map(|s| s.to_string()).collect(),
            output: None,
        }
    }

    /// Replaces the clip variable set.
    pub fn with_clip_variables<I, S>(mut self, variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clip_variables = variables.into_iter().map(Into::into).collect();
        self
    }

    /// Sets an explicit output path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    /// Returns the clip variable set.
    pub fn clip_variables(&self) -> &BTreeSet<String> {
        &self.clip_variables
    }

    /// Returns whether `param` is clipped to non-negative values.
    pub fn is_clipped(&self, param: &str) -> bool {
        self.clip_variables.contains(param)
    }

    /// Returns the explicit output path, if set.
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

impl Default for RecenterConfig {
    fn default() -> Self {
        Self::new()
    }
}
