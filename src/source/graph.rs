//! In-memory point graph.

use super::{PointSource, SourceResult};
use crate::error::{Error, Result};

/// A set of `(x, y)` points.
#[derive(Debug, Clone, PartialEq)]
pub struct Graph {
    name: String,
    x: Vec<f64>,
    y: Vec<f64>,
}

impl Graph {
    /// Create a graph from paired coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] if `x` and `y` differ in length.
    pub fn new(name: impl Into<String>, x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(Error::DataLengthMismatch {
                x_len: x.len(),
                y_len: y.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            x: x.to_vec(),
            y: y.to_vec(),
        })
    }

    /// Graph name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a point.
    pub fn push(&mut self, x: f64, y: f64) {
        self.x.push(x);
        self.y.push(y);
    }
}

impl PointSource for Graph {
    fn point_count(&self) -> SourceResult<usize> {
        Ok(self.x.len())
    }

    fn x_values(&self) -> SourceResult<&[f64]> {
        Ok(&self.x)
    }

    fn y_values(&self) -> SourceResult<&[f64]> {
        Ok(&self.y)
    }
}
