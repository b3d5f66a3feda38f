//! Point series extraction from graph-like sources.

use crate::error::{Error, Result};
use crate::source::PointSource;
use tracing::debug;

/// Paired x and y coordinates read from a [`PointSource`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PointSeries {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl PointSeries {
    /// Read exactly `point_count()` values from each coordinate buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSource`] if an accessor fails and
    /// [`Error::MalformedBuffer`] if a buffer is shorter than the count.
    pub fn extract<S: PointSource + ?Sized>(source: &S) -> Result<Self> {
        let n = source
            .point_count()
            .map_err(|e| Error::InvalidSource(format!("point_count() failed: {e}")))?;
        let xs = source
            .x_values()
            .map_err(|e| Error::InvalidSource(format!("x_values() failed: {e}")))?;
        let ys = source
            .y_values()
            .map_err(|e| Error::InvalidSource(format!("y_values() failed: {e}")))?;

        for buffer in [xs, ys] {
            if buffer.len() < n {
                return Err(Error::MalformedBuffer { expected: n, actual: buffer.len() });
            }
        }

        debug!(points = n, "extracted point series");
        Ok(Self { x: xs[..n].to_vec(), y: ys[..n].to_vec() })
    }

    /// Build a series from explicit coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLengthMismatch`] if the lengths differ.
    pub fn from_xy(x: &[f64], y: &[f64]) -> Result<Self> {
        if x.len() != y.len() {
            return Err(Error::DataLengthMismatch { x_len: x.len(), y_len: y.len() });
        }
        Ok(Self { x: x.to_vec(), y: y.to_vec() })
    }

    /// X coordinates.
    #[must_use]
    pub fn x(&self) -> &[f64] {
        &self.x
    }

    /// Y coordinates.
    #[must_use]
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// True if there are no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Iterate over `(x, y)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Finite `((x_min, x_max), (y_min, y_max))` over points with both
    /// coordinates finite.
    #[must_use]
    pub fn extents(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut finite = self.iter().filter(|(x, y)| x.is_finite() && y.is_finite());
        let (x0, y0) = finite.next()?;
        Some(finite.fold(((x0, x0), (y0, y0)), |((xl, xh), (yl, yh)), (x, y)| {
            ((xl.min(x), xh.max(x)), (yl.min(y), yh.max(y)))
        }))
    }
}
