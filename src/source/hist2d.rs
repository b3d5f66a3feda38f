//! In-memory two-dimensional histogram.

use super::{check_bin, Axis, GridSource, SourceResult};
use crate::error::Result;

/// A weighted 2-D histogram stored as one flat buffer.
///
/// The buffer holds `(nx + 2) * (ny + 2)` cells including one boundary bin
/// on each side of both axes. Cell `(ix, iy)` lives at
/// `ix + (nx + 2) * iy`, so rows follow y and columns follow x.
#[derive(Debug, Clone, PartialEq)]
pub struct Hist2D {
    name: String,
    x_axis: Axis,
    y_axis: Axis,
    sumw: Vec<f64>,
    sumw2: Vec<f64>,
    entries: u64,
}

impl Hist2D {
    /// Create an empty histogram over the given axes.
    #[must_use]
    pub fn new(name: impl Into<String>, x_axis: Axis, y_axis: Axis) -> Self {
        let size = (x_axis.n_bins() + 2) * (y_axis.n_bins() + 2);
        Self {
            name: name.into(),
            x_axis,
            y_axis,
            sumw: vec![0.0; size],
            sumw2: vec![0.0; size],
            entries: 0,
        }
    }

    /// Create an empty histogram with uniform binning on both axes.
    ///
    /// # Errors
    ///
    /// Returns an error if either axis is invalid.
    pub fn uniform(
        name: impl Into<String>,
        x_bins: (usize, f64, f64),
        y_bins: (usize, f64, f64),
    ) -> Result<Self> {
        let x_axis = Axis::uniform(x_bins.0, x_bins.1, x_bins.2)?;
        let y_axis = Axis::uniform(y_bins.0, y_bins.1, y_bins.2)?;
        Ok(Self::new(name, x_axis, y_axis))
    }

    /// Histogram name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The x binning.
    #[must_use]
    pub fn x_axis(&self) -> &Axis {
        &self.x_axis
    }

    /// The y binning.
    #[must_use]
    pub fn y_axis(&self) -> &Axis {
        &self.y_axis
    }

    /// Number of fill calls.
    #[must_use]
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Flat index of cell `(ix, iy)`.
    pub fn global_bin(&self, ix: usize, iy: usize) -> SourceResult<usize> {
        let ix = check_bin(ix, 0, self.x_axis.n_bins() + 1)?;
        let iy = check_bin(iy, 0, self.y_axis.n_bins() + 1)?;
        Ok(ix + (self.x_axis.n_bins() + 2) * iy)
    }

    /// Add one unit-weight entry at `(x, y)`.
    pub fn fill(&mut self, x: f64, y: f64) -> usize {
        self.fill_weighted(x, y, 1.0)
    }

    /// Add an entry at `(x, y)` with weight `w`. Returns the flat index.
    pub fn fill_weighted(&mut self, x: f64, y: f64, w: f64) -> usize {
        let ix = self.x_axis.find_bin(x);
        let iy = self.y_axis.find_bin(y);
        let global = ix + (self.x_axis.n_bins() + 2) * iy;
        self.sumw[global] += w;
        self.sumw2[global] += w * w;
        self.entries += 1;
        global
    }

    /// Content of cell `(ix, iy)`.
    pub fn bin_content(&self, ix: usize, iy: usize) -> SourceResult<f64> {
        Ok(self.sumw[self.global_bin(ix, iy)?])
    }

    /// Error of cell `(ix, iy)`.
    pub fn bin_error(&self, ix: usize, iy: usize) -> SourceResult<f64> {
        Ok(self.sumw2[self.global_bin(ix, iy)?].sqrt())
    }

    /// Overwrite the content of cell `(ix, iy)`.
    pub fn set_bin_content(&mut self, ix: usize, iy: usize, content: f64) -> SourceResult<()> {
        let global = self.global_bin(ix, iy)?;
        self.sumw[global] = content;
        Ok(())
    }
}

impl GridSource for Hist2D {
    fn flat_buffer(&self) -> SourceResult<&[f64]> {
        Ok(&self.sumw)
    }

    fn total_size(&self) -> SourceResult<usize> {
        Ok(self.sumw.len())
    }

    fn row_bin_count(&self) -> SourceResult<usize> {
        Ok(self.y_axis.n_bins())
    }

    fn col_bin_count(&self) -> SourceResult<usize> {
        Ok(self.x_axis.n_bins())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_layout() {
        let hist = Hist2D::uniform("h", (19, 0.0, 1.0), (13, 0.0, 1.0)).unwrap();
        assert_eq!(hist.total_size(), Ok(21 * 15));
        assert_eq!(hist.row_bin_count(), Ok(13));
        assert_eq!(hist.col_bin_count(), Ok(19));
        assert_eq!(hist.global_bin(1, 1), Ok(22));
    }

    #[test]
    fn test_fill_lands_in_row_major_cell() {
        let mut hist = Hist2D::uniform("h", (2, 0.0, 2.0), (3, 0.0, 3.0)).unwrap();
        let global = hist.fill(1.5, 2.5);
        // ix = 2, iy = 3, row stride = 4
        assert_eq!(global, 2 + 4 * 3);
        assert_eq!(hist.bin_content(2, 3), Ok(1.0));
        assert_eq!(hist.flat_buffer().unwrap()[14], 1.0);
        assert_eq!(hist.entries(), 1);
    }

    #[test]
    fn test_boundary_cells() {
        let mut hist = Hist2D::uniform("h", (2, 0.0, 1.0), (2, 0.0, 1.0)).unwrap();
        hist.fill(-1.0, 5.0);
        assert_eq!(hist.bin_content(0, 3), Ok(1.0));
        hist.fill_weighted(0.2, 0.2, 2.0);
        assert_eq!(hist.bin_error(1, 1), Ok(2.0));
    }

    #[test]
    fn test_set_bin_content_bounds() {
        let mut hist = Hist2D::uniform("h", (2, 0.0, 1.0), (2, 0.0, 1.0)).unwrap();
        assert!(hist.set_bin_content(1, 2, 4.0).is_ok());
        assert!(hist.set_bin_content(4, 0, 4.0).is_err());
        assert_eq!(hist.bin_content(1, 2), Ok(4.0));
    }
}
