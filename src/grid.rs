//! Two-dimensional grid extraction.
//!
//! A 2-D histogram stores its cells as one flat row-major buffer with a
//! boundary bin on every side. [`Grid2D`] reshapes that buffer into a
//! matrix, optionally stripping the boundary rows and columns.
//!
//! ```text
//!   c0  c1  ..  cN+1
//!  +---+---+---+---+   r0    (boundary)
//!  |   | a | b |   |   r1..rN (real rows)
//!  +---+---+---+---+   rN+1  (boundary)
//! ```

use crate::error::{Error, Result};
use crate::source::GridSource;
use tracing::debug;

/// A row-major matrix of 2-D histogram contents.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid2D {
    values: Vec<f64>,
    n_rows: usize,
    n_cols: usize,
    stripped: bool,
}

impl Grid2D {
    /// Read the flat buffer of `source` and reshape it.
    ///
    /// The source's `total_size()` elements are read from its buffer and
    /// arranged into `row_bin_count() + 2` rows of `col_bin_count() + 2`
    /// values. With `strip_boundary`, the outer rows and columns are
    /// removed, leaving exactly the real bins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSource`] if an accessor fails, and
    /// [`Error::MalformedBuffer`] if the buffer holds fewer than
    /// `total_size()` elements or `total_size()` disagrees with the
    /// declared bin counts.
    pub fn extract<S: GridSource + ?Sized>(source: &S, strip_boundary: bool) -> Result<Self> {
        let n_rows = source
            .row_bin_count()
            .map_err(|e| Error::InvalidSource(format!("row_bin_count() failed: {e}")))?;
        let n_cols = source
            .col_bin_count()
            .map_err(|e| Error::InvalidSource(format!("col_bin_count() failed: {e}")))?;
        let total = source
            .total_size()
            .map_err(|e| Error::InvalidSource(format!("total_size() failed: {e}")))?;
        let buffer = source
            .flat_buffer()
            .map_err(|e| Error::InvalidSource(format!("flat_buffer() failed: {e}")))?;

        if buffer.len() < total {
            return Err(Error::MalformedBuffer { expected: total, actual: buffer.len() });
        }

        let grid = Self::from_flat(&buffer[..total], n_rows, n_cols, strip_boundary)?;
        debug!(rows = n_rows, cols = n_cols, stripped = strip_boundary, "extracted 2-D grid");
        Ok(grid)
    }

    /// Reshape a flat buffer holding `(n_rows + 2) * (n_cols + 2)` values.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedBuffer`] if the buffer length differs from
    /// the size implied by the bin counts.
    pub fn from_flat(
        buffer: &[f64],
        n_rows: usize,
        n_cols: usize,
        strip_boundary: bool,
    ) -> Result<Self> {
        let full_rows = n_rows.checked_add(2);
        let full_cols = n_cols.checked_add(2);
        let expected = full_rows.zip(full_cols).and_then(|(r, c)| r.checked_mul(c));

        let Some(expected) = expected else {
            return Err(Error::MalformedBuffer { expected: usize::MAX, actual: buffer.len() });
        };
        if buffer.len() != expected {
            return Err(Error::MalformedBuffer { expected, actual: buffer.len() });
        }

        let stride = n_cols + 2;
        let values = if strip_boundary {
            buffer
                .chunks_exact(stride)
                .skip(1)
                .take(n_rows)
                .flat_map(|row| row[1..=n_cols].iter().copied())
                .collect()
        } else {
            buffer.to_vec()
        };

        let (n_rows, n_cols) = if strip_boundary { (n_rows, n_cols) } else { (n_rows + 2, stride) };
        Ok(Self { values, n_rows, n_cols, stripped: strip_boundary })
    }

    /// `(rows, columns)` of the matrix as held.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Number of rows.
    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    #[must_use]
    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// True if the boundary rows and columns were removed.
    #[must_use]
    pub fn is_stripped(&self) -> bool {
        self.stripped
    }

    /// Value at `(row, col)`.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.n_rows || col >= self.n_cols {
            return None;
        }
        self.values.get(row * self.n_cols + col).copied()
    }

    /// One row as a slice.
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row >= self.n_rows {
            return None;
        }
        let start = row * self.n_cols;
        self.values.get(start..start + self.n_cols)
    }

    /// Iterate over rows, first row first.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunks_exact panics on 0
        self.values.chunks_exact(self.n_cols.max(1))
    }

    /// All values, row-major.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Finite `(min, max)` over all values.
    #[must_use]
    pub fn extent(&self) -> Option<(f64, f64)> {
        let mut finite = self.values.iter().copied().filter(|v| v.is_finite());
        let first = finite.next()?;
        Some(finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Hist2D, SourceResult};

    /// Source that reports whatever sizes it is told to.
    struct RawGrid {
        buffer: Vec<f64>,
        total: usize,
        rows: usize,
        cols: usize,
    }

    impl GridSource for RawGrid {
        fn flat_buffer(&self) -> SourceResult<&[f64]> {
            Ok(&self.buffer)
        }
        fn total_size(&self) -> SourceResult<usize> {
            Ok(self.total)
        }
        fn row_bin_count(&self) -> SourceResult<usize> {
            Ok(self.rows)
        }
        fn col_bin_count(&self) -> SourceResult<usize> {
            Ok(self.cols)
        }
    }

    fn raw(total: usize, rows: usize, cols: usize) -> RawGrid {
        RawGrid { buffer: (0..total).map(|i| i as f64).collect(), total, rows, cols }
    }

    #[test]
    fn test_extract_stripped_shape() {
        let grid = Grid2D::extract(&raw(144, 10, 10), true).unwrap();
        assert_eq!(grid.shape(), (10, 10));
        assert!(grid.is_stripped());
        // first real cell is row 1, col 1 of a 12-wide buffer
        assert_eq!(grid.get(0, 0), Some(13.0));
        assert_eq!(grid.get(9, 9), Some(130.0));
    }

    #[test]
    fn test_extract_full_shape() {
        let grid = Grid2D::extract(&raw(144, 10, 10), false).unwrap();
        assert_eq!(grid.shape(), (12, 12));
        assert_eq!(grid.values().len(), 144);
        assert_eq!(grid.row(1).unwrap()[0], 12.0);
    }

    #[test]
    fn test_extract_size_mismatch() {
        let err = Grid2D::extract(&raw(100, 10, 10), true).unwrap_err();
        assert!(matches!(err, Error::MalformedBuffer { expected: 144, actual: 100 }));
    }

    #[test]
    fn test_extract_short_buffer() {
        let mut source = raw(144, 10, 10);
        source.buffer.truncate(50);
        let err = Grid2D::extract(&source, false).unwrap_err();
        assert!(matches!(err, Error::MalformedBuffer { expected: 144, actual: 50 }));
    }

    #[test]
    fn test_extract_reads_only_total_size() {
        let mut source = raw(144, 10, 10);
        source.buffer.extend([1.0, 2.0, 3.0]);
        let grid = Grid2D::extract(&source, false).unwrap();
        assert_eq!(grid.values().len(), 144);
    }

    #[test]
    fn test_extract_hist2d_orientation() {
        let mut hist = Hist2D::uniform("h", (3, 0.0, 3.0), (2, 0.0, 2.0)).unwrap();
        hist.fill_weighted(2.5, 0.5, 7.0);
        let grid = Grid2D::extract(&hist, true).unwrap();
        // rows follow y, columns follow x
        assert_eq!(grid.shape(), (2, 3));
        assert_eq!(grid.get(0, 2), Some(7.0));
        assert_eq!(grid.rows().count(), 2);
    }

    #[test]
    fn test_degenerate_grid() {
        let grid = Grid2D::from_flat(&[1.0, 2.0, 3.0, 4.0], 0, 0, true).unwrap();
        assert_eq!(grid.shape(), (0, 0));
        assert!(grid.values().is_empty());
        assert!(grid.extent().is_none());
    }

    #[test]
    fn test_extent_skips_non_finite() {
        let grid =
            Grid2D::from_flat(&[f64::NAN, -1.0, 4.0, f64::INFINITY], 0, 0, false).unwrap();
        assert_eq!(grid.extent(), Some((-1.0, 4.0)));
        assert!(grid.get(2, 0).is_none());
    }
}
