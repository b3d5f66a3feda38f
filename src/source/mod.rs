//! Histogram sources.
//!
//! The extractors never talk to an analysis framework directly. They consume
//! the small accessor contracts defined here, which a framework binding (or
//! the in-memory histograms in this module) implements.
//!
//! # Bin numbering
//!
//! 1-D sources use the framework's 1-based numbering: bin `0` is the
//! underflow bin, bins `1..=n` are the real bins and bin `n + 1` is the
//! overflow bin. `bin_low_edge(n + 1)` must return the upper edge of the
//! last real bin.

mod axis;
mod graph;
mod hist1d;
mod hist2d;
mod profile;

pub use axis::Axis;
pub use graph::Graph;
pub use hist1d::Hist1D;
pub use hist2d::Hist2D;
pub use profile::Profile1D;

use thiserror::Error;

/// Failure reported by a source accessor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The requested bin does not exist.
    #[error("bin {bin} out of range (valid bins: {first}..={last})")]
    BinOutOfRange {
        /// Requested bin number.
        bin: usize,
        /// First valid bin number.
        first: usize,
        /// Last valid bin number.
        last: usize,
    },

    /// The source cannot provide this accessor.
    #[error("accessor unavailable: {0}")]
    Unavailable(String),
}

/// Result type for source accessors.
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// A one-dimensional binned object (histogram or profile).
pub trait BinnedSource {
    /// Number of real bins, excluding underflow and overflow.
    fn bin_count(&self) -> SourceResult<usize>;

    /// Content of bin `bin` (1-based).
    fn bin_content(&self, bin: usize) -> SourceResult<f64>;

    /// Statistical uncertainty of bin `bin` (1-based).
    fn bin_error(&self, bin: usize) -> SourceResult<f64>;

    /// Lower edge of bin `bin` (1-based, valid up to `bin_count() + 1`).
    fn bin_low_edge(&self, bin: usize) -> SourceResult<f64>;

    /// Width of bin `bin` (1-based).
    fn bin_width(&self, bin: usize) -> SourceResult<f64>;
}

/// A two-dimensional histogram exposing its raw storage.
///
/// The buffer is row-major with one boundary bin on each side of both
/// axes: rows follow the y axis, columns follow the x axis.
pub trait GridSource {
    /// The raw backing buffer, including boundary bins.
    fn flat_buffer(&self) -> SourceResult<&[f64]>;

    /// Number of elements the histogram reports for its buffer.
    fn total_size(&self) -> SourceResult<usize>;

    /// Number of real bins along the row (y) axis.
    fn row_bin_count(&self) -> SourceResult<usize>;

    /// Number of real bins along the column (x) axis.
    fn col_bin_count(&self) -> SourceResult<usize>;
}

/// A scatter-like object made of `(x, y)` points.
pub trait PointSource {
    /// Number of points.
    fn point_count(&self) -> SourceResult<usize>;

    /// The x coordinate buffer.
    fn x_values(&self) -> SourceResult<&[f64]>;

    /// The y coordinate buffer.
    fn y_values(&self) -> SourceResult<&[f64]>;
}

impl<S: BinnedSource + ?Sized> BinnedSource for &S {
    fn bin_count(&self) -> SourceResult<usize> {
        (**self).bin_count()
    }

    fn bin_content(&self, bin: usize) -> SourceResult<f64> {
        (**self).bin_content(bin)
    }

    fn bin_error(&self, bin: usize) -> SourceResult<f64> {
        (**self).bin_error(bin)
    }

    fn bin_low_edge(&self, bin: usize) -> SourceResult<f64> {
        (**self).bin_low_edge(bin)
    }

    fn bin_width(&self, bin: usize) -> SourceResult<f64> {
        (**self).bin_width(bin)
    }
}

/// Check that `bin` lies in `first..=last`.
pub(crate) fn check_bin(bin: usize, first: usize, last: usize) -> SourceResult<usize> {
    if bin < first || bin > last {
        return Err(SourceError::BinOutOfRange { bin, first, last });
    }
    Ok(bin)
}
