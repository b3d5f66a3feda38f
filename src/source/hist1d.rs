//! In-memory one-dimensional histogram.

use super::{check_bin, Axis, BinnedSource, SourceResult};
use crate::error::Result;

/// A weighted 1-D histogram with underflow and overflow bins.
///
/// Storage is indexed by the 1-based bin numbering of [`Axis`]: index `0`
/// is underflow and index `n_bins + 1` is overflow. Bin errors are the
/// square root of the summed squared weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Hist1D {
    name: String,
    title: String,
    axis: Axis,
    sumw: Vec<f64>,
    sumw2: Vec<f64>,
    entries: u64,
}

impl Hist1D {
    /// Create an empty histogram over `axis`.
    #[must_use]
    pub fn new(name: impl Into<String>, axis: Axis) -> Self {
        let slots = axis.n_bins() + 2;
        Self {
            name: name.into(),
            title: String::new(),
            axis,
            sumw: vec![0.0; slots],
            sumw2: vec![0.0; slots],
            entries: 0,
        }
    }

    /// Create an empty histogram with `n_bins` equal bins over `[min, max)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the axis is invalid.
    pub fn uniform(name: impl Into<String>, n_bins: usize, min: f64, max: f64) -> Result<Self> {
        Ok(Self::new(name, Axis::uniform(n_bins, min, max)?))
    }

    /// Set the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Histogram name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Histogram title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The binning.
    #[must_use]
    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    /// Number of fill calls.
    #[must_use]
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Add one unit-weight entry at `x`. Returns the bin that was filled.
    pub fn fill(&mut self, x: f64) -> usize {
        self.fill_weighted(x, 1.0)
    }

    /// Add an entry at `x` with weight `w`. Returns the bin that was filled.
    pub fn fill_weighted(&mut self, x: f64, w: f64) -> usize {
        let bin = self.axis.find_bin(x);
        self.sumw[bin] += w;
        self.sumw2[bin] += w * w;
        self.entries += 1;
        bin
    }

    /// Overwrite the content of `bin` (flow bins included).
    pub fn set_bin_content(&mut self, bin: usize, content: f64) -> SourceResult<()> {
        let bin = check_bin(bin, 0, self.axis.n_bins() + 1)?;
        self.sumw[bin] = content;
        Ok(())
    }

    /// Overwrite the error of `bin` (flow bins included).
    pub fn set_bin_error(&mut self, bin: usize, error: f64) -> SourceResult<()> {
        let bin = check_bin(bin, 0, self.axis.n_bins() + 1)?;
        self.sumw2[bin] = error * error;
        Ok(())
    }

    /// Sum of the real-bin contents.
    #[must_use]
    pub fn integral(&self) -> f64 {
        self.sumw[1..=self.axis.n_bins()].iter().sum()
    }

    /// Underflow bin content.
    #[must_use]
    pub fn underflow(&self) -> f64 {
        self.sumw[0]
    }

    /// Overflow bin content.
    #[must_use]
    pub fn overflow(&self) -> f64 {
        self.sumw[self.axis.n_bins() + 1]
    }
}

impl BinnedSource for Hist1D {
    fn bin_count(&self) -> SourceResult<usize> {
        Ok(self.axis.n_bins())
    }

    fn bin_content(&self, bin: usize) -> SourceResult<f64> {
        let bin = check_bin(bin, 0, self.axis.n_bins() + 1)?;
        Ok(self.sumw[bin])
    }

    fn bin_error(&self, bin: usize) -> SourceResult<f64> {
        let bin = check_bin(bin, 0, self.axis.n_bins() + 1)?;
        Ok(self.sumw2[bin].sqrt())
    }

    fn bin_low_edge(&self, bin: usize) -> SourceResult<f64> {
        self.axis.low_edge(bin)
    }

    fn bin_width(&self, bin: usize) -> SourceResult<f64> {
        self.axis.width(bin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_and_read() {
        let mut hist = Hist1D::uniform("h", 4, 0.0, 4.0).unwrap();
        hist.fill(0.5);
        hist.fill(0.5);
        hist.fill_weighted(2.5, 3.0);

        assert_eq!(hist.bin_content(1), Ok(2.0));
        assert_eq!(hist.bin_content(3), Ok(3.0));
        assert_eq!(hist.bin_error(3), Ok(3.0));
        assert!((hist.bin_error(1).unwrap() - 2.0_f64.sqrt()).abs() < 1e-12);
        assert_eq!(hist.entries(), 3);
        assert_eq!(hist.integral(), 5.0);
    }

    #[test]
    fn test_flow_bins() {
        let mut hist = Hist1D::uniform("h", 2, 0.0, 1.0).unwrap();
        assert_eq!(hist.fill(-1.0), 0);
        assert_eq!(hist.fill(1.0), 3);
        assert_eq!(hist.underflow(), 1.0);
        assert_eq!(hist.overflow(), 1.0);
        assert_eq!(hist.integral(), 0.0);
    }

    #[test]
    fn test_set_bin_content_and_error() {
        let mut hist = Hist1D::uniform("h", 3, 0.0, 3.0).unwrap().with_title("counts");
        hist.set_bin_content(2, 7.0).unwrap();
        hist.set_bin_error(2, 0.5).unwrap();
        assert_eq!(hist.bin_content(2), Ok(7.0));
        assert_eq!(hist.bin_error(2), Ok(0.5));
        assert!(hist.set_bin_content(5, 1.0).is_err());
        assert_eq!(hist.title(), "counts");
        assert_eq!(hist.name(), "h");
    }

    #[test]
    fn test_out_of_range_accessors() {
        let hist = Hist1D::uniform("h", 3, 0.0, 3.0).unwrap();
        assert!(hist.bin_content(5).is_err());
        assert_eq!(hist.bin_low_edge(4), Ok(3.0));
        assert!(hist.bin_width(4).is_err());
    }
}
