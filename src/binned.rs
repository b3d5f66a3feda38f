//! One-dimensional binned series extraction.
//!
//! [`BinnedSeries`] holds four aligned arrays read from a
//! [`BinnedSource`]: bin contents, bin errors, bin edges and bin centers.
//! They are the positional inputs every histogram-style layer consumes.
//!
//! ```text
//! edges:    |____|____|____|___..
//!          [0]  [1]  [2]  [3]
//! centers:    |_____|_____|_____|__...
//!               [0]   [1]   [2]
//! ```

use crate::error::{Error, Result};
use crate::source::{BinnedSource, SourceError};
use tracing::debug;

/// Contents, errors, edges and centers of a 1-D binned object.
///
/// `contents`, `errors` and `centers` have one entry per bin and `edges`
/// has one more. The four arrays always change together.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BinnedSeries {
    contents: Vec<f64>,
    errors: Vec<f64>,
    edges: Vec<f64>,
    centers: Vec<f64>,
}

/// Wrap an accessor failure with the accessor name and bin number.
fn accessor_error(accessor: &str, bin: usize, err: &SourceError) -> Error {
    Error::InvalidSource(format!("{accessor}({bin}) failed: {err}"))
}

impl BinnedSeries {
    /// Read all bins of `source` in a single pass.
    ///
    /// Accessors are called with 1-based bin numbers: bins `1..=n` for
    /// content, error, low edge and width, and `n + 1` for the closing low
    /// edge. Values pass through unchanged.
    ///
    /// A source with zero bins yields an empty series.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSource`] if the bin count or any accessor
    /// fails, or if the source's edges are not strictly increasing.
    /// Centers are taken as computed; a bin narrower than the float spacing
    /// at its low edge may report a center equal to that edge.
    pub fn extract<S: BinnedSource + ?Sized>(source: &S) -> Result<Self> {
        let n = source
            .bin_count()
            .map_err(|e| Error::InvalidSource(format!("bin_count() failed: {e}")))?;

        let mut contents = Vec::with_capacity(n);
        let mut errors = Vec::with_capacity(n);
        let mut edges = Vec::with_capacity(n + 1);
        let mut centers = Vec::with_capacity(n);

        for bin in 1..=n {
            let content =
                source.bin_content(bin).map_err(|e| accessor_error("bin_content", bin, &e))?;
            let error = source.bin_error(bin).map_err(|e| accessor_error("bin_error", bin, &e))?;
            let low = source.bin_low_edge(bin).map_err(|e| accessor_error("bin_low_edge", bin, &e))?;
            let width = source.bin_width(bin).map_err(|e| accessor_error("bin_width", bin, &e))?;

            contents.push(content);
            errors.push(error);
            edges.push(low);
            centers.push(low + width / 2.0);
        }

        if n > 0 {
            let closing = source
                .bin_low_edge(n + 1)
                .map_err(|e| accessor_error("bin_low_edge", n + 1, &e))?;
            edges.push(closing);
        }

        let series = Self { contents, errors, edges, centers };
        series.check_edges().map_err(Error::InvalidSource)?;

        debug!(bins = n, "extracted binned series");
        Ok(series)
    }

    /// Build a series from explicit arrays; centers are bin midpoints.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the lengths disagree or the edges
    /// are not strictly increasing.
    pub fn from_parts(contents: Vec<f64>, errors: Vec<f64>, edges: Vec<f64>) -> Result<Self> {
        if contents.is_empty() && errors.is_empty() && edges.is_empty() {
            return Ok(Self::default());
        }
        if errors.len() != contents.len() || edges.len() != contents.len() + 1 {
            return Err(Error::Configuration(format!(
                "series arrays disagree: {} contents, {} errors, {} edges",
                contents.len(),
                errors.len(),
                edges.len()
            )));
        }

        let centers = edges.windows(2).map(|w| w[0] + (w[1] - w[0]) / 2.0).collect();
        let series = Self { contents, errors, edges, centers };
        series.check_edges().map_err(Error::Configuration)?;
        series.check_centers().map_err(Error::Configuration)?;
        Ok(series)
    }

    fn check_edges(&self) -> std::result::Result<(), String> {
        if let Some(i) = self.edges.windows(2).position(|w| !(w[0] < w[1])) {
            return Err(format!(
                "bin edges not strictly increasing at bin {}: {} then {}",
                i + 1,
                self.edges[i],
                self.edges[i + 1]
            ));
        }
        Ok(())
    }

    /// Every center strictly inside its bin.
    fn check_centers(&self) -> std::result::Result<(), String> {
        let misplaced = self
            .centers
            .iter()
            .zip(self.edges.windows(2))
            .position(|(&c, w)| !(w[0] < c && c < w[1]));
        if let Some(i) = misplaced {
            return Err(format!(
                "bin center {} outside bin {} [{}, {}]",
                self.centers[i],
                i + 1,
                self.edges[i],
                self.edges[i + 1]
            ));
        }
        Ok(())
    }

    /// Remove every bin whose content is exactly zero.
    ///
    /// The same index is removed from all four arrays; for `edges` that is
    /// the bin's low edge. The remaining edges no longer partition the axis
    /// contiguously: a dropped bin's span is absorbed by its left
    /// neighbour when drawn. Only exact `0.0` (or `-0.0`) is dropped.
    #[must_use]
    pub fn drop_zero_bins(&self) -> Self {
        let mut out = self.clone();
        let zero_bins: Vec<usize> =
            (0..self.contents.len()).filter(|&i| self.contents[i] == 0.0).collect();

        for &i in zero_bins.iter().rev() {
            out.contents.remove(i);
            out.errors.remove(i);
            out.centers.remove(i);
            out.edges.remove(i);
        }

        if !zero_bins.is_empty() {
            debug!(dropped = zero_bins.len(), remaining = out.len(), "dropped zero-content bins");
        }
        out
    }

    /// Bin contents.
    #[must_use]
    pub fn contents(&self) -> &[f64] {
        &self.contents
    }

    /// Bin errors.
    #[must_use]
    pub fn errors(&self) -> &[f64] {
        &self.errors
    }

    /// Bin edges (`len() + 1` entries, empty for an empty series).
    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Bin centers.
    #[must_use]
    pub fn centers(&self) -> &[f64] {
        &self.centers
    }

    /// Number of bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// True if the series has no bins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Sum of the bin contents.
    #[must_use]
    pub fn integral(&self) -> f64 {
        self.contents.iter().sum()
    }

    /// Lowest and highest edge.
    #[must_use]
    pub fn x_range(&self) -> Option<(f64, f64)> {
        Some((*self.edges.first()?, *self.edges.last()?))
    }

    /// Finite `(min, max)` of `content ± error` over all bins.
    #[must_use]
    pub fn error_band_extent(&self) -> Option<(f64, f64)> {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (&c, &e) in self.contents.iter().zip(&self.errors) {
            let e = if e.is_finite() { e.abs() } else { 0.0 };
            if c.is_finite() {
                lo = lo.min(c - e);
                hi = hi.max(c + e);
            }
        }
        (lo <= hi).then_some((lo, hi))
    }

    /// True if both series have identical edges.
    #[must_use]
    pub fn has_same_binning(&self, other: &Self) -> bool {
        self.edges == other.edges
    }

    /// Bin-wise `self / denominator`.
    ///
    /// Errors combine both inputs: `e² = (e₁²·c₂² + e₂²·c₁²) / c₂⁴`. A zero
    /// denominator bin gives ratio `0` with error `0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the binnings differ.
    pub fn ratio_to(&self, denominator: &Self) -> Result<Self> {
        if !self.has_same_binning(denominator) {
            return Err(Error::Configuration(
                "ratio requires identical binning in numerator and denominator".to_string(),
            ));
        }

        let mut contents = Vec::with_capacity(self.len());
        let mut errors = Vec::with_capacity(self.len());
        for i in 0..self.len() {
            let (c1, e1) = (self.contents[i], self.errors[i]);
            let (c2, e2) = (denominator.contents[i], denominator.errors[i]);
            if c2 == 0.0 {
                contents.push(0.0);
                errors.push(0.0);
                continue;
            }
            let c2_sq = c2 * c2;
            contents.push(c1 / c2);
            errors.push(((e1 * e1 * c2_sq + e2 * e2 * c1 * c1) / (c2_sq * c2_sq)).sqrt());
        }

        Ok(Self {
            contents,
            errors,
            edges: self.edges.clone(),
            centers: self.centers.clone(),
        })
    }

    /// Bin-wise sum of several series; errors add in quadrature.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `series` is empty or the binnings
    /// differ.
    pub fn sum(series: &[Self]) -> Result<Self> {
        let first = series
            .first()
            .ok_or_else(|| Error::Configuration("cannot sum an empty list of series".to_string()))?;
        ensure_same_binning(series)?;

        let mut total = first.clone();
        for other in &series[1..] {
            for i in 0..total.len() {
                total.contents[i] += other.contents[i];
                total.errors[i] = total.errors[i].hypot(other.errors[i]);
            }
        }
        Ok(total)
    }
}

fn ensure_same_binning(series: &[BinnedSeries]) -> Result<()> {
    if let Some(first) = series.first() {
        if let Some(k) = series.iter().position(|s| !s.has_same_binning(first)) {
            return Err(Error::Configuration(format!(
                "series {k} has different binning from series 0"
            )));
        }
    }
    Ok(())
}

/// Running sums of contents for stacked drawing.
///
/// Entry `k` holds, per bin, the sum of contents of series `0..=k`.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if the series do not share binning.
pub fn stack_cumulative(series: &[BinnedSeries]) -> Result<Vec<Vec<f64>>> {
    ensure_same_binning(series)?;

    let mut layers: Vec<Vec<f64>> = Vec::with_capacity(series.len());
    for s in series {
        let layer = match layers.last() {
            Some(below) => below.iter().zip(&s.contents).map(|(b, c)| b + c).collect(),
            None => s.contents.clone(),
        };
        layers.push(layer);
    }
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Hist1D, SourceResult};
    use approx::assert_relative_eq;
    use std::cell::Cell;

    /// Source whose bin count cannot be read.
    struct Broken;

    impl BinnedSource for Broken {
        fn bin_count(&self) -> SourceResult<usize> {
            Err(SourceError::Unavailable("no axis".to_string()))
        }
        fn bin_content(&self, _: usize) -> SourceResult<f64> {
            Ok(0.0)
        }
        fn bin_error(&self, _: usize) -> SourceResult<f64> {
            Ok(0.0)
        }
        fn bin_low_edge(&self, _: usize) -> SourceResult<f64> {
            Ok(0.0)
        }
        fn bin_width(&self, _: usize) -> SourceResult<f64> {
            Ok(1.0)
        }
    }

    /// Source that only answers for 0-based bins, to pin the 1-based calls.
    struct ZeroBased {
        contents: Vec<f64>,
    }

    impl BinnedSource for ZeroBased {
        fn bin_count(&self) -> SourceResult<usize> {
            Ok(self.contents.len())
        }
        fn bin_content(&self, bin: usize) -> SourceResult<f64> {
            self.contents.get(bin).copied().ok_or(SourceError::BinOutOfRange {
                bin,
                first: 0,
                last: self.contents.len() - 1,
            })
        }
        fn bin_error(&self, _: usize) -> SourceResult<f64> {
            Ok(0.0)
        }
        fn bin_low_edge(&self, bin: usize) -> SourceResult<f64> {
            Ok(bin as f64)
        }
        fn bin_width(&self, _: usize) -> SourceResult<f64> {
            Ok(1.0)
        }
    }

    /// Source with no bins that counts edge reads.
    struct Empty {
        edge_reads: Cell<usize>,
    }

    impl BinnedSource for Empty {
        fn bin_count(&self) -> SourceResult<usize> {
            Ok(0)
        }
        fn bin_content(&self, bin: usize) -> SourceResult<f64> {
            Err(SourceError::BinOutOfRange { bin, first: 1, last: 0 })
        }
        fn bin_error(&self, bin: usize) -> SourceResult<f64> {
            Err(SourceError::BinOutOfRange { bin, first: 1, last: 0 })
        }
        fn bin_low_edge(&self, _: usize) -> SourceResult<f64> {
            self.edge_reads.set(self.edge_reads.get() + 1);
            Err(SourceError::Unavailable("no axis".to_string()))
        }
        fn bin_width(&self, bin: usize) -> SourceResult<f64> {
            Err(SourceError::BinOutOfRange { bin, first: 1, last: 0 })
        }
    }

    /// One bin of width 2 starting at `low`.
    struct Narrow {
        low: f64,
    }

    impl BinnedSource for Narrow {
        fn bin_count(&self) -> SourceResult<usize> {
            Ok(1)
        }
        fn bin_content(&self, _: usize) -> SourceResult<f64> {
            Ok(1.0)
        }
        fn bin_error(&self, _: usize) -> SourceResult<f64> {
            Ok(1.0)
        }
        fn bin_low_edge(&self, bin: usize) -> SourceResult<f64> {
            Ok(self.low + 2.0 * (bin as f64 - 1.0))
        }
        fn bin_width(&self, _: usize) -> SourceResult<f64> {
            Ok(2.0)
        }
    }

    /// Reports the closing edge below the low edge.
    struct Reversed(Narrow);

    impl BinnedSource for Reversed {
        fn bin_count(&self) -> SourceResult<usize> {
            self.0.bin_count()
        }
        fn bin_content(&self, bin: usize) -> SourceResult<f64> {
            self.0.bin_content(bin)
        }
        fn bin_error(&self, bin: usize) -> SourceResult<f64> {
            self.0.bin_error(bin)
        }
        fn bin_low_edge(&self, bin: usize) -> SourceResult<f64> {
            self.0.bin_low_edge(bin).map(|e| if bin > 1 { -e } else { e })
        }
        fn bin_width(&self, bin: usize) -> SourceResult<f64> {
            self.0.bin_width(bin)
        }
    }

    fn series(contents: &[f64], edges: &[f64]) -> BinnedSeries {
        BinnedSeries::from_parts(contents.to_vec(), vec![0.0; contents.len()], edges.to_vec())
            .unwrap()
    }

    #[test]
    fn test_extract_hist() {
        let mut hist = Hist1D::uniform("h", 4, 0.0, 4.0).unwrap();
        hist.fill(0.5);
        hist.fill_weighted(2.5, 4.0);

        let s = BinnedSeries::extract(&hist).unwrap();
        assert_eq!(s.contents(), &[1.0, 0.0, 4.0, 0.0]);
        assert_eq!(s.errors(), &[1.0, 0.0, 4.0, 0.0]);
        assert_eq!(s.edges(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(s.centers(), &[0.5, 1.5, 2.5, 3.5]);
        assert_eq!(s.len(), 4);
        assert_relative_eq!(s.integral(), 5.0);
    }

    #[test]
    fn test_extract_ignores_flow_bins() {
        let mut hist = Hist1D::uniform("h", 2, 0.0, 2.0).unwrap();
        hist.fill(-5.0);
        hist.fill(5.0);
        let s = BinnedSeries::extract(&hist).unwrap();
        assert_eq!(s.contents(), &[0.0, 0.0]);
    }

    #[test]
    fn test_extract_uses_one_based_bins() {
        let source = ZeroBased { contents: vec![1.0, 2.0] };
        // bin_content(2) exists, bin_content(1) reads the second element,
        // so the last call (bin 2) fails on a 0-based source.
        let err = BinnedSeries::extract(&source).unwrap_err();
        assert!(err.to_string().contains("bin_content(2)"));
    }

    #[test]
    fn test_extract_zero_bins() {
        let source = Empty { edge_reads: Cell::new(0) };
        let s = BinnedSeries::extract(&source).unwrap();
        assert!(s.contents().is_empty());
        assert!(s.errors().is_empty());
        assert!(s.edges().is_empty());
        assert!(s.centers().is_empty());
        // no closing edge read without bins
        assert_eq!(source.edge_reads.get(), 0);
    }

    #[test]
    fn test_extract_single_bin() {
        let hist = Hist1D::uniform("h", 1, 0.0, 1.0).unwrap();
        let s = BinnedSeries::extract(&hist).unwrap();
        assert_eq!(s.len(), 1);
        assert_eq!(s.edges(), &[0.0, 1.0]);
        assert_eq!(s.centers(), &[0.5]);
    }

    #[test]
    fn test_from_parts_empty() {
        let s = BinnedSeries::from_parts(vec![], vec![], vec![]).unwrap();
        assert!(s.is_empty());
        assert!(s.edges().is_empty());
        assert!(s.x_range().is_none());
    }

    #[test]
    fn test_extract_keeps_narrow_bin_center() {
        // width 2 at 1e16 is one float step; the midpoint rounds onto the low edge
        let source = Narrow { low: 1e16 };
        let s = BinnedSeries::extract(&source).unwrap();
        assert_eq!(s.edges(), &[1e16, 1e16 + 2.0]);
        assert_eq!(s.centers(), &[1e16]);
    }

    #[test]
    fn test_extract_rejects_decreasing_edges() {
        let source = Narrow { low: 1e16 };
        assert!(BinnedSeries::extract(&Reversed(source)).is_err());
    }

    #[test]
    fn test_extract_broken_source() {
        let err = BinnedSeries::extract(&Broken).unwrap_err();
        assert!(matches!(err, Error::InvalidSource(_)));
    }

    #[test]
    fn test_extract_preserves_nan_and_negative() {
        let mut hist = Hist1D::uniform("h", 3, 0.0, 3.0).unwrap();
        hist.set_bin_content(1, -2.0).unwrap();
        hist.set_bin_content(2, f64::NAN).unwrap();
        let s = BinnedSeries::extract(&hist).unwrap();
        assert_eq!(s.contents()[0], -2.0);
        assert!(s.contents()[1].is_nan());
    }

    #[test]
    fn test_from_parts_validation() {
        assert!(BinnedSeries::from_parts(vec![1.0], vec![1.0], vec![0.0]).is_err());
        assert!(BinnedSeries::from_parts(vec![1.0, 2.0], vec![1.0], vec![0.0, 1.0, 2.0]).is_err());
        assert!(BinnedSeries::from_parts(vec![1.0], vec![1.0], vec![1.0, 1.0]).is_err());
    }

    #[test]
    fn test_drop_zero_bins_scenario() {
        let s = series(&[0.0, 5.0, 0.0, 3.0], &[0.0, 1.0, 2.0, 3.0, 4.0]);
        let dropped = s.drop_zero_bins();
        assert_eq!(dropped.contents(), &[5.0, 3.0]);
        assert_eq!(dropped.centers(), &[1.5, 3.5]);
        assert_eq!(dropped.errors().len(), 2);
        assert_eq!(dropped.edges(), &[1.0, 3.0, 4.0]);
        // original untouched
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn test_drop_zero_bins_exact_equality() {
        let s = series(&[1e-300, 0.0, -0.0], &[0.0, 1.0, 2.0, 3.0]);
        let dropped = s.drop_zero_bins();
        assert_eq!(dropped.contents(), &[1e-300]);
    }

    #[test]
    fn test_drop_zero_bins_idempotent() {
        let s = series(&[0.0, 1.0, 0.0, 0.0, 2.0], &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        let once = s.drop_zero_bins();
        assert_eq!(once.drop_zero_bins(), once);
    }

    #[test]
    fn test_ratio_identical_is_one() {
        let s = BinnedSeries::from_parts(vec![2.0, 4.0], vec![1.0, 2.0], vec![0.0, 1.0, 2.0])
            .unwrap();
        let r = s.ratio_to(&s).unwrap();
        assert_eq!(r.contents(), &[1.0, 1.0]);
        assert_relative_eq!(r.errors()[0], (0.5_f64.powi(2) * 2.0).sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_ratio_zero_denominator() {
        let num = series(&[3.0, 1.0], &[0.0, 1.0, 2.0]);
        let den = series(&[0.0, 2.0], &[0.0, 1.0, 2.0]);
        let r = num.ratio_to(&den).unwrap();
        assert_eq!(r.contents(), &[0.0, 0.5]);
        assert_eq!(r.errors()[0], 0.0);
    }

    #[test]
    fn test_ratio_binning_mismatch() {
        let a = series(&[1.0], &[0.0, 1.0]);
        let b = series(&[1.0], &[0.0, 2.0]);
        assert!(matches!(a.ratio_to(&b), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_sum_and_stack() {
        let a = BinnedSeries::from_parts(vec![1.0, 2.0], vec![3.0, 0.0], vec![0.0, 1.0, 2.0])
            .unwrap();
        let b = BinnedSeries::from_parts(vec![4.0, 1.0], vec![4.0, 1.0], vec![0.0, 1.0, 2.0])
            .unwrap();

        let total = BinnedSeries::sum(&[a.clone(), b.clone()]).unwrap();
        assert_eq!(total.contents(), &[5.0, 3.0]);
        assert_eq!(total.errors(), &[5.0, 1.0]);

        let stacked = stack_cumulative(&[a, b]).unwrap();
        assert_eq!(stacked, vec![vec![1.0, 2.0], vec![5.0, 3.0]]);
        assert!(BinnedSeries::sum(&[]).is_err());
    }

    #[test]
    fn test_error_band_extent() {
        let s = BinnedSeries::from_parts(
            vec![1.0, f64::NAN, 5.0],
            vec![0.5, 1.0, 2.0],
            vec![0.0, 1.0, 2.0, 3.0],
        )
        .unwrap();
        assert_eq!(s.error_band_extent(), Some((0.5, 7.0)));
        assert_eq!(BinnedSeries::default().error_band_extent(), None);
    }
}
