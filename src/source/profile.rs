//! In-memory profile histogram (per-bin mean of y).

use super::{check_bin, Axis, BinnedSource, SourceResult};
use crate::error::Result;

/// Per-bin running sums for a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct ProfileBin {
    sum_w: f64,
    sum_w2: f64,
    sum_wy: f64,
    sum_wy2: f64,
}

impl ProfileBin {
    fn mean(&self) -> f64 {
        if self.sum_w == 0.0 {
            0.0
        } else {
            self.sum_wy / self.sum_w
        }
    }

    /// Standard error of the mean: spread / sqrt(effective entries).
    fn error_of_mean(&self) -> f64 {
        if self.sum_w == 0.0 || self.sum_w2 == 0.0 {
            return 0.0;
        }
        let mean = self.mean();
        let spread = (self.sum_wy2 / self.sum_w - mean * mean).abs().sqrt();
        let n_eff = self.sum_w * self.sum_w / self.sum_w2;
        spread / n_eff.sqrt()
    }
}

/// A profile: each bin reports the mean of the `y` values filled into it.
///
/// Bins without entries report content `0` and error `0`, which is why
/// profile plots usually go through
/// [`BinnedSeries::drop_zero_bins`](crate::binned::BinnedSeries::drop_zero_bins).
#[derive(Debug, Clone, PartialEq)]
pub struct Profile1D {
    name: String,
    axis: Axis,
    bins: Vec<ProfileBin>,
    entries: u64,
}

impl Profile1D {
    /// Create an empty profile over `axis`.
    #[must_use]
    pub fn new(name: impl Into<String>, axis: Axis) -> Self {
        let slots = axis.n_bins() + 2;
        Self {
            name: name.into(),
            axis,
            bins: vec![ProfileBin::default(); slots],
            entries: 0,
        }
    }

    /// Create an empty profile with `n_bins` equal bins over `[min, max)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the axis is invalid.
    pub fn uniform(name: impl Into<String>, n_bins: usize, min: f64, max: f64) -> Result<Self> {
        Ok(Self::new(name, Axis::uniform(n_bins, min, max)?))
    }

    /// Profile name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
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

    /// Add `y` to the bin containing `x`.
    pub fn fill(&mut self, x: f64, y: f64) -> usize {
        self.fill_weighted(x, y, 1.0)
    }

    /// Add `y` with weight `w` to the bin containing `x`.
    pub fn fill_weighted(&mut self, x: f64, y: f64, w: f64) -> usize {
        let bin = self.axis.find_bin(x);
        let slot = &mut self.bins[bin];
        slot.sum_w += w;
        slot.sum_w2 += w * w;
        slot.sum_wy += w * y;
        slot.sum_wy2 += w * y * y;
        self.entries += 1;
        bin
    }

    /// Summed weight in `bin`.
    pub fn bin_weight(&self, bin: usize) -> SourceResult<f64> {
        let bin = check_bin(bin, 0, self.axis.n_bins() + 1)?;
        Ok(self.bins[bin].sum_w)
    }
}

impl BinnedSource for Profile1D {
    fn bin_count(&self) -> SourceResult<usize> {
        Ok(self.axis.n_bins())
    }

    fn bin_content(&self, bin: usize) -> SourceResult<f64> {
        let bin = check_bin(bin, 0, self.axis.n_bins() + 1)?;
        Ok(self.bins[bin].mean())
    }

    fn bin_error(&self, bin: usize) -> SourceResult<f64> {
        let bin = check_bin(bin, 0, self.axis.n_bins() + 1)?;
        Ok(self.bins[bin].error_of_mean())
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
    use approx::assert_relative_eq;

    #[test]
    fn test_profile_mean() {
        let mut prof = Profile1D::uniform("p", 2, 0.0, 2.0).unwrap();
        prof.fill(0.5, 1.0);
        prof.fill(0.5, 3.0);
        prof.fill(1.5, 10.0);

        assert_relative_eq!(prof.bin_content(1).unwrap(), 2.0);
        assert_relative_eq!(prof.bin_content(2).unwrap(), 10.0);
        assert_eq!(prof.entries(), 3);
        assert_eq!(prof.bin_weight(1), Ok(2.0));
    }

    #[test]
    fn test_profile_error_of_mean() {
        let mut prof = Profile1D::uniform("p", 1, 0.0, 1.0).unwrap();
        for y in [1.0, 3.0] {
            prof.fill(0.5, y);
        }
        // spread = 1, n = 2
        assert_relative_eq!(prof.bin_error(1).unwrap(), 1.0 / 2.0_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_empty_bins_are_zero() {
        let prof = Profile1D::uniform("p", 3, 0.0, 3.0).unwrap();
        assert_eq!(prof.bin_content(2), Ok(0.0));
        assert_eq!(prof.bin_error(2), Ok(0.0));
    }

    #[test]
    fn test_single_entry_has_zero_error() {
        let mut prof = Profile1D::uniform("p", 1, 0.0, 1.0).unwrap();
        prof.fill(0.2, 4.0);
        assert_relative_eq!(prof.bin_content(1).unwrap(), 4.0);
        assert_relative_eq!(prof.bin_error(1).unwrap(), 0.0);
    }
}
