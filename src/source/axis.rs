//! Binned axis with framework-style bin numbering.

use super::{check_bin, SourceResult};
use crate::error::{Error, Result};

/// A binned axis.
///
/// Bin `0` collects values below the axis range, bins `1..=n` are the real
/// bins and bin `n + 1` collects values at or above the upper edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    /// Bin edges, strictly increasing, `n_bins + 1` entries.
    edges: Vec<f64>,
}

impl Axis {
    /// Create an axis with `n_bins` equal-width bins spanning `[min, max)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `n_bins` is zero or the range is
    /// empty or not finite.
    pub fn uniform(n_bins: usize, min: f64, max: f64) -> Result<Self> {
        if n_bins == 0 {
            return Err(Error::Configuration("axis needs at least one bin".to_string()));
        }
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return Err(Error::Configuration(format!(
                "axis range [{min}, {max}) is empty or not finite"
            )));
        }

        let span = max - min;
        let mut edges: Vec<f64> =
            (0..n_bins).map(|i| min + span * (i as f64) / (n_bins as f64)).collect();
        edges.push(max);
        Ok(Self { edges })
    }

    /// Create an axis from explicit bin edges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if fewer than two edges are given or
    /// the edges are not finite and strictly increasing.
    pub fn variable(edges: &[f64]) -> Result<Self> {
        if edges.len() < 2 {
            return Err(Error::Configuration(format!(
                "axis needs at least two edges, got {}",
                edges.len()
            )));
        }
        if edges.iter().any(|e| !e.is_finite()) || edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::Configuration(
                "axis edges must be finite and strictly increasing".to_string(),
            ));
        }
        Ok(Self { edges: edges.to_vec() })
    }

    /// Number of real bins.
    #[must_use]
    pub fn n_bins(&self) -> usize {
        self.edges.len() - 1
    }

    /// Lower edge of the first bin.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.edges[0]
    }

    /// Upper edge of the last bin.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    /// All bin edges.
    #[must_use]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Bin number containing `x`: `0` for underflow, `n_bins + 1` for
    /// overflow. NaN lands in the underflow bin.
    #[must_use]
    pub fn find_bin(&self, x: f64) -> usize {
        // Number of edges <= x; equals the 1-based bin for in-range values.
        self.edges.partition_point(|&edge| edge <= x)
    }

    /// Lower edge of bin `bin`, valid for `1..=n_bins + 1`.
    pub fn low_edge(&self, bin: usize) -> SourceResult<f64> {
        let bin = check_bin(bin, 1, self.n_bins() + 1)?;
        Ok(self.edges[bin - 1])
    }

    /// Width of bin `bin`, valid for `1..=n_bins`.
    pub fn width(&self, bin: usize) -> SourceResult<f64> {
        let bin = check_bin(bin, 1, self.n_bins())?;
        Ok(self.edges[bin] - self.edges[bin - 1])
    }

    /// Center of bin `bin`, valid for `1..=n_bins`.
    pub fn center(&self, bin: usize) -> SourceResult<f64> {
        Ok(self.low_edge(bin)? + self.width(bin)? / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_edges() {
        let axis = Axis::uniform(4, 0.0, 2.0).unwrap();
        assert_eq!(axis.n_bins(), 4);
        assert_eq!(axis.edges(), &[0.0, 0.5, 1.0, 1.5, 2.0]);
        assert_eq!(axis.min(), 0.0);
        assert_eq!(axis.max(), 2.0);
    }

    #[test]
    fn test_uniform_invalid() {
        assert!(Axis::uniform(0, 0.0, 1.0).is_err());
        assert!(Axis::uniform(3, 1.0, 1.0).is_err());
        assert!(Axis::uniform(3, 0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_variable_edges() {
        let axis = Axis::variable(&[0.0, 1.0, 3.0, 7.0]).unwrap();
        assert_eq!(axis.n_bins(), 3);
        assert_eq!(axis.width(3), Ok(4.0));
        assert!(Axis::variable(&[0.0]).is_err());
        assert!(Axis::variable(&[0.0, 2.0, 1.0]).is_err());
        assert!(Axis::variable(&[0.0, 1.0, 1.0]).is_err());
    }

    #[test]
    fn test_find_bin() {
        let axis = Axis::uniform(10, -10.0, 10.0).unwrap();
        assert_eq!(axis.find_bin(-11.0), 0);
        assert_eq!(axis.find_bin(-10.0), 1);
        assert_eq!(axis.find_bin(-9.5), 1);
        assert_eq!(axis.find_bin(0.0), 6);
        assert_eq!(axis.find_bin(9.99), 10);
        assert_eq!(axis.find_bin(10.0), 11);
        assert_eq!(axis.find_bin(f64::NAN), 0);
    }

    #[test]
    fn test_low_edge_one_past_last() {
        let axis = Axis::uniform(4, 0.0, 4.0).unwrap();
        assert_eq!(axis.low_edge(1), Ok(0.0));
        assert_eq!(axis.low_edge(5), Ok(4.0));
        assert!(axis.low_edge(0).is_err());
        assert!(axis.low_edge(6).is_err());
        assert!(axis.width(5).is_err());
    }

    #[test]
    fn test_center() {
        let axis = Axis::uniform(2, 0.0, 2.0).unwrap();
        assert_eq!(axis.center(1), Ok(0.5));
        assert_eq!(axis.center(2), Ok(1.5));
    }
}
