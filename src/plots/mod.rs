//! Plot layers.
//!
//! Each layer implements [`Layer`](crate::figure::Layer) and is handed to a
//! [`Figure`]. [`HistStack`] bundles the common stacked-background, data
//! and ratio combination.

mod errorbar;
mod heatmap;
mod histogram;
mod scatter;

pub use errorbar::ErrorBarLayer;
pub use heatmap::{value_extent, HeatmapLayer};
pub use histogram::{HistogramLayer, StackLayer};
pub use scatter::ScatterLayer;

use crate::binned::BinnedSeries;
use crate::config::StackOptions;
use crate::error::{Error, Result};
use crate::figure::Figure;
use crate::source::BinnedSource;
use tracing::debug;

/// A stack of histograms with optional data points and ratio.
///
/// ```
/// use trueno_hist::prelude::*;
///
/// let mut bkg = Hist1D::uniform("bkg", 4, 0.0, 4.0).unwrap();
/// let mut data = Hist1D::uniform("data", 4, 0.0, 4.0).unwrap();
/// for x in [0.5, 1.5, 1.5, 2.5] {
///     bkg.fill(x);
///     data.fill(x);
/// }
///
/// let stack = HistStack::from_sources(&[&bkg], StackOptions::stacked())
///     .unwrap()
///     .with_data(BinnedSeries::extract(&data).unwrap())
///     .with_data_ratio()
///     .unwrap();
///
/// let options = PlotOptions::default().ratio_panel(RatioPanel::default());
/// let mut figure = Figure::new(options).unwrap();
/// stack.draw(&mut figure).unwrap();
/// assert!(figure.finalize().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HistStack {
    stack: StackLayer,
    series: Vec<BinnedSeries>,
    data: Option<BinnedSeries>,
    data_label: String,
    ratio: Option<BinnedSeries>,
}

impl HistStack {
    /// Stack `series` styled by `options`.
    ///
    /// # Errors
    ///
    /// As [`StackLayer::new`].
    pub fn new(series: Vec<BinnedSeries>, options: &StackOptions) -> Result<Self> {
        let stack = StackLayer::new(&series, options)?;
        Ok(Self { stack, series, data: None, data_label: "Data".to_string(), ratio: None })
    }

    /// Extract every source, then stack.
    ///
    /// # Errors
    ///
    /// Returns the first extraction error, or any error from
    /// [`HistStack::new`].
    pub fn from_sources<S: BinnedSource>(sources: &[S], options: StackOptions) -> Result<Self> {
        let series = sources.iter().map(BinnedSeries::extract).collect::<Result<Vec<_>>>()?;
        Self::new(series, &options)
    }

    /// Overlay data as black error bars.
    #[must_use]
    pub fn with_data(mut self, data: BinnedSeries) -> Self {
        self.data = Some(data);
        self
    }

    /// Legend label for the data points.
    #[must_use]
    pub fn data_label(mut self, label: impl Into<String>) -> Self {
        self.data_label = label.into();
        self
    }

    /// Draw `ratio` in the ratio panel.
    #[must_use]
    pub fn with_ratio(mut self, ratio: BinnedSeries) -> Self {
        self.ratio = Some(ratio);
        self
    }

    /// Set the ratio to data divided by the stack total.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] without data or when data and stack
    /// binnings differ.
    pub fn with_data_ratio(self) -> Result<Self> {
        let data = self
            .data
            .as_ref()
            .ok_or_else(|| Error::Configuration("data/stack ratio needs data".to_string()))?;
        let ratio = data.ratio_to(&self.total()?)?;
        Ok(self.with_ratio(ratio))
    }

    /// Bin-wise sum of the stacked series.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the binnings differ.
    pub fn total(&self) -> Result<BinnedSeries> {
        BinnedSeries::sum(&self.series)
    }

    /// The stack layer.
    #[must_use]
    pub fn stack(&self) -> &StackLayer {
        &self.stack
    }

    /// The ratio series, if any.
    #[must_use]
    pub fn ratio(&self) -> Option<&BinnedSeries> {
        self.ratio.as_ref()
    }

    /// Add the stack, data and ratio layers to `figure`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if a ratio is set and the figure
    /// has no ratio panel.
    pub fn draw(self, figure: &mut Figure) -> Result<()> {
        if self.ratio.is_some() && figure.options().ratio_panel.is_none() {
            return Err(Error::Configuration(
                "stack has a ratio but the figure has no ratio panel".to_string(),
            ));
        }
        debug!(
            series = self.series.len(),
            data = self.data.is_some(),
            ratio = self.ratio.is_some(),
            "drawing histogram stack"
        );

        figure.draw(self.stack);
        if let Some(data) = self.data {
            figure.draw(ErrorBarLayer::new(data).label(self.data_label));
        }
        if let Some(ratio) = self.ratio {
            figure.draw_ratio(ErrorBarLayer::new(ratio))?;
        }
        Ok(())
    }
}
