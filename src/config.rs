//! Plot configuration.
//!
//! Every option a figure or stack understands lives in a plain struct that
//! can be built in code or loaded from YAML:
//!
//! ```yaml
//! width: 900
//! title: "Dijet mass"
//! x_label: "m_jj [GeV]"
//! log_y: true
//! xlim: [0.0, 2000.0]
//! legend: upper_left
//! ratio_panel:
//!   height_fraction: 0.25
//!   y_label: "Data / MC"
//! ```
//!
//! Validation happens once, when the figure or layer is constructed.

use crate::color::Rgba;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

// ============================================================================
// Axis limits
// ============================================================================

/// A closed, non-empty data interval `[min, max]`.
///
/// Serialized as a two-element list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct AxisLimits {
    min: f64,
    max: f64,
}

impl AxisLimits {
    /// Create limits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] unless both bounds are finite and
    /// `min < max`.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(min.is_finite() && max.is_finite()) || min >= max {
            return Err(Error::Configuration(format!(
                "axis limits [{min}, {max}] must be finite with min < max"
            )));
        }
        Ok(Self { min, max })
    }

    /// Lower bound.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// `(min, max)`.
    #[must_use]
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.min, self.max)
    }
}

impl TryFrom<[f64; 2]> for AxisLimits {
    type Error = Error;

    fn try_from(pair: [f64; 2]) -> Result<Self> {
        Self::new(pair[0], pair[1])
    }
}

impl From<AxisLimits> for [f64; 2] {
    fn from(limits: AxisLimits) -> Self {
        [limits.min, limits.max]
    }
}

// ============================================================================
// Figure options
// ============================================================================

/// Corner of the main panel holding the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPlacement {
    /// Top right.
    #[default]
    UpperRight,
    /// Top left.
    UpperLeft,
    /// Bottom right.
    LowerRight,
    /// Bottom left.
    LowerLeft,
    /// No legend.
    Hidden,
}

/// Figure margins as fractions of the figure size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    /// Left margin.
    pub left: f32,
    /// Right margin.
    pub right: f32,
    /// Top margin.
    pub top: f32,
    /// Bottom margin.
    pub bottom: f32,
}

impl Default for Margins {
    fn default() -> Self {
        Self { left: 0.16, right: 0.05, top: 0.05, bottom: 0.16 }
    }
}

/// A secondary panel under the main one, sharing its x axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatioPanel {
    /// Share of the plotting height given to the panel, in `(0, 1)`.
    pub height_fraction: f32,
    /// Y axis label.
    pub y_label: String,
    /// Fixed y range; automatic when absent.
    pub limits: Option<AxisLimits>,
    /// Draw a dashed guide at this y value.
    pub reference_line: Option<f64>,
    /// Target number of y ticks.
    pub ticks: usize,
}

impl Default for RatioPanel {
    fn default() -> Self {
        Self {
            height_fraction: 0.3,
            y_label: "Ratio".to_string(),
            limits: None,
            reference_line: Some(1.0),
            ticks: 5,
        }
    }
}

/// Figure-wide options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotOptions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Space around the panels.
    pub margins: Margins,
    /// Title above the main panel.
    pub title: Option<String>,
    /// X axis label (under the lowest panel).
    pub x_label: Option<String>,
    /// Y axis label of the main panel.
    pub y_label: Option<String>,
    /// Fixed x range; automatic when absent.
    pub xlim: Option<AxisLimits>,
    /// Fixed y range; automatic when absent.
    pub ylim: Option<AxisLimits>,
    /// Logarithmic main y axis.
    pub log_y: bool,
    /// Legend corner.
    pub legend: LegendPlacement,
    /// Optional ratio panel.
    pub ratio_panel: Option<RatioPanel>,
    /// Figure background.
    pub background: Rgba,
    /// Target number of ticks per axis.
    pub ticks: usize,
    /// Tick label font size in pixels.
    pub tick_font_size: f32,
    /// Axis label font size in pixels.
    pub label_font_size: f32,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            margins: Margins::default(),
            title: None,
            x_label: None,
            y_label: None,
            xlim: None,
            ylim: None,
            log_y: false,
            legend: LegendPlacement::default(),
            ratio_panel: None,
            background: Rgba::WHITE,
            ticks: 6,
            tick_font_size: 14.0,
            label_font_size: 18.0,
        }
    }
}

impl PlotOptions {
    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set both axis labels.
    #[must_use]
    pub fn labels(mut self, x: impl Into<String>, y: impl Into<String>) -> Self {
        self.x_label = Some(x.into());
        self.y_label = Some(y.into());
        self
    }

    /// Set the figure size.
    #[must_use]
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Fix the x range.
    #[must_use]
    pub fn xlim(mut self, limits: AxisLimits) -> Self {
        self.xlim = Some(limits);
        self
    }

    /// Fix the y range.
    #[must_use]
    pub fn ylim(mut self, limits: AxisLimits) -> Self {
        self.ylim = Some(limits);
        self
    }

    /// Use a logarithmic y axis.
    #[must_use]
    pub fn log_y(mut self, log_y: bool) -> Self {
        self.log_y = log_y;
        self
    }

    /// Set the legend corner.
    #[must_use]
    pub fn legend(mut self, placement: LegendPlacement) -> Self {
        self.legend = placement;
        self
    }

    /// Add a ratio panel.
    #[must_use]
    pub fn ratio_panel(mut self, panel: RatioPanel) -> Self {
        self.ratio_panel = Some(panel);
        self
    }

    /// Check ranges that the type system cannot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for a zero-sized figure and
    /// [`Error::Configuration`] for out-of-range margins, a ratio fraction
    /// outside `(0, 1)`, a log axis with non-positive limits, or zero ticks.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }

        let m = &self.margins;
        let in_unit = |v: f32| (0.0..1.0).contains(&v);
        if ![m.left, m.right, m.top, m.bottom].into_iter().all(in_unit)
            || m.left + m.right >= 1.0
            || m.top + m.bottom >= 1.0
        {
            return Err(Error::Configuration(format!(
                "margins {m:?} must be fractions leaving room for the panels"
            )));
        }

        if let Some(panel) = &self.ratio_panel {
            if !(panel.height_fraction > 0.0 && panel.height_fraction < 1.0) {
                return Err(Error::Configuration(format!(
                    "ratio panel height fraction {} must lie in (0, 1)",
                    panel.height_fraction
                )));
            }
            if panel.ticks == 0 {
                return Err(Error::Configuration("ratio panel needs at least one tick".into()));
            }
        }

        if self.log_y {
            if let Some(ylim) = self.ylim {
                if ylim.min() <= 0.0 {
                    return Err(Error::Configuration(format!(
                        "log y axis needs positive limits, got [{}, {}]",
                        ylim.min(),
                        ylim.max()
                    )));
                }
            }
        }

        if self.ticks == 0 {
            return Err(Error::Configuration("at least one tick per axis is required".into()));
        }
        Ok(())
    }

    /// Parse options from YAML and validate them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] for malformed YAML and any error from
    /// [`PlotOptions::validate`].
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let options: Self = serde_yaml_ng::from_str(yaml)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a YAML file and validate them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise as
    /// [`PlotOptions::from_yaml`].
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "loading plot options");
        Self::from_yaml(&text)
    }
}

// ============================================================================
// Stack options
// ============================================================================

/// How 1-D histograms are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistType {
    /// Outline only.
    Step,
    /// Filled area with an outline.
    #[default]
    #[serde(alias = "stepfilled")]
    Filled,
}

/// Labels and colors for a group of histograms.
///
/// Unset `labels` or `colors` fall back to `hist0..histN-1` and the
/// default color cycle. A list that is given must match the group size,
/// even when empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StackOptions {
    /// One label per histogram.
    pub labels: Option<Vec<String>>,
    /// One color per histogram.
    pub colors: Option<Vec<Rgba>>,
    /// Drawing style.
    pub histtype: HistType,
    /// Stack on top of each other rather than overlay.
    pub stacked: bool,
}

/// Labels and colors resolved for a concrete number of histograms.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    /// One label per histogram.
    pub labels: Vec<String>,
    /// One color per histogram.
    pub colors: Vec<Rgba>,
}

impl StackOptions {
    /// Options for a stacked, filled group.
    #[must_use]
    pub fn stacked() -> Self {
        Self { stacked: true, ..Self::default() }
    }

    /// Set the labels.
    #[must_use]
    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Set the colors.
    #[must_use]
    pub fn colors(mut self, colors: Vec<Rgba>) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Set the drawing style.
    #[must_use]
    pub fn histtype(mut self, histtype: HistType) -> Self {
        self.histtype = histtype;
        self
    }

    /// Resolve labels and colors for `n` histograms.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if given `labels` or `colors` do
    /// not have exactly `n` entries.
    pub fn resolve(&self, n: usize) -> Result<ResolvedStyle> {
        let labels = match &self.labels {
            None => (0..n).map(|i| format!("hist{i}")).collect(),
            Some(labels) if labels.len() == n => labels.clone(),
            Some(labels) => {
                return Err(Error::Configuration(format!(
                    "bad labels length: {} labels for {n} histograms",
                    labels.len()
                )));
            }
        };

        let colors = match &self.colors {
            None => (0..n).map(Rgba::cycle).collect(),
            Some(colors) if colors.len() == n => colors.clone(),
            Some(colors) => {
                return Err(Error::Configuration(format!(
                    "bad colors length: {} colors for {n} histograms",
                    colors.len()
                )));
            }
        };

        Ok(ResolvedStyle { labels, colors })
    }
}
