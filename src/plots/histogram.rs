//! Binned histogram layers.
//!
//! Bars span the bin edges exactly, so variable-width binning is drawn
//! as-is. `Filled` draws a bar per bin; `Step` draws the outline as one
//! polyline that drops to the baseline at both ends.

use crate::binned::{stack_cumulative, BinnedSeries};
use crate::color::Rgba;
use crate::config::{HistType, StackOptions};
use crate::error::{Error, Result};
use crate::figure::{finite_range, min_positive, DrawContext, Extent, Layer, LegendEntry, LegendKind};
use crate::geometry::{Point, Rect};
use crate::render::Primitive;
use tracing::{debug, warn};

/// One histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramLayer {
    series: BinnedSeries,
    histtype: HistType,
    color: Rgba,
    line_width: f32,
    label: Option<String>,
}

impl HistogramLayer {
    /// Filled histogram in the first cycle color.
    #[must_use]
    pub fn new(series: BinnedSeries) -> Self {
        Self {
            series,
            histtype: HistType::default(),
            color: Rgba::cycle(0),
            line_width: 1.5,
            label: None,
        }
    }

    /// Set the drawing style.
    #[must_use]
    pub fn histtype(mut self, histtype: HistType) -> Self {
        self.histtype = histtype;
        self
    }

    /// Set the color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Set the outline width for `Step`.
    #[must_use]
    pub fn line_width(mut self, width: f32) -> Self {
        self.line_width = width.max(0.5);
        self
    }

    /// Add a legend entry.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The drawn series.
    #[must_use]
    pub fn series(&self) -> &BinnedSeries {
        &self.series
    }
}

impl Layer for HistogramLayer {
    fn data_extent(&self) -> Option<Extent> {
        bars_extent(self.series.edges(), self.series.contents())
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) {
        draw_bars(
            ctx,
            self.series.edges(),
            None,
            self.series.contents(),
            self.histtype,
            self.color,
            self.line_width,
        );
    }

    fn legend_entries(&self) -> Vec<LegendEntry> {
        self.label
            .iter()
            .map(|label| LegendEntry {
                label: label.clone(),
                color: self.color,
                kind: legend_kind(self.histtype),
            })
            .collect()
    }
}

/// Several histograms sharing a legend, stacked or overlaid.
#[derive(Debug, Clone, PartialEq)]
pub struct StackLayer {
    edges: Vec<Vec<f64>>,
    /// Top of each band; cumulative when stacked.
    levels: Vec<Vec<f64>>,
    labels: Vec<String>,
    colors: Vec<Rgba>,
    histtype: HistType,
    stacked: bool,
}

impl StackLayer {
    /// Build a group from `series` styled by `options`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for an empty group, for labels or
    /// colors whose length differs from the number of series, and for a
    /// stacked group whose series do not share binning.
    pub fn new(series: &[BinnedSeries], options: &StackOptions) -> Result<Self> {
        if series.is_empty() {
            return Err(Error::Configuration("cannot draw an empty stack".to_string()));
        }
        let style = options.resolve(series.len())?;

        let levels = if options.stacked {
            stack_cumulative(series)?
        } else {
            series.iter().map(|s| s.contents().to_vec()).collect()
        };
        debug!(series = series.len(), stacked = options.stacked, "built stack layer");

        Ok(Self {
            edges: series.iter().map(|s| s.edges().to_vec()).collect(),
            levels,
            labels: style.labels,
            colors: style.colors,
            histtype: options.histtype,
            stacked: options.stacked,
        })
    }

    /// Number of series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false; construction rejects empty groups.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Band tops, cumulative when stacked.
    #[must_use]
    pub fn levels(&self) -> &[Vec<f64>] {
        &self.levels
    }

    /// Resolved labels.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Resolved colors.
    #[must_use]
    pub fn colors(&self) -> &[Rgba] {
        &self.colors
    }
}

impl Layer for StackLayer {
    fn data_extent(&self) -> Option<Extent> {
        self.edges
            .iter()
            .zip(&self.levels)
            .filter_map(|(edges, level)| bars_extent(edges, level))
            .reduce(Extent::union)
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) {
        for (i, (edges, level)) in self.edges.iter().zip(&self.levels).enumerate() {
            let lower = if self.stacked && i > 0 { Some(self.levels[i - 1].as_slice()) } else { None };
            draw_bars(ctx, edges, lower, level, self.histtype, self.colors[i], 1.5);
        }
    }

    fn legend_entries(&self) -> Vec<LegendEntry> {
        let kind = legend_kind(self.histtype);
        self.labels
            .iter()
            .zip(&self.colors)
            .map(|(label, &color)| LegendEntry { label: label.clone(), color, kind })
            .collect()
    }
}

fn legend_kind(histtype: HistType) -> LegendKind {
    match histtype {
        HistType::Filled => LegendKind::Swatch,
        HistType::Step => LegendKind::Line,
    }
}

/// Bars include the zero baseline.
fn bars_extent(edges: &[f64], tops: &[f64]) -> Option<Extent> {
    let x = (*edges.first()?, *edges.last()?);
    let (lo, hi) = finite_range(tops.iter().copied()).unwrap_or((0.0, 0.0));
    Some(Extent::new(x, (lo.min(0.0), hi.max(0.0))).with_min_positive(min_positive(tops.iter().copied())))
}

/// Draw bins from `lower` (or the baseline) up to `upper`.
///
/// Non-finite values sit on the baseline.
fn draw_bars(
    ctx: &mut DrawContext<'_>,
    edges: &[f64],
    lower: Option<&[f64]>,
    upper: &[f64],
    histtype: HistType,
    color: Rgba,
    line_width: f32,
) {
    let baseline = ctx.baseline_px();
    let level_px = |ctx: &DrawContext<'_>, v: f64| if v.is_finite() { ctx.y_px_clamped(v) } else { baseline };

    let skipped = upper.iter().filter(|v| !v.is_finite()).count();
    if skipped > 0 {
        warn!(skipped, "non-finite bin contents drawn at the baseline");
    }

    match histtype {
        HistType::Filled => {
            for (i, &top) in upper.iter().enumerate() {
                let x0 = ctx.x_px_clamped(edges[i]);
                let x1 = ctx.x_px_clamped(edges[i + 1]);
                let y_top = level_px(ctx, top);
                let y_bottom = lower.map_or(baseline, |l| level_px(ctx, l[i]));
                let (y0, y1) = (y_top.min(y_bottom), y_top.max(y_bottom));
                if x1 > x0 && y1 > y0 {
                    ctx.push(Primitive::Rect { rect: Rect::new(x0, y0, x1 - x0, y1 - y0), fill: color });
                }
            }
        }
        HistType::Step => {
            let (Some(&first), Some(&last)) = (edges.first(), edges.last()) else {
                return;
            };
            let mut points = Vec::with_capacity(2 * upper.len() + 2);
            let start_y = lower.and_then(<[f64]>::first).map_or(baseline, |&v| level_px(ctx, v));
            points.push(Point::new(ctx.x_px_clamped(first), start_y));
            for (i, &top) in upper.iter().enumerate() {
                let y = level_px(ctx, top);
                points.push(Point::new(ctx.x_px_clamped(edges[i]), y));
                points.push(Point::new(ctx.x_px_clamped(edges[i + 1]), y));
            }
            let end_y = lower.and_then(<[f64]>::last).map_or(baseline, |&v| level_px(ctx, v));
            points.push(Point::new(ctx.x_px_clamped(last), end_y));
            ctx.push(Primitive::Polyline { points, stroke: color, width: line_width });
        }
    }
}
