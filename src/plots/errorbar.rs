//! Markers at bin centers with vertical error bars.
//!
//! Used for data overlays, ratio panels and profile plots.

use crate::binned::BinnedSeries;
use crate::color::Rgba;
use crate::figure::{min_positive, DrawContext, Extent, Layer, LegendEntry, LegendKind};
use crate::geometry::Point;
use crate::render::{MarkerShape, Primitive};

/// Error-bar overlay for a binned series.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorBarLayer {
    series: BinnedSeries,
    color: Rgba,
    marker: MarkerShape,
    marker_size: f32,
    x_errors: bool,
    label: Option<String>,
}

impl ErrorBarLayer {
    /// Black circles, vertical bars only.
    #[must_use]
    pub fn new(series: BinnedSeries) -> Self {
        Self {
            series,
            color: Rgba::BLACK,
            marker: MarkerShape::Circle,
            marker_size: 7.0,
            x_errors: false,
            label: None,
        }
    }

    /// Profile plot: empty (exactly zero) bins are dropped first.
    #[must_use]
    pub fn profile(series: &BinnedSeries) -> Self {
        Self::new(series.drop_zero_bins())
    }

    /// Set the color.
    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = color;
        self
    }

    /// Set the marker shape.
    #[must_use]
    pub fn marker(mut self, marker: MarkerShape) -> Self {
        self.marker = marker;
        self
    }

    /// Set the marker diameter in pixels.
    #[must_use]
    pub fn marker_size(mut self, size: f32) -> Self {
        self.marker_size = size.max(1.0);
        self
    }

    /// Also draw horizontal bars spanning each bin's edges.
    #[must_use]
    pub fn x_errors(mut self, enabled: bool) -> Self {
        self.x_errors = enabled;
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

    fn points(&self) -> impl Iterator<Item = (usize, f64, f64, f64)> + '_ {
        let s = &self.series;
        s.centers()
            .iter()
            .zip(s.contents())
            .zip(s.errors())
            .enumerate()
            .filter(|(_, ((x, y), _))| x.is_finite() && y.is_finite())
            .map(|(i, ((&x, &y), &e))| (i, x, y, if e.is_finite() { e.abs() } else { 0.0 }))
    }
}

impl Layer for ErrorBarLayer {
    fn data_extent(&self) -> Option<Extent> {
        let x = self.series.x_range()?;
        let (lo, hi) = self.series.error_band_extent()?;
        let lows = self.points().map(|(_, _, y, e)| y - e);
        let positive = min_positive(lows.chain(self.series.contents().iter().copied()));
        Some(Extent::new(x, (lo, hi)).with_min_positive(positive))
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) {
        let edges = self.series.edges();
        for (i, x, y, e) in self.points() {
            let px = ctx.x_px(x);
            if e > 0.0 {
                let top = ctx.y_px_clamped(y + e);
                let bottom = ctx.y_px_clamped(y - e);
                ctx.push(Primitive::Line {
                    from: Point::new(px, bottom),
                    to: Point::new(px, top),
                    stroke: self.color,
                    width: 1.0,
                });
            }
            if !ctx.contains(x, y) {
                continue;
            }
            let py = ctx.y_px(y);
            if self.x_errors {
                ctx.push(Primitive::Line {
                    from: Point::new(ctx.x_px_clamped(edges[i]), py),
                    to: Point::new(ctx.x_px_clamped(edges[i + 1]), py),
                    stroke: self.color,
                    width: 1.0,
                });
            }
            ctx.push(Primitive::Marker {
                center: Point::new(px, py),
                shape: self.marker,
                size: self.marker_size,
                color: self.color,
            });
        }
    }

    fn legend_entries(&self) -> Vec<LegendEntry> {
        self.label
            .iter()
            .map(|label| LegendEntry {
                label: label.clone(),
                color: self.color,
                kind: LegendKind::Marker(self.marker),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlotOptions;
    use crate::figure::Figure;

    fn series() -> BinnedSeries {
        let edges = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        BinnedSeries::from_parts(vec![0.0, 5.0, 0.0, 3.0], vec![0.0, 1.0, 0.0, 0.5], edges).unwrap()
    }

    fn markers(fig: Figure) -> Vec<Point> {
        fig.finalize()
            .unwrap()
            .primitives()
            .iter()
            .filter_map(|p| match p {
                Primitive::Marker { center, .. } => Some(*center),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_extent_covers_error_band() {
        let layer = ErrorBarLayer::new(series());
        let extent = layer.data_extent().unwrap();
        assert_eq!(extent.x, (0.0, 4.0));
        assert_eq!(extent.y, (0.0, 6.0));
        assert_eq!(extent.y_min_positive, Some(2.5));
    }

    #[test]
    fn test_profile_drops_empty_bins() {
        let layer = ErrorBarLayer::profile(&series());
        assert_eq!(layer.series().contents(), &[5.0, 3.0]);
        assert_eq!(layer.series().centers(), &[1.5, 3.5]);

        let mut fig = Figure::new(PlotOptions::default()).unwrap();
        fig.draw(layer);
        assert_eq!(markers(fig).len(), 2);
    }

    #[test]
    fn test_all_bins_marked_without_profile() {
        let mut fig = Figure::new(PlotOptions::default()).unwrap();
        fig.draw(ErrorBarLayer::new(series()).label("Data"));
        assert_eq!(markers(fig).len(), 4);
    }

    #[test]
    fn test_legend_entry_uses_marker() {
        let layer = ErrorBarLayer::new(series()).label("Data").marker(MarkerShape::Square);
        let entries = layer.legend_entries();
        assert_eq!(entries[0].kind, LegendKind::Marker(MarkerShape::Square));
        assert_eq!(entries[0].label, "Data");
    }
}
