//! Scatter layer for graph points.

use crate::color::Rgba;
use crate::figure::{min_positive, DrawContext, Extent, Layer, LegendEntry, LegendKind};
use crate::geometry::Point;
use crate::points::PointSeries;
use crate::render::{MarkerShape, Primitive};

/// Fraction of each span added on both sides, so edge points are not cut.
const PADDING: f64 = 0.05;

/// `PointSeries` drawn as markers, optionally joined by a line.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterLayer {
    points: PointSeries,
    color: Rgba,
    marker: MarkerShape,
    size: f32,
    connect: bool,
    label: Option<String>,
}

impl ScatterLayer {
    /// Black circles, unconnected.
    #[must_use]
    pub fn new(points: PointSeries) -> Self {
        Self {
            points,
            color: Rgba::BLACK,
            marker: MarkerShape::Circle,
            size: 7.0,
            connect: false,
            label: None,
        }
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
    pub fn size(mut self, size: f32) -> Self {
        self.size = size.max(1.0);
        self
    }

    /// Join consecutive points with a line.
    #[must_use]
    pub fn connect(mut self, connect: bool) -> Self {
        self.connect = connect;
        self
    }

    /// Add a legend entry.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

fn pad((lo, hi): (f64, f64)) -> (f64, f64) {
    let d = (hi - lo) * PADDING;
    (lo - d, hi + d)
}

impl Layer for ScatterLayer {
    fn data_extent(&self) -> Option<Extent> {
        let (x, y) = self.points.extents()?;
        Some(Extent::new(pad(x), pad(y)).with_min_positive(min_positive(self.points.y().iter().copied())))
    }

    fn wants_headroom(&self) -> bool {
        false
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) {
        if self.connect {
            let line: Vec<Point> = self
                .points
                .iter()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .map(|(x, y)| ctx.panel().clamp(Point::new(ctx.x_px(x), ctx.y_px(y))))
                .collect();
            if line.len() > 1 {
                ctx.push(Primitive::Polyline { points: line, stroke: self.color, width: 1.5 });
            }
        }

        for (x, y) in self.points.iter() {
            if ctx.contains(x, y) {
                let center = Point::new(ctx.x_px(x), ctx.y_px(y));
                ctx.push(Primitive::Marker { center, shape: self.marker, size: self.size, color: self.color });
            }
        }
    }

    fn legend_entries(&self) -> Vec<LegendEntry> {
        let kind = if self.connect { LegendKind::Line } else { LegendKind::Marker(self.marker) };
        self.label
            .iter()
            .map(|label| LegendEntry { label: label.clone(), color: self.color, kind })
            .collect()
    }
}
