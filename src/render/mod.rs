//! Display-list primitives and their rasterization.
//!
//! Layers never touch pixels. They push [`Primitive`]s into the figure's
//! display list, which is later either rasterized into a [`Framebuffer`]
//! or translated into SVG elements.
//!
//! # Algorithms
//!
//! - **Bresenham's Line**: integer line drawing
//! - **Midpoint Circle**: filled circle markers
//!
//! Text primitives are kept for vector output and skipped by
//! [`rasterize`].

mod primitives;

pub use primitives::{
    draw_circle, draw_cross, draw_line, draw_rect, draw_rect_outline, draw_square,
    draw_thick_line,
};

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};

/// Marker shape for error-bar and scatter points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerShape {
    /// Filled circle.
    #[default]
    Circle,
    /// Filled square.
    Square,
    /// Diagonal cross.
    Cross,
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    /// Text starts at the anchor.
    #[default]
    Start,
    /// Text is centered on the anchor.
    Middle,
    /// Text ends at the anchor.
    End,
}

/// One drawing instruction in pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Filled rectangle.
    Rect {
        /// Area to fill.
        rect: Rect,
        /// Fill color (alpha is composited).
        fill: Rgba,
    },
    /// Rectangle border.
    RectOutline {
        /// Outer bounds.
        rect: Rect,
        /// Border color.
        stroke: Rgba,
        /// Border width in pixels.
        width: f32,
    },
    /// Straight segment.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Line color.
        stroke: Rgba,
        /// Line width in pixels.
        width: f32,
    },
    /// Connected segments.
    Polyline {
        /// Vertices in drawing order.
        points: Vec<Point>,
        /// Line color.
        stroke: Rgba,
        /// Line width in pixels.
        width: f32,
    },
    /// Point marker.
    Marker {
        /// Marker center.
        center: Point,
        /// Shape.
        shape: MarkerShape,
        /// Diameter in pixels.
        size: f32,
        /// Fill color.
        color: Rgba,
    },
    /// Text label.
    Text {
        /// Anchor point (baseline).
        position: Point,
        /// Label text.
        text: String,
        /// Font size in pixels.
        size: f32,
        /// Text color.
        color: Rgba,
        /// Horizontal alignment.
        anchor: TextAnchor,
        /// Rotate 90° counter-clockwise (y-axis labels).
        vertical: bool,
    },
}

/// Round a float pixel coordinate, saturating far-off values.
fn px(v: f32) -> i32 {
    v.round().clamp(-1.0e6, 1.0e6) as i32
}

fn stroke_px(width: f32) -> u32 {
    width.round().max(1.0) as u32
}

/// Draw every non-text primitive, in order, into `fb`.
pub fn rasterize(primitives: &[Primitive], fb: &mut Framebuffer) {
    for primitive in primitives {
        match primitive {
            Primitive::Rect { rect, fill } => {
                let (x0, y0) = (px(rect.x), px(rect.y));
                let (x1, y1) = (px(rect.right()), px(rect.bottom()));
                if x1 > x0 && y1 > y0 {
                    draw_rect(fb, x0, y0, (x1 - x0) as u32, (y1 - y0) as u32, *fill);
                }
            }
            Primitive::RectOutline { rect, stroke, width } => {
                let (x0, y0) = (px(rect.x), px(rect.y));
                let (x1, y1) = (px(rect.right()), px(rect.bottom()));
                if x1 > x0 && y1 > y0 {
                    let (w, h) = ((x1 - x0) as u32, (y1 - y0) as u32);
                    draw_rect_outline(fb, x0, y0, w, h, *stroke, stroke_px(*width));
                }
            }
            Primitive::Line { from, to, stroke, width } => {
                let t = stroke_px(*width);
                draw_thick_line(fb, px(from.x), px(from.y), px(to.x), px(to.y), *stroke, t);
            }
            Primitive::Polyline { points, stroke, width } => {
                let t = stroke_px(*width);
                for pair in points.windows(2) {
                    let (a, b) = (pair[0], pair[1]);
                    draw_thick_line(fb, px(a.x), px(a.y), px(b.x), px(b.y), *stroke, t);
                }
            }
            Primitive::Marker { center, shape, size, color } => {
                let (cx, cy) = (px(center.x), px(center.y));
                let half = (size / 2.0).round() as i32;
                match shape {
                    MarkerShape::Circle => draw_circle(fb, cx, cy, half, *color),
                    MarkerShape::Square => draw_square(fb, cx, cy, half, *color),
                    MarkerShape::Cross => draw_cross(fb, cx, cy, half, *color),
                }
            }
            Primitive::Text { .. } => {}
        }
    }
}
