//! SVG output encoder.
//!
//! Translates the figure's display list into vector elements. Unlike the
//! raster path, text primitives are kept, so axis labels and legends only
//! appear in SVG output.

use crate::color::Rgba;
use crate::error::Result;
use crate::render::{MarkerShape, Primitive, TextAnchor};
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// SVG document builder.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    width: u32,
    height: u32,
    /// Background color (None for transparent)
    background: Option<Rgba>,
    elements: Vec<SvgElement>,
}

/// An SVG element.
///
/// Field names match SVG attribute names.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
        stroke_width: f32,
    },
    /// Filled circle
    Circle { cx: f32, cy: f32, r: f32, fill: Rgba },
    /// Line
    Line { x1: f32, y1: f32, x2: f32, y2: f32, stroke: Rgba, stroke_width: f32 },
    /// Open polyline
    Polyline { points: Vec<(f32, f32)>, stroke: Rgba, stroke_width: f32 },
    /// Text, optionally rotated to read bottom-to-top
    Text {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
        fill: Rgba,
        anchor: TextAnchor,
        vertical: bool,
    },
}

impl SvgEncoder {
    /// Create an empty document with a white background.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, background: Some(Rgba::WHITE), elements: Vec::new() }
    }

    /// Build a document from a display list.
    #[must_use]
    pub fn from_primitives(
        width: u32,
        height: u32,
        background: Rgba,
        primitives: &[Primitive],
    ) -> Self {
        let mut encoder = Self::new(width, height).background(Some(background));
        for primitive in primitives {
            encoder.push_primitive(primitive);
        }
        debug!(elements = encoder.elements.len(), "built svg document");
        encoder
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Add a raw element.
    pub fn add_element(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    /// Elements in document order.
    #[must_use]
    pub fn elements(&self) -> &[SvgElement] {
        &self.elements
    }

    fn push_primitive(&mut self, primitive: &Primitive) {
        match primitive {
            Primitive::Rect { rect, fill } => self.add_element(SvgElement::Rect {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                fill: Some(*fill),
                stroke: None,
                stroke_width: 0.0,
            }),
            Primitive::RectOutline { rect, stroke, width } => {
                // stroke is centered on the edge; keep it inside like the raster path
                let inset = width / 2.0;
                self.add_element(SvgElement::Rect {
                    x: rect.x + inset,
                    y: rect.y + inset,
                    width: (rect.width - width).max(0.0),
                    height: (rect.height - width).max(0.0),
                    fill: None,
                    stroke: Some(*stroke),
                    stroke_width: *width,
                });
            }
            Primitive::Line { from, to, stroke, width } => self.add_element(SvgElement::Line {
                x1: from.x,
                y1: from.y,
                x2: to.x,
                y2: to.y,
                stroke: *stroke,
                stroke_width: *width,
            }),
            Primitive::Polyline { points, stroke, width } => {
                self.add_element(SvgElement::Polyline {
                    points: points.iter().map(|p| (p.x, p.y)).collect(),
                    stroke: *stroke,
                    stroke_width: *width,
                });
            }
            Primitive::Marker { center, shape, size, color } => {
                let half = size / 2.0;
                match shape {
                    MarkerShape::Circle => self.add_element(SvgElement::Circle {
                        cx: center.x,
                        cy: center.y,
                        r: half,
                        fill: *color,
                    }),
                    MarkerShape::Square => self.add_element(SvgElement::Rect {
                        x: center.x - half,
                        y: center.y - half,
                        width: *size,
                        height: *size,
                        fill: Some(*color),
                        stroke: None,
                        stroke_width: 0.0,
                    }),
                    MarkerShape::Cross => {
                        for dy in [-half, half] {
                            self.add_element(SvgElement::Line {
                                x1: center.x - half,
                                y1: center.y - dy,
                                x2: center.x + half,
                                y2: center.y + dy,
                                stroke: *color,
                                stroke_width: 1.5,
                            });
                        }
                    }
                }
            }
            Primitive::Text { position, text, size, color, anchor, vertical } => {
                self.add_element(SvgElement::Text {
                    x: position.x,
                    y: position.y,
                    text: text.clone(),
                    font_size: *size,
                    fill: *color,
                    anchor: *anchor,
                    vertical: *vertical,
                });
            }
        }
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(256 + 96 * self.elements.len());

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );

        if let Some(bg) = self.background {
            let _ = writeln!(svg, r#"  <rect width="100%" height="100%"{}/>"#, paint("fill", bg));
        }

        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element_to_svg(element));
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        debug!(path = %path.display(), "wrote svg");
        Ok(())
    }
}

/// ` fill="rgb(..)"` plus an opacity attribute for translucent colors.
fn paint(attr: &str, color: Rgba) -> String {
    if color.a == 255 {
        format!(r#" {attr}="{}""#, color.to_css_rgb())
    } else {
        format!(r#" {attr}="{}" {attr}-opacity="{:.3}""#, color.to_css_rgb(), color.opacity())
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn element_to_svg(element: &SvgElement) -> String {
    match element {
        SvgElement::Rect { x, y, width, height, fill, stroke, stroke_width } => {
            let fill_attr = fill.map_or_else(|| r#" fill="none""#.to_string(), |f| paint("fill", f));
            let stroke_attr = stroke
                .map(|s| format!(r#"{} stroke-width="{stroke_width}""#, paint("stroke", s)))
                .unwrap_or_default();
            format!(r#"<rect x="{x}" y="{y}" width="{width}" height="{height}"{fill_attr}{stroke_attr}/>"#)
        }
        SvgElement::Circle { cx, cy, r, fill } => {
            format!(r#"<circle cx="{cx}" cy="{cy}" r="{r}"{}/>"#, paint("fill", *fill))
        }
        SvgElement::Line { x1, y1, x2, y2, stroke, stroke_width } => {
            format!(
                r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}"{} stroke-width="{stroke_width}"/>"#,
                paint("stroke", *stroke)
            )
        }
        SvgElement::Polyline { points, stroke, stroke_width } => {
            let points_str = points.iter().map(|(x, y)| format!("{x},{y}")).collect::<Vec<_>>().join(" ");
            format!(
                r#"<polyline points="{points_str}" fill="none"{} stroke-width="{stroke_width}"/>"#,
                paint("stroke", *stroke)
            )
        }
        SvgElement::Text { x, y, text, font_size, fill, anchor, vertical } => {
            let anchor_str = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let transform =
                if *vertical { format!(r#" transform="rotate(-90 {x} {y})""#) } else { String::new() };
            format!(
                r#"<text x="{x}" y="{y}" font-size="{font_size}"{} text-anchor="{anchor_str}" font-family="sans-serif"{transform}>{}</text>"#,
                paint("fill", *fill),
                escape(text)
            )
        }
    }
}
