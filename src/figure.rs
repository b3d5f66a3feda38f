//! The render context.
//!
//! A [`Figure`] collects layers, then [`Figure::finalize`] fixes the axis
//! ranges, lets every layer emit its primitives, and adds the frame, ticks,
//! labels and legend:
//!
//! ```text
//! Figure::new(options) ─► draw(layer)* ─► draw_ratio(layer)* ─► finalize()
//!                                                                  │
//!                        FinishedFigure ◄──────────────────────────┘
//!                        ├─ png_bytes / save_png
//!                        ├─ to_svg / save_svg
//!                        └─ to_terminal
//! ```
//!
//! Ranges come from [`PlotOptions`] limits when given, otherwise from the
//! union of the panel's layer extents.

use crate::color::Rgba;
use crate::config::{LegendPlacement, PlotOptions, RatioPanel};
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};
use crate::output::{PngEncoder, SvgEncoder, TerminalEncoder};
use crate::render::{rasterize, MarkerShape, Primitive, TextAnchor};
use crate::scale::{format_tick, AxisMapping, Scale};
use std::path::Path;
use tracing::{debug, warn};

/// Fraction of the y span added above the data.
const HEADROOM: f64 = 0.1;
/// Gap between the main and ratio panels, in pixels.
const PANEL_GAP: f32 = 8.0;
/// Major tick length, in pixels.
const TICK_LENGTH: f32 = 8.0;
const FRAME_COLOR: Rgba = Rgba::BLACK;

// ============================================================================
// Layer contract
// ============================================================================

/// Data-space bounds of a layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    /// `(min, max)` along x.
    pub x: (f64, f64),
    /// `(min, max)` along y.
    pub y: (f64, f64),
    /// Smallest strictly positive y, for log axes.
    pub y_min_positive: Option<f64>,
}

impl Extent {
    /// Bounds with `y_min_positive` taken from the y minimum when positive.
    #[must_use]
    pub fn new(x: (f64, f64), y: (f64, f64)) -> Self {
        Self { x, y, y_min_positive: (y.0 > 0.0).then_some(y.0) }
    }

    /// Override the smallest positive y.
    #[must_use]
    pub fn with_min_positive(mut self, value: Option<f64>) -> Self {
        self.y_min_positive = value;
        self
    }

    /// Smallest extent covering both.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        let y_min_positive = match (self.y_min_positive, other.y_min_positive) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        Self {
            x: (self.x.0.min(other.x.0), self.x.1.max(other.x.1)),
            y: (self.y.0.min(other.y.0), self.y.1.max(other.y.1)),
            y_min_positive,
        }
    }
}

/// Finite `(min, max)` of `values`.
pub(crate) fn finite_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Smallest finite value above zero.
pub(crate) fn min_positive(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    values.into_iter().filter(|v| v.is_finite() && *v > 0.0).reduce(f64::min)
}

/// How a legend entry is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendKind {
    /// Filled swatch.
    Swatch,
    /// Short line segment.
    Line,
    /// Point marker.
    Marker(MarkerShape),
}

/// One row of the legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    /// Text.
    pub label: String,
    /// Color of the key.
    pub color: Rgba,
    /// Key style.
    pub kind: LegendKind,
}

/// Something that can be drawn into a panel.
pub trait Layer {
    /// Data bounds; `None` if there is nothing to draw.
    fn data_extent(&self) -> Option<Extent>;

    /// Whether the automatic y range should leave room above the data.
    fn wants_headroom(&self) -> bool {
        true
    }

    /// Emit primitives for this layer.
    fn draw(&self, ctx: &mut DrawContext<'_>);

    /// Legend rows contributed by this layer.
    fn legend_entries(&self) -> Vec<LegendEntry> {
        Vec::new()
    }
}

/// Coordinate mapping and output for one panel.
pub struct DrawContext<'a> {
    panel: Rect,
    x: AxisMapping,
    y: AxisMapping,
    primitives: &'a mut Vec<Primitive>,
}

impl<'a> DrawContext<'a> {
    pub(crate) fn new(
        panel: Rect,
        x: AxisMapping,
        y: AxisMapping,
        primitives: &'a mut Vec<Primitive>,
    ) -> Self {
        Self { panel, x, y, primitives }
    }

    /// Panel bounds in pixels.
    #[must_use]
    pub fn panel(&self) -> Rect {
        self.panel
    }

    /// Data x to pixel x.
    #[must_use]
    pub fn x_px(&self, x: f64) -> f32 {
        self.x.scale(x)
    }

    /// Data y to pixel y.
    #[must_use]
    pub fn y_px(&self, y: f64) -> f32 {
        self.y.scale(y)
    }

    /// Data x to pixel x, clamped to the panel.
    #[must_use]
    pub fn x_px_clamped(&self, x: f64) -> f32 {
        self.x_px(x).clamp(self.panel.x, self.panel.right())
    }

    /// Data y to pixel y, clamped to the panel.
    #[must_use]
    pub fn y_px_clamped(&self, y: f64) -> f32 {
        self.y_px(y).clamp(self.panel.y, self.panel.bottom())
    }

    /// Pixel y of the zero line (the panel bottom on log axes).
    #[must_use]
    pub fn baseline_px(&self) -> f32 {
        if self.y.is_log() {
            self.panel.bottom()
        } else {
            self.y_px_clamped(0.0)
        }
    }

    /// True if the data point maps inside the panel.
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x.is_finite() && y.is_finite() && self.panel.contains(Point::new(self.x_px(x), self.y_px(y)))
    }

    /// The x data range.
    #[must_use]
    pub fn x_domain(&self) -> (f64, f64) {
        self.x.domain()
    }

    /// The y data range.
    #[must_use]
    pub fn y_domain(&self) -> (f64, f64) {
        self.y.domain()
    }

    /// Append a primitive.
    pub fn push(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }
}

// ============================================================================
// Figure
// ============================================================================

/// Panel rectangles in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Main panel.
    pub main: Rect,
    /// Ratio panel under the main one.
    pub ratio: Option<Rect>,
}

impl Layout {
    fn new(options: &PlotOptions) -> Self {
        let (w, h) = (options.width as f32, options.height as f32);
        let m = options.margins;
        let area = Rect::new(0.0, 0.0, w, h).inset(m.left * w, m.top * h, m.right * w, m.bottom * h);

        match &options.ratio_panel {
            Some(panel) => {
                let (main, ratio) = area.split_bottom(panel.height_fraction, PANEL_GAP);
                Self { main, ratio: Some(ratio) }
            }
            None => Self { main: area, ratio: None },
        }
    }

    /// The panel that carries the x tick labels.
    #[must_use]
    pub fn lowest(&self) -> Rect {
        self.ratio.unwrap_or(self.main)
    }
}

/// A figure under construction.
pub struct Figure {
    options: PlotOptions,
    layout: Layout,
    main: Vec<Box<dyn Layer>>,
    ratio: Vec<Box<dyn Layer>>,
}

impl std::fmt::Debug for Figure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Figure")
            .field("layout", &self.layout)
            .field("main_layers", &self.main.len())
            .field("ratio_layers", &self.ratio.len())
            .finish_non_exhaustive()
    }
}

impl Figure {
    /// Start a figure.
    ///
    /// # Errors
    ///
    /// Returns any error from [`PlotOptions::validate`].
    pub fn new(options: PlotOptions) -> Result<Self> {
        options.validate()?;
        let layout = Layout::new(&options);
        Ok(Self { options, layout, main: Vec::new(), ratio: Vec::new() })
    }

    /// The options this figure was created with.
    #[must_use]
    pub fn options(&self) -> &PlotOptions {
        &self.options
    }

    /// Panel rectangles.
    #[must_use]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Add a layer to the main panel.
    pub fn draw<L: Layer + 'static>(&mut self, layer: L) {
        self.main.push(Box::new(layer));
    }

    /// Add a layer to the ratio panel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the options have no ratio panel.
    pub fn draw_ratio<L: Layer + 'static>(&mut self, layer: L) -> Result<()> {
        if self.options.ratio_panel.is_none() {
            return Err(Error::Configuration(
                "figure has no ratio panel; set PlotOptions::ratio_panel".to_string(),
            ));
        }
        self.ratio.push(Box::new(layer));
        Ok(())
    }

    /// Number of layers across both panels.
    #[must_use]
    pub fn layer_count(&self) -> usize {
        self.main.len() + self.ratio.len()
    }

    /// Fix ranges and produce the display list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] if no layer has anything to draw and
    /// [`Error::ScaleDomain`] if a log axis has no positive data.
    pub fn finalize(self) -> Result<FinishedFigure> {
        let main_extent = union_extent(&self.main);
        let ratio_extent = union_extent(&self.ratio);

        let data_x = match (main_extent, ratio_extent) {
            (Some(a), Some(b)) => a.union(b).x,
            (Some(a), None) | (None, Some(a)) => a.x,
            (None, None) => {
                warn!(layers = self.layer_count(), "figure has no drawable layer");
                return Err(Error::EmptyData);
            }
        };

        let x_range = self.options.xlim.map_or_else(|| ensure_span(data_x), |l| l.as_tuple());
        let headroom = self.main.iter().any(|l| l.wants_headroom());
        let y_range = self.main_y_range(main_extent, headroom)?;

        let opts = &self.options;
        let mut primitives = vec![Primitive::Rect {
            rect: Rect::new(0.0, 0.0, opts.width as f32, opts.height as f32),
            fill: opts.background,
        }];

        let main = self.layout.main;
        let x_main = AxisMapping::new(x_range, (main.x, main.right()), false)?;
        let y_main = AxisMapping::new(y_range, (main.bottom(), main.y), opts.log_y)?;
        draw_layers(&self.main, main, x_main, y_main, &mut primitives);
        let labelled_x = self.layout.ratio.is_none();
        self.draw_axes(&mut primitives, main, x_main, y_main, opts.ticks, labelled_x);

        if let (Some(rect), Some(panel)) = (self.layout.ratio, &opts.ratio_panel) {
            let y_ratio_range = ratio_y_range(panel, ratio_extent);
            let x_ratio = AxisMapping::new(x_range, (rect.x, rect.right()), false)?;
            let y_ratio = AxisMapping::new(y_ratio_range, (rect.bottom(), rect.y), false)?;

            if let Some(reference) = panel.reference_line {
                if (y_ratio_range.0..=y_ratio_range.1).contains(&reference) {
                    let py = y_ratio.scale(reference);
                    dashed_hline(&mut primitives, rect.x, rect.right(), py, Rgba::rgb(128, 128, 128));
                }
            }
            draw_layers(&self.ratio, rect, x_ratio, y_ratio, &mut primitives);
            self.draw_axes(&mut primitives, rect, x_ratio, y_ratio, panel.ticks, true);
            self.vertical_label(&mut primitives, rect, &panel.y_label);
        }

        self.draw_labels(&mut primitives);
        self.draw_legend(&mut primitives);

        debug!(
            primitives = primitives.len(),
            layers = self.layer_count(),
            x_min = x_range.0,
            x_max = x_range.1,
            "finalized figure"
        );

        Ok(FinishedFigure {
            width: opts.width,
            height: opts.height,
            background: opts.background,
            primitives,
        })
    }

    fn main_y_range(&self, extent: Option<Extent>, headroom: bool) -> Result<(f64, f64)> {
        if let Some(limits) = self.options.ylim {
            return Ok(limits.as_tuple());
        }
        let log = self.options.log_y;
        let Some(extent) = extent else {
            // only ratio layers were drawn
            return Ok(if log { (0.1, 1.0) } else { (0.0, 1.0) });
        };

        if log {
            let hi = extent.y.1;
            let Some(lo) = extent.y_min_positive.filter(|_| hi > 0.0) else {
                warn!(y_min = extent.y.0, y_max = hi, "log y axis has no positive data");
                return Err(Error::ScaleDomain("log y axis has no positive data".to_string()));
            };
            if extent.y.0 <= 0.0 {
                warn!(y_min = extent.y.0, "non-positive values are clipped on the log y axis");
            }
            let lo = lo * 0.5;
            let hi = if headroom { hi * 10f64.powf(HEADROOM * (hi / lo).log10()) } else { hi };
            return Ok(if hi > lo { (lo, hi) } else { (lo, lo * 10.0) });
        }

        let (lo, hi) = ensure_span(extent.y);
        if !headroom {
            return Ok((lo, hi));
        }
        let pad = HEADROOM * (hi - lo);
        Ok((if lo < 0.0 { lo - pad } else { lo }, hi + pad))
    }

    fn draw_axes(
        &self,
        out: &mut Vec<Primitive>,
        rect: Rect,
        x: AxisMapping,
        y: AxisMapping,
        y_ticks: usize,
        label_x: bool,
    ) {
        let font = self.options.tick_font_size;
        out.push(Primitive::RectOutline { rect, stroke: FRAME_COLOR, width: 1.0 });

        let xs = x.ticks(self.options.ticks);
        let x_step = tick_step(&xs);
        for &v in &xs {
            let px = x.scale(v);
            out.push(tick_line(Point::new(px, rect.bottom()), Point::new(px, rect.bottom() - TICK_LENGTH)));
            out.push(tick_line(Point::new(px, rect.y), Point::new(px, rect.y + TICK_LENGTH)));
            if label_x {
                out.push(text(
                    Point::new(px, rect.bottom() + font + 4.0),
                    format_tick(v, x_step),
                    font,
                    TextAnchor::Middle,
                ));
            }
        }

        let ys = y.ticks(y_ticks);
        let y_step = tick_step(&ys);
        for &v in &ys {
            let py = y.scale(v);
            out.push(tick_line(Point::new(rect.x, py), Point::new(rect.x + TICK_LENGTH, py)));
            out.push(tick_line(Point::new(rect.right(), py), Point::new(rect.right() - TICK_LENGTH, py)));
            let step = if y.is_log() { v } else { y_step };
            out.push(text(
                Point::new(rect.x - 6.0, py + font / 3.0),
                format_tick(v, step),
                font,
                TextAnchor::End,
            ));
        }
    }

    fn draw_labels(&self, out: &mut Vec<Primitive>) {
        let opts = &self.options;
        let main = self.layout.main;
        let size = opts.label_font_size;

        if let Some(title) = &opts.title {
            out.push(text(Point::new(main.center().x, main.y - 8.0), title.clone(), size, TextAnchor::Middle));
        }
        if let Some(label) = &opts.x_label {
            let lowest = self.layout.lowest();
            let y = lowest.bottom() + opts.tick_font_size + size + 10.0;
            out.push(text(Point::new(lowest.right(), y), label.clone(), size, TextAnchor::End));
        }
        if let Some(label) = &opts.y_label {
            self.vertical_label(out, main, label);
        }
    }

    fn vertical_label(&self, out: &mut Vec<Primitive>, rect: Rect, label: &str) {
        if label.is_empty() {
            return;
        }
        let x = rect.x - 3.5 * self.options.tick_font_size;
        out.push(Primitive::Text {
            position: Point::new(x.max(self.options.label_font_size), rect.center().y),
            text: label.to_string(),
            size: self.options.label_font_size,
            color: FRAME_COLOR,
            anchor: TextAnchor::Middle,
            vertical: true,
        });
    }

    fn draw_legend(&self, out: &mut Vec<Primitive>) {
        let placement = self.options.legend;
        if placement == LegendPlacement::Hidden {
            return;
        }
        let entries: Vec<LegendEntry> = self.main.iter().flat_map(|l| l.legend_entries()).collect();
        if entries.is_empty() {
            return;
        }

        let font = self.options.tick_font_size;
        let row = font * 1.4;
        let key = font * 1.2;
        let longest = entries.iter().map(|e| e.label.chars().count()).max().unwrap_or(0);
        let box_w = key + 6.0 + 0.6 * font * longest as f32;
        let box_h = row * entries.len() as f32;
        let pad = 10.0;

        let main = self.layout.main;
        let x0 = match placement {
            LegendPlacement::UpperLeft | LegendPlacement::LowerLeft => main.x + pad,
            _ => main.right() - pad - box_w,
        };
        let y0 = match placement {
            LegendPlacement::LowerRight | LegendPlacement::LowerLeft => main.bottom() - pad - box_h,
            _ => main.y + pad,
        };

        for (i, entry) in entries.into_iter().enumerate() {
            let top = y0 + row * i as f32;
            let mid = top + row / 2.0;
            match entry.kind {
                LegendKind::Swatch => out.push(Primitive::Rect {
                    rect: Rect::new(x0, mid - font * 0.35, key, font * 0.7),
                    fill: entry.color,
                }),
                LegendKind::Line => out.push(Primitive::Line {
                    from: Point::new(x0, mid),
                    to: Point::new(x0 + key, mid),
                    stroke: entry.color,
                    width: 2.0,
                }),
                LegendKind::Marker(shape) => out.push(Primitive::Marker {
                    center: Point::new(x0 + key / 2.0, mid),
                    shape,
                    size: 7.0,
                    color: entry.color,
                }),
            }
            out.push(text(Point::new(x0 + key + 6.0, mid + font / 3.0), entry.label, font, TextAnchor::Start));
        }
    }
}

fn union_extent(layers: &[Box<dyn Layer>]) -> Option<Extent> {
    layers.iter().filter_map(|l| l.data_extent()).reduce(Extent::union)
}

fn draw_layers(
    layers: &[Box<dyn Layer>],
    panel: Rect,
    x: AxisMapping,
    y: AxisMapping,
    out: &mut Vec<Primitive>,
) {
    let mut ctx = DrawContext::new(panel, x, y, out);
    for layer in layers {
        layer.draw(&mut ctx);
    }
}

/// Widen a zero-width range so scales stay invertible.
fn ensure_span((lo, hi): (f64, f64)) -> (f64, f64) {
    if hi > lo {
        return (lo, hi);
    }
    let d = if lo == 0.0 { 0.5 } else { lo.abs() * 0.1 };
    (lo - d, hi + d)
}

fn ratio_y_range(panel: &RatioPanel, extent: Option<Extent>) -> (f64, f64) {
    if let Some(limits) = panel.limits {
        return limits.as_tuple();
    }
    let Some(extent) = extent else {
        return (0.0, 2.0);
    };
    let (mut lo, mut hi) = extent.y;
    if let Some(reference) = panel.reference_line {
        lo = lo.min(reference);
        hi = hi.max(reference);
    }
    let (lo, hi) = ensure_span((lo, hi));
    let pad = HEADROOM * (hi - lo);
    (lo - pad, hi + pad)
}

fn tick_step(ticks: &[f64]) -> f64 {
    match ticks {
        [a, b, ..] => b - a,
        _ => 1.0,
    }
}

fn dashed_hline(out: &mut Vec<Primitive>, x0: f32, x1: f32, y: f32, stroke: Rgba) {
    const DASH: f32 = 6.0;
    let mut x = x0;
    while x < x1 {
        let end = (x + DASH).min(x1);
        out.push(Primitive::Line { from: Point::new(x, y), to: Point::new(end, y), stroke, width: 1.0 });
        x += 2.0 * DASH;
    }
}

fn tick_line(from: Point, to: Point) -> Primitive {
    Primitive::Line { from, to, stroke: FRAME_COLOR, width: 1.0 }
}

fn text(position: Point, text: String, size: f32, anchor: TextAnchor) -> Primitive {
    Primitive::Text { position, text, size, color: FRAME_COLOR, anchor, vertical: false }
}

// ============================================================================
// Finished figure
// ============================================================================

/// A laid-out figure ready for output.
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedFigure {
    width: u32,
    height: u32,
    background: Rgba,
    primitives: Vec<Primitive>,
}

impl FinishedFigure {
    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The display list, in drawing order.
    #[must_use]
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Rasterize into a new framebuffer (text is not drawn).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for a zero-sized figure.
    pub fn to_framebuffer(&self) -> Result<Framebuffer> {
        let mut fb = Framebuffer::new(self.width, self.height)?;
        fb.clear(self.background);
        rasterize(&self.primitives, &mut fb);
        Ok(fb)
    }

    /// Encode as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterization or PNG encoding fails.
    pub fn png_bytes(&self) -> Result<Vec<u8>> {
        PngEncoder::to_bytes(&self.to_framebuffer()?)
    }

    /// Write a PNG file.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterization, encoding or writing fails.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        PngEncoder::write_to_file(&self.to_framebuffer()?, path)
    }

    /// Render as an SVG document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        SvgEncoder::from_primitives(self.width, self.height, self.background, &self.primitives)
            .render()
    }

    /// Write an SVG file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if writing fails.
    pub fn save_svg(&self, path: impl AsRef<Path>) -> Result<()> {
        SvgEncoder::from_primitives(self.width, self.height, self.background, &self.primitives)
            .write_to_file(path)
    }

    /// Write PNG or SVG depending on the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for other extensions, otherwise as
    /// the format-specific save.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("png") => self.save_png(path),
            Some("svg") => self.save_svg(path),
            _ => Err(Error::Configuration(format!(
                "cannot infer output format from {}; use .png or .svg",
                path.display()
            ))),
        }
    }

    /// Render as terminal text with `encoder`.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterization fails.
    pub fn to_terminal(&self, encoder: &TerminalEncoder) -> Result<String> {
        Ok(encoder.render(&self.to_framebuffer()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AxisLimits;

    /// Layer with a fixed extent that draws one marker per corner.
    struct Fixed {
        extent: Option<Extent>,
        headroom: bool,
    }

    impl Layer for Fixed {
        fn data_extent(&self) -> Option<Extent> {
            self.extent
        }
        fn wants_headroom(&self) -> bool {
            self.headroom
        }
        fn draw(&self, ctx: &mut DrawContext<'_>) {
            let (x0, x1) = ctx.x_domain();
            let (y0, y1) = ctx.y_domain();
            for (x, y) in [(x0, y0), (x1, y1)] {
                ctx.push(Primitive::Marker {
                    center: Point::new(ctx.x_px(x), ctx.y_px(y)),
                    shape: MarkerShape::Square,
                    size: 2.0,
                    color: Rgba::RED,
                });
            }
        }
        fn legend_entries(&self) -> Vec<LegendEntry> {
            vec![LegendEntry { label: "fixed".into(), color: Rgba::RED, kind: LegendKind::Swatch }]
        }
    }

    fn fixed(x: (f64, f64), y: (f64, f64)) -> Fixed {
        Fixed { extent: Some(Extent::new(x, y)), headroom: true }
    }

    fn texts(fig: &FinishedFigure) -> Vec<String> {
        fig.primitives()
            .iter()
            .filter_map(|p| match p {
                Primitive::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_empty_figure_is_error() {
        let fig = Figure::new(PlotOptions::default()).unwrap();
        assert!(matches!(fig.finalize(), Err(Error::EmptyData)));

        let mut fig = Figure::new(PlotOptions::default()).unwrap();
        fig.draw(Fixed { extent: None, headroom: true });
        assert!(matches!(fig.finalize(), Err(Error::EmptyData)));
    }

    #[test]
    fn test_auto_range_has_headroom() {
        let mut fig = Figure::new(PlotOptions::default()).unwrap();
        fig.draw(fixed((0.0, 4.0), (0.0, 10.0)));
        let y = fig.main_y_range(Some(Extent::new((0.0, 4.0), (0.0, 10.0))), true).unwrap();
        assert_eq!(y, (0.0, 11.0));
        let no_room = fig.main_y_range(Some(Extent::new((0.0, 4.0), (-2.0, 8.0))), false).unwrap();
        assert_eq!(no_room, (-2.0, 8.0));
        assert!(fig.finalize().is_ok());
    }

    #[test]
    fn test_log_range() {
        let fig = Figure::new(PlotOptions::default().log_y(true)).unwrap();
        let extent = Extent::new((0.0, 1.0), (0.0, 100.0)).with_min_positive(Some(2.0));
        let (lo, hi) = fig.main_y_range(Some(extent), false).unwrap();
        assert_eq!((lo, hi), (1.0, 100.0));

        let zeros = Extent::new((0.0, 1.0), (0.0, 0.0));
        assert!(matches!(fig.main_y_range(Some(zeros), true), Err(Error::ScaleDomain(_))));
    }

    #[test]
    fn test_limits_override_data() {
        let options = PlotOptions::default()
            .xlim(AxisLimits::new(-1.0, 1.0).unwrap())
            .ylim(AxisLimits::new(0.0, 5.0).unwrap());
        let mut fig = Figure::new(options).unwrap();
        fig.draw(fixed((0.0, 100.0), (0.0, 100.0)));
        let finished = fig.finalize().unwrap();
        let labels = texts(&finished);
        assert!(labels.contains(&"-1".to_string()) || labels.contains(&"-1.0".to_string()));
        assert!(labels.contains(&"5".to_string()));
    }

    #[test]
    fn test_draw_ratio_requires_panel() {
        let mut fig = Figure::new(PlotOptions::default()).unwrap();
        assert!(matches!(fig.draw_ratio(fixed((0.0, 1.0), (0.0, 1.0))), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_ratio_layout_and_labels() {
        let options = PlotOptions::default()
            .title("Stack")
            .labels("mass", "events")
            .ratio_panel(RatioPanel::default());
        let mut fig = Figure::new(options).unwrap();
        let layout = fig.layout();
        let ratio = layout.ratio.unwrap();
        assert!(ratio.y > layout.main.bottom());
        assert_eq!(layout.lowest(), ratio);

        fig.draw(fixed((0.0, 10.0), (0.0, 50.0)));
        fig.draw_ratio(fixed((0.0, 10.0), (0.8, 1.2))).unwrap();
        assert_eq!(fig.layer_count(), 2);

        let finished = fig.finalize().unwrap();
        let labels = texts(&finished);
        for expected in ["Stack", "mass", "events", "Ratio", "fixed"] {
            assert!(labels.iter().any(|t| t == expected), "missing {expected}");
        }
        // reference line at 1.0
        assert!(finished.primitives().iter().any(|p| matches!(
            p,
            Primitive::Line { stroke, .. } if *stroke == Rgba::rgb(128, 128, 128)
        )));
    }

    #[test]
    fn test_hidden_legend() {
        let mut fig = Figure::new(PlotOptions::default().legend(LegendPlacement::Hidden)).unwrap();
        fig.draw(fixed((0.0, 1.0), (0.0, 1.0)));
        let finished = fig.finalize().unwrap();
        assert!(!texts(&finished).contains(&"fixed".to_string()));
    }

    #[test]
    fn test_extent_union() {
        let a = Extent::new((0.0, 1.0), (1.0, 2.0));
        let b = Extent::new((-1.0, 0.5), (0.0, 5.0)).with_min_positive(Some(0.5));
        let u = a.union(b);
        assert_eq!(u.x, (-1.0, 1.0));
        assert_eq!(u.y, (0.0, 5.0));
        assert_eq!(u.y_min_positive, Some(0.5));
    }

    #[test]
    fn test_range_helpers() {
        assert_eq!(finite_range([3.0, f64::NAN, -1.0]), Some((-1.0, 3.0)));
        assert_eq!(finite_range([f64::NAN]), None);
        assert_eq!(min_positive([0.0, -2.0, 4.0, 0.5]), Some(0.5));
        assert_eq!(ensure_span((2.0, 2.0)), (1.8, 2.2));
        assert_eq!(ensure_span((0.0, 0.0)), (-0.5, 0.5));
    }

    #[test]
    fn test_save_dispatch() {
        let mut fig = Figure::new(PlotOptions::default().dimensions(120, 90)).unwrap();
        fig.draw(fixed((0.0, 1.0), (0.0, 1.0)));
        let finished = fig.finalize().unwrap();

        let dir = tempfile::tempdir().unwrap();
        finished.save(dir.path().join("out.PNG")).unwrap();
        finished.save(dir.path().join("out.svg")).unwrap();
        assert!(dir.path().join("out.PNG").exists());
        assert!(matches!(
            finished.save(dir.path().join("out.gif")),
            Err(Error::Configuration(_))
        ));
        assert_eq!(&finished.png_bytes().unwrap()[..4], &[137, 80, 78, 71]);
    }
}
