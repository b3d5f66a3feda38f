//! Heatmap layer for 2-D histograms.
//!
//! Row 0 of the grid is drawn at the bottom, like ROOT's `COLZ`. Cell `(r, c)`
//! covers `[c - 0.5, c + 0.5] x [r - 0.5, r + 0.5]` in bin-index
//! coordinates unless explicit axis ranges are set, in which case cells
//! split those ranges evenly.
//!
//! The color domain is the finite value extent, computed with trueno's SIMD
//! reductions.

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::figure::{DrawContext, Extent, Layer};
use crate::geometry::{Point, Rect};
use crate::grid::Grid2D;
use crate::render::{Primitive, TextAnchor};
use crate::scale::{format_tick, nice_ticks, ColorScale, Palette, Scale};
use tracing::debug;
use trueno::Vector;

/// Colorbar width in pixels.
const COLORBAR_WIDTH: f32 = 12.0;
/// Gap between the panel and the colorbar.
const COLORBAR_GAP: f32 = 8.0;
const COLORBAR_STEPS: usize = 64;

/// Finite `(min, max)` of `values` using trueno vectors.
///
/// # Errors
///
/// Returns [`Error::Rendering`] if the SIMD reduction fails.
pub fn value_extent(values: &[f64]) -> Result<Option<(f64, f64)>> {
    let finite: Vec<f32> = values.iter().filter(|v| v.is_finite()).map(|&v| v as f32).collect();
    if finite.is_empty() {
        return Ok(None);
    }
    let vector = Vector::from_vec(finite);
    let min = vector.min().map_err(|e| Error::Rendering(format!("heatmap min: {e}")))?;
    let max = vector.max().map_err(|e| Error::Rendering(format!("heatmap max: {e}")))?;
    Ok(Some((f64::from(min), f64::from(max))))
}

/// `Grid2D` drawn as colored cells.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapLayer {
    grid: Grid2D,
    colors: ColorScale,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    colorbar: bool,
}

impl HeatmapLayer {
    /// Heatmap with the default palette and a colorbar.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyData`] for a grid with no cells or no finite
    /// values.
    pub fn new(grid: Grid2D) -> Result<Self> {
        Self::with_palette(grid, Palette::default())
    }

    /// Heatmap colored by `palette`.
    ///
    /// # Errors
    ///
    /// As [`HeatmapLayer::new`].
    pub fn with_palette(grid: Grid2D, palette: Palette) -> Result<Self> {
        if grid.n_rows() == 0 || grid.n_cols() == 0 {
            return Err(Error::EmptyData);
        }
        let (lo, hi) = value_extent(grid.values())?.ok_or(Error::EmptyData)?;
        let domain = if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) };
        debug!(rows = grid.n_rows(), cols = grid.n_cols(), min = lo, max = hi, "built heatmap layer");
        Ok(Self { colors: palette.scale(domain)?, grid, x_range: None, y_range: None, colorbar: true })
    }

    /// Span columns over `[min, max]` instead of bin indices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] unless `min < max`, both finite.
    pub fn x_range(mut self, min: f64, max: f64) -> Result<Self> {
        self.x_range = Some(checked_range(min, max)?);
        Ok(self)
    }

    /// Span rows over `[min, max]` instead of bin indices.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] unless `min < max`, both finite.
    pub fn y_range(mut self, min: f64, max: f64) -> Result<Self> {
        self.y_range = Some(checked_range(min, max)?);
        Ok(self)
    }

    /// Show or hide the colorbar.
    #[must_use]
    pub fn colorbar(mut self, show: bool) -> Self {
        self.colorbar = show;
        self
    }

    /// The value-to-color mapping.
    #[must_use]
    pub fn color_scale(&self) -> &ColorScale {
        &self.colors
    }

    /// The drawn grid.
    #[must_use]
    pub fn grid(&self) -> &Grid2D {
        &self.grid
    }

    fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let index_span = |n: usize| (-0.5, n as f64 - 0.5);
        (
            self.x_range.unwrap_or_else(|| index_span(self.grid.n_cols())),
            self.y_range.unwrap_or_else(|| index_span(self.grid.n_rows())),
        )
    }

    fn draw_colorbar(&self, ctx: &mut DrawContext<'_>) {
        let panel = ctx.panel();
        let bar = Rect::new(panel.right() + COLORBAR_GAP, panel.y, COLORBAR_WIDTH, panel.height);
        let (lo, hi) = self.colors.domain();

        let step_h = bar.height / COLORBAR_STEPS as f32;
        for i in 0..COLORBAR_STEPS {
            let t = (i as f64 + 0.5) / COLORBAR_STEPS as f64;
            let y = bar.bottom() - (i + 1) as f32 * step_h;
            ctx.push(Primitive::Rect {
                rect: Rect::new(bar.x, y, bar.width, step_h + 0.5),
                fill: self.colors.scale(lo + t * (hi - lo)),
            });
        }
        ctx.push(Primitive::RectOutline { rect: bar, stroke: Rgba::BLACK, width: 1.0 });

        let ticks = nice_ticks(lo, hi, 5);
        let step = match ticks.as_slice() {
            [a, b, ..] => b - a,
            _ => hi - lo,
        };
        for v in ticks {
            let y = bar.bottom() - ((v - lo) / (hi - lo)) as f32 * bar.height;
            ctx.push(Primitive::Line {
                from: Point::new(bar.right() - 4.0, y),
                to: Point::new(bar.right(), y),
                stroke: Rgba::BLACK,
                width: 1.0,
            });
            ctx.push(Primitive::Text {
                position: Point::new(bar.right() + 4.0, y + 4.0),
                text: format_tick(v, step),
                size: 12.0,
                color: Rgba::BLACK,
                anchor: TextAnchor::Start,
                vertical: false,
            });
        }
    }
}

fn checked_range(min: f64, max: f64) -> Result<(f64, f64)> {
    if min.is_finite() && max.is_finite() && min < max {
        Ok((min, max))
    } else {
        Err(Error::Configuration(format!("heatmap range [{min}, {max}] must be increasing")))
    }
}

impl Layer for HeatmapLayer {
    fn data_extent(&self) -> Option<Extent> {
        let (x, y) = self.bounds();
        Some(Extent::new(x, y))
    }

    fn wants_headroom(&self) -> bool {
        false
    }

    fn draw(&self, ctx: &mut DrawContext<'_>) {
        let ((x0, x1), (y0, y1)) = self.bounds();
        let cell_w = (x1 - x0) / self.grid.n_cols() as f64;
        let cell_h = (y1 - y0) / self.grid.n_rows() as f64;

        for (r, row) in self.grid.rows().enumerate() {
            let bottom = ctx.y_px_clamped(y0 + r as f64 * cell_h);
            let top = ctx.y_px_clamped(y0 + (r + 1) as f64 * cell_h);
            if bottom <= top {
                continue;
            }
            for (c, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    continue;
                }
                let left = ctx.x_px_clamped(x0 + c as f64 * cell_w);
                let right = ctx.x_px_clamped(x0 + (c + 1) as f64 * cell_w);
                if right > left {
                    ctx.push(Primitive::Rect {
                        rect: Rect::new(left, top, right - left, bottom - top),
                        fill: self.colors.scale(value),
                    });
                }
            }
        }

        if self.colorbar {
            self.draw_colorbar(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LegendPlacement, PlotOptions};
    use crate::figure::Figure;

    fn grid() -> Grid2D {
        // 2 rows x 3 cols, row 0 is the lowest y bin
        Grid2D::from_flat(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3, false).unwrap()
    }

    #[test]
    fn test_value_extent() {
        let extent = value_extent(&[3.0, f64::NAN, -1.5, 8.0]).unwrap();
        assert_eq!(extent, Some((-1.5, 8.0)));
        assert_eq!(value_extent(&[f64::NAN]).unwrap(), None);
    }

    #[test]
    fn test_index_bounds() {
        let layer = HeatmapLayer::new(grid()).unwrap();
        let extent = layer.data_extent().unwrap();
        assert_eq!(extent.x, (-0.5, 2.5));
        assert_eq!(extent.y, (-0.5, 1.5));
        assert_eq!(layer.color_scale().domain(), (1.0, 6.0));
    }

    #[test]
    fn test_constant_grid_gets_a_domain() {
        let flat = Grid2D::from_flat(&[2.0; 4], 2, 2, false).unwrap();
        let layer = HeatmapLayer::new(flat).unwrap();
        assert_eq!(layer.color_scale().domain(), (1.5, 2.5));
    }

    #[test]
    fn test_rejects_bad_input() {
        let nan = Grid2D::from_flat(&[f64::NAN], 1, 1, false).unwrap();
        assert!(matches!(HeatmapLayer::new(nan), Err(Error::EmptyData)));
        assert!(HeatmapLayer::new(grid()).unwrap().x_range(1.0, 1.0).is_err());
    }

    #[test]
    fn test_origin_is_bottom_left() {
        let options = PlotOptions::default().legend(LegendPlacement::Hidden);
        let mut fig = Figure::new(options).unwrap();
        let layer = HeatmapLayer::with_palette(grid(), Palette::Magma)
            .unwrap()
            .x_range(0.0, 3.0)
            .unwrap()
            .y_range(0.0, 1.0)
            .unwrap()
            .colorbar(false);
        let low = layer.color_scale().scale(1.0);
        let high = layer.color_scale().scale(6.0);
        fig.draw(layer);
        let finished = fig.finalize().unwrap();

        let cells: Vec<(Rect, Rgba)> = finished
            .primitives()
            .iter()
            .filter_map(|p| match p {
                Primitive::Rect { rect, fill } if *fill == low || *fill == high => Some((*rect, *fill)),
                _ => None,
            })
            .collect();
        assert_eq!(cells.len(), 2);
        let first = cells.iter().find(|(_, f)| *f == low).unwrap().0;
        let last = cells.iter().find(|(_, f)| *f == high).unwrap().0;
        // value 1 at row 0 col 0: bottom-left; value 6 at row 1 col 2: top-right
        assert!(first.y > last.y);
        assert!(first.x < last.x);
    }

    #[test]
    fn test_colorbar_is_drawn_outside_panel() {
        let mut fig = Figure::new(PlotOptions::default()).unwrap();
        let panel = fig.layout().main;
        fig.draw(HeatmapLayer::new(grid()).unwrap());
        let finished = fig.finalize().unwrap();
        assert!(finished.primitives().iter().any(|p| matches!(
            p,
            Primitive::RectOutline { rect, .. } if rect.x > panel.right()
        )));
    }
}
