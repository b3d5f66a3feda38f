//! Terminal preview of a rasterized figure.
//!
//! Each character cell covers a block of pixels. Figures are mostly thin
//! dark strokes on a light background, so a cell shows its most inked
//! pixel rather than the average, which would wash one-pixel lines out.
//!
//! - ASCII: density ramp ` .:-=+*#%@`, dark ink maps to dense glyphs
//! - Half-block: `▀` with 24-bit ANSI colors, two pixel rows per line

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use std::fmt::Write as FmtWrite;
use tracing::trace;

/// Terminal rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalMode {
    /// Plain ASCII density ramp.
    Ascii,
    /// Colored half blocks (needs a true-color terminal).
    #[default]
    HalfBlock,
}

/// Terminal encoder configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalEncoder {
    mode: TerminalMode,
    width: u32,
    height: Option<u32>,
}

impl Default for TerminalEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalEncoder {
    const ASCII_RAMP: &'static [char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

    /// Terminal cells are roughly twice as tall as wide.
    const CELL_ASPECT: f32 = 2.0;

    /// Half-block output, 80 columns.
    #[must_use]
    pub fn new() -> Self {
        Self { mode: TerminalMode::default(), width: 80, height: None }
    }

    /// Set the rendering mode.
    #[must_use]
    pub fn mode(mut self, mode: TerminalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the width in columns (at least 1).
    #[must_use]
    pub fn width(mut self, columns: u32) -> Self {
        self.width = columns.max(1);
        self
    }

    /// Set the height in lines; derived from the aspect ratio otherwise.
    #[must_use]
    pub fn height(mut self, lines: u32) -> Self {
        self.height = Some(lines.max(1));
        self
    }

    /// Columns and lines for a framebuffer.
    fn grid(&self, fb: &Framebuffer) -> (u32, u32) {
        let columns = self.width.min(fb.width());
        let lines = self.height.unwrap_or_else(|| {
            let cell_w = fb.width() as f32 / columns as f32;
            ((fb.height() as f32 / (cell_w * Self::CELL_ASPECT)).round() as u32).max(1)
        });
        (columns, lines)
    }

    /// Render a framebuffer to a string, one line per terminal row.
    #[must_use]
    pub fn render(&self, fb: &Framebuffer) -> String {
        let (columns, lines) = self.grid(fb);
        trace!(columns, lines, mode = ?self.mode, "terminal render");
        match self.mode {
            TerminalMode::Ascii => Self::render_ascii(fb, columns, lines),
            TerminalMode::HalfBlock => Self::render_half_block(fb, columns, lines),
        }
    }

    fn render_ascii(fb: &Framebuffer, columns: u32, lines: u32) -> String {
        let mut out = String::with_capacity((columns as usize + 1) * lines as usize);
        for row in 0..lines {
            for col in 0..columns {
                let cell = Cell::new(fb, col, row, columns, lines);
                let ink = 1.0 - luma(cell.strongest_ink(fb));
                let idx = (ink * (Self::ASCII_RAMP.len() - 1) as f32).round() as usize;
                out.push(Self::ASCII_RAMP[idx.min(Self::ASCII_RAMP.len() - 1)]);
            }
            out.push('\n');
        }
        out
    }

    fn render_half_block(fb: &Framebuffer, columns: u32, lines: u32) -> String {
        let rows = lines * 2;
        let mut out = String::with_capacity((columns as usize * 40 + 8) * lines as usize);
        for line in 0..lines {
            for col in 0..columns {
                let top = Cell::new(fb, col, 2 * line, columns, rows).strongest_ink(fb);
                let bottom = Cell::new(fb, col, 2 * line + 1, columns, rows).strongest_ink(fb);
                let _ = write!(
                    out,
                    "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m\u{2580}",
                    top.r, top.g, top.b, bottom.r, bottom.g, bottom.b
                );
            }
            out.push_str("\x1b[0m\n");
        }
        out
    }
}

/// Pixel block covered by one character cell.
struct Cell {
    x0: u32,
    x1: u32,
    y0: u32,
    y1: u32,
}

impl Cell {
    fn new(fb: &Framebuffer, col: u32, row: u32, columns: u32, rows: u32) -> Self {
        let span = |i: u32, n: u32, len: u32| {
            let start = (u64::from(i) * u64::from(len) / u64::from(n)) as u32;
            let end = (u64::from(i + 1) * u64::from(len) / u64::from(n)) as u32;
            (start.min(len - 1), end.clamp(start + 1, len))
        };
        let (x0, x1) = span(col, columns, fb.width());
        let (y0, y1) = span(row, rows, fb.height());
        Self { x0, x1, y0, y1 }
    }

    /// The pixel furthest from white, composited over white.
    fn strongest_ink(&self, fb: &Framebuffer) -> Rgba {
        let mut best = Rgba::WHITE;
        let mut best_luma = f32::INFINITY;
        for y in self.y0..self.y1 {
            for x in self.x0..self.x1 {
                if let Some(px) = fb.get_pixel(x, y) {
                    let px = px.blend_over(Rgba::WHITE);
                    let l = luma(px);
                    if l < best_luma {
                        best_luma = l;
                        best = px;
                    }
                }
            }
        }
        best
    }
}

/// Rec. 601 luma in `0.0..=1.0`.
fn luma(c: Rgba) -> f32 {
    (0.299 * f32::from(c.r) + 0.587 * f32::from(c.g) + 0.114 * f32::from(c.b)) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(w: u32, h: u32) -> Framebuffer {
        let mut fb = Framebuffer::new(w, h).unwrap();
        fb.clear(Rgba::WHITE);
        fb
    }

    #[test]
    fn test_blank_page_is_spaces() {
        let out = TerminalEncoder::new().mode(TerminalMode::Ascii).width(5).render(&white(10, 10));
        assert!(out.chars().all(|c| c == ' ' || c == '\n'));
    }

    #[test]
    fn test_black_is_densest_glyph() {
        let mut fb = white(10, 10);
        fb.clear(Rgba::BLACK);
        let out = TerminalEncoder::new().mode(TerminalMode::Ascii).width(5).render(&fb);
        assert!(out.chars().all(|c| c == '@' || c == '\n'));
    }

    #[test]
    fn test_thin_line_survives_downsampling() {
        let mut fb = white(100, 40);
        for x in 0..100 {
            fb.set_pixel(x, 21, Rgba::BLACK);
        }
        let out = TerminalEncoder::new().mode(TerminalMode::Ascii).width(10).height(4).render(&fb);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[2], "@@@@@@@@@@");
        assert_eq!(lines[0].trim(), "");
    }

    #[test]
    fn test_half_block_colors() {
        let mut fb = white(10, 10);
        fb.fill_rect(0, 5, 10, 5, Rgba::BLUE);
        let out = TerminalEncoder::new().width(10).height(1).render(&fb);
        assert!(out.contains("\x1b[38;2;255;255;255m"));
        assert!(out.contains("\x1b[48;2;0;0;255m"));
        assert!(out.contains('\u{2580}'));
        assert!(out.ends_with("\x1b[0m\n"));
    }

    #[test]
    fn test_aspect_ratio() {
        let out = TerminalEncoder::new().mode(TerminalMode::Ascii).width(40).render(&white(200, 100));
        // 5 px per column, 10 px per line
        assert_eq!(out.lines().count(), 10);
        assert!(out.lines().all(|l| l.chars().count() == 40));
    }

    #[test]
    fn test_width_capped_at_framebuffer() {
        let out = TerminalEncoder::new().mode(TerminalMode::Ascii).width(500).render(&white(20, 20));
        assert_eq!(out.lines().next().map(str::len), Some(20));
    }
}
