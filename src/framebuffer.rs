//! RGBA pixel buffer that figures rasterize into.
//!
//! Rows are padded to a 64-byte stride so that clears and rectangle fills
//! copy whole cache lines.

use crate::color::Rgba;
use crate::error::{Error, Result};

/// Row alignment in bytes.
const ROW_ALIGNMENT: usize = 64;

/// Row-major RGBA framebuffer.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    /// RGBA pixels, 4 bytes each, `stride` bytes per row.
    pixels: Vec<u8>,
    stride: usize,
}

impl Framebuffer {
    /// Create a transparent framebuffer with the given dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use trueno_hist::framebuffer::Framebuffer;
    ///
    /// let fb = Framebuffer::new(800, 600).unwrap();
    /// assert_eq!(fb.width(), 800);
    /// assert_eq!(fb.height(), 600);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let row_bytes = (width as usize) * 4;
        let stride = (row_bytes + ROW_ALIGNMENT - 1) & !(ROW_ALIGNMENT - 1);

        Ok(Self { width, height, pixels: vec![0; stride * (height as usize)], stride })
    }

    /// Get the width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Get the stride (row width in bytes, including any padding).
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// Get the total number of pixels.
    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Get a row of pixels as a slice.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * self.stride;
        let end = start + (self.width as usize) * 4;
        Some(&self.pixels[start..end])
    }

    /// Clear the framebuffer to a solid color.
    pub fn clear(&mut self, color: Rgba) {
        let pixel = color.to_array();
        let row_bytes = (self.width as usize) * 4;

        for row in self.pixels.chunks_exact_mut(self.stride) {
            for chunk in row[..row_bytes].chunks_exact_mut(4) {
                chunk.copy_from_slice(&pixel);
            }
        }
    }

    /// Fill a rectangular region with a solid color.
    ///
    /// Coordinates are clamped to framebuffer bounds.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        let Some((x1, y1, x2, y2)) = self.clip(x, y, w, h) else {
            return;
        };

        let pixel = color.to_array();
        let rect_width = (x2 - x1) as usize;

        for row_y in y1..y2 {
            let row_start = (row_y as usize) * self.stride + (x1 as usize) * 4;
            let row = &mut self.pixels[row_start..row_start + rect_width * 4];
            for chunk in row.chunks_exact_mut(4) {
                chunk.copy_from_slice(&pixel);
            }
        }
    }

    /// Fill a rectangular region, compositing a translucent color over the
    /// existing pixels.
    pub fn fill_rect_blend(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba) {
        if color.a == 255 {
            self.fill_rect(x, y, w, h, color);
            return;
        }
        let Some((x1, y1, x2, y2)) = self.clip(x, y, w, h) else {
            return;
        };
        for py in y1..y2 {
            for px in x1..x2 {
                self.blend_pixel(px, py, color);
            }
        }
    }

    fn clip(&self, x: u32, y: u32, w: u32, h: u32) -> Option<(u32, u32, u32, u32)> {
        let x1 = x.min(self.width);
        let y1 = y.min(self.height);
        let x2 = x.saturating_add(w).min(self.width);
        let y2 = y.saturating_add(h).min(self.height);
        (x1 < x2 && y1 < y2).then_some((x1, y1, x2, y2))
    }

    /// Get the color at a specific pixel coordinate.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let idx = self.pixel_index(x, y);
        Some(Rgba::new(
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ))
    }

    /// Set the color at a specific pixel coordinate.
    ///
    /// Does nothing if the coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = self.pixel_index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_array());
    }

    /// Composite `color` over the pixel at `(x, y)`.
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(dst) = self.get_pixel(x, y) {
            self.set_pixel(x, y, color.blend_over(dst));
        }
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * self.stride + (x as usize) * 4
    }

    /// Pixel data without stride padding, as PNG expects.
    #[must_use]
    pub fn to_compact_pixels(&self) -> Vec<u8> {
        let row_bytes = (self.width as usize) * 4;

        if self.stride == row_bytes {
            return self.pixels.clone();
        }

        let mut compact = Vec::with_capacity(row_bytes * (self.height as usize));
        for row in self.pixels.chunks_exact(self.stride) {
            compact.extend_from_slice(&row[..row_bytes]);
        }
        compact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_framebuffer() {
        let fb = Framebuffer::new(100, 50).unwrap();
        assert_eq!(fb.width(), 100);
        assert_eq!(fb.height(), 50);
        assert_eq!(fb.pixel_count(), 5000);
        assert_eq!(fb.stride() % ROW_ALIGNMENT, 0);
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_zero_dimensions() {
        assert!(matches!(
            Framebuffer::new(0, 10),
            Err(Error::InvalidDimensions { width: 0, height: 10 })
        ));
    }

    #[test]
    fn test_clear_and_rows() {
        let mut fb = Framebuffer::new(7, 3).unwrap();
        fb.clear(Rgba::RED);
        assert_eq!(fb.get_pixel(6, 2), Some(Rgba::RED));
        assert_eq!(fb.row(0).unwrap().len(), 28);
        assert!(fb.row(3).is_none());
    }

    #[test]
    fn test_fill_rect_clamped() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.fill_rect(8, 8, 100, 100, Rgba::BLUE);
        assert_eq!(fb.get_pixel(9, 9), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(7, 7), Some(Rgba::TRANSPARENT));
        fb.fill_rect(u32::MAX, 0, 5, 5, Rgba::RED);
    }

    #[test]
    fn test_fill_rect_blend() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.clear(Rgba::WHITE);
        fb.fill_rect_blend(0, 0, 2, 2, Rgba::BLACK.with_alpha(128));
        let px = fb.get_pixel(1, 1).unwrap();
        assert_eq!(px.r, 127);
        assert_eq!(fb.get_pixel(3, 3), Some(Rgba::WHITE));
    }

    #[test]
    fn test_set_pixel_out_of_bounds() {
        let mut fb = Framebuffer::new(2, 2).unwrap();
        fb.set_pixel(5, 5, Rgba::RED);
        assert!(fb.get_pixel(5, 5).is_none());
    }

    #[test]
    fn test_compact_pixels() {
        let mut fb = Framebuffer::new(3, 2).unwrap();
        fb.clear(Rgba::WHITE);
        let compact = fb.to_compact_pixels();
        assert_eq!(compact.len(), 3 * 2 * 4);
        assert!(compact.iter().all(|&b| b == 255));
    }
}
