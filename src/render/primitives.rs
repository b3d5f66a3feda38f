//! Pixel-level rasterization of lines, rectangles and markers.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;

// ============================================================================
// Line Drawing
// ============================================================================

/// Draw a one-pixel line using Bresenham's algorithm.
pub fn draw_line(fb: &mut Framebuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        if x >= 0 && y >= 0 {
            fb.blend_pixel(x as u32, y as u32, color);
        }

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Draw a line `thickness` pixels wide.
///
/// Extra passes are offset across the minor axis, so horizontal and
/// vertical segments come out as solid bars.
pub fn draw_thick_line(
    fb: &mut Framebuffer,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: Rgba,
    thickness: u32,
) {
    let thickness = thickness.max(1) as i32;
    let shallow = (x1 - x0).abs() >= (y1 - y0).abs();
    let first = -(thickness - 1) / 2;

    for offset in first..first + thickness {
        if shallow {
            draw_line(fb, x0, y0 + offset, x1, y1 + offset, color);
        } else {
            draw_line(fb, x0 + offset, y0, x1 + offset, y1, color);
        }
    }
}

// ============================================================================
// Rectangle Drawing
// ============================================================================

/// Draw a filled rectangle; translucent colors are composited.
pub fn draw_rect(fb: &mut Framebuffer, x: i32, y: i32, width: u32, height: u32, color: Rgba) {
    // clip the part left of / above the origin
    let (x, width) = clip_span(x, width);
    let (y, height) = clip_span(y, height);
    fb.fill_rect_blend(x, y, width, height, color);
}

fn clip_span(start: i32, len: u32) -> (u32, u32) {
    if start >= 0 {
        (start as u32, len)
    } else {
        (0, len.saturating_sub(start.unsigned_abs()))
    }
}

/// Draw a rectangle outline.
pub fn draw_rect_outline(
    fb: &mut Framebuffer,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    color: Rgba,
    thickness: u32,
) {
    let thickness = thickness.max(1);
    let t = thickness as i32;

    // Top edge
    draw_rect(fb, x, y, width, thickness, color);
    // Bottom edge
    if height > thickness {
        draw_rect(fb, x, y + height as i32 - t, width, thickness, color);
    }
    // Left and right edges
    if height > 2 * thickness {
        let inner = height - 2 * thickness;
        draw_rect(fb, x, y + t, thickness, inner, color);
        if width > thickness {
            draw_rect(fb, x + width as i32 - t, y + t, thickness, inner, color);
        }
    }
}

// ============================================================================
// Markers
// ============================================================================

/// Draw a filled circle using the midpoint algorithm.
pub fn draw_circle(fb: &mut Framebuffer, cx: i32, cy: i32, radius: i32, color: Rgba) {
    if radius <= 0 {
        if radius == 0 && cx >= 0 && cy >= 0 {
            fb.set_pixel(cx as u32, cy as u32, color);
        }
        return;
    }

    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;

    while x >= y {
        draw_horizontal_line(fb, cx - x, cx + x, cy + y, color);
        draw_horizontal_line(fb, cx - x, cx + x, cy - y, color);
        draw_horizontal_line(fb, cx - y, cx + y, cy + x, color);
        draw_horizontal_line(fb, cx - y, cx + y, cy - x, color);

        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// Draw a filled square centered on `(cx, cy)`.
pub fn draw_square(fb: &mut Framebuffer, cx: i32, cy: i32, half: i32, color: Rgba) {
    let half = half.max(0);
    let side = (2 * half + 1) as u32;
    draw_rect(fb, cx - half, cy - half, side, side, color);
}

/// Draw an `x`-shaped cross centered on `(cx, cy)`.
pub fn draw_cross(fb: &mut Framebuffer, cx: i32, cy: i32, half: i32, color: Rgba) {
    draw_line(fb, cx - half, cy - half, cx + half, cy + half, color);
    draw_line(fb, cx - half, cy + half, cx + half, cy - half, color);
}

/// Horizontal scan line for the filled circle.
#[inline]
fn draw_horizontal_line(fb: &mut Framebuffer, x1: i32, x2: i32, y: i32, color: Rgba) {
    if y < 0 || y >= fb.height() as i32 {
        return;
    }

    let x_start = x1.max(0) as u32;
    let x_end = (x2 + 1).max(0).min(fb.width() as i32) as u32;

    if x_start < x_end {
        fb.fill_rect(x_start, y as u32, x_end - x_start, 1, color);
    }
}
