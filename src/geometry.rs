//! Geometric primitives for figure layout.

/// A 2D point in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle defined by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: f32,
    /// Y coordinate of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if a point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Get the center point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Shrink by independent amounts on each side. Size never goes negative.
    #[must_use]
    pub fn inset(&self, left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(
            self.x + left,
            self.y + top,
            (self.width - left - right).max(0.0),
            (self.height - top - bottom).max(0.0),
        )
    }

    /// Split into a top part and a bottom part holding `fraction` of the
    /// height, separated by `gap` pixels.
    #[must_use]
    pub fn split_bottom(&self, fraction: f32, gap: f32) -> (Self, Self) {
        let usable = (self.height - gap).max(0.0);
        let bottom_h = usable * fraction.clamp(0.0, 1.0);
        let top_h = usable - bottom_h;
        let top = Self::new(self.x, self.y, self.width, top_h);
        let bottom = Self::new(self.x, self.y + top_h + gap, self.width, bottom_h);
        (top, bottom)
    }

    /// Clamp a point into the rectangle.
    #[must_use]
    pub fn clamp(&self, point: Point) -> Point {
        Point::new(point.x.clamp(self.x, self.right()), point.y.clamp(self.y, self.bottom()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Point::new(5.0, 5.0)));
        assert!(!rect.contains(Point::new(15.0, 5.0)));
        assert_eq!(rect.center(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_inset() {
        let rect = Rect::new(0.0, 0.0, 100.0, 50.0).inset(10.0, 5.0, 20.0, 15.0);
        assert_eq!(rect, Rect::new(10.0, 5.0, 70.0, 30.0));
        let collapsed = Rect::new(0.0, 0.0, 10.0, 10.0).inset(8.0, 8.0, 8.0, 8.0);
        assert_eq!(collapsed.width, 0.0);
    }

    #[test]
    fn test_split_bottom() {
        let (top, bottom) = Rect::new(0.0, 0.0, 100.0, 110.0).split_bottom(0.3, 10.0);
        assert!((top.height - 70.0).abs() < 1e-4);
        assert!((bottom.height - 30.0).abs() < 1e-4);
        assert!((bottom.y - 80.0).abs() < 1e-4);
        assert!((bottom.bottom() - 110.0).abs() < 1e-4);
    }

    #[test]
    fn test_clamp() {
        let rect = Rect::new(10.0, 10.0, 10.0, 10.0);
        assert_eq!(rect.clamp(Point::new(0.0, 30.0)), Point::new(10.0, 20.0));
    }
}
