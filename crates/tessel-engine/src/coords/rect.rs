use super::Point;

/// Integer rectangle in surface pixels (top-left origin).
///
/// `w`/`h` are extents, so the covered pixels are `[x, x + w) x [y, y + h)`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rectangle {
    #[inline]
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub const fn origin(self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Returns the corners as floats: `(x1, y1, x2, y2)` with `x2 = x + w`, `y2 = y + h`.
    #[inline]
    pub fn edges(self) -> (f32, f32, f32, f32) {
        let x1 = self.x as f32;
        let y1 = self.y as f32;
        (x1, y1, x1 + self.w as f32, y1 + self.h as f32)
    }

    /// Same size, moved so that its origin is `p`.
    #[inline]
    pub const fn at(self, p: Point) -> Self {
        Self::new(p.x, p.y, self.w, self.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_add_extent() {
        assert_eq!(Rectangle::new(3, 4, 10, 20).edges(), (3.0, 4.0, 13.0, 24.0));
    }

    #[test]
    fn empty_when_no_extent() {
        assert!(Rectangle::new(0, 0, 0, 5).is_empty());
        assert!(Rectangle::new(0, 0, 5, -1).is_empty());
        assert!(!Rectangle::new(0, 0, 1, 1).is_empty());
    }

    #[test]
    fn at_keeps_size() {
        let r = Rectangle::new(1, 2, 3, 4).at(Point::new(9, 8));
        assert_eq!(r, Rectangle::new(9, 8, 3, 4));
    }
}
