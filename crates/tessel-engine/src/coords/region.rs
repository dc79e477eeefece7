use super::Rectangle;

/// Inclusive integer region `(x1, y1)..=(x2, y2)`.
///
/// Used for clip rectangles and for line endpoints.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Region {
    #[inline]
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Region covering a whole `width x height` surface.
    #[inline]
    pub const fn covering(width: i32, height: i32) -> Self {
        Self::new(0, 0, width - 1, height - 1)
    }

    #[inline]
    pub const fn width(self) -> i32 {
        self.x2 - self.x1 + 1
    }

    #[inline]
    pub const fn height(self) -> i32 {
        self.y2 - self.y1 + 1
    }

    /// True if the region lies inside a `width x height` surface.
    #[inline]
    pub fn is_within(self, width: i32, height: i32) -> bool {
        self.x1 >= 0
            && self.y1 >= 0
            && self.x1 <= self.x2
            && self.y1 <= self.y2
            && self.x2 < width
            && self.y2 < height
    }

    #[inline]
    pub const fn to_rectangle(self) -> Rectangle {
        Rectangle::new(self.x1, self.y1, self.width(), self.height())
    }
}
