/// Integer point in surface pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Triangle given by three integer vertices, in submission order.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Triangle {
    pub a: Point,
    pub b: Point,
    pub c: Point,
}

impl Triangle {
    #[inline]
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32, x3: i32, y3: i32) -> Self {
        Self {
            a: Point::new(x1, y1),
            b: Point::new(x2, y2),
            c: Point::new(x3, y3),
        }
    }
}
