use crate::coords::{Rectangle, Region, Triangle};

/// Filled rectangle: corners in triangle-fan order.
pub fn fill_rectangle(rect: &Rectangle) -> [[f32; 2]; 4] {
    let (x1, y1, x2, y2) = rect.edges();
    [[x1, y1], [x2, y1], [x2, y2], [x1, y2]]
}

/// Outlined rectangle: corners for a line loop, inset by one on the top-left
/// so lines land on pixel centers.
pub fn draw_rectangle(rect: &Rectangle) -> [[f32; 2]; 4] {
    let (x, y) = (rect.x as f32, rect.y as f32);
    let (x1, y1) = (x + 1.0, y + 1.0);
    let (x2, y2) = (x + rect.w as f32, y + rect.h as f32);
    [[x1, y1], [x2, y1], [x2, y2], [x1, y2]]
}

/// Line endpoints.
pub fn line(line: &Region) -> [[f32; 2]; 2] {
    [[line.x1 as f32, line.y1 as f32], [line.x2 as f32, line.y2 as f32]]
}

/// Triangle vertices, order preserved.
pub fn triangle(tri: &Triangle) -> [[f32; 2]; 3] {
    [
        [tri.a.x as f32, tri.a.y as f32],
        [tri.b.x as f32, tri.b.y as f32],
        [tri.c.x as f32, tri.c.y as f32],
    ]
}
