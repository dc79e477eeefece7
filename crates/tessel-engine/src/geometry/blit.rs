use crate::coords::{Point, Rectangle};
use crate::state::BlittingFlags;

use super::primitives::fill_rectangle;

/// Rotation applied to the sampled source image.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum BlitRotation {
    #[default]
    None,
    Rotate90,
    Rotate180,
    Rotate270,
}

impl BlitRotation {
    /// Resolves the rotation from blitting flags. 180 wins over 90, 90 over 270.
    pub fn from_flags(flags: BlittingFlags) -> Self {
        if flags.contains(BlittingFlags::ROTATE180) {
            BlitRotation::Rotate180
        } else if flags.contains(BlittingFlags::ROTATE90) {
            BlitRotation::Rotate90
        } else if flags.contains(BlittingFlags::ROTATE270) {
            BlitRotation::Rotate270
        } else {
            BlitRotation::None
        }
    }
}

/// Source corners ordered to match the destination fan `(x1,y1) (x2,y1) (x2,y2) (x1,y2)`.
pub fn texcoords(src: &Rectangle, rotation: BlitRotation) -> [[f32; 2]; 4] {
    let (tx1, ty1, tx2, ty2) = src.edges();
    match rotation {
        BlitRotation::None => [[tx1, ty1], [tx2, ty1], [tx2, ty2], [tx1, ty2]],
        BlitRotation::Rotate180 => [[tx2, ty2], [tx1, ty2], [tx1, ty1], [tx2, ty1]],
        BlitRotation::Rotate90 => [[tx2, ty1], [tx2, ty2], [tx1, ty2], [tx1, ty1]],
        BlitRotation::Rotate270 => [[tx1, ty2], [tx1, ty1], [tx2, ty1], [tx2, ty2]],
    }
}

/// Fan geometry for a single blit or stretch blit.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BlitQuad {
    pub positions: [[f32; 2]; 4],
    pub texcoords: [[f32; 2]; 4],
}

/// Unscaled blit of `src` to `(dx, dy)`.
pub fn blit(src: &Rectangle, dx: i32, dy: i32, rotation: BlitRotation) -> BlitQuad {
    BlitQuad {
        positions: fill_rectangle(&src.at(Point::new(dx, dy))),
        texcoords: texcoords(src, rotation),
    }
}

/// Blit of `src` scaled into `dst`; x and y scale independently.
pub fn stretch_blit(src: &Rectangle, dst: &Rectangle, rotation: BlitRotation) -> BlitQuad {
    BlitQuad {
        positions: fill_rectangle(dst),
        texcoords: texcoords(src, rotation),
    }
}

/// Vertices per batched item: two independent triangles.
pub const BATCH_VERTICES_PER_ITEM: usize = 6;

/// Fan corner order to triangle-list order: `(0, 1, 2)` then `(2, 0, 3)`.
const FAN_TO_TRIANGLES: [usize; BATCH_VERTICES_PER_ITEM] = [0, 1, 2, 2, 0, 3];

/// Triangle-list geometry for a batch of blits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchGeometry {
    pub positions: Vec<[f32; 2]>,
    pub texcoords: Vec<[f32; 2]>,
    /// Items actually emitted.
    pub count: usize,
}

/// Builds a batch from `(rect, point)` pairs, emitting at most `limit` items.
///
/// Pairs beyond the shorter of the two slices are ignored.
pub fn batch_blit(
    rects: &[Rectangle],
    points: &[Point],
    rotation: BlitRotation,
    limit: usize,
) -> BatchGeometry {
    let count = rects.len().min(points.len()).min(limit);

    let mut positions = Vec::with_capacity(count * BATCH_VERTICES_PER_ITEM);
    let mut tex = Vec::with_capacity(count * BATCH_VERTICES_PER_ITEM);

    for (rect, point) in rects.iter().zip(points).take(count) {
        let quad = blit(rect, point.x, point.y, rotation);
        for i in FAN_TO_TRIANGLES {
            positions.push(quad.positions[i]);
            tex.push(quad.texcoords[i]);
        }
    }

    BatchGeometry { positions, texcoords: tex, count }
}
