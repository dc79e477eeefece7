//! Primitive entry points. Each one builds geometry and draws; SetState must
//! have prepared the matching function beforehand.

use crate::coords::{Point, Rectangle, Region, Triangle};
use crate::geometry::{self, BlitRotation};
use crate::gl::{GlApi, Primitive};

use super::driver::Device;

impl<G: GlApi> Device<G> {
    pub fn fill_rectangle(&mut self, rect: &Rectangle) -> bool {
        log::trace!("fill_rectangle {rect:?}");
        let pos = geometry::fill_rectangle(rect);
        self.gl.draw_arrays(Primitive::TriangleFan, &pos, None);
        true
    }

    pub fn draw_rectangle(&mut self, rect: &Rectangle) -> bool {
        log::trace!("draw_rectangle {rect:?}");
        let pos = geometry::draw_rectangle(rect);
        self.gl.draw_arrays(Primitive::LineLoop, &pos, None);
        true
    }

    pub fn draw_line(&mut self, line: &Region) -> bool {
        log::trace!("draw_line {line:?}");
        let pos = geometry::line(line);
        self.gl.draw_arrays(Primitive::Lines, &pos, None);
        true
    }

    pub fn fill_triangle(&mut self, tri: &Triangle) -> bool {
        log::trace!("fill_triangle {tri:?}");
        let pos = geometry::triangle(tri);
        self.gl.draw_arrays(Primitive::Triangles, &pos, None);
        true
    }

    /// Copies `src` to `(dx, dy)`, rotated per the recorded blitting flags.
    pub fn blit(&mut self, src: &Rectangle, dx: i32, dy: i32) -> bool {
        log::trace!("blit {src:?} -> {dx},{dy}");
        let quad = geometry::blit(src, dx, dy, self.blit_rotation());
        self.gl.draw_arrays(Primitive::TriangleFan, &quad.positions, Some(&quad.texcoords));
        true
    }

    pub fn stretch_blit(&mut self, src: &Rectangle, dst: &Rectangle) -> bool {
        log::trace!("stretch_blit {src:?} -> {dst:?}");
        let quad = geometry::stretch_blit(src, dst, self.blit_rotation());
        self.gl.draw_arrays(Primitive::TriangleFan, &quad.positions, Some(&quad.texcoords));
        true
    }

    /// Blits `rects[i]` to `points[i]` in one draw call.
    ///
    /// Returns how many items were drawn. That is fewer than requested when
    /// `max_batch_blits` caps the batch; the caller handles the rest.
    pub fn batch_blit(&mut self, rects: &[Rectangle], points: &[Point]) -> usize {
        let requested = rects.len().min(points.len());
        let limit = self.config.max_batch_blits.unwrap_or(usize::MAX);

        let batch = geometry::batch_blit(rects, points, self.blit_rotation(), limit);
        if batch.count < requested {
            log::warn!("batch blit truncated to {} of {requested} items", batch.count);
        }
        log::trace!("batch_blit {} items", batch.count);

        if batch.count > 0 {
            self.gl.draw_arrays(Primitive::Triangles, &batch.positions, Some(&batch.texcoords));
        }
        batch.count
    }

    #[inline]
    fn blit_rotation(&self) -> BlitRotation {
        BlitRotation::from_flags(self.blitting_flags)
    }
}
