//! Vertex builders for the accelerated primitives.
//!
//! Positions are in destination pixels and texture coordinates in source
//! texels; the vertex stage normalizes both. Builders are pure and allocate
//! only for batches, whose buffers live for a single draw call.

mod blit;
mod primitives;

pub use blit::{
    BATCH_VERTICES_PER_ITEM, BatchGeometry, BlitQuad, BlitRotation, batch_blit, blit, stretch_blit,
    texcoords,
};
pub use primitives::{draw_rectangle, fill_rectangle, line, triangle};
