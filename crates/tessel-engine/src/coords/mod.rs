//! Integer geometry types exchanged with the consumer.
//!
//! Canonical space:
//! - surface pixels
//! - origin top-left
//! - +X right, +Y down
//!
//! Conversion to GPU clip space happens in the vertex stage using the
//! destination uniforms computed during validation.

mod point;
mod rect;
mod region;

pub use point::{Point, Triangle};
pub use rect::Rectangle;
pub use region::Region;
