//! Abstract render state shared with the consumer.
//!
//! Scope:
//! - flag sets (acceleration functions, drawing/blitting flags, render options)
//! - the modification mask consumed by SetState
//! - blend enumerants and their GPU mapping
//! - `CardState`, the retained state object itself

mod blend;
mod card_state;
mod color;
mod flags;

pub use blend::{BlendFactor, BlendFunction};
pub use card_state::{CardState, Destination, MATRIX_IDENTITY, Source};
pub use color::{Color, colorkey_channels};
pub use flags::{AccelMask, BlittingFlags, DrawingFlags, RenderOptions, StateModification};
