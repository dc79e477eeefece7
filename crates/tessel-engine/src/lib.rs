//! Tessel engine crate.
//!
//! Translates a retained 2D render state into GLES2-style GPU state, caching
//! what each shader program already has so that SetState only uploads what
//! changed since that program was last used.

pub mod backend;
pub mod coords;
pub mod device;
pub mod display;
pub mod geometry;
pub mod gl;
pub mod logging;
pub mod state;
