//! [`GlApi`](crate::gl::GlApi) implementations.
//!
//! - `recording`: headless, records calls (tests, tooling)
//! - `gpu`: renders through wgpu

pub mod gpu;
pub mod recording;

pub use gpu::WgpuGl;
pub use recording::{GlCall, RecordingGl};
