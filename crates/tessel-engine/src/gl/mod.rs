//! GPU interface seam.
//!
//! The core never talks to a graphics API directly. It drives an implementation
//! of [`GlApi`], a small GLES2-shaped surface: programs with named uniforms,
//! immediate fixed-function state and client-side vertex arrays.

mod api;
mod error;
pub mod shaders;

pub use api::{
    Capability, GlApi, Primitive, ProgramHandle, TextureFilter, TextureHandle, UniformLocation,
    VertexAttrib,
};
pub use error::{ShaderError, StageKind};
