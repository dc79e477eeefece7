//! The acceleration device.
//!
//! This module is responsible for:
//! - building the ten program variants at init and releasing them at close
//! - the CheckState capability gate
//! - SetState: invalidation, program selection and lazy per-aspect validation
//! - the primitive entry points (rectangles, lines, triangles and blits)

mod caps;
mod config;
mod draw;
mod driver;
mod error;
mod program;
mod selector;
mod validation;
mod validators;

#[cfg(test)]
mod tests;

pub use caps::{CardCapabilities, DeviceCaps, DeviceInfo, DriverInfo};
pub use config::DriverConfig;
pub use driver::{Device, Gles2Driver};
pub use error::{BlendSide, DeviceError};
pub use program::{NUM_PROGRAMS, ProgramIndex, ProgramInfo, ProgramRegistry, UniformTable};
pub use selector::{Operation, Selection, select};
pub use validation::{Aspect, ValidationCache, ValidationFlags};
pub use validators::{
    Projection, blend_factors, blit_color, draw_color, projection, render_matrix, scissor_box,
};
