use super::error::ShaderError;
use super::shaders::{ShaderStage, glsl_source};
use crate::state::BlendFactor;

/// Opaque program object handle issued by the backend.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

/// Opaque texture handle issued by the backend (or the surface layer behind it).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Resolved uniform location within one program.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub i32);

/// Fixed-function capabilities toggled with `enable`/`disable`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Capability {
    Blend,
    ScissorTest,
}

/// Generic vertex attribute slots. Bound by index at link time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VertexAttrib {
    Positions = 0,
    TexCoords = 1,
}

/// Texture minification/magnification filter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TextureFilter {
    Nearest,
    Linear,
}

/// Primitive assembly mode for `draw_arrays`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Primitive {
    Lines,
    LineLoop,
    Triangles,
    TriangleFan,
}

/// GLES2-shaped GPU interface the core drives.
///
/// Semantics follow GLES2: uniform uploads apply to the program bound by the
/// last `use_program`, texture parameters apply to the bound texture, and all
/// state persists until changed. Implementations are confined to the thread
/// owning the GPU context.
pub trait GlApi {
    /// Renderer name, `None` if no usable context exists.
    fn renderer(&self) -> Option<String>;

    /// Source text for a stage in this backend's shading language.
    fn shader_source(&self, stage: ShaderStage) -> &'static str {
        glsl_source(stage)
    }

    /// Compiles both stages and links them into a program.
    ///
    /// Positions are bound to attribute 0; texture coordinates to attribute 1
    /// when `bind_texcoords` is set.
    fn compile_program(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
        bind_texcoords: bool,
    ) -> Result<ProgramHandle, ShaderError>;

    /// Location of an active uniform, `None` if the program does not use it.
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation>;

    fn delete_program(&mut self, program: ProgramHandle);
    fn use_program(&mut self, program: ProgramHandle);

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn enable(&mut self, cap: Capability);
    fn disable(&mut self, cap: Capability);
    /// Scissor box with a bottom-left origin.
    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor);

    fn uniform_2f(&mut self, loc: UniformLocation, v: [f32; 2]);
    fn uniform_3f(&mut self, loc: UniformLocation, v: [f32; 3]);
    fn uniform_4f(&mut self, loc: UniformLocation, v: [f32; 4]);
    fn uniform_3i(&mut self, loc: UniformLocation, v: [i32; 3]);
    /// Column-major 3x3 matrix, not transposed.
    fn uniform_matrix_3f(&mut self, loc: UniformLocation, m: &[f32; 9]);

    fn bind_texture(&mut self, texture: TextureHandle);
    fn texture_filter(&mut self, filter: TextureFilter);

    fn enable_vertex_attrib(&mut self, attrib: VertexAttrib);
    fn disable_vertex_attrib(&mut self, attrib: VertexAttrib);

    /// Draws `positions.len()` vertices. `texcoords`, when given, has the same length.
    fn draw_arrays(
        &mut self,
        primitive: Primitive,
        positions: &[[f32; 2]],
        texcoords: Option<&[[f32; 2]]>,
    );
}
