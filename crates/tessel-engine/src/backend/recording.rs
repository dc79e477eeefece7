//! Headless backend that records every call.
//!
//! Uniform locations are resolved by scanning the program's source text, so a
//! program "has" exactly the uniforms its shaders mention.

use crate::gl::shaders::UNIFORMS;
use crate::gl::{
    Capability, GlApi, Primitive, ProgramHandle, ShaderError, StageKind, TextureFilter,
    TextureHandle, UniformLocation, VertexAttrib,
};
use crate::state::BlendFactor;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    CompileProgram { program: ProgramHandle, bind_texcoords: bool },
    DeleteProgram(ProgramHandle),
    UseProgram(ProgramHandle),
    Viewport([i32; 4]),
    Enable(Capability),
    Disable(Capability),
    Scissor([i32; 4]),
    BlendFunc(BlendFactor, BlendFactor),
    Uniform2f(UniformLocation, [f32; 2]),
    Uniform3f(UniformLocation, [f32; 3]),
    Uniform4f(UniformLocation, [f32; 4]),
    Uniform3i(UniformLocation, [i32; 3]),
    UniformMatrix3f(UniformLocation, [f32; 9]),
    BindTexture(TextureHandle),
    TextureFilter(TextureFilter),
    EnableVertexAttrib(VertexAttrib),
    DisableVertexAttrib(VertexAttrib),
    DrawArrays {
        primitive: Primitive,
        positions: Vec<[f32; 2]>,
        texcoords: Option<Vec<[f32; 2]>>,
    },
}

impl GlCall {
    /// True for any uniform upload.
    pub fn is_upload(&self) -> bool {
        matches!(
            self,
            GlCall::Uniform2f(..)
                | GlCall::Uniform3f(..)
                | GlCall::Uniform4f(..)
                | GlCall::Uniform3i(..)
                | GlCall::UniformMatrix3f(..)
        )
    }
}

#[derive(Debug, Clone)]
struct Program {
    handle: ProgramHandle,
    vertex_src: String,
    fragment_src: String,
}

/// [`GlApi`] that performs nothing and remembers everything.
#[derive(Debug, Clone)]
pub struct RecordingGl {
    calls: Vec<GlCall>,
    programs: Vec<Program>,
    attempts: usize,
    fail_compile_at: Option<usize>,
    fail_link_at: Option<usize>,
    renderer: Option<String>,
}

impl Default for RecordingGl {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingGl {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            programs: Vec::new(),
            attempts: 0,
            fail_compile_at: None,
            fail_link_at: None,
            renderer: Some("recording".to_owned()),
        }
    }

    /// Reports no renderer, as a backend without a context would.
    pub fn without_context(mut self) -> Self {
        self.renderer = None;
        self
    }

    /// Makes the `n`-th `compile_program` call (0-based) fail to compile its vertex stage.
    pub fn fail_compile_at(mut self, n: usize) -> Self {
        self.fail_compile_at = Some(n);
        self
    }

    /// Makes the `n`-th `compile_program` call (0-based) fail to link.
    pub fn fail_link_at(mut self, n: usize) -> Self {
        self.fail_link_at = Some(n);
        self
    }

    #[inline]
    pub fn calls(&self) -> &[GlCall] {
        &self.calls
    }

    pub fn count(&self, pred: impl Fn(&GlCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    /// Forgets the recorded calls; programs stay alive.
    pub fn clear(&mut self) {
        self.calls.clear();
    }

    /// Programs compiled and not yet deleted.
    pub fn live_programs(&self) -> usize {
        self.programs.len()
    }
}

impl GlApi for RecordingGl {
    fn renderer(&self) -> Option<String> {
        self.renderer.clone()
    }

    fn compile_program(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
        bind_texcoords: bool,
    ) -> Result<ProgramHandle, ShaderError> {
        let attempt = self.attempts;
        self.attempts += 1;

        if self.fail_compile_at == Some(attempt) {
            return Err(ShaderError::Compile {
                stage: StageKind::Vertex,
                log: format!("compile failure injected at program {attempt}"),
            });
        }
        if self.fail_link_at == Some(attempt) {
            return Err(ShaderError::Link {
                log: format!("link failure injected at program {attempt}"),
            });
        }

        let handle = ProgramHandle(attempt as u32 + 1);
        self.programs.push(Program {
            handle,
            vertex_src: vertex_src.to_owned(),
            fragment_src: fragment_src.to_owned(),
        });
        self.calls.push(GlCall::CompileProgram { program: handle, bind_texcoords });
        Ok(handle)
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        let p = self.programs.iter().find(|p| p.handle == program)?;
        if !p.vertex_src.contains(name) && !p.fragment_src.contains(name) {
            return None;
        }
        let slot = UNIFORMS.iter().position(|&u| u == name)?;
        Some(UniformLocation(slot as i32))
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        self.programs.retain(|p| p.handle != program);
        self.calls.push(GlCall::DeleteProgram(program));
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.calls.push(GlCall::UseProgram(program));
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.calls.push(GlCall::Viewport([x, y, width, height]));
    }

    fn enable(&mut self, cap: Capability) {
        self.calls.push(GlCall::Enable(cap));
    }

    fn disable(&mut self, cap: Capability) {
        self.calls.push(GlCall::Disable(cap));
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.calls.push(GlCall::Scissor([x, y, width, height]));
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.calls.push(GlCall::BlendFunc(src, dst));
    }

    fn uniform_2f(&mut self, loc: UniformLocation, v: [f32; 2]) {
        self.calls.push(GlCall::Uniform2f(loc, v));
    }

    fn uniform_3f(&mut self, loc: UniformLocation, v: [f32; 3]) {
        self.calls.push(GlCall::Uniform3f(loc, v));
    }

    fn uniform_4f(&mut self, loc: UniformLocation, v: [f32; 4]) {
        self.calls.push(GlCall::Uniform4f(loc, v));
    }

    fn uniform_3i(&mut self, loc: UniformLocation, v: [i32; 3]) {
        self.calls.push(GlCall::Uniform3i(loc, v));
    }

    fn uniform_matrix_3f(&mut self, loc: UniformLocation, m: &[f32; 9]) {
        self.calls.push(GlCall::UniformMatrix3f(loc, *m));
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.calls.push(GlCall::BindTexture(texture));
    }

    fn texture_filter(&mut self, filter: TextureFilter) {
        self.calls.push(GlCall::TextureFilter(filter));
    }

    fn enable_vertex_attrib(&mut self, attrib: VertexAttrib) {
        self.calls.push(GlCall::EnableVertexAttrib(attrib));
    }

    fn disable_vertex_attrib(&mut self, attrib: VertexAttrib) {
        self.calls.push(GlCall::DisableVertexAttrib(attrib));
    }

    fn draw_arrays(
        &mut self,
        primitive: Primitive,
        positions: &[[f32; 2]],
        texcoords: Option<&[[f32; 2]]>,
    ) {
        self.calls.push(GlCall::DrawArrays {
            primitive,
            positions: positions.to_vec(),
            texcoords: texcoords.map(<[_]>::to_vec),
        });
    }
}
