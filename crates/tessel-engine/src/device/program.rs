use crate::gl::shaders::{
    FragmentStage, ShaderStage, U_COLOR, U_COLORKEY, U_MVP_MATRIX, U_RENDER_MATRIX, U_ROT_MATRIX,
    U_SCALE, U_TEX_SCALE, VertexStage,
};
use crate::gl::{GlApi, ProgramHandle, UniformLocation};

use super::error::DeviceError;

/// Number of program variants.
pub const NUM_PROGRAMS: usize = 10;

/// The ten shader program variants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ProgramIndex {
    Draw,
    DrawMat,
    Blit,
    BlitMat,
    BlitColor,
    BlitColorMat,
    BlitColorkey,
    BlitColorkeyMat,
    BlitPremultiply,
    BlitPremultiplyMat,
}

impl ProgramIndex {
    pub const ALL: [ProgramIndex; NUM_PROGRAMS] = [
        ProgramIndex::Draw,
        ProgramIndex::DrawMat,
        ProgramIndex::Blit,
        ProgramIndex::BlitMat,
        ProgramIndex::BlitColor,
        ProgramIndex::BlitColorMat,
        ProgramIndex::BlitColorkey,
        ProgramIndex::BlitColorkeyMat,
        ProgramIndex::BlitPremultiply,
        ProgramIndex::BlitPremultiplyMat,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            ProgramIndex::Draw => "draw",
            ProgramIndex::DrawMat => "draw_mat",
            ProgramIndex::Blit => "blit",
            ProgramIndex::BlitMat => "blit_mat",
            ProgramIndex::BlitColor => "blit_color",
            ProgramIndex::BlitColorMat => "blit_color_mat",
            ProgramIndex::BlitColorkey => "blit_colorkey",
            ProgramIndex::BlitColorkeyMat => "blit_colorkey_mat",
            ProgramIndex::BlitPremultiply => "blit_premultiply",
            ProgramIndex::BlitPremultiplyMat => "blit_premultiply_mat",
        }
    }

    /// True for the variants transforming positions by the render-option matrix.
    pub const fn uses_matrix(self) -> bool {
        matches!(
            self,
            ProgramIndex::DrawMat
                | ProgramIndex::BlitMat
                | ProgramIndex::BlitColorMat
                | ProgramIndex::BlitColorkeyMat
                | ProgramIndex::BlitPremultiplyMat
        )
    }

    /// True for the blit family (sampling a texture).
    pub const fn is_blit(self) -> bool {
        !matches!(self, ProgramIndex::Draw | ProgramIndex::DrawMat)
    }

    pub const fn vertex_stage(self) -> VertexStage {
        match (self.is_blit(), self.uses_matrix()) {
            (false, false) => VertexStage::Draw,
            (false, true) => VertexStage::DrawMatrix,
            (true, false) => VertexStage::Blit,
            (true, true) => VertexStage::BlitMatrix,
        }
    }

    pub const fn fragment_stage(self) -> FragmentStage {
        match self {
            ProgramIndex::Draw | ProgramIndex::DrawMat => FragmentStage::Draw,
            ProgramIndex::Blit | ProgramIndex::BlitMat => FragmentStage::Blit,
            ProgramIndex::BlitColor | ProgramIndex::BlitColorMat => FragmentStage::BlitColor,
            ProgramIndex::BlitColorkey | ProgramIndex::BlitColorkeyMat => {
                FragmentStage::BlitColorkey
            }
            ProgramIndex::BlitPremultiply | ProgramIndex::BlitPremultiplyMat => {
                FragmentStage::BlitPremultiply
            }
        }
    }
}

/// Uniform locations of one program. `None` where the variant does not use the uniform.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct UniformTable {
    pub scale: Option<UniformLocation>,
    pub rot_matrix: Option<UniformLocation>,
    pub render_matrix: Option<UniformLocation>,
    pub mvp_matrix: Option<UniformLocation>,
    pub color: Option<UniformLocation>,
    pub colorkey: Option<UniformLocation>,
    pub tex_scale: Option<UniformLocation>,
}

impl UniformTable {
    fn resolve<G: GlApi + ?Sized>(gl: &G, program: ProgramHandle) -> Self {
        Self {
            scale: gl.uniform_location(program, U_SCALE),
            rot_matrix: gl.uniform_location(program, U_ROT_MATRIX),
            render_matrix: gl.uniform_location(program, U_RENDER_MATRIX),
            mvp_matrix: gl.uniform_location(program, U_MVP_MATRIX),
            color: gl.uniform_location(program, U_COLOR),
            colorkey: gl.uniform_location(program, U_COLORKEY),
            tex_scale: gl.uniform_location(program, U_TEX_SCALE),
        }
    }
}

/// One compiled variant. Immutable after device init.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ProgramInfo {
    /// `None` only while the registry is being built.
    pub handle: Option<ProgramHandle>,
    pub uniforms: UniformTable,
    pub name: &'static str,
}

impl ProgramInfo {
    const INVALID: Self = Self {
        handle: None,
        uniforms: UniformTable {
            scale: None,
            rot_matrix: None,
            render_matrix: None,
            mvp_matrix: None,
            color: None,
            colorkey: None,
            tex_scale: None,
        },
        name: "invalid",
    };
}

/// The ten program variants, indexed by [`ProgramIndex`].
#[derive(Debug, Clone)]
pub struct ProgramRegistry {
    programs: [ProgramInfo; NUM_PROGRAMS],
}

impl ProgramRegistry {
    /// Compiles and links every variant.
    ///
    /// On failure all programs created so far are deleted and the error names
    /// the variant that failed.
    pub fn build<G: GlApi + ?Sized>(gl: &mut G) -> Result<Self, DeviceError> {
        let mut registry = Self { programs: [ProgramInfo::INVALID; NUM_PROGRAMS] };

        for idx in ProgramIndex::ALL {
            let vs = gl.shader_source(ShaderStage::Vertex(idx.vertex_stage()));
            let fs = gl.shader_source(ShaderStage::Fragment(idx.fragment_stage()));

            let handle = match gl.compile_program(vs, fs, idx.is_blit()) {
                Ok(h) => h,
                Err(source) => {
                    log::error!("failed to create {} program: {source}", idx.name());
                    registry.release(gl);
                    return Err(DeviceError::Program { name: idx.name(), source });
                }
            };

            registry.programs[idx.index()] = ProgramInfo {
                handle: Some(handle),
                uniforms: UniformTable::resolve(gl, handle),
                name: idx.name(),
            };

            log::debug!("created {} program ({handle:?})", idx.name());
        }

        Ok(registry)
    }

    #[inline]
    pub fn get(&self, idx: ProgramIndex) -> &ProgramInfo {
        &self.programs[idx.index()]
    }

    /// Deletes every created program object.
    pub fn release<G: GlApi + ?Sized>(&mut self, gl: &mut G) {
        for p in &mut self.programs {
            if let Some(handle) = p.handle.take() {
                gl.delete_program(handle);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::recording::{GlCall, RecordingGl};
    use crate::gl::ShaderError;

    #[test]
    fn indices_are_dense() {
        for (i, idx) in ProgramIndex::ALL.iter().enumerate() {
            assert_eq!(idx.index(), i);
        }
    }

    #[test]
    fn matrix_variants_pair_up() {
        for pair in ProgramIndex::ALL.chunks(2) {
            assert!(!pair[0].uses_matrix());
            assert!(pair[1].uses_matrix());
            assert_eq!(pair[0].fragment_stage(), pair[1].fragment_stage());
        }
    }

    #[test]
    fn build_creates_all_variants() {
        let mut gl = RecordingGl::new();
        let reg = ProgramRegistry::build(&mut gl).unwrap();
        for idx in ProgramIndex::ALL {
            let p = reg.get(idx);
            assert!(p.handle.is_some());
            assert_eq!(p.name, idx.name());
        }
        assert_eq!(gl.count(|c| matches!(c, GlCall::CompileProgram { .. })), NUM_PROGRAMS);
    }

    #[test]
    fn uniform_tables_follow_the_shaders() {
        let mut gl = RecordingGl::new();
        let reg = ProgramRegistry::build(&mut gl).unwrap();

        let draw = reg.get(ProgramIndex::Draw).uniforms;
        assert!(draw.scale.is_some() && draw.rot_matrix.is_some() && draw.color.is_some());
        assert!(draw.mvp_matrix.is_none() && draw.tex_scale.is_none() && draw.colorkey.is_none());

        let blit = reg.get(ProgramIndex::Blit).uniforms;
        assert!(blit.tex_scale.is_some());
        assert!(blit.color.is_none());

        let keyed = reg.get(ProgramIndex::BlitColorkeyMat).uniforms;
        assert!(keyed.colorkey.is_some() && keyed.mvp_matrix.is_some());
        assert!(keyed.render_matrix.is_some() && keyed.scale.is_none());
    }

    #[test]
    fn failure_releases_created_programs() {
        let mut gl = RecordingGl::new().fail_link_at(4);
        let err = ProgramRegistry::build(&mut gl).unwrap_err();

        match err {
            DeviceError::Program { name, source: ShaderError::Link { .. } } => {
                assert_eq!(name, ProgramIndex::BlitColor.name());
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(gl.count(|c| matches!(c, GlCall::DeleteProgram(_))), 4);
    }
}
