//! Per-aspect validators.
//!
//! Each validator computes one slice of GPU state from the [`CardState`] and
//! uploads it to the active program. The arithmetic lives in free functions so
//! it can be checked without a backend.

use crate::coords::Region;
use crate::display::Rotation;
use crate::gl::{Capability, GlApi, UniformLocation};
use crate::state::{
    BlendFactor, BlendFunction, BlittingFlags, CardState, Color, Destination, DrawingFlags,
    RenderOptions, colorkey_channels,
};

use super::driver::Device;
use super::error::{BlendSide, DeviceError};
use super::program::ProgramIndex;
use super::validation::Aspect;

/// Vertex transform uploaded by the Destination validator.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Projection {
    /// Pixel-to-clip matrix for the explicit render matrix path.
    Matrix { mvp: [f32; 9] },
    /// Scale/offset vector plus display rotation for the fixed path.
    Scaled { scale: [f32; 3], rotation: [f32; 9] },
}

/// Column-major 3x3 identity.
const IDENTITY: [f32; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

/// Transform from destination pixels (top-left origin) to clip space.
pub fn projection(
    dest: &Destination,
    explicit_matrix: bool,
    rotation: Rotation,
    aspect: f32,
) -> Projection {
    let w = dest.width as f32;
    let h = dest.height as f32;

    if explicit_matrix {
        let mut m = [0.0; 9];
        m[0] = 2.0 / w;
        m[4] = -2.0 / h;
        m[6] = -1.0;
        m[7] = 1.0;
        m[8] = 1.0;
        return Projection::Matrix { mvp: m };
    }

    // Off-screen targets are bottom-up and never rotated.
    if dest.offscreen {
        return Projection::Scaled { scale: [2.0 / w, 2.0 / h, -1.0], rotation: IDENTITY };
    }

    let scale = if rotation == Rotation::Deg90 {
        [aspect * 2.0 / h, aspect * -2.0 / w, 1.0]
    } else {
        [2.0 / w, -2.0 / h, 1.0]
    };

    let mut m = [0.0; 9];
    m[8] = 1.0;
    match rotation {
        Rotation::Deg180 => {
            m[0] = -1.0;
            m[4] = -1.0;
        }
        Rotation::Deg90 => {
            m[1] = 1.0;
            m[3] = -1.0;
        }
        // 270 has no dedicated matrix.
        Rotation::Deg0 | Rotation::Deg270 => {
            m[0] = 1.0;
            m[4] = 1.0;
        }
    }

    Projection::Scaled { scale, rotation: m }
}

/// Converts the 16.16 render-option matrix to the float layout the vertex stage expects.
///
/// The third row is fed from inputs 6 and 7, and input 8 lands in the last
/// slot. This layout is relied upon by existing content; keep it as is.
pub fn render_matrix(fixed: &[i32; 9]) -> [f32; 9] {
    let f = |i: usize| fixed[i] as f32 / 65536.0;

    let mut m = [0.0; 9];
    m[0] = f(0);
    m[3] = f(1);
    m[6] = f(6);
    m[1] = f(3);
    m[4] = f(4);
    m[7] = f(7);
    m[2] = f(6);
    m[5] = f(7);
    m[8] = f(8);
    m
}

/// Scissor box `[x, y, w, h]` for the clip region, bottom-left origin.
///
/// Off-screen targets are already bottom-up and keep the clip's y; the
/// primary target is flipped against the destination height.
pub fn scissor_box(dest: &Destination, clip: &Region) -> [i32; 4] {
    let y = if dest.offscreen { clip.y1 } else { dest.height - clip.y2 - 1 };
    [clip.x1, y, clip.width(), clip.height()]
}

/// Constant color for the draw programs.
pub fn draw_color(flags: DrawingFlags, color: Color) -> [f32; 4] {
    if flags.contains(DrawingFlags::SRC_PREMULTIPLY) {
        color.to_premultiplied_unit()
    } else {
        color.to_unit()
    }
}

/// Modulation color for the blit programs. Opaque white unless a flag says otherwise.
pub fn blit_color(flags: BlittingFlags, color: Color) -> [f32; 4] {
    let [cr, cg, cb, ca] = color.to_unit();

    let (mut r, mut g, mut b) = if flags.contains(BlittingFlags::COLORIZE) {
        (cr, cg, cb)
    } else {
        (1.0, 1.0, 1.0)
    };

    let a = if flags.contains(BlittingFlags::BLEND_COLORALPHA) { ca } else { 1.0 };

    if flags.contains(BlittingFlags::SRC_PREMULTCOLOR) {
        r *= a;
        g *= a;
        b *= a;
    }

    [r, g, b, a]
}

/// Maps both blend enumerants, reporting the first one outside the known set.
pub fn blend_factors(
    src: BlendFunction,
    dst: BlendFunction,
) -> Result<(BlendFactor, BlendFactor), DeviceError> {
    let src = BlendFactor::from_function(src).ok_or(DeviceError::UnexpectedBlendFunction {
        side: BlendSide::Source,
        value: src.0,
    })?;
    let dst = BlendFactor::from_function(dst).ok_or(DeviceError::UnexpectedBlendFunction {
        side: BlendSide::Destination,
        value: dst.0,
    })?;
    Ok((src, dst))
}

impl<G: GlApi> Device<G> {
    /// Validates `aspect` for `program` unless it is still valid.
    pub(super) fn check_validate(
        &mut self,
        program: ProgramIndex,
        aspect: Aspect,
        state: &CardState,
    ) -> Result<(), DeviceError> {
        if self.cache.is_valid(program, aspect) {
            return Ok(());
        }

        match aspect {
            Aspect::Destination => self.validate_destination(program, state),
            Aspect::Clip => self.validate_clip(state),
            Aspect::Matrix => self.validate_matrix(program, state),
            Aspect::ColorDraw => self.validate_color_draw(program, state),
            Aspect::ColorKey => self.validate_colorkey(program, state),
            Aspect::Source => self.validate_source(program, state)?,
            Aspect::ColorBlit => self.validate_color_blit(program, state),
            Aspect::Blending => self.validate_blending(state)?,
        }

        self.cache.validate(program, aspect);
        Ok(())
    }

    fn validate_destination(&mut self, program: ProgramIndex, state: &CardState) {
        let dest = state.destination;
        log::trace!("validate destination {}x{} (offscreen {})", dest.width, dest.height, dest.offscreen);

        self.gl.viewport(0, 0, dest.width, dest.height);

        let (rotation, aspect) =
            self.display_cache.get(self.display.as_ref(), self.config.primary_rotation);

        let uniforms = self.programs.get(program).uniforms;
        match projection(
            &dest,
            state.render_options.contains(RenderOptions::MATRIX),
            rotation,
            aspect,
        ) {
            Projection::Matrix { mvp } => {
                upload(uniforms.mvp_matrix, |loc| self.gl.uniform_matrix_3f(loc, &mvp));
            }
            Projection::Scaled { scale, rotation } => {
                upload(uniforms.scale, |loc| self.gl.uniform_3f(loc, scale));
                upload(uniforms.rot_matrix, |loc| self.gl.uniform_matrix_3f(loc, &rotation));
            }
        }
    }

    fn validate_clip(&mut self, state: &CardState) {
        let [x, y, w, h] = scissor_box(&state.destination, &state.clip);
        log::trace!("validate clip {:?} -> scissor {x},{y} {w}x{h}", state.clip);

        self.gl.enable(Capability::ScissorTest);
        self.gl.scissor(x, y, w, h);
    }

    fn validate_matrix(&mut self, program: ProgramIndex, state: &CardState) {
        if !state.render_options.contains(RenderOptions::MATRIX) {
            return;
        }

        let m = render_matrix(&state.matrix);
        log::trace!("validate matrix {m:?}");

        let loc = self.programs.get(program).uniforms.render_matrix;
        upload(loc, |loc| self.gl.uniform_matrix_3f(loc, &m));
    }

    fn validate_color_draw(&mut self, program: ProgramIndex, state: &CardState) {
        let c = draw_color(state.drawing_flags, state.color);
        log::trace!("validate draw color {c:?}");

        let loc = self.programs.get(program).uniforms.color;
        upload(loc, |loc| self.gl.uniform_4f(loc, c));
    }

    fn validate_colorkey(&mut self, program: ProgramIndex, state: &CardState) {
        let key = colorkey_channels(state.src_colorkey);
        log::trace!("validate colorkey {key:?}");

        let loc = self.programs.get(program).uniforms.colorkey;
        upload(loc, |loc| self.gl.uniform_3i(loc, key));
    }

    fn validate_source(
        &mut self,
        program: ProgramIndex,
        state: &CardState,
    ) -> Result<(), DeviceError> {
        let Some(src) = state.source else {
            log::error!("blit state has no source surface");
            return Err(DeviceError::MissingSource);
        };
        log::trace!("validate source {}x{} ({:?})", src.width, src.height, src.texture);

        self.gl.bind_texture(src.texture);

        let scale = [1.0 / src.width as f32, 1.0 / src.height as f32];
        let loc = self.programs.get(program).uniforms.tex_scale;
        upload(loc, |loc| self.gl.uniform_2f(loc, scale));
        Ok(())
    }

    fn validate_color_blit(&mut self, program: ProgramIndex, state: &CardState) {
        let c = blit_color(state.blitting_flags, state.color);
        log::trace!("validate blit color {c:?} ({:?})", state.blitting_flags);

        let loc = self.programs.get(program).uniforms.color;
        upload(loc, |loc| self.gl.uniform_4f(loc, c));
    }

    fn validate_blending(&mut self, state: &CardState) -> Result<(), DeviceError> {
        let (src, dst) = blend_factors(state.src_blend, state.dst_blend).inspect_err(|e| {
            log::error!("{e}");
        })?;
        log::trace!("validate blending {src:?} {dst:?}");

        self.gl.blend_func(src, dst);
        Ok(())
    }
}

/// Uploads only when the program has the uniform.
#[inline]
fn upload(loc: Option<UniformLocation>, f: impl FnOnce(UniformLocation)) {
    if let Some(loc) = loc {
        f(loc);
    }
}
