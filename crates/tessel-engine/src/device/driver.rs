use crate::display::{Display, DisplayCache};
use crate::gl::{Capability, GlApi, VertexAttrib};
use crate::state::{AccelMask, BlendFactor, BlittingFlags, CardState, StateModification};

use super::caps::{DeviceCaps, DeviceInfo, DriverInfo};
use super::config::DriverConfig;
use super::error::DeviceError;
use super::program::{ProgramIndex, ProgramRegistry};
use super::selector::{Operation, select};
use super::validation::{Aspect, ValidationCache, ValidationFlags};

/// Driver entry points that need no device.
pub struct Gles2Driver;

impl Gles2Driver {
    /// True if the backend has a usable context.
    pub fn probe<G: GlApi + ?Sized>(gl: &G) -> bool {
        gl.renderer().is_some()
    }

    pub const fn info() -> DriverInfo {
        DriverInfo::gles2()
    }
}

/// An initialized device: the backend, the ten programs and the validation state.
///
/// Calls must be serialized on the thread owning the backend's context.
pub struct Device<G: GlApi> {
    pub(super) gl: G,
    pub(super) display: Box<dyn Display>,
    pub(super) config: DriverConfig,
    pub(super) info: DeviceInfo,
    pub(super) programs: ProgramRegistry,
    pub(super) active: Option<ProgramIndex>,
    pub(super) cache: ValidationCache,
    pub(super) display_cache: DisplayCache,
    /// Blitting flags recorded by the last SetState; the blit builders read the rotation here.
    pub(super) blitting_flags: BlittingFlags,
}

impl<G: GlApi> Device<G> {
    /// Builds every program variant.
    ///
    /// Fails if any variant does not compile or link; programs created before
    /// the failure are deleted.
    pub fn init(
        mut gl: G,
        display: Box<dyn Display>,
        config: DriverConfig,
    ) -> Result<Self, DeviceError> {
        let programs = ProgramRegistry::build(&mut gl)?;

        let info = DeviceInfo {
            name: gl.renderer().unwrap_or_else(|| "unknown".to_owned()),
            vendor: "OpenGL ES".to_owned(),
            caps: DeviceCaps::gles2(),
        };

        log::info!("initialized {} device on '{}'", Gles2Driver::info().name, info.name);

        Ok(Self {
            gl,
            display,
            config,
            info,
            programs,
            active: None,
            cache: ValidationCache::default(),
            display_cache: DisplayCache::default(),
            blitting_flags: BlittingFlags::empty(),
        })
    }

    /// Deletes all programs and hands the backend back.
    pub fn close(mut self) -> G {
        self.programs.release(&mut self.gl);
        log::debug!("closed device");
        self.gl
    }

    #[inline]
    pub fn info(&self) -> &DeviceInfo {
        &self.info
    }

    #[inline]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    #[inline]
    pub fn active_program(&self) -> Option<ProgramIndex> {
        self.active
    }

    #[inline]
    pub fn gl(&self) -> &G {
        &self.gl
    }

    #[inline]
    pub fn gl_mut(&mut self) -> &mut G {
        &mut self.gl
    }

    /// Marks `accel` as accelerated in `state` when the current flags allow it.
    ///
    /// Returns whether it did; otherwise the caller takes its fallback path.
    pub fn check_state(&self, state: &mut CardState, accel: AccelMask) -> bool {
        log::debug!("check_state({accel:?})");

        if !self.info.caps.supports(state, accel) {
            return false;
        }

        state.accel |= accel;
        true
    }

    /// Prepares the GPU for `accel` and publishes in `state.set` what may be
    /// issued without calling this again.
    ///
    /// On error `state.set` is left untouched; the modifications have already
    /// been consumed, so a later call re-validates the same aspects.
    pub fn set_state(&mut self, state: &mut CardState, accel: AccelMask) -> Result<(), DeviceError> {
        log::debug!("set_state({accel:?}) <- mod_hw {:?}", state.mod_hw);

        self.blitting_flags = state.blitting_flags;

        self.invalidate(ValidationFlags::invalidated_by(state.mod_hw));
        state.mod_hw = StateModification::empty();

        let Some(op) = Operation::classify(accel) else {
            log::error!("unexpected drawing/blitting function {accel:?}");
            return Err(DeviceError::UnexpectedFunction(accel));
        };

        let sel = select(op, state);
        let program = self.use_program(sel.program);

        let aspects: &[Aspect] = match op {
            Operation::Draw => &[Aspect::Destination, Aspect::Clip, Aspect::Matrix, Aspect::ColorDraw],
            Operation::Blit | Operation::StretchBlit => &[
                Aspect::Destination,
                Aspect::Clip,
                Aspect::Matrix,
                Aspect::Source,
                Aspect::ColorBlit,
            ],
        };
        for &aspect in aspects {
            self.check_validate(program, aspect, state)?;
        }

        if sel.blend {
            self.check_validate(program, Aspect::Blending, state)?;
            self.gl.enable(Capability::Blend);
        } else if sel.colorkey {
            // Keyed texels are discarded; the rest go through a fixed alpha blend.
            self.check_validate(program, Aspect::ColorKey, state)?;
            self.gl.blend_func(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);
            self.gl.enable(Capability::Blend);
            self.cache.invalidate(ValidationFlags::BLENDING);
        } else {
            self.gl.disable(Capability::Blend);
        }

        if let Some(filter) = sel.filter {
            self.gl.texture_filter(filter);
        }

        self.gl.enable_vertex_attrib(VertexAttrib::Positions);
        match op {
            Operation::Draw => {
                self.gl.disable_vertex_attrib(VertexAttrib::TexCoords);
                state.set = AccelMask::DRAWING;
            }
            Operation::Blit | Operation::StretchBlit => {
                self.gl.enable_vertex_attrib(VertexAttrib::TexCoords);
                state.set = accel;
            }
        }

        Ok(())
    }

    /// Clears `flags` for every program. A destination change also drops the display cache.
    fn invalidate(&mut self, flags: ValidationFlags) {
        if flags.is_empty() {
            return;
        }
        if flags.contains(ValidationFlags::DESTINATION) {
            self.display_cache.invalidate();
        }
        self.cache.invalidate(flags);
    }

    /// Binds `program` if it is not the active one.
    fn use_program(&mut self, program: ProgramIndex) -> ProgramIndex {
        if self.active != Some(program) {
            if let Some(handle) = self.programs.get(program).handle {
                self.gl.use_program(handle);
            }
            self.active = Some(program);
        }

        log::debug!("  -> using shader program \"{}\"", self.programs.get(program).name);
        program
    }
}
