use bitflags::bitflags;

use crate::state::{AccelMask, BlittingFlags, CardState, DrawingFlags};

bitflags! {
    /// General card capabilities.
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
    pub struct CardCapabilities: u32 {
        /// Hardware clipping (scissor).
        const CLIPPING    = 0x0000_0001;
        /// Render options, including the transform matrix.
        const RENDER_OPTS = 0x0000_0002;
    }
}

/// What the device accelerates.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DeviceCaps {
    pub flags: CardCapabilities,
    pub accel: AccelMask,
    pub drawing: DrawingFlags,
    pub blitting: BlittingFlags,
}

impl DeviceCaps {
    /// Capabilities backed by the ten program variants.
    pub fn gles2() -> Self {
        Self {
            flags: CardCapabilities::CLIPPING | CardCapabilities::RENDER_OPTS,
            accel: AccelMask::DRAWING | AccelMask::BLIT | AccelMask::STRETCH_BLIT,
            drawing: DrawingFlags::BLEND | DrawingFlags::SRC_PREMULTIPLY,
            blitting: BlittingFlags::BLEND_ALPHACHANNEL
                | BlittingFlags::BLEND_COLORALPHA
                | BlittingFlags::COLORIZE
                | BlittingFlags::SRC_COLORKEY
                | BlittingFlags::SRC_PREMULTIPLY
                | BlittingFlags::SRC_PREMULTCOLOR
                | BlittingFlags::ROTATE180
                | BlittingFlags::ROTATE90
                | BlittingFlags::ROTATE270,
        }
    }

    /// True if `accel` with the state's current flags is within these capabilities.
    pub fn supports(&self, state: &CardState, accel: AccelMask) -> bool {
        if !self.accel.contains(accel) {
            log::debug!("  -> unsupported function {accel:?}");
            return false;
        }

        if accel.is_drawing() {
            if !self.drawing.contains(state.drawing_flags) {
                log::debug!("  -> unsupported drawing flags {:?}", state.drawing_flags);
                return false;
            }
        } else if !self.blitting.contains(state.blitting_flags) {
            log::debug!("  -> unsupported blitting flags {:?}", state.blitting_flags);
            return false;
        }

        true
    }
}

/// Static driver description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverInfo {
    pub name: &'static str,
    pub vendor: &'static str,
    pub version: (u32, u32),
}

impl DriverInfo {
    pub const fn gles2() -> Self {
        Self { name: "GLES2", vendor: "tessel", version: (0, 1) }
    }
}

/// Description of an initialized device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Renderer string reported by the backend.
    pub name: String,
    pub vendor: String,
    pub caps: DeviceCaps,
}
