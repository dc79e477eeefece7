use thiserror::Error;

use crate::gl::ShaderError;
use crate::state::AccelMask;

/// Which side of the blend equation carried a bad enumerant.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BlendSide {
    Source,
    Destination,
}

impl std::fmt::Display for BlendSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BlendSide::Source => "src",
            BlendSide::Destination => "dst",
        })
    }
}

/// Device-level failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// A program variant could not be built; fatal for device init.
    #[error("failed to create {name} program")]
    Program {
        name: &'static str,
        #[source]
        source: ShaderError,
    },

    /// Internal-consistency fault: blend enumerant outside the known set.
    #[error("unexpected {side} blend function {value}")]
    UnexpectedBlendFunction { side: BlendSide, value: u32 },

    /// A blit was prepared without a source surface bound in the state.
    #[error("blit requested without a source surface")]
    MissingSource,

    /// Internal-consistency fault: SetState called for something that is not a single function.
    #[error("unexpected drawing/blitting function {0:?}")]
    UnexpectedFunction(AccelMask),
}
