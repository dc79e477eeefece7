/// Consumer-facing blend function enumerant.
///
/// Kept as a raw value: the consumer API is numeric, and values outside the
/// known set must reach the Blending validator so it can report them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BlendFunction(pub u32);

impl BlendFunction {
    pub const UNKNOWN: Self = Self(0);
    pub const ZERO: Self = Self(1);
    pub const ONE: Self = Self(2);
    pub const SRC_COLOR: Self = Self(3);
    pub const INV_SRC_COLOR: Self = Self(4);
    pub const SRC_ALPHA: Self = Self(5);
    pub const INV_SRC_ALPHA: Self = Self(6);
    pub const DST_ALPHA: Self = Self(7);
    pub const INV_DST_ALPHA: Self = Self(8);
    pub const DST_COLOR: Self = Self(9);
    pub const INV_DST_COLOR: Self = Self(10);
    pub const SRC_ALPHA_SAT: Self = Self(11);
}

impl Default for BlendFunction {
    fn default() -> Self {
        Self::ONE
    }
}

/// GPU blend factors (GLES2 `glBlendFunc` arguments).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    DstColor,
    OneMinusDstColor,
    SrcAlphaSaturate,
}

impl BlendFactor {
    /// Maps a consumer enumerant 1:1 onto the GPU factor.
    ///
    /// Returns `None` for values outside the known set.
    pub fn from_function(f: BlendFunction) -> Option<Self> {
        Some(match f {
            BlendFunction::ZERO => Self::Zero,
            BlendFunction::ONE => Self::One,
            BlendFunction::SRC_COLOR => Self::SrcColor,
            BlendFunction::INV_SRC_COLOR => Self::OneMinusSrcColor,
            BlendFunction::SRC_ALPHA => Self::SrcAlpha,
            BlendFunction::INV_SRC_ALPHA => Self::OneMinusSrcAlpha,
            BlendFunction::DST_ALPHA => Self::DstAlpha,
            BlendFunction::INV_DST_ALPHA => Self::OneMinusDstAlpha,
            BlendFunction::DST_COLOR => Self::DstColor,
            BlendFunction::INV_DST_COLOR => Self::OneMinusDstColor,
            BlendFunction::SRC_ALPHA_SAT => Self::SrcAlphaSaturate,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_known_function_maps() {
        let expected = [
            BlendFactor::Zero,
            BlendFactor::One,
            BlendFactor::SrcColor,
            BlendFactor::OneMinusSrcColor,
            BlendFactor::SrcAlpha,
            BlendFactor::OneMinusSrcAlpha,
            BlendFactor::DstAlpha,
            BlendFactor::OneMinusDstAlpha,
            BlendFactor::DstColor,
            BlendFactor::OneMinusDstColor,
            BlendFactor::SrcAlphaSaturate,
        ];
        for (i, factor) in expected.into_iter().enumerate() {
            assert_eq!(BlendFactor::from_function(BlendFunction(i as u32 + 1)), Some(factor));
        }
    }

    #[test]
    fn unknown_values_do_not_map() {
        assert_eq!(BlendFactor::from_function(BlendFunction::UNKNOWN), None);
        assert_eq!(BlendFactor::from_function(BlendFunction(12)), None);
        assert_eq!(BlendFactor::from_function(BlendFunction(0xFFFF)), None);
    }
}
