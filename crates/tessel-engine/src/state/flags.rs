use bitflags::bitflags;

bitflags! {
    /// Acceleration functions a consumer may request.
    ///
    /// Drawing functions occupy the low 16 bits, blitting functions the high bits.
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
    pub struct AccelMask: u32 {
        const FILL_RECTANGLE = 0x0000_0001;
        const DRAW_RECTANGLE = 0x0000_0002;
        const DRAW_LINE      = 0x0000_0004;
        const FILL_TRIANGLE  = 0x0000_0008;
        const FILL_QUADRANGLE = 0x0000_0010;

        const BLIT           = 0x0001_0000;
        const STRETCH_BLIT   = 0x0002_0000;
        const TEX_TRIANGLES  = 0x0004_0000;
        const BLIT2          = 0x0008_0000;

        const DRAWING = Self::FILL_RECTANGLE.bits()
            | Self::DRAW_RECTANGLE.bits()
            | Self::DRAW_LINE.bits()
            | Self::FILL_TRIANGLE.bits();
    }
}

impl AccelMask {
    /// True for drawing (non-texturing) functions.
    #[inline]
    pub fn is_drawing(self) -> bool {
        self.bits() & 0x0000_FFFF != 0
    }
}

bitflags! {
    /// Flags controlling drawing functions.
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
    pub struct DrawingFlags: u32 {
        const BLEND           = 0x0000_0001;
        const DST_COLORKEY    = 0x0000_0002;
        const SRC_PREMULTIPLY = 0x0000_0004;
        const DST_PREMULTIPLY = 0x0000_0008;
        const DEMULTIPLY      = 0x0000_0010;
        const XOR             = 0x0000_0020;
    }
}

bitflags! {
    /// Flags controlling blitting functions.
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
    pub struct BlittingFlags: u32 {
        const BLEND_ALPHACHANNEL = 0x0000_0001;
        const BLEND_COLORALPHA   = 0x0000_0002;
        const COLORIZE           = 0x0000_0004;
        const SRC_COLORKEY       = 0x0000_0008;
        const DST_COLORKEY       = 0x0000_0010;
        const SRC_PREMULTIPLY    = 0x0000_0020;
        const DST_PREMULTIPLY    = 0x0000_0040;
        const DEMULTIPLY         = 0x0000_0080;
        const DEINTERLACE        = 0x0000_0100;
        const SRC_PREMULTCOLOR   = 0x0000_0200;
        const XOR                = 0x0000_0400;
        const INDEX_TRANSLATION  = 0x0000_0800;
        const ROTATE180          = 0x0000_1000;
        const ROTATE90           = 0x0000_2000;
        const ROTATE270          = 0x0000_4000;
        const COLORKEY_PROTECT   = 0x0001_0000;
    }
}

bitflags! {
    /// Render options.
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
    pub struct RenderOptions: u32 {
        const SMOOTH_UPSCALE   = 0x0000_0001;
        const SMOOTH_DOWNSCALE = 0x0000_0002;
        /// Transform all geometry by [`CardState::matrix`](super::CardState::matrix).
        const MATRIX           = 0x0000_0004;
        const ANTIALIAS        = 0x0000_0008;
    }
}

bitflags! {
    /// Aspects of [`CardState`](super::CardState) modified since the last SetState.
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
    pub struct StateModification: u32 {
        const DRAWING_FLAGS  = 0x0000_0001;
        const BLITTING_FLAGS = 0x0000_0002;
        const CLIP           = 0x0000_0004;
        const COLOR          = 0x0000_0008;
        const SRC_BLEND      = 0x0000_0010;
        const DST_BLEND      = 0x0000_0020;
        const SRC_COLORKEY   = 0x0000_0040;
        const DST_COLORKEY   = 0x0000_0080;
        const DESTINATION    = 0x0000_0100;
        const SOURCE         = 0x0000_0200;
        const RENDER_OPTIONS = 0x0000_0400;
        const MATRIX         = 0x0000_0800;
    }
}
