/// 8-bit straight-alpha RGBA color as supplied by the consumer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn white() -> Self {
        Self::new(0xFF, 0xFF, 0xFF, 0xFF)
    }

    /// Channels scaled into `[0, 1]`.
    #[inline]
    pub fn to_unit(self) -> [f32; 4] {
        let s = 1.0 / 255.0;
        [self.r as f32 * s, self.g as f32 * s, self.b as f32 * s, self.a as f32 * s]
    }

    /// RGB pre-multiplied by alpha: `c/255 * a/255 = c * a/65025`; alpha scaled to `[0, 1]`.
    #[inline]
    pub fn to_premultiplied_unit(self) -> [f32; 4] {
        let a = self.a as f32 / 65025.0;
        [self.r as f32 * a, self.g as f32 * a, self.b as f32 * a, self.a as f32 / 255.0]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::white()
    }
}

/// Splits a packed `0x00RRGGBB` color key into its channels.
#[inline]
pub fn colorkey_channels(key: u32) -> [i32; 3] {
    [
        ((key & 0x00FF_0000) >> 16) as i32,
        ((key & 0x0000_FF00) >> 8) as i32,
        (key & 0x0000_00FF) as i32,
    ]
}
