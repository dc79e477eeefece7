use crate::coords::Region;
use crate::gl::TextureHandle;

use super::{
    AccelMask, BlendFunction, BlittingFlags, Color, DrawingFlags, RenderOptions, StateModification,
};

/// Destination surface as seen by the core.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Destination {
    pub width: i32,
    pub height: i32,
    /// Rendering goes into an off-screen framebuffer object rather than the primary target.
    pub offscreen: bool,
}

/// Source surface bound as a texture.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Source {
    pub width: i32,
    pub height: i32,
    pub texture: TextureHandle,
}

/// Abstract 2D render state owned by the consumer.
///
/// The core only writes back `set`, `accel` and `mod_hw`. Everything else is
/// read-only from its point of view. Use the setters to keep `mod_hw` and
/// `set` coherent; writing fields directly requires marking `mod_hw` by hand.
#[derive(Debug, Clone)]
pub struct CardState {
    pub destination: Destination,
    /// Inclusive clip region; must lie within the destination.
    pub clip: Region,
    /// 3x3 row-major 16.16 fixed point matrix, used when `RenderOptions::MATRIX` is set.
    pub matrix: [i32; 9],
    pub render_options: RenderOptions,
    pub drawing_flags: DrawingFlags,
    pub blitting_flags: BlittingFlags,
    pub src_blend: BlendFunction,
    pub dst_blend: BlendFunction,
    pub color: Color,
    /// Packed `0x00RRGGBB` source color key.
    pub src_colorkey: u32,
    pub source: Option<Source>,

    /// Aspects modified since the last SetState.
    pub mod_hw: StateModification,
    /// Functions accelerated by the device for the current flags (written by CheckState).
    pub accel: AccelMask,
    /// Functions callable without another SetState (written by SetState).
    pub set: AccelMask,
}

/// 16.16 fixed point identity.
pub const MATRIX_IDENTITY: [i32; 9] = [0x10000, 0, 0, 0, 0x10000, 0, 0, 0, 0x10000];

impl CardState {
    /// Creates a state targeting `destination`, clipped to its full extent, everything modified.
    pub fn new(destination: Destination) -> Self {
        Self {
            destination,
            clip: Region::covering(destination.width, destination.height),
            matrix: MATRIX_IDENTITY,
            render_options: RenderOptions::empty(),
            drawing_flags: DrawingFlags::empty(),
            blitting_flags: BlittingFlags::empty(),
            src_blend: BlendFunction::SRC_ALPHA,
            dst_blend: BlendFunction::INV_SRC_ALPHA,
            color: Color::white(),
            src_colorkey: 0,
            source: None,
            mod_hw: StateModification::all(),
            accel: AccelMask::empty(),
            set: AccelMask::empty(),
        }
    }

    #[inline]
    fn modified(&mut self, what: StateModification) {
        self.mod_hw |= what;
        self.set = AccelMask::empty();
    }

    /// True if `accel` cannot be issued before another SetState.
    #[inline]
    pub fn needs_set_state(&self, accel: AccelMask) -> bool {
        !self.mod_hw.is_empty() || !self.set.contains(accel)
    }

    pub fn set_destination(&mut self, destination: Destination) {
        if self.destination == destination {
            return;
        }

        // The scissor is derived from the destination height and orientation.
        let mut what = StateModification::DESTINATION;
        if self.destination.height != destination.height
            || self.destination.offscreen != destination.offscreen
        {
            what |= StateModification::CLIP;
        }

        self.destination = destination;
        self.modified(what);
    }

    pub fn set_clip(&mut self, clip: Region) {
        debug_assert!(
            clip.is_within(self.destination.width, self.destination.height),
            "clip {clip:?} outside destination {:?}",
            self.destination
        );
        if self.clip != clip {
            self.clip = clip;
            self.modified(StateModification::CLIP);
        }
    }

    pub fn set_matrix(&mut self, matrix: [i32; 9]) {
        if self.matrix != matrix {
            self.matrix = matrix;
            self.modified(StateModification::MATRIX);
        }
    }

    pub fn set_render_options(&mut self, options: RenderOptions) {
        if self.render_options != options {
            self.render_options = options;
            self.modified(StateModification::RENDER_OPTIONS);
        }
    }

    pub fn set_drawing_flags(&mut self, flags: DrawingFlags) {
        if self.drawing_flags != flags {
            self.drawing_flags = flags;
            self.modified(StateModification::DRAWING_FLAGS);
        }
    }

    pub fn set_blitting_flags(&mut self, flags: BlittingFlags) {
        if self.blitting_flags != flags {
            self.blitting_flags = flags;
            self.modified(StateModification::BLITTING_FLAGS);
        }
    }

    pub fn set_src_blend(&mut self, f: BlendFunction) {
        if self.src_blend != f {
            self.src_blend = f;
            self.modified(StateModification::SRC_BLEND);
        }
    }

    pub fn set_dst_blend(&mut self, f: BlendFunction) {
        if self.dst_blend != f {
            self.dst_blend = f;
            self.modified(StateModification::DST_BLEND);
        }
    }

    pub fn set_color(&mut self, color: Color) {
        if self.color != color {
            self.color = color;
            self.modified(StateModification::COLOR);
        }
    }

    pub fn set_src_colorkey(&mut self, key: u32) {
        if self.src_colorkey != key {
            self.src_colorkey = key;
            self.modified(StateModification::SRC_COLORKEY);
        }
    }

    pub fn set_source(&mut self, source: Option<Source>) {
        if self.source != source {
            self.source = source;
            self.modified(StateModification::SOURCE);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dest() -> Destination {
        Destination { width: 640, height: 480, offscreen: false }
    }

    #[test]
    fn new_state_is_fully_modified() {
        let s = CardState::new(dest());
        assert!(s.mod_hw.is_all());
        assert_eq!(s.clip, Region::new(0, 0, 639, 479));
        assert!(s.needs_set_state(AccelMask::FILL_RECTANGLE));
    }

    #[test]
    fn setter_marks_and_resets_set() {
        let mut s = CardState::new(dest());
        s.mod_hw = StateModification::empty();
        s.set = AccelMask::DRAWING;
        assert!(!s.needs_set_state(AccelMask::DRAW_LINE));

        s.set_color(Color::new(1, 2, 3, 4));
        assert_eq!(s.mod_hw, StateModification::COLOR);
        assert!(s.set.is_empty());
        assert!(s.needs_set_state(AccelMask::DRAW_LINE));
    }

    #[test]
    fn destination_flip_marks_the_clip() {
        let mut s = CardState::new(dest());
        s.mod_hw = StateModification::empty();

        s.set_destination(Destination { width: 800, height: 480, offscreen: false });
        assert_eq!(s.mod_hw, StateModification::DESTINATION);

        s.mod_hw = StateModification::empty();
        s.set_destination(Destination { width: 800, height: 480, offscreen: true });
        assert_eq!(s.mod_hw, StateModification::DESTINATION | StateModification::CLIP);

        s.mod_hw = StateModification::empty();
        s.set_destination(Destination { width: 800, height: 600, offscreen: true });
        assert_eq!(s.mod_hw, StateModification::DESTINATION | StateModification::CLIP);
    }

    #[test]
    fn unchanged_value_is_not_a_modification() {
        let mut s = CardState::new(dest());
        s.mod_hw = StateModification::empty();
        s.set = AccelMask::BLIT;
        s.set_blitting_flags(BlittingFlags::empty());
        s.set_color(Color::white());
        assert!(s.mod_hw.is_empty());
        assert_eq!(s.set, AccelMask::BLIT);
    }
}
