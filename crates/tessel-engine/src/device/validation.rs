use bitflags::bitflags;

use crate::state::StateModification;

use super::program::{NUM_PROGRAMS, ProgramIndex};

bitflags! {
    /// GPU state aspects that can be valid for a program.
    #[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
    pub struct ValidationFlags: u32 {
        const DESTINATION = 0x0000_0001;
        const CLIP        = 0x0000_0002;
        const MATRIX      = 0x0000_0004;

        const COLOR_DRAW  = 0x0000_0010;
        const COLORKEY    = 0x0000_0020;

        const SOURCE      = 0x0000_0100;
        const COLOR_BLIT  = 0x0000_0200;

        const BLENDING    = 0x0001_0000;
    }
}

impl ValidationFlags {
    /// Aspects invalidated by a set of state modifications.
    pub fn invalidated_by(m: StateModification) -> Self {
        if m.is_all() {
            return Self::all();
        }

        let mut flags = Self::empty();

        if m.contains(StateModification::DESTINATION) {
            flags |= Self::DESTINATION;
        }
        if m.contains(StateModification::CLIP) {
            flags |= Self::CLIP;
        }
        if m.intersects(StateModification::MATRIX | StateModification::RENDER_OPTIONS) {
            flags |= Self::MATRIX;
        }
        if m.intersects(StateModification::COLOR | StateModification::DRAWING_FLAGS) {
            flags |= Self::COLOR_DRAW;
        }
        if m.intersects(StateModification::COLOR | StateModification::BLITTING_FLAGS) {
            flags |= Self::COLOR_BLIT;
        }
        if m.contains(StateModification::SRC_COLORKEY) {
            flags |= Self::COLORKEY;
        }
        if m.contains(StateModification::SOURCE) {
            flags |= Self::SOURCE;
        }
        if m.intersects(StateModification::SRC_BLEND | StateModification::DST_BLEND) {
            flags |= Self::BLENDING;
        }

        flags
    }
}

/// One independently invalidated slice of GPU state.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Aspect {
    Destination,
    Clip,
    Matrix,
    ColorDraw,
    ColorKey,
    Source,
    ColorBlit,
    Blending,
}

impl Aspect {
    pub const fn flag(self) -> ValidationFlags {
        match self {
            Aspect::Destination => ValidationFlags::DESTINATION,
            Aspect::Clip => ValidationFlags::CLIP,
            Aspect::Matrix => ValidationFlags::MATRIX,
            Aspect::ColorDraw => ValidationFlags::COLOR_DRAW,
            Aspect::ColorKey => ValidationFlags::COLORKEY,
            Aspect::Source => ValidationFlags::SOURCE,
            Aspect::ColorBlit => ValidationFlags::COLOR_BLIT,
            Aspect::Blending => ValidationFlags::BLENDING,
        }
    }
}

/// One validity mask per program variant.
///
/// Protocol:
/// - state changes invalidate an aspect for *all* programs at once
/// - an aspect is validated lazily, for the active program only
/// - between invalidations each (program, aspect) pair is validated at most once
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationCache {
    valid: [ValidationFlags; NUM_PROGRAMS],
}

impl ValidationCache {
    /// Clears `flags` in every program's mask.
    pub fn invalidate(&mut self, flags: ValidationFlags) {
        for v in &mut self.valid {
            v.remove(flags);
        }
    }

    /// Marks `aspect` valid for `program`.
    #[inline]
    pub fn validate(&mut self, program: ProgramIndex, aspect: Aspect) {
        self.valid[program.index()].insert(aspect.flag());
    }

    #[inline]
    pub fn is_valid(&self, program: ProgramIndex, aspect: Aspect) -> bool {
        self.valid[program.index()].contains(aspect.flag())
    }

    #[inline]
    pub fn flags(&self, program: ProgramIndex) -> ValidationFlags {
        self.valid[program.index()]
    }
}
