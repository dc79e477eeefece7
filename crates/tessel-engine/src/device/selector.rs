use crate::gl::TextureFilter;
use crate::state::{AccelMask, BlittingFlags, CardState, DrawingFlags, RenderOptions};

use super::program::ProgramIndex;

/// Operation kind SetState prepares for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Rectangles, lines and triangles.
    Draw,
    Blit,
    StretchBlit,
}

impl Operation {
    /// Classifies a single accelerated function. `None` for empty or combined masks.
    pub fn classify(accel: AccelMask) -> Option<Self> {
        if accel.bits().count_ones() != 1 {
            return None;
        }

        if accel.intersects(AccelMask::DRAWING) {
            Some(Operation::Draw)
        } else if accel == AccelMask::BLIT {
            Some(Operation::Blit)
        } else if accel == AccelMask::STRETCH_BLIT {
            Some(Operation::StretchBlit)
        } else {
            None
        }
    }
}

/// Outcome of program selection for one SetState.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Selection {
    pub program: ProgramIndex,
    /// Alpha blending requested by the operation's own flags.
    pub blend: bool,
    /// Source colorkeying without blending: blending is forced on with a fixed function.
    pub colorkey: bool,
    /// Texture filter for blits, `None` for drawing.
    pub filter: Option<TextureFilter>,
}

/// Picks the program variant and fixed-function settings for `op`.
///
/// Recomputed from scratch on every call.
pub fn select(op: Operation, state: &CardState) -> Selection {
    let matrix = state.render_options.contains(RenderOptions::MATRIX);

    match op {
        Operation::Draw => Selection {
            program: if matrix { ProgramIndex::DrawMat } else { ProgramIndex::Draw },
            blend: state.drawing_flags.contains(DrawingFlags::BLEND),
            colorkey: false,
            filter: None,
        },
        Operation::Blit | Operation::StretchBlit => {
            let flags = state.blitting_flags;

            let blend = flags
                .intersects(BlittingFlags::BLEND_ALPHACHANNEL | BlittingFlags::BLEND_COLORALPHA);
            let colorkey = !blend && flags.contains(BlittingFlags::SRC_COLORKEY);

            let program = if colorkey {
                pick(matrix, ProgramIndex::BlitColorkey, ProgramIndex::BlitColorkeyMat)
            } else if flags.contains(BlittingFlags::SRC_PREMULTIPLY) {
                pick(matrix, ProgramIndex::BlitPremultiply, ProgramIndex::BlitPremultiplyMat)
            } else if flags.intersects(
                BlittingFlags::COLORIZE
                    | BlittingFlags::BLEND_COLORALPHA
                    | BlittingFlags::SRC_PREMULTCOLOR,
            ) {
                pick(matrix, ProgramIndex::BlitColor, ProgramIndex::BlitColorMat)
            } else {
                pick(matrix, ProgramIndex::Blit, ProgramIndex::BlitMat)
            };

            let filter = if op == Operation::Blit || colorkey {
                TextureFilter::Nearest
            } else {
                TextureFilter::Linear
            };

            Selection { program, blend, colorkey, filter: Some(filter) }
        }
    }
}

#[inline]
fn pick(matrix: bool, plain: ProgramIndex, with_matrix: ProgramIndex) -> ProgramIndex {
    if matrix { with_matrix } else { plain }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Destination;

    fn state(blitting: BlittingFlags) -> CardState {
        let mut s = CardState::new(Destination { width: 320, height: 240, offscreen: false });
        s.blitting_flags = blitting;
        s
    }

    // ── classify ──────────────────────────────────────────────────────────

    #[test]
    fn classify_single_functions() {
        assert_eq!(Operation::classify(AccelMask::FILL_RECTANGLE), Some(Operation::Draw));
        assert_eq!(Operation::classify(AccelMask::DRAW_LINE), Some(Operation::Draw));
        assert_eq!(Operation::classify(AccelMask::FILL_TRIANGLE), Some(Operation::Draw));
        assert_eq!(Operation::classify(AccelMask::BLIT), Some(Operation::Blit));
        assert_eq!(Operation::classify(AccelMask::STRETCH_BLIT), Some(Operation::StretchBlit));
    }

    #[test]
    fn classify_rejects_the_rest() {
        assert_eq!(Operation::classify(AccelMask::empty()), None);
        assert_eq!(Operation::classify(AccelMask::BLIT | AccelMask::STRETCH_BLIT), None);
        assert_eq!(Operation::classify(AccelMask::TEX_TRIANGLES), None);
        assert_eq!(Operation::classify(AccelMask::DRAWING), None);
    }

    // ── draw ──────────────────────────────────────────────────────────────

    #[test]
    fn draw_follows_matrix_and_blend() {
        let mut s = state(BlittingFlags::empty());
        let sel = select(Operation::Draw, &s);
        assert_eq!(sel.program, ProgramIndex::Draw);
        assert!(!sel.blend);
        assert_eq!(sel.filter, None);

        s.render_options = RenderOptions::MATRIX;
        s.drawing_flags = DrawingFlags::BLEND;
        let sel = select(Operation::Draw, &s);
        assert_eq!(sel.program, ProgramIndex::DrawMat);
        assert!(sel.blend);
    }

    // ── blit precedence ───────────────────────────────────────────────────

    #[test]
    fn colorkey_beats_colorize_without_blend() {
        let s = state(BlittingFlags::SRC_COLORKEY | BlittingFlags::COLORIZE);
        let sel = select(Operation::Blit, &s);
        assert_eq!(sel.program, ProgramIndex::BlitColorkey);
        assert!(sel.colorkey);
        assert!(!sel.blend);
    }

    #[test]
    fn colorkey_ignored_when_blending() {
        let s = state(BlittingFlags::SRC_COLORKEY | BlittingFlags::BLEND_ALPHACHANNEL);
        let sel = select(Operation::Blit, &s);
        assert_eq!(sel.program, ProgramIndex::Blit);
        assert!(sel.blend);
        assert!(!sel.colorkey);
    }

    #[test]
    fn premultiply_beats_color() {
        let s = state(BlittingFlags::SRC_PREMULTIPLY | BlittingFlags::COLORIZE);
        assert_eq!(select(Operation::Blit, &s).program, ProgramIndex::BlitPremultiply);
    }

    #[test]
    fn color_variant_triggers() {
        for flags in [
            BlittingFlags::COLORIZE,
            BlittingFlags::BLEND_COLORALPHA,
            BlittingFlags::SRC_PREMULTCOLOR,
        ] {
            assert_eq!(select(Operation::Blit, &state(flags)).program, ProgramIndex::BlitColor);
        }
        // Color alpha also turns on blending.
        assert!(select(Operation::Blit, &state(BlittingFlags::BLEND_COLORALPHA)).blend);
    }

    #[test]
    fn matrix_crosses_every_family() {
        let mut s = state(BlittingFlags::empty());
        s.render_options = RenderOptions::MATRIX;
        for (flags, program) in [
            (BlittingFlags::empty(), ProgramIndex::BlitMat),
            (BlittingFlags::SRC_COLORKEY, ProgramIndex::BlitColorkeyMat),
            (BlittingFlags::SRC_PREMULTIPLY, ProgramIndex::BlitPremultiplyMat),
            (BlittingFlags::COLORIZE, ProgramIndex::BlitColorMat),
        ] {
            s.blitting_flags = flags;
            assert_eq!(select(Operation::StretchBlit, &s).program, program);
        }
    }

    #[test]
    fn rotation_flags_do_not_affect_selection() {
        let s = state(BlittingFlags::ROTATE90);
        assert_eq!(select(Operation::Blit, &s).program, ProgramIndex::Blit);
    }

    // ── filtering ─────────────────────────────────────────────────────────

    #[test]
    fn filter_choice() {
        let plain = state(BlittingFlags::empty());
        assert_eq!(select(Operation::Blit, &plain).filter, Some(TextureFilter::Nearest));
        assert_eq!(select(Operation::StretchBlit, &plain).filter, Some(TextureFilter::Linear));

        let keyed = state(BlittingFlags::SRC_COLORKEY);
        assert_eq!(select(Operation::StretchBlit, &keyed).filter, Some(TextureFilter::Nearest));
    }
}
