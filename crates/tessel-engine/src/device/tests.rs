use std::cell::Cell;
use std::rc::Rc;

use super::*;
use crate::backend::recording::{GlCall, RecordingGl};
use crate::coords::{Point, Rectangle, Region, Triangle};
use crate::display::{Display, FixedDisplay, Rotation};
use crate::geometry::{BlitRotation, texcoords};
use crate::gl::{Capability, Primitive, ShaderError, TextureFilter, TextureHandle, VertexAttrib};
use crate::state::{
    AccelMask, BlendFactor, BlendFunction, BlittingFlags, CardState, Color, Destination,
    DrawingFlags, RenderOptions, Source, StateModification,
};

fn device_with(config: DriverConfig) -> Device<RecordingGl> {
    Device::init(RecordingGl::new(), Box::new(FixedDisplay::new(800, 600)), config).unwrap()
}

fn device() -> Device<RecordingGl> {
    device_with(DriverConfig::default())
}

fn state() -> CardState {
    let mut s = CardState::new(Destination { width: 640, height: 480, offscreen: false });
    s.source = Some(Source { width: 64, height: 32, texture: TextureHandle(7) });
    s
}

fn uploads(dev: &Device<RecordingGl>) -> usize {
    dev.gl().count(GlCall::is_upload)
}

fn last_draw(dev: &Device<RecordingGl>) -> (Primitive, Vec<[f32; 2]>, Option<Vec<[f32; 2]>>) {
    dev.gl()
        .calls()
        .iter()
        .rev()
        .find_map(|c| match c {
            GlCall::DrawArrays { primitive, positions, texcoords } => {
                Some((*primitive, positions.clone(), texcoords.clone()))
            }
            _ => None,
        })
        .expect("no draw recorded")
}

fn handle(dev: &Device<RecordingGl>, idx: ProgramIndex) -> crate::gl::ProgramHandle {
    dev.programs.get(idx).handle.expect("program not built")
}

// ── lifecycle ─────────────────────────────────────────────────────────────

#[test]
fn probe_needs_a_renderer() {
    assert!(Gles2Driver::probe(&RecordingGl::new()));
    assert!(!Gles2Driver::probe(&RecordingGl::new().without_context()));
    assert_eq!(Gles2Driver::info().name, "GLES2");
}

#[test]
fn init_publishes_device_info() {
    let dev = device();
    assert_eq!(dev.info().name, "recording");
    assert_eq!(dev.info().vendor, "OpenGL ES");
    assert_eq!(dev.info().caps, DeviceCaps::gles2());
    assert_eq!(dev.active_program(), None);
    assert_eq!(dev.gl().live_programs(), NUM_PROGRAMS);
}

#[test]
fn init_failure_reports_the_variant() {
    let err = Device::init(
        RecordingGl::new().fail_compile_at(0),
        Box::new(FixedDisplay::new(800, 600)),
        DriverConfig::default(),
    )
    .err()
    .expect("init should fail");

    assert!(matches!(
        err,
        DeviceError::Program { name: "draw", source: ShaderError::Compile { .. } }
    ));
}

#[test]
fn close_deletes_every_program() {
    let gl = device().close();
    assert_eq!(gl.live_programs(), 0);
    assert_eq!(gl.count(|c| matches!(c, GlCall::DeleteProgram(_))), NUM_PROGRAMS);
}

// ── check_state ───────────────────────────────────────────────────────────

#[test]
fn check_state_marks_accelerated_functions() {
    let dev = device();
    let mut s = state();

    assert!(dev.check_state(&mut s, AccelMask::FILL_RECTANGLE));
    assert!(dev.check_state(&mut s, AccelMask::BLIT));
    assert_eq!(s.accel, AccelMask::FILL_RECTANGLE | AccelMask::BLIT);

    s.drawing_flags = DrawingFlags::XOR;
    assert!(!dev.check_state(&mut s, AccelMask::DRAW_LINE));
    assert!(!s.accel.contains(AccelMask::DRAW_LINE));
}

// ── set_state: invalidation protocol ──────────────────────────────────────

#[test]
fn set_state_consumes_modifications() {
    let mut dev = device();
    let mut s = state();

    dev.set_state(&mut s, AccelMask::FILL_RECTANGLE).unwrap();
    assert!(s.mod_hw.is_empty());
    assert_eq!(s.set, AccelMask::DRAWING);
    assert!(!s.needs_set_state(AccelMask::DRAW_LINE));
    assert!(s.needs_set_state(AccelMask::BLIT));
}

#[test]
fn aspect_validated_once_between_invalidations() {
    let mut dev = device();
    let mut s = state();
    dev.set_state(&mut s, AccelMask::FILL_RECTANGLE).unwrap();

    s.set_color(Color::new(10, 20, 30, 40));
    dev.gl_mut().clear();
    dev.set_state(&mut s, AccelMask::FILL_RECTANGLE).unwrap();
    dev.set_state(&mut s, AccelMask::DRAW_LINE).unwrap();

    assert_eq!(uploads(&dev), 1);
    assert_eq!(dev.gl().count(|c| matches!(c, GlCall::Uniform4f(..))), 1);
    // The program did not change.
    assert_eq!(dev.gl().count(|c| matches!(c, GlCall::UseProgram(_))), 0);
}

#[test]
fn each_aspect_validated_once_after_its_modification() {
    struct Case {
        name: &'static str,
        setup: fn(&mut CardState),
        modify: fn(&mut CardState),
        accel: AccelMask,
        emitted: fn(&GlCall) -> bool,
    }

    let cases = [
        Case {
            name: "destination",
            setup: |_| {},
            modify: |s| s.set_destination(Destination { width: 800, height: 480, offscreen: false }),
            accel: AccelMask::FILL_RECTANGLE,
            emitted: |c| matches!(c, GlCall::Viewport(_)),
        },
        Case {
            name: "clip",
            setup: |_| {},
            modify: |s| s.set_clip(Region::new(0, 0, 99, 99)),
            accel: AccelMask::FILL_RECTANGLE,
            emitted: |c| matches!(c, GlCall::Scissor(_)),
        },
        Case {
            name: "matrix",
            setup: |s| s.set_render_options(RenderOptions::MATRIX),
            modify: |s| s.set_matrix([0x20000, 0, 0, 0, 0x20000, 0, 0, 0, 0x10000]),
            accel: AccelMask::FILL_RECTANGLE,
            emitted: |c| matches!(c, GlCall::UniformMatrix3f(..)),
        },
        Case {
            name: "colorkey",
            setup: |s| s.set_blitting_flags(BlittingFlags::SRC_COLORKEY),
            modify: |s| s.set_src_colorkey(0x00ff_8040),
            accel: AccelMask::BLIT,
            emitted: |c| matches!(c, GlCall::Uniform3i(..)),
        },
        Case {
            name: "source",
            setup: |_| {},
            modify: |s| {
                s.set_source(Some(Source { width: 64, height: 32, texture: TextureHandle(8) }))
            },
            accel: AccelMask::BLIT,
            emitted: |c| matches!(c, GlCall::BindTexture(_)),
        },
        Case {
            name: "blending",
            setup: |s| s.set_blitting_flags(BlittingFlags::BLEND_ALPHACHANNEL),
            modify: |s| s.set_src_blend(BlendFunction::ONE),
            accel: AccelMask::BLIT,
            emitted: |c| matches!(c, GlCall::BlendFunc(..)),
        },
        Case {
            name: "blit color",
            setup: |s| s.set_blitting_flags(BlittingFlags::COLORIZE),
            modify: |s| s.set_color(Color::new(10, 20, 30, 40)),
            accel: AccelMask::BLIT,
            emitted: |c| matches!(c, GlCall::Uniform4f(..)),
        },
    ];

    for case in cases {
        let mut dev = device();
        let mut s = state();
        (case.setup)(&mut s);
        dev.set_state(&mut s, case.accel).unwrap();

        (case.modify)(&mut s);
        dev.gl_mut().clear();
        dev.set_state(&mut s, case.accel).unwrap();
        dev.set_state(&mut s, case.accel).unwrap();

        assert_eq!(dev.gl().count(case.emitted), 1, "{}", case.name);
    }
}

#[test]
fn full_modification_revalidates_everything() {
    let mut dev = device();
    let mut s = state();
    dev.set_state(&mut s, AccelMask::FILL_RECTANGLE).unwrap();

    s.mod_hw = StateModification::all();
    dev.gl_mut().clear();
    dev.set_state(&mut s, AccelMask::FILL_RECTANGLE).unwrap();

    // scale + rotation + color
    assert_eq!(uploads(&dev), 3);
    assert_eq!(dev.gl().count(|c| matches!(c, GlCall::Viewport(_))), 1);
    assert_eq!(dev.gl().count(|c| matches!(c, GlCall::Scissor(_))), 1);
}

#[test]
fn validation_is_isolated_per_program() {
    let mut dev = device();
    let mut s = state();

    dev.set_state(&mut s, AccelMask::FILL_RECTANGLE).unwrap();
    dev.set_state(&mut s, AccelMask::BLIT).unwrap();
    assert_eq!(dev.active_program(), Some(ProgramIndex::Blit));

    // Back to draw: program rebinds, nothing is uploaded again.
    dev.gl_mut().clear();
    dev.set_state(&mut s, AccelMask::FILL_RECTANGLE).unwrap();
    assert_eq!(dev.gl().calls()[0], GlCall::UseProgram(handle(&dev, ProgramIndex::Draw)));
    assert_eq!(uploads(&dev), 0);
    assert_eq!(dev.gl().count(|c| matches!(c, GlCall::Scissor(_))), 0);

    // A global invalidation hits both programs, each validating lazily.
    s.set_clip(Region::new(0, 0, 99, 99));
    dev.gl_mut().clear();
    dev.set_state(&mut s, AccelMask::FILL_RECTANGLE).unwrap();
    dev.set_state(&mut s, AccelMask::BLIT).unwrap();
    dev.set_state(&mut s, AccelMask::FILL_RECTANGLE).unwrap();
    assert_eq!(dev.gl().count(|c| matches!(c, GlCall::Scissor(_))), 2);
}

#[test]
fn selection_follows_the_latest_flags() {
    let mut dev = device();
    let mut s = state();

    s.set_blitting_flags(BlittingFlags::COLORIZE);
    dev.set_state(&mut s, AccelMask::BLIT).unwrap();
    assert_eq!(dev.active_program(), Some(ProgramIndex::BlitColor));

    s.set_blitting_flags(BlittingFlags::COLORIZE | BlittingFlags::SRC_COLORKEY);
    dev.set_state(&mut s, AccelMask::BLIT).unwrap();
    assert_eq!(dev.active_program(), Some(ProgramIndex::BlitColorkey));

    s.set_render_options(RenderOptions::MATRIX);
    dev.set_state(&mut s, AccelMask::STRETCH_BLIT).unwrap();
    assert_eq!(dev.active_program(), Some(ProgramIndex::BlitColorkeyMat));
    assert_eq!(s.set, AccelMask::STRETCH_BLIT);
}

// ── set_state: fixed-function settings ────────────────────────────────────

#[test]
fn draw_path_settings() {
    let mut dev = device();
    let mut s = state();
    dev.set_state(&mut s, AccelMask::FILL_TRIANGLE).unwrap();

    let calls = dev.gl().calls();
    assert!(calls.contains(&GlCall::Disable(Capability::Blend)));
    assert!(calls.contains(&GlCall::Enable(Capability::ScissorTest)));
    assert!(calls.contains(&GlCall::EnableVertexAttrib(VertexAttrib::Positions)));
    assert!(calls.contains(&GlCall::DisableVertexAttrib(VertexAttrib::TexCoords)));
    assert!(!calls.iter().any(|c| matches!(c, GlCall::TextureFilter(_))));

    dev.gl_mut().clear();
    s.set_drawing_flags(DrawingFlags::BLEND);
    dev.set_state(&mut s, AccelMask::FILL_TRIANGLE).unwrap();
    let calls = dev.gl().calls();
    assert!(calls.contains(&GlCall::BlendFunc(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha)));
    assert!(calls.contains(&GlCall::Enable(Capability::Blend)));
}

#[test]
fn blit_path_settings() {
    let mut dev = device();
    let mut s = state();
    dev.set_state(&mut s, AccelMask::STRETCH_BLIT).unwrap();

    let calls = dev.gl().calls();
    assert!(calls.contains(&GlCall::BindTexture(TextureHandle(7))));
    assert!(calls.contains(&GlCall::Uniform2f(
        dev.programs.get(ProgramIndex::Blit).uniforms.tex_scale.unwrap(),
        [1.0 / 64.0, 1.0 / 32.0]
    )));
    assert!(calls.contains(&GlCall::TextureFilter(TextureFilter::Linear)));
    assert!(calls.contains(&GlCall::EnableVertexAttrib(VertexAttrib::TexCoords)));
    assert!(calls.contains(&GlCall::Disable(Capability::Blend)));

    dev.gl_mut().clear();
    dev.set_state(&mut s, AccelMask::BLIT).unwrap();
    assert!(dev.gl().calls().contains(&GlCall::TextureFilter(TextureFilter::Nearest)));
}

#[test]
fn colorkey_forces_blending() {
    let mut dev = device();
    let mut s = state();
    s.set_src_colorkey(0x0011_2233);
    s.set_blitting_flags(BlittingFlags::SRC_COLORKEY);
    dev.set_state(&mut s, AccelMask::STRETCH_BLIT).unwrap();

    let calls = dev.gl().calls();
    let key = dev.programs.get(ProgramIndex::BlitColorkey).uniforms.colorkey.unwrap();
    assert!(calls.contains(&GlCall::Uniform3i(key, [0x11, 0x22, 0x33])));
    assert!(calls.contains(&GlCall::BlendFunc(BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha)));
    assert!(calls.contains(&GlCall::Enable(Capability::Blend)));
    assert!(calls.contains(&GlCall::TextureFilter(TextureFilter::Nearest)));
}

#[test]
fn forced_blend_function_is_not_trusted_afterwards() {
    let mut dev = device();
    let mut s = state();
    s.set_src_blend(BlendFunction::ONE);
    s.set_dst_blend(BlendFunction::ZERO);

    s.set_blitting_flags(BlittingFlags::BLEND_ALPHACHANNEL);
    dev.set_state(&mut s, AccelMask::BLIT).unwrap();

    s.set_blitting_flags(BlittingFlags::SRC_COLORKEY);
    dev.set_state(&mut s, AccelMask::BLIT).unwrap();

    s.set_blitting_flags(BlittingFlags::BLEND_ALPHACHANNEL);
    dev.gl_mut().clear();
    dev.set_state(&mut s, AccelMask::BLIT).unwrap();

    assert!(dev.gl().calls().contains(&GlCall::BlendFunc(BlendFactor::One, BlendFactor::Zero)));
}

// ── set_state: destination ────────────────────────────────────────────────

#[test]
fn scissor_follows_target_orientation() {
    let mut dev = device();
    let mut s = state();
    s.set_clip(Region::new(10, 20, 109, 219));
    dev.set_state(&mut s, AccelMask::FILL_RECTANGLE).unwrap();
    assert!(dev.gl().calls().contains(&GlCall::Scissor([10, 260, 100, 200])));

    // Same clip on an off-screen target: the scissor keeps its y.
    s.set_destination(Destination { width: 640, height: 480, offscreen: true });
    dev.gl_mut().clear();
    dev.set_state(&mut s, AccelMask::FILL_RECTANGLE).unwrap();
    assert_eq!(dev.gl().count(|c| matches!(c, GlCall::Scissor(_))), 1);
    assert!(dev.gl().calls().contains(&GlCall::Scissor([10, 20, 100, 200])));
    assert_eq!(scissor_box(&s.destination, &s.clip), [10, 20, 100, 200]);
    assert!(dev.gl().calls().contains(&GlCall::Viewport([0, 0, 640, 480])));
}

#[test]
fn quarter_turn_uses_aspect_correction() {
    let mut dev = device_with(DriverConfig {
        primary_rotation: Some(Rotation::Deg90),
        ..Default::default()
    });
    let mut s = state();
    dev.set_state(&mut s, AccelMask::FILL_RECTANGLE).unwrap();

    let scale = dev.programs.get(ProgramIndex::Draw).uniforms.scale.unwrap();
    let uploaded = dev
        .gl()
        .calls()
        .iter()
        .find_map(|c| match c {
            GlCall::Uniform3f(loc, v) if *loc == scale => Some(*v),
            _ => None,
        })
        .unwrap();
    let expected = [0.75 * 2.0 / 480.0, 0.75 * -2.0 / 640.0, 1.0];
    for (a, b) in uploaded.iter().zip(expected) {
        assert!((a - b).abs() < 1e-6);
    }
}

struct CountingDisplay(Rc<Cell<u32>>);

impl Display for CountingDisplay {
    fn rotation(&self) -> Rotation {
        self.0.set(self.0.get() + 1);
        Rotation::Deg0
    }

    fn screen_size(&self) -> (u32, u32) {
        (640, 480)
    }
}

#[test]
fn display_queried_until_destination_changes() {
    let queries = Rc::new(Cell::new(0));
    let mut dev = Device::init(
        RecordingGl::new(),
        Box::new(CountingDisplay(queries.clone())),
        DriverConfig::default(),
    )
    .unwrap();
    let mut s = state();

    dev.set_state(&mut s, AccelMask::FILL_RECTANGLE).unwrap();
    dev.set_state(&mut s, AccelMask::BLIT).unwrap();
    assert_eq!(queries.get(), 1);

    s.set_destination(Destination { width: 640, height: 480, offscreen: true });
    dev.set_state(&mut s, AccelMask::BLIT).unwrap();
    assert_eq!(queries.get(), 2);
}

#[test]
fn explicit_matrix_uploads_both_matrices() {
    let mut dev = device();
    let mut s = state();
    s.set_render_options(RenderOptions::MATRIX);
    dev.set_state(&mut s, AccelMask::FILL_RECTANGLE).unwrap();

    assert_eq!(dev.active_program(), Some(ProgramIndex::DrawMat));
    assert_eq!(dev.gl().count(|c| matches!(c, GlCall::UniformMatrix3f(..))), 2);
    assert_eq!(dev.gl().count(|c| matches!(c, GlCall::Uniform3f(..))), 0);
}

// ── set_state: faults ─────────────────────────────────────────────────────

#[test]
fn bad_blend_function_aborts_the_call_only() {
    let mut dev = device();
    let mut s = state();
    s.set_drawing_flags(DrawingFlags::BLEND);
    s.set_src_blend(BlendFunction(99));

    let err = dev.set_state(&mut s, AccelMask::FILL_RECTANGLE).unwrap_err();
    assert_eq!(
        err,
        DeviceError::UnexpectedBlendFunction { side: BlendSide::Source, value: 99 }
    );
    assert!(s.set.is_empty());

    s.set_src_blend(BlendFunction::SRC_ALPHA);
    dev.set_state(&mut s, AccelMask::FILL_RECTANGLE).unwrap();
    assert_eq!(s.set, AccelMask::DRAWING);
}

#[test]
fn unexpected_function_is_rejected() {
    let mut dev = device();
    let mut s = state();
    let accel = AccelMask::BLIT | AccelMask::FILL_RECTANGLE;
    assert_eq!(dev.set_state(&mut s, accel), Err(DeviceError::UnexpectedFunction(accel)));
    assert!(s.mod_hw.is_empty());
    assert_eq!(dev.active_program(), None);
}

#[test]
fn blit_without_source_is_rejected() {
    let mut dev = device();
    let mut s = state();
    s.set_source(None);
    assert_eq!(dev.set_state(&mut s, AccelMask::BLIT), Err(DeviceError::MissingSource));
    assert!(s.set.is_empty());
}

// ── primitives ────────────────────────────────────────────────────────────

#[test]
fn drawing_primitives() {
    let mut dev = device();
    let mut s = state();
    dev.set_state(&mut s, AccelMask::FILL_RECTANGLE).unwrap();

    assert!(dev.fill_rectangle(&Rectangle::new(0, 0, 4, 4)));
    assert_eq!(last_draw(&dev).0, Primitive::TriangleFan);

    assert!(dev.draw_rectangle(&Rectangle::new(0, 0, 4, 4)));
    let (prim, pos, tex) = last_draw(&dev);
    assert_eq!(prim, Primitive::LineLoop);
    assert_eq!(pos[0], [1.0, 1.0]);
    assert!(tex.is_none());

    assert!(dev.draw_line(&Region::new(1, 2, 3, 4)));
    assert_eq!(last_draw(&dev).0, Primitive::Lines);

    assert!(dev.fill_triangle(&Triangle::new(0, 0, 5, 0, 0, 5)));
    let (prim, pos, _) = last_draw(&dev);
    assert_eq!(prim, Primitive::Triangles);
    assert_eq!(pos.len(), 3);
}

#[test]
fn blit_rotation_comes_from_set_state() {
    let mut dev = device();
    let mut s = state();
    let src = Rectangle::new(0, 0, 10, 20);

    s.set_blitting_flags(BlittingFlags::ROTATE90);
    dev.set_state(&mut s, AccelMask::BLIT).unwrap();
    // Not seen until the next SetState.
    s.set_blitting_flags(BlittingFlags::empty());

    assert!(dev.blit(&src, 5, 5));
    let (prim, pos, tex) = last_draw(&dev);
    assert_eq!(prim, Primitive::TriangleFan);
    assert_eq!(pos[0], [5.0, 5.0]);
    assert_eq!(tex.unwrap(), texcoords(&src, BlitRotation::Rotate90).to_vec());

    dev.set_state(&mut s, AccelMask::STRETCH_BLIT).unwrap();
    assert!(dev.stretch_blit(&src, &Rectangle::new(0, 0, 100, 100)));
    let (_, pos, tex) = last_draw(&dev);
    assert_eq!(pos[2], [100.0, 100.0]);
    assert_eq!(tex.unwrap(), texcoords(&src, BlitRotation::None).to_vec());
}

#[test]
fn batch_blit_draws_every_item() {
    let mut dev = device();
    let mut s = state();
    dev.set_state(&mut s, AccelMask::BLIT).unwrap();

    let rects = [Rectangle::new(0, 0, 8, 8); 5];
    let points: Vec<Point> = (0..5).map(|i| Point::new(i * 8, 0)).collect();

    assert_eq!(dev.batch_blit(&rects, &points), 5);
    let (prim, pos, tex) = last_draw(&dev);
    assert_eq!(prim, Primitive::Triangles);
    assert_eq!(pos.len(), 30);
    assert_eq!(tex.map(|t| t.len()), Some(30));
}

#[test]
fn batch_blit_reports_partial_completion() {
    let mut dev = device_with(DriverConfig { max_batch_blits: Some(3), ..Default::default() });
    let mut s = state();
    dev.set_state(&mut s, AccelMask::BLIT).unwrap();

    let rects = [Rectangle::new(0, 0, 8, 8); 5];
    let points = [Point::default(); 5];
    assert_eq!(dev.batch_blit(&rects, &points), 3);
    assert_eq!(last_draw(&dev).1.len(), 18);

    dev.gl_mut().clear();
    assert_eq!(dev.batch_blit(&[], &[]), 0);
    assert_eq!(dev.gl().count(|c| matches!(c, GlCall::DrawArrays { .. })), 0);
}
