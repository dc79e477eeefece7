//! Demo scene driving the engine through the consumer protocol:
//! CheckState, SetState when `needs_set_state`, then primitives.
//!
//! Every frame renders a small scene into an off-screen surface, then draws
//! the window contents with every primitive and program variant, sampling
//! both the off-screen surface and a static checkerboard.

use anyhow::{Context, Result};

use tessel_engine::backend::gpu::{FrameTarget, WgpuGl};
use tessel_engine::coords::{Point, Rectangle, Region, Triangle};
use tessel_engine::device::{Device, DriverConfig, Gles2Driver};
use tessel_engine::display::FixedDisplay;
use tessel_engine::state::{
    AccelMask, BlendFunction, BlittingFlags, CardState, Color, Destination, DrawingFlags,
    MATRIX_IDENTITY, RenderOptions, Source,
};

use crate::gpu::{Gpu, GpuFrame};

const OFFSCREEN_SIZE: u32 = 128;
const CHECKER_SIZE: u32 = 64;
const CHECKER_CELL: u32 = 8;
/// Magenta cells of the checkerboard are keyed out.
const CHECKER_KEY: u32 = 0x00FF_00FF;

struct Offscreen {
    /// Render attachment view; the sampling view was handed to the backend.
    target: wgpu::TextureView,
    source: Source,
}

pub struct Demo {
    device: Device<WgpuGl>,
    state: CardState,
    checker: Source,
    offscreen: Offscreen,
    frame: u64,
}

impl Demo {
    pub fn new(gpu: &Gpu<'_>) -> Result<Self> {
        let gl = WgpuGl::new(gpu.device().clone(), gpu.queue().clone(), gpu.surface_format());
        anyhow::ensure!(Gles2Driver::probe(&gl), "backend has no usable context");

        let size = gpu.size();
        let config = DriverConfig {
            max_batch_blits: Some(64),
            ..DriverConfig::default()
        };
        let mut device = Device::init(gl, Box::new(FixedDisplay::new(size.width, size.height)), config)
            .context("failed to initialize the GLES2 device")?;

        log::info!("{} on {}", Gles2Driver::info().name, device.info().name);

        let checker = Source {
            width: CHECKER_SIZE as i32,
            height: CHECKER_SIZE as i32,
            texture: device
                .gl_mut()
                .create_texture_rgba8(CHECKER_SIZE, CHECKER_SIZE, &checkerboard()),
        };

        let offscreen = create_offscreen(gpu, &mut device);

        let state = CardState::new(Destination {
            width: size.width as i32,
            height: size.height as i32,
            offscreen: false,
        });

        Ok(Self { device, state, checker, offscreen, frame: 0 })
    }

    /// Records one frame into `frame.encoder`.
    pub fn render(&mut self, frame: &mut GpuFrame, width: u32, height: u32) {
        self.frame += 1;
        let t = self.frame as f32 / 60.0;

        self.draw_offscreen(t);
        self.device.gl_mut().flush(
            &mut frame.encoder,
            &FrameTarget {
                view: &self.offscreen.target,
                width: OFFSCREEN_SIZE,
                height: OFFSCREEN_SIZE,
                offscreen: true,
            },
        );

        self.draw_screen(t, width as i32, height as i32);
        self.device.gl_mut().flush(
            &mut frame.encoder,
            &FrameTarget { view: &frame.view, width, height, offscreen: false },
        );
    }

    /// Runs CheckState and, when needed, SetState for `accel`.
    fn prepare(&mut self, accel: AccelMask) -> bool {
        if !self.device.check_state(&mut self.state, accel) {
            log::debug!("{accel:?} not accelerated for the current flags");
            return false;
        }
        if self.state.needs_set_state(accel) {
            if let Err(e) = self.device.set_state(&mut self.state, accel) {
                log::warn!("set_state({accel:?}) failed: {e}");
                return false;
            }
        }
        true
    }

    fn reset_flags(&mut self) {
        self.state.set_drawing_flags(DrawingFlags::empty());
        self.state.set_blitting_flags(BlittingFlags::empty());
        self.state.set_render_options(RenderOptions::empty());
        self.state.set_color(Color::white());
    }

    // ── off-screen ────────────────────────────────────────────────────────

    fn draw_offscreen(&mut self, t: f32) {
        let size = OFFSCREEN_SIZE as i32;
        self.state.set_destination(Destination { width: size, height: size, offscreen: true });
        self.state.set_clip(Region::covering(size, size));
        self.reset_flags();

        self.state.set_color(Color::new(24, 28, 40, 255));
        if self.prepare(AccelMask::FILL_RECTANGLE) {
            self.device.fill_rectangle(&Rectangle::new(0, 0, size, size));
        }

        // A bar sweeping downwards shows which way the surface is stored.
        let y = ((t * 40.0) as i32).rem_euclid(size);
        self.state.set_color(Color::new(240, 180, 40, 255));
        if self.prepare(AccelMask::FILL_RECTANGLE) {
            self.device.fill_rectangle(&Rectangle::new(0, y, size, 12));
        }

        self.state.set_color(Color::new(80, 200, 255, 255));
        if self.prepare(AccelMask::FILL_TRIANGLE) {
            self.device.fill_triangle(&Triangle::new(8, 8, size - 8, 8, 8, size - 8));
        }
        if self.prepare(AccelMask::DRAW_RECTANGLE) {
            self.device.draw_rectangle(&Rectangle::new(2, 2, size - 4, size - 4));
        }
    }

    // ── window ────────────────────────────────────────────────────────────

    fn draw_screen(&mut self, t: f32, width: i32, height: i32) {
        self.state.set_destination(Destination { width, height, offscreen: false });
        self.state.set_clip(Region::covering(width, height));
        self.reset_flags();

        self.draw_shapes(t, width, height);
        self.draw_blits(t);
        self.draw_rotations();
        self.draw_batch(t);
        self.draw_transformed(t, width, height);
    }

    fn draw_shapes(&mut self, t: f32, width: i32, height: i32) {
        self.state.set_color(Color::new(16, 16, 20, 255));
        if self.prepare(AccelMask::FILL_RECTANGLE) {
            self.device.fill_rectangle(&Rectangle::new(0, 0, width, height));
        }

        self.state.set_color(Color::new(60, 60, 72, 255));
        if self.prepare(AccelMask::DRAW_RECTANGLE) {
            for i in 0..8 {
                self.device.draw_rectangle(&Rectangle::new(16 + i * 80, 16, 72, 72));
            }
        }

        // Lines radiating from the window center, clipped to its lower half.
        let (cx, cy) = (width / 2, height * 3 / 4);
        self.state.set_clip(Region::new(0, height / 2, width - 1, height - 1));
        self.state.set_color(Color::new(120, 220, 120, 255));
        if self.prepare(AccelMask::DRAW_LINE) {
            for i in 0..24 {
                let a = t + i as f32 * std::f32::consts::TAU / 24.0;
                let x2 = cx + (a.cos() * 200.0) as i32;
                let y2 = cy + (a.sin() * 200.0) as i32;
                self.device.draw_line(&Region::new(cx, cy, x2, y2));
            }
        }
        self.state.set_clip(Region::covering(width, height));

        self.state.set_drawing_flags(DrawingFlags::BLEND);
        self.state.set_src_blend(BlendFunction::SRC_ALPHA);
        self.state.set_dst_blend(BlendFunction::INV_SRC_ALPHA);
        self.state.set_color(Color::new(255, 80, 80, 128));
        if self.prepare(AccelMask::FILL_TRIANGLE) {
            self.device.fill_triangle(&Triangle::new(cx - 120, cy + 60, cx + 120, cy + 60, cx, cy - 100));
        }
        self.state.set_drawing_flags(DrawingFlags::empty());
    }

    fn draw_blits(&mut self, t: f32) {
        let row = 110;
        let full = Rectangle::new(0, 0, CHECKER_SIZE as i32, CHECKER_SIZE as i32);

        // Plain copy of the off-screen surface.
        self.state.set_source(Some(self.offscreen.source));
        if self.prepare(AccelMask::BLIT) {
            let src = Rectangle::new(0, 0, OFFSCREEN_SIZE as i32, OFFSCREEN_SIZE as i32);
            self.device.blit(&src, 16, row);
        }

        self.state.set_source(Some(self.checker));

        self.state.set_src_colorkey(CHECKER_KEY);
        self.state.set_blitting_flags(BlittingFlags::SRC_COLORKEY);
        if self.prepare(AccelMask::BLIT) {
            self.device.blit(&full, 160, row);
        }

        let pulse = ((t.sin() * 0.5 + 0.5) * 255.0) as u8;
        self.state.set_color(Color::new(pulse, 128, 255 - pulse, 255));
        self.state.set_blitting_flags(BlittingFlags::COLORIZE);
        if self.prepare(AccelMask::BLIT) {
            self.device.blit(&full, 240, row);
        }

        self.state.set_color(Color::new(255, 255, 255, pulse));
        self.state.set_blitting_flags(BlittingFlags::BLEND_COLORALPHA | BlittingFlags::BLEND_ALPHACHANNEL);
        if self.prepare(AccelMask::BLIT) {
            self.device.blit(&full, 320, row);
        }

        self.state.set_blitting_flags(BlittingFlags::SRC_PREMULTIPLY | BlittingFlags::BLEND_ALPHACHANNEL);
        if self.prepare(AccelMask::BLIT) {
            self.device.blit(&full, 400, row);
        }

        self.state.set_blitting_flags(BlittingFlags::SRC_PREMULTCOLOR | BlittingFlags::BLEND_ALPHACHANNEL);
        if self.prepare(AccelMask::BLIT) {
            self.device.blit(&full, 480, row);
        }

        self.state.set_color(Color::white());
        self.state.set_blitting_flags(BlittingFlags::empty());
        if self.prepare(AccelMask::STRETCH_BLIT) {
            let grow = ((t.sin() * 0.5 + 0.5) * 96.0) as i32;
            self.device.stretch_blit(&Rectangle::new(8, 8, 16, 16), &Rectangle::new(560, row, 32 + grow, 32 + grow));
        }
    }

    fn draw_rotations(&mut self) {
        let row = 260;
        let src = Rectangle::new(0, 0, OFFSCREEN_SIZE as i32, OFFSCREEN_SIZE as i32);
        self.state.set_source(Some(self.offscreen.source));

        let rotations = [
            BlittingFlags::empty(),
            BlittingFlags::ROTATE90,
            BlittingFlags::ROTATE180,
            BlittingFlags::ROTATE270,
        ];
        for (i, flags) in rotations.into_iter().enumerate() {
            self.state.set_blitting_flags(flags);
            if self.prepare(AccelMask::BLIT) {
                self.device.blit(&src, 16 + i as i32 * 144, row);
            }
        }
        self.state.set_blitting_flags(BlittingFlags::empty());
    }

    fn draw_batch(&mut self, t: f32) {
        let cell = CHECKER_CELL as i32 * 2;
        let shift = (t * 4.0) as i32;

        let rects: Vec<Rectangle> = (0..32)
            .map(|i| Rectangle::new((i % 4) * cell, ((i / 4) % 4) * cell, cell, cell))
            .collect();
        let points: Vec<Point> = (0..32)
            .map(|i| Point::new(16 + ((i + shift) % 32) * (cell + 2), 410))
            .collect();

        self.state.set_source(Some(self.checker));
        if self.prepare(AccelMask::BLIT) {
            let mut done = 0;
            while done < rects.len() {
                let n = self.device.batch_blit(&rects[done..], &points[done..]);
                if n == 0 {
                    break;
                }
                done += n;
            }
        }
    }

    fn draw_transformed(&mut self, t: f32, width: i32, height: i32) {
        let (cx, cy) = (width - 120, height - 120);
        self.state.set_matrix(rotation_about(t * 0.5, cx as f32, cy as f32));
        self.state.set_render_options(RenderOptions::MATRIX);

        self.state.set_color(Color::new(255, 200, 60, 255));
        if self.prepare(AccelMask::FILL_RECTANGLE) {
            self.device.fill_rectangle(&Rectangle::new(cx - 70, cy - 70, 140, 140));
        }

        self.state.set_color(Color::white());
        self.state.set_source(Some(self.checker));
        if self.prepare(AccelMask::STRETCH_BLIT) {
            let full = Rectangle::new(0, 0, CHECKER_SIZE as i32, CHECKER_SIZE as i32);
            self.device.stretch_blit(&full, &Rectangle::new(cx - 50, cy - 50, 100, 100));
        }

        self.state.set_render_options(RenderOptions::empty());
        self.state.set_matrix(MATRIX_IDENTITY);
    }
}

/// Off-screen surface: rendered into through one view, sampled through another.
fn create_offscreen(gpu: &Gpu<'_>, device: &mut Device<WgpuGl>) -> Offscreen {
    let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
        label: Some("tessel-studio offscreen"),
        size: wgpu::Extent3d {
            width: OFFSCREEN_SIZE,
            height: OFFSCREEN_SIZE,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: gpu.surface_format(),
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });

    let target = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let handle = device
        .gl_mut()
        .register_texture(texture.create_view(&wgpu::TextureViewDescriptor::default()));

    Offscreen {
        target,
        source: Source {
            width: OFFSCREEN_SIZE as i32,
            height: OFFSCREEN_SIZE as i32,
            texture: handle,
        },
    }
}

/// RGBA8 checkerboard; every other cell is the color key.
fn checkerboard() -> Vec<u8> {
    let key = CHECKER_KEY.to_be_bytes();
    (0..CHECKER_SIZE * CHECKER_SIZE)
        .flat_map(|i| {
            let (x, y) = (i % CHECKER_SIZE / CHECKER_CELL, i / CHECKER_SIZE / CHECKER_CELL);
            if (x + y) % 2 == 0 {
                [key[1], key[2], key[3], 0xFF]
            } else {
                [0x30, 0xC0, 0xB0, 0xC0]
            }
        })
        .collect()
}

/// Row-major 16.16 rotation by `angle` radians about `(cx, cy)`.
fn rotation_about(angle: f32, cx: f32, cy: f32) -> [i32; 9] {
    let (s, c) = angle.sin_cos();
    let fixed = |v: f32| (v * 65536.0) as i32;
    [
        fixed(c),
        fixed(-s),
        fixed(cx - c * cx + s * cy),
        fixed(s),
        fixed(c),
        fixed(cy - s * cx - c * cy),
        0,
        0,
        0x10000,
    ]
}
