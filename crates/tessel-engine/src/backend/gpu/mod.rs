//! wgpu implementation of [`GlApi`].
//!
//! GLES2 is immediate; wgpu records passes. `WgpuGl` keeps the GL-like current
//! state (program, uniforms per program, blend, scissor, bound texture) and
//! snapshots it into a pending draw on every `draw_arrays`. `flush` encodes all
//! pending draws into one render pass over the caller's target.
//!
//! GLES2 conventions emulated here:
//! - scissor and viewport have a bottom-left origin on the screen target
//! - off-screen targets are stored bottom-up, so clip space y is flipped for them
//! - triangle fans and line loops are expanded to lists and strips

mod pipeline;
mod uniforms;

use std::collections::HashMap;

use wgpu::util::DeviceExt;

use crate::gl::shaders::{FragmentStage, ShaderStage, VertexStage};
use crate::gl::{
    Capability, GlApi, Primitive, ProgramHandle, ShaderError, StageKind, TextureFilter,
    TextureHandle, UniformLocation, VertexAttrib,
};
use crate::state::BlendFactor;

use pipeline::{PipelineDesc, PipelineKey};
use uniforms::{ProgramUniforms, Slot, uniform_stride};

const PRELUDE: &str = include_str!("shaders/prelude.wgsl");

/// WGSL source for a stage. Entry points are `vs_main` and `fs_main`.
pub fn wgsl_source(stage: ShaderStage) -> &'static str {
    match stage {
        ShaderStage::Vertex(VertexStage::Draw) => include_str!("shaders/draw.vert.wgsl"),
        ShaderStage::Vertex(VertexStage::DrawMatrix) => include_str!("shaders/draw_mat.vert.wgsl"),
        ShaderStage::Vertex(VertexStage::Blit) => include_str!("shaders/blit.vert.wgsl"),
        ShaderStage::Vertex(VertexStage::BlitMatrix) => include_str!("shaders/blit_mat.vert.wgsl"),
        ShaderStage::Fragment(FragmentStage::Draw) => include_str!("shaders/draw.frag.wgsl"),
        ShaderStage::Fragment(FragmentStage::Blit) => include_str!("shaders/blit.frag.wgsl"),
        ShaderStage::Fragment(FragmentStage::BlitColor) => {
            include_str!("shaders/blit_color.frag.wgsl")
        }
        ShaderStage::Fragment(FragmentStage::BlitColorkey) => {
            include_str!("shaders/blit_colorkey.frag.wgsl")
        }
        ShaderStage::Fragment(FragmentStage::BlitPremultiply) => {
            include_str!("shaders/blit_premultiply.frag.wgsl")
        }
    }
}

/// Render target for one `flush`.
pub struct FrameTarget<'a> {
    pub view: &'a wgpu::TextureView,
    pub width: u32,
    pub height: u32,
    /// Off-screen surface (GLES2 framebuffer object) rather than the window.
    pub offscreen: bool,
}

struct Program {
    module: wgpu::ShaderModule,
    /// Stage sources without the prelude, for uniform lookup.
    stage_sources: String,
    texcoords: bool,
    uniforms: ProgramUniforms,
}

struct Texture {
    view: wgpu::TextureView,
    filter: TextureFilter,
}

struct PendingDraw {
    key: PipelineKey,
    texcoords: bool,
    vertices: std::ops::Range<u32>,
    uniforms: ProgramUniforms,
    /// Texture index and its filter at draw time.
    texture: Option<(usize, TextureFilter)>,
    viewport: [i32; 4],
    scissor: Option<[i32; 4]>,
}

/// [`GlApi`] over a wgpu device, rendering into caller-provided targets.
pub struct WgpuGl {
    device: wgpu::Device,
    queue: wgpu::Queue,
    format: wgpu::TextureFormat,

    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    samplers: [wgpu::Sampler; 2],
    dummy_texture: wgpu::TextureView,

    programs: Vec<Option<Program>>,
    textures: Vec<Texture>,

    // current state
    program: Option<usize>,
    bound_texture: Option<usize>,
    blend_enabled: bool,
    blend_func: (BlendFactor, BlendFactor),
    scissor_enabled: bool,
    scissor: [i32; 4],
    viewport: [i32; 4],
    attribs: [bool; 2],

    // recorded work
    positions: Vec<[f32; 2]>,
    texcoords: Vec<[f32; 2]>,
    pending: Vec<PendingDraw>,
}

impl WgpuGl {
    /// Creates a backend drawing into targets of `format`.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, format: wgpu::TextureFormat) -> Self {
        let bind_group_layout = pipeline::bind_group_layout(&device);
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessel gles2 pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let samplers = [
            pipeline::sampler(&device, TextureFilter::Nearest),
            pipeline::sampler(&device, TextureFilter::Linear),
        ];

        // Bound for draw programs, which never sample.
        let dummy = device.create_texture_with_data(
            &queue,
            &wgpu::TextureDescriptor {
                label: Some("tessel gles2 dummy texture"),
                size: wgpu::Extent3d { width: 1, height: 1, depth_or_array_layers: 1 },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            &[0xFF; 4],
        );

        Self {
            dummy_texture: dummy.create_view(&wgpu::TextureViewDescriptor::default()),
            device,
            queue,
            format,
            bind_group_layout,
            pipeline_layout,
            pipelines: HashMap::new(),
            samplers,
            programs: Vec::new(),
            textures: Vec::new(),
            program: None,
            bound_texture: None,
            blend_enabled: false,
            blend_func: (BlendFactor::One, BlendFactor::Zero),
            scissor_enabled: false,
            scissor: [0; 4],
            viewport: [0; 4],
            attribs: [false; 2],
            positions: Vec::new(),
            texcoords: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Makes a texture view available to blits. Views must be filterable float textures.
    pub fn register_texture(&mut self, view: wgpu::TextureView) -> TextureHandle {
        self.textures.push(Texture { view, filter: TextureFilter::Linear });
        TextureHandle(self.textures.len() as u32)
    }

    /// Uploads RGBA8 pixels (rows top to bottom) as a new texture and registers it.
    pub fn create_texture_rgba8(&mut self, width: u32, height: u32, pixels: &[u8]) -> TextureHandle {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("tessel gles2 source texture"),
            size: wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d { width, height, depth_or_array_layers: 1 },
        );

        self.register_texture(texture.create_view(&wgpu::TextureViewDescriptor::default()))
    }

    /// Number of draws waiting for `flush`.
    #[inline]
    pub fn pending_draws(&self) -> usize {
        self.pending.len()
    }

    /// Encodes every pending draw into one render pass that loads `target`.
    pub fn flush(&mut self, encoder: &mut wgpu::CommandEncoder, target: &FrameTarget<'_>) {
        if self.pending.is_empty() {
            return;
        }

        let flip = if target.offscreen { -1.0 } else { 1.0 };
        let stride = uniform_stride(self.device.limits().min_uniform_buffer_offset_alignment);

        // Uniform records, one per draw.
        let mut ubo_data = vec![0u8; stride as usize * self.pending.len()];
        for (i, draw) in self.pending.iter().enumerate() {
            let mut u = draw.uniforms;
            u.target_flip = [flip, 0.0, 0.0, 0.0];
            let at = i * stride as usize;
            ubo_data[at..at + pipeline::uniform_size() as usize]
                .copy_from_slice(bytemuck::bytes_of(&u));
        }
        let ubo = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessel gles2 uniforms"),
            contents: &ubo_data,
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let pos_vbo = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessel gles2 positions"),
            contents: bytemuck::cast_slice(&self.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let uv_vbo = self.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessel gles2 texcoords"),
            contents: bytemuck::cast_slice(&self.texcoords),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Pipelines and bind groups must exist before the pass borrows them.
        let pending = std::mem::take(&mut self.pending);
        for draw in &pending {
            self.ensure_pipeline(draw.key, draw.texcoords);
        }

        let mut bind_groups: HashMap<Option<(usize, TextureFilter)>, wgpu::BindGroup> =
            HashMap::new();
        for draw in &pending {
            if !bind_groups.contains_key(&draw.texture) {
                let bg = self.bind_group(&ubo, draw.texture);
                bind_groups.insert(draw.texture, bg);
            }
        }

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tessel gles2 pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            rpass.set_vertex_buffer(0, pos_vbo.slice(..));
            rpass.set_vertex_buffer(1, uv_vbo.slice(..));

            for (i, draw) in pending.iter().enumerate() {
                let Some(pipeline) = self.pipelines.get(&draw.key) else { continue };
                let Some(bind_group) = bind_groups.get(&draw.texture) else { continue };

                let Some((x, y, w, h)) = to_target_rect(draw.viewport, target) else { continue };
                rpass.set_viewport(x as f32, y as f32, w as f32, h as f32, 0.0, 1.0);

                let scissor = draw.scissor.unwrap_or([0, 0, target.width as i32, target.height as i32]);
                let Some((sx, sy, sw, sh)) = to_target_rect(scissor, target) else { continue };
                rpass.set_scissor_rect(sx, sy, sw, sh);

                rpass.set_pipeline(pipeline);
                rpass.set_bind_group(0, bind_group, &[(i as u64 * stride) as u32]);
                rpass.draw(draw.vertices.clone(), 0..1);
            }
        }

        log::trace!("flushed {} draws ({} vertices)", pending.len(), self.positions.len());

        self.positions.clear();
        self.texcoords.clear();
    }

    fn ensure_pipeline(&mut self, key: PipelineKey, texcoords: bool) {
        if self.pipelines.contains_key(&key) {
            return;
        }
        let Some(Some(program)) = self.programs.get(key.program as usize - 1) else { return };

        let pipeline = pipeline::create_pipeline(PipelineDesc {
            device: &self.device,
            layout: &self.pipeline_layout,
            module: &program.module,
            format: self.format,
            texcoords,
            key,
        });
        log::debug!("created pipeline {key:?}");
        self.pipelines.insert(key, pipeline);
    }

    fn bind_group(
        &self,
        ubo: &wgpu::Buffer,
        texture: Option<(usize, TextureFilter)>,
    ) -> wgpu::BindGroup {
        let (view, filter) = match texture.and_then(|(i, f)| Some((&self.textures.get(i)?.view, f))) {
            Some(t) => t,
            None => (&self.dummy_texture, TextureFilter::Nearest),
        };
        let sampler = match filter {
            TextureFilter::Nearest => &self.samplers[0],
            TextureFilter::Linear => &self.samplers[1],
        };

        self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tessel gles2 bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: ubo,
                        offset: 0,
                        size: wgpu::BufferSize::new(pipeline::uniform_size()),
                    }),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    fn current_program(&mut self) -> Option<&mut Program> {
        self.programs.get_mut(self.program?)?.as_mut()
    }

    fn set_uniform(&mut self, loc: UniformLocation, f: impl FnOnce(&mut ProgramUniforms, Slot)) {
        let Some(slot) = Slot::from_location(loc) else {
            log::warn!("upload to unknown uniform location {loc:?}");
            return;
        };
        match self.current_program() {
            Some(p) => f(&mut p.uniforms, slot),
            None => log::warn!("uniform upload without a program in use"),
        }
    }
}

/// True if `src` reads the uniform block member `name` (`u.name` as a whole word).
fn references(src: &str, name: &str) -> bool {
    let needle = format!("u.{name}");
    src.match_indices(&needle).any(|(at, _)| {
        src[at + needle.len()..]
            .chars()
            .next()
            .is_none_or(|c| !(c.is_ascii_alphanumeric() || c == '_'))
    })
}

/// Converts a bottom-left GL rectangle into a clamped top-left rectangle on `target`.
fn to_target_rect(r: [i32; 4], target: &FrameTarget<'_>) -> Option<(u32, u32, u32, u32)> {
    target_rect(r, target.width, target.height, target.offscreen)
}

fn target_rect(r: [i32; 4], width: u32, height: u32, offscreen: bool) -> Option<(u32, u32, u32, u32)> {
    let [x, y, w, h] = r;
    let (tw, th) = (width as i32, height as i32);
    let top = if offscreen { y } else { th - y - h };

    let x1 = x.clamp(0, tw);
    let y1 = top.clamp(0, th);
    let x2 = (x + w).clamp(0, tw);
    let y2 = (top + h).clamp(0, th);

    if x2 <= x1 || y2 <= y1 {
        return None;
    }
    Some((x1 as u32, y1 as u32, (x2 - x1) as u32, (y2 - y1) as u32))
}

/// Expands GLES2-only primitives into wgpu topologies.
fn assemble(primitive: Primitive, n: usize) -> (wgpu::PrimitiveTopology, Vec<usize>) {
    match primitive {
        Primitive::Lines => (wgpu::PrimitiveTopology::LineList, (0..n).collect()),
        Primitive::Triangles => (wgpu::PrimitiveTopology::TriangleList, (0..n).collect()),
        Primitive::LineLoop => {
            let mut idx: Vec<usize> = (0..n).collect();
            if n > 0 {
                idx.push(0);
            }
            (wgpu::PrimitiveTopology::LineStrip, idx)
        }
        Primitive::TriangleFan => {
            let idx = (1..n.saturating_sub(1)).flat_map(|i| [0, i, i + 1]).collect();
            (wgpu::PrimitiveTopology::TriangleList, idx)
        }
    }
}

impl GlApi for WgpuGl {
    fn renderer(&self) -> Option<String> {
        Some(format!("wgpu ({:?})", self.format))
    }

    fn shader_source(&self, stage: ShaderStage) -> &'static str {
        wgsl_source(stage)
    }

    fn compile_program(
        &mut self,
        vertex_src: &str,
        fragment_src: &str,
        bind_texcoords: bool,
    ) -> Result<ProgramHandle, ShaderError> {
        if !vertex_src.contains("fn vs_main") {
            return Err(ShaderError::Link { log: "vertex entry point vs_main missing".to_owned() });
        }
        if !fragment_src.contains("fn fs_main") {
            return Err(ShaderError::Link { log: "fragment entry point fs_main missing".to_owned() });
        }

        let source = format!("{PRELUDE}{vertex_src}\n{fragment_src}");
        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tessel gles2 program"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let info = pollster::block_on(module.get_compilation_info());
        let errors: Vec<String> = info
            .messages
            .iter()
            .filter(|m| m.message_type == wgpu::CompilationMessageType::Error)
            .map(|m| m.message.clone())
            .collect();
        if !errors.is_empty() {
            return Err(ShaderError::Compile { stage: StageKind::Vertex, log: errors.join("\n") });
        }

        self.programs.push(Some(Program {
            module,
            stage_sources: format!("{vertex_src}\n{fragment_src}"),
            texcoords: bind_texcoords,
            uniforms: ProgramUniforms::default(),
        }));
        Ok(ProgramHandle(self.programs.len() as u32))
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> Option<UniformLocation> {
        let p = self.programs.get(program.0.checked_sub(1)? as usize)?.as_ref()?;
        if !references(&p.stage_sources, name) {
            return None;
        }
        Slot::location_of(name)
    }

    fn delete_program(&mut self, program: ProgramHandle) {
        let Some(idx) = program.0.checked_sub(1).map(|i| i as usize) else { return };
        if let Some(slot) = self.programs.get_mut(idx) {
            *slot = None;
        }
        self.pipelines.retain(|k, _| k.program != program.0);
        if self.program == Some(idx) {
            self.program = None;
        }
    }

    fn use_program(&mut self, program: ProgramHandle) {
        self.program = program.0.checked_sub(1).map(|i| i as usize);
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.viewport = [x, y, width, height];
    }

    fn enable(&mut self, cap: Capability) {
        match cap {
            Capability::Blend => self.blend_enabled = true,
            Capability::ScissorTest => self.scissor_enabled = true,
        }
    }

    fn disable(&mut self, cap: Capability) {
        match cap {
            Capability::Blend => self.blend_enabled = false,
            Capability::ScissorTest => self.scissor_enabled = false,
        }
    }

    fn scissor(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.scissor = [x, y, width, height];
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.blend_func = (src, dst);
    }

    fn uniform_2f(&mut self, loc: UniformLocation, v: [f32; 2]) {
        self.set_uniform(loc, |u, slot| u.set_float(slot, &v));
    }

    fn uniform_3f(&mut self, loc: UniformLocation, v: [f32; 3]) {
        self.set_uniform(loc, |u, slot| u.set_float(slot, &v));
    }

    fn uniform_4f(&mut self, loc: UniformLocation, v: [f32; 4]) {
        self.set_uniform(loc, |u, slot| u.set_float(slot, &v));
    }

    fn uniform_3i(&mut self, loc: UniformLocation, v: [i32; 3]) {
        self.set_uniform(loc, |u, slot| u.set_int(slot, v));
    }

    fn uniform_matrix_3f(&mut self, loc: UniformLocation, m: &[f32; 9]) {
        let m = *m;
        self.set_uniform(loc, |u, slot| u.set_matrix(slot, &m));
    }

    fn bind_texture(&mut self, texture: TextureHandle) {
        self.bound_texture = texture.0.checked_sub(1).map(|i| i as usize);
    }

    fn texture_filter(&mut self, filter: TextureFilter) {
        let Some(tex) = self.bound_texture.and_then(|i| self.textures.get_mut(i)) else {
            log::warn!("texture filter set without a bound texture");
            return;
        };
        tex.filter = filter;
    }

    fn enable_vertex_attrib(&mut self, attrib: VertexAttrib) {
        self.attribs[attrib as usize] = true;
    }

    fn disable_vertex_attrib(&mut self, attrib: VertexAttrib) {
        self.attribs[attrib as usize] = false;
    }

    fn draw_arrays(
        &mut self,
        primitive: Primitive,
        positions: &[[f32; 2]],
        texcoords: Option<&[[f32; 2]]>,
    ) {
        if !self.attribs[VertexAttrib::Positions as usize] {
            log::warn!("draw with position array disabled ignored");
            return;
        }
        let Some(program_idx) = self.program else {
            log::warn!("draw without a program in use ignored");
            return;
        };
        let Some(Some(program)) = self.programs.get(program_idx) else { return };

        let (topology, indices) = assemble(primitive, positions.len());
        if indices.is_empty() {
            return;
        }

        let texcoords = texcoords.filter(|_| self.attribs[VertexAttrib::TexCoords as usize]);
        let first = self.positions.len() as u32;
        for &i in &indices {
            self.positions.push(positions[i]);
            self.texcoords.push(texcoords.and_then(|t| t.get(i).copied()).unwrap_or([0.0; 2]));
        }

        let texture = if program.texcoords {
            self.bound_texture
                .and_then(|i| self.textures.get(i).map(|t| (i, t.filter)))
        } else {
            None
        };

        self.pending.push(PendingDraw {
            key: PipelineKey {
                program: program_idx as u32 + 1,
                topology,
                blend: self.blend_enabled.then_some(self.blend_func),
            },
            texcoords: program.texcoords,
            vertices: first..first + indices.len() as u32,
            uniforms: program.uniforms,
            texture,
            viewport: self.viewport,
            scissor: self.scissor_enabled.then_some(self.scissor),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── primitive assembly ────────────────────────────────────────────────

    #[test]
    fn fan_becomes_triangle_list() {
        let (topology, idx) = assemble(Primitive::TriangleFan, 4);
        assert_eq!(topology, wgpu::PrimitiveTopology::TriangleList);
        assert_eq!(idx, vec![0, 1, 2, 0, 2, 3]);
        assert!(assemble(Primitive::TriangleFan, 2).1.is_empty());
    }

    #[test]
    fn loop_is_closed_strip() {
        let (topology, idx) = assemble(Primitive::LineLoop, 4);
        assert_eq!(topology, wgpu::PrimitiveTopology::LineStrip);
        assert_eq!(idx, vec![0, 1, 2, 3, 0]);
    }

    #[test]
    fn lists_pass_through() {
        assert_eq!(assemble(Primitive::Lines, 2), (wgpu::PrimitiveTopology::LineList, vec![0, 1]));
        assert_eq!(assemble(Primitive::Triangles, 3).1, vec![0, 1, 2]);
    }

    // ── sources ───────────────────────────────────────────────────────────

    #[test]
    fn every_stage_has_its_entry_point() {
        for v in [VertexStage::Draw, VertexStage::DrawMatrix, VertexStage::Blit, VertexStage::BlitMatrix] {
            assert!(wgsl_source(ShaderStage::Vertex(v)).contains("fn vs_main"));
        }
        for f in [
            FragmentStage::Draw,
            FragmentStage::Blit,
            FragmentStage::BlitColor,
            FragmentStage::BlitColorkey,
            FragmentStage::BlitPremultiply,
        ] {
            assert!(wgsl_source(ShaderStage::Fragment(f)).contains("fn fs_main"));
        }
    }

    #[test]
    fn uniform_lookup_matches_whole_names() {
        use crate::gl::shaders::{U_COLOR, U_COLORKEY, U_SCALE};

        let keyed = wgsl_source(ShaderStage::Fragment(FragmentStage::BlitColorkey));
        assert!(references(keyed, U_COLORKEY));
        assert!(references(keyed, U_COLOR));

        assert!(!references("return u.uColorKey;", U_COLOR));
        assert!(!references(PRELUDE, U_SCALE));
        assert!(!references(wgsl_source(ShaderStage::Fragment(FragmentStage::Blit)), U_COLOR));
    }

    // ── target rectangles ─────────────────────────────────────────────────

    #[test]
    fn screen_rects_flip_to_top_left() {
        assert_eq!(target_rect([10, 20, 100, 50], 640, 480, false), Some((10, 410, 100, 50)));
        assert_eq!(target_rect([10, 20, 100, 50], 640, 480, true), Some((10, 20, 100, 50)));
    }

    #[test]
    fn rects_are_clamped_to_the_target() {
        assert_eq!(target_rect([-10, 0, 20, 480], 640, 480, true), Some((0, 0, 10, 480)));
        assert_eq!(target_rect([700, 0, 20, 20], 640, 480, true), None);
        assert_eq!(target_rect([0, 0, 0, 10], 640, 480, false), None);
    }
}
