use bytemuck::{Pod, Zeroable};

use crate::gl::UniformLocation;
use crate::gl::shaders::UNIFORMS;

/// CPU copy of one program's uniform block, laid out as `Uniforms` in `prelude.wgsl`.
///
/// `mat3x3<f32>` columns are padded to 16 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub(super) struct ProgramUniforms {
    pub scale: [f32; 4],
    pub rot_matrix: [[f32; 4]; 3],
    pub render_matrix: [[f32; 4]; 3],
    pub mvp_matrix: [[f32; 4]; 3],
    pub color: [f32; 4],
    pub colorkey: [i32; 4],
    pub tex_scale: [f32; 4],
    /// Owned by the backend, filled at flush time.
    pub target_flip: [f32; 4],
}

/// Uniform slot addressed by a location. Locations index [`UNIFORMS`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(super) enum Slot {
    Scale,
    RotMatrix,
    RenderMatrix,
    MvpMatrix,
    Color,
    ColorKey,
    TexScale,
}

impl Slot {
    pub fn location_of(name: &str) -> Option<UniformLocation> {
        UNIFORMS.iter().position(|&u| u == name).map(|i| UniformLocation(i as i32))
    }

    pub fn from_location(loc: UniformLocation) -> Option<Self> {
        Some(match loc.0 {
            0 => Slot::Scale,
            1 => Slot::RotMatrix,
            2 => Slot::RenderMatrix,
            3 => Slot::MvpMatrix,
            4 => Slot::Color,
            5 => Slot::ColorKey,
            6 => Slot::TexScale,
            _ => return None,
        })
    }
}

impl ProgramUniforms {
    /// Writes float components; missing ones stay zero.
    pub fn set_float(&mut self, slot: Slot, v: &[f32]) {
        let dst = match slot {
            Slot::Scale => &mut self.scale,
            Slot::Color => &mut self.color,
            Slot::TexScale => &mut self.tex_scale,
            other => {
                log::warn!("float vector upload to matrix/int uniform {other:?} ignored");
                return;
            }
        };
        *dst = [0.0; 4];
        dst[..v.len()].copy_from_slice(v);
    }

    pub fn set_int(&mut self, slot: Slot, v: [i32; 3]) {
        if slot != Slot::ColorKey {
            log::warn!("int vector upload to {slot:?} ignored");
            return;
        }
        self.colorkey = [v[0], v[1], v[2], 0];
    }

    /// Column-major 3x3.
    pub fn set_matrix(&mut self, slot: Slot, m: &[f32; 9]) {
        let dst = match slot {
            Slot::RotMatrix => &mut self.rot_matrix,
            Slot::RenderMatrix => &mut self.render_matrix,
            Slot::MvpMatrix => &mut self.mvp_matrix,
            other => {
                log::warn!("matrix upload to vector uniform {other:?} ignored");
                return;
            }
        };
        for (c, col) in dst.iter_mut().enumerate() {
            *col = [m[c * 3], m[c * 3 + 1], m[c * 3 + 2], 0.0];
        }
    }
}

/// Size of one uniform record in the dynamic-offset buffer.
pub(super) fn uniform_stride(min_alignment: u32) -> u64 {
    let size = std::mem::size_of::<ProgramUniforms>() as u64;
    let align = u64::from(min_alignment.max(1));
    size.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_wgsl() {
        assert_eq!(std::mem::size_of::<ProgramUniforms>(), 224);
        assert_eq!(uniform_stride(256), 256);
        assert_eq!(uniform_stride(32), 224);
    }

    #[test]
    fn locations_map_to_slots() {
        for name in UNIFORMS {
            let loc = Slot::location_of(name).unwrap();
            assert!(Slot::from_location(loc).is_some());
        }
        assert_eq!(Slot::location_of("uSampler"), None);
        assert_eq!(Slot::from_location(UniformLocation(7)), None);
    }

    #[test]
    fn matrices_are_stored_by_column() {
        let mut u = ProgramUniforms::default();
        u.set_matrix(Slot::RotMatrix, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        assert_eq!(u.rot_matrix[1], [4.0, 5.0, 6.0, 0.0]);

        u.set_float(Slot::TexScale, &[0.5, 0.25]);
        assert_eq!(u.tex_scale, [0.5, 0.25, 0.0, 0.0]);

        // Mismatched kinds leave the block untouched.
        let before = u;
        u.set_matrix(Slot::Color, &[0.0; 9]);
        u.set_int(Slot::Scale, [1, 2, 3]);
        assert_eq!(u, before);
    }
}
