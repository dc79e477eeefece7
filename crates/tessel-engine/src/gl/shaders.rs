//! Shader stages used by the program variants, with GLSL ES 1.00 sources.
//!
//! Uniform and attribute names are shared by every backend; a backend with a
//! different shading language must keep them when it overrides
//! [`GlApi::shader_source`](super::GlApi::shader_source).

/// Vertex stage variants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum VertexStage {
    /// Positions scaled to clip space, then rotated for the display.
    Draw,
    /// Positions transformed by the projection and render-option matrices.
    DrawMatrix,
    /// `Draw` plus texture coordinates.
    Blit,
    /// `DrawMatrix` plus texture coordinates.
    BlitMatrix,
}

/// Fragment stage variants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FragmentStage {
    /// Constant color.
    Draw,
    /// Texture sample.
    Blit,
    /// Texture sample modulated by a constant color.
    BlitColor,
    /// Modulated sample, discarded when it matches the color key.
    BlitColorkey,
    /// Modulated sample with RGB multiplied by its alpha.
    BlitPremultiply,
}

/// Either stage, for source lookup.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex(VertexStage),
    Fragment(FragmentStage),
}

pub const ATTR_POSITION: &str = "aPos";
pub const ATTR_TEXCOORD: &str = "aUV";

pub const U_SCALE: &str = "uScale";
pub const U_ROT_MATRIX: &str = "uRotMatrix";
pub const U_RENDER_MATRIX: &str = "uRenderMatrix";
pub const U_MVP_MATRIX: &str = "uMvpMatrix";
pub const U_COLOR: &str = "uColor";
pub const U_COLORKEY: &str = "uColorKey";
pub const U_TEX_SCALE: &str = "uTexScale";

/// Every uniform name, in a fixed order backends may use as location numbering.
pub const UNIFORMS: [&str; 7] =
    [U_SCALE, U_ROT_MATRIX, U_RENDER_MATRIX, U_MVP_MATRIX, U_COLOR, U_COLORKEY, U_TEX_SCALE];

const DRAW_VERT: &str = r#"
attribute vec2 aPos;
uniform   vec3 uScale;
uniform   mat3 uRotMatrix;

void main(void)
{
    vec3 pos = uRotMatrix * vec3(uScale.x * aPos.x - 1.0, uScale.y * aPos.y + uScale.z, 1.0);
    gl_Position = vec4(pos.x, pos.y, 0.0, 1.0);
}
"#;

const DRAW_MAT_VERT: &str = r#"
attribute vec2 aPos;
uniform   mat3 uMvpMatrix;
uniform   mat3 uRenderMatrix;

void main(void)
{
    vec3 pos = uMvpMatrix * uRenderMatrix * vec3(aPos, 1.0);
    gl_Position = vec4(pos.x, pos.y, 0.0, pos.z);
}
"#;

const BLIT_VERT: &str = r#"
attribute vec2 aPos;
attribute vec2 aUV;
uniform   vec3 uScale;
uniform   mat3 uRotMatrix;
uniform   vec2 uTexScale;
varying   vec2 vTexCoord;

void main(void)
{
    vec3 pos = uRotMatrix * vec3(uScale.x * aPos.x - 1.0, uScale.y * aPos.y + uScale.z, 1.0);
    gl_Position = vec4(pos.x, pos.y, 0.0, 1.0);
    vTexCoord = uTexScale * aUV;
}
"#;

const BLIT_MAT_VERT: &str = r#"
attribute vec2 aPos;
attribute vec2 aUV;
uniform   mat3 uMvpMatrix;
uniform   mat3 uRenderMatrix;
uniform   vec2 uTexScale;
varying   vec2 vTexCoord;

void main(void)
{
    vec3 pos = uMvpMatrix * uRenderMatrix * vec3(aPos, 1.0);
    gl_Position = vec4(pos.x, pos.y, 0.0, pos.z);
    vTexCoord = uTexScale * aUV;
}
"#;

const DRAW_FRAG: &str = r#"
precision mediump float;
uniform vec4 uColor;

void main(void)
{
    gl_FragColor = uColor;
}
"#;

const BLIT_FRAG: &str = r#"
precision mediump float;
uniform sampler2D uSampler;
varying vec2      vTexCoord;

void main(void)
{
    gl_FragColor = texture2D(uSampler, vTexCoord);
}
"#;

const BLIT_COLOR_FRAG: &str = r#"
precision mediump float;
uniform sampler2D uSampler;
uniform vec4      uColor;
varying vec2      vTexCoord;

void main(void)
{
    gl_FragColor = texture2D(uSampler, vTexCoord) * uColor;
}
"#;

const BLIT_COLORKEY_FRAG: &str = r#"
precision mediump float;
uniform sampler2D uSampler;
uniform vec4      uColor;
uniform ivec3     uColorKey;
varying vec2      vTexCoord;

void main(void)
{
    vec4 c = texture2D(uSampler, vTexCoord);
    ivec3 rgb = ivec3(c.rgb * 255.0 + 0.5);
    if (rgb == uColorKey)
        discard;
    gl_FragColor = c * uColor;
}
"#;

const BLIT_PREMULTIPLY_FRAG: &str = r#"
precision mediump float;
uniform sampler2D uSampler;
uniform vec4      uColor;
varying vec2      vTexCoord;

void main(void)
{
    gl_FragColor = texture2D(uSampler, vTexCoord) * uColor;
    gl_FragColor.rgb *= gl_FragColor.a;
}
"#;

/// GLSL ES 1.00 source for a stage.
pub fn glsl_source(stage: ShaderStage) -> &'static str {
    match stage {
        ShaderStage::Vertex(VertexStage::Draw) => DRAW_VERT,
        ShaderStage::Vertex(VertexStage::DrawMatrix) => DRAW_MAT_VERT,
        ShaderStage::Vertex(VertexStage::Blit) => BLIT_VERT,
        ShaderStage::Vertex(VertexStage::BlitMatrix) => BLIT_MAT_VERT,
        ShaderStage::Fragment(FragmentStage::Draw) => DRAW_FRAG,
        ShaderStage::Fragment(FragmentStage::Blit) => BLIT_FRAG,
        ShaderStage::Fragment(FragmentStage::BlitColor) => BLIT_COLOR_FRAG,
        ShaderStage::Fragment(FragmentStage::BlitColorkey) => BLIT_COLORKEY_FRAG,
        ShaderStage::Fragment(FragmentStage::BlitPremultiply) => BLIT_PREMULTIPLY_FRAG,
    }
}
