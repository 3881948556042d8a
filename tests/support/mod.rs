#![allow(dead_code)]

use shader_context::math::Vector2;
use shader_context::prelude::*;

pub const VS: &str = "
attribute vec2 a_position;
attribute vec2 a_texcoord;
uniform mat4 u_projection;
varying vec2 v_texcoord;

void main() {
    v_texcoord = a_texcoord;
    gl_Position = u_projection * vec4(a_position, 0.0, 1.0);
}
";

pub const FS: &str = "
uniform sampler2D u_texture;
varying vec2 v_texcoord;

void main() {
    gl_FragColor = texture2D(u_texture, v_texcoord);
}
";

pub const TINTED_FS: &str = "
uniform sampler2D u_texture;
varying vec2 v_texcoord;
varying vec4 v_color;

void main() {
    gl_FragColor = texture2D(u_texture, v_texcoord) * v_color;
}
";

pub const UNPROJECTED_VS: &str = "
attribute vec2 a_position;
attribute vec2 a_texcoord;
varying vec2 v_texcoord;

void main() {
    v_texcoord = a_texcoord;
    gl_Position = vec4(a_position, 0.0, 1.0);
}
";

pub const MALFORMED_FS: &str = "
uniform sampler2D u_texture;
void mian() {
";

pub fn setup() -> ShaderContext<HeadlessVisitor> {
    let _ = env_logger::try_init();
    ShaderContext::initialize(HeadlessVisitor::new(), ShaderContextParams::default()).unwrap()
}

pub struct HeadlessTexture {
    pub dimensions: Vector2<u32>,
    pub bound: bool,
    pub binds: usize,
    pub fail: bool,
}

impl HeadlessTexture {
    pub fn new(width: u32, height: u32) -> Self {
        HeadlessTexture {
            dimensions: Vector2::new(width, height),
            bound: false,
            binds: 0,
            fail: false,
        }
    }
}

impl Texture for HeadlessTexture {
    fn dimensions(&self) -> Vector2<u32> {
        self.dimensions
    }

    unsafe fn bind(&mut self) -> Result<()> {
        if self.fail {
            return Err(Error::TextureBind("texture lost".into()).into());
        }

        self.bound = true;
        self.binds += 1;
        Ok(())
    }

    unsafe fn unbind(&mut self) {
        self.bound = false;
    }
}

pub fn floats(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks(4)
        .map(|v| f32::from_ne_bytes([v[0], v[1], v[2], v[3]]))
        .collect()
}
