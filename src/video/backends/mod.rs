//! The backend of the shader context, which should be responsible for only one thing:
//! forwarding the few GL calls we need to the driver (or to a simulation of it).

pub mod gl;
pub mod headless;

use ::gl::types::*;

use super::buffers::BufferWrite;
use super::shader::ShaderStage;
use crate::errors::*;

/// The source of a vertex attribute array, as described by `glVertexAttribPointer`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    pub buffer: GLuint,
    pub size: GLint,
    pub kind: GLenum,
    pub normalized: bool,
    pub stride: GLsizei,
    pub offset: usize,
}

impl VertexAttribute {
    /// Float components sourced from `buffer`.
    pub fn floats(buffer: GLuint, size: usize, stride: usize, offset: usize) -> Self {
        VertexAttribute {
            buffer,
            size: size as GLint,
            kind: ::gl::FLOAT,
            normalized: false,
            stride: stride as GLsizei,
            offset,
        }
    }
}

impl Default for VertexAttribute {
    fn default() -> Self {
        VertexAttribute::floats(0, 4, 0, 0)
    }
}

/// The `GL_BLEND` capability with its blend factors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct BlendState {
    pub enabled: bool,
    pub src_rgb: GLenum,
    pub dst_rgb: GLenum,
    pub src_alpha: GLenum,
    pub dst_alpha: GLenum,
}

impl BlendState {
    /// Regular alpha blending, `SRC_ALPHA` over `ONE_MINUS_SRC_ALPHA`.
    pub fn alpha() -> Self {
        BlendState {
            enabled: true,
            src_rgb: ::gl::SRC_ALPHA,
            dst_rgb: ::gl::ONE_MINUS_SRC_ALPHA,
            src_alpha: ::gl::SRC_ALPHA,
            dst_alpha: ::gl::ONE_MINUS_SRC_ALPHA,
        }
    }
}

impl Default for BlendState {
    fn default() -> Self {
        BlendState {
            enabled: false,
            src_rgb: ::gl::ONE,
            dst_rgb: ::gl::ZERO,
            src_alpha: ::gl::ONE,
            dst_alpha: ::gl::ZERO,
        }
    }
}

pub trait Visitor {
    /// Compiles a single stage. On failure the stage object is already released and
    /// the error carries the driver diagnostic.
    unsafe fn create_stage(&mut self, stage: ShaderStage, src: &str) -> Result<GLuint>;

    unsafe fn delete_stage(&mut self, id: GLuint);

    /// Creates a program from compiled stages, binds the attribute locations, then
    /// links and validates it. The stages are detached before returning, whatever
    /// the outcome.
    unsafe fn create_program(
        &mut self,
        stages: &[GLuint],
        attributes: &[(GLuint, &str)],
    ) -> Result<GLuint>;

    unsafe fn delete_program(&mut self, id: GLuint);

    /// Returns the location of a uniform, or `-1` if it is not active.
    unsafe fn uniform_location(&mut self, program: GLuint, name: &str) -> Result<GLint>;

    /// The program currently in use, `0` if none.
    unsafe fn current_program(&mut self) -> GLuint;

    unsafe fn use_program(&mut self, id: GLuint) -> Result<()>;

    /// The current viewport as `[x, y, width, height]`.
    unsafe fn viewport(&mut self) -> [i32; 4];

    /// The framebuffer currently bound for drawing, `0` for the window.
    unsafe fn framebuffer(&mut self) -> GLuint;

    /// The active texture unit, e.g. `GL_TEXTURE0`.
    unsafe fn active_texture(&mut self) -> GLenum;

    unsafe fn set_active_texture(&mut self, unit: GLenum);

    /// The 2D texture bound to the active texture unit.
    unsafe fn texture_binding(&mut self) -> GLuint;

    unsafe fn bind_texture(&mut self, id: GLuint);

    unsafe fn blend(&mut self) -> BlendState;

    unsafe fn set_blend(&mut self, state: &BlendState);

    unsafe fn set_uniform_i32(&mut self, location: GLint, value: i32) -> Result<()>;

    unsafe fn set_uniform_matrix4(&mut self, location: GLint, value: &[f32; 16]) -> Result<()>;

    unsafe fn create_buffers(&mut self, num: usize) -> Result<Vec<GLuint>>;

    unsafe fn delete_buffers(&mut self, ids: &[GLuint]);

    /// The buffer bound to `GL_ARRAY_BUFFER`.
    unsafe fn array_buffer(&mut self) -> GLuint;

    unsafe fn bind_array_buffer(&mut self, id: GLuint);

    /// Binds the vertex buffer and writes `bytes` at its beginning.
    unsafe fn write_buffer(&mut self, id: GLuint, write: BufferWrite, bytes: &[u8])
        -> Result<()>;

    unsafe fn is_attribute_enabled(&mut self, location: GLuint) -> bool;

    unsafe fn set_attribute_enabled(&mut self, location: GLuint, enabled: bool);

    unsafe fn attribute(&mut self, location: GLuint) -> VertexAttribute;

    /// Binds `attribute.buffer` to `GL_ARRAY_BUFFER` and points the attribute array
    /// at it.
    unsafe fn attribute_pointer(&mut self, location: GLuint, attribute: &VertexAttribute)
        -> Result<()>;

    unsafe fn draw_triangle_strip(&mut self, count: usize) -> Result<()>;
}
