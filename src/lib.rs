//! # shader-context
//!
//! A small facility to load, compile and bind GLSL shader programs, and to draw a single
//! textured quad through a bound program. It is meant to sit next to a 2D renderer (usually
//! SDL2's OpenGL renderer) that owns the window, the GL context and the textures.
//!
//! ```rust,ignore
//! use shader_context::prelude::*;
//!
//! let visitor = unsafe { GLVisitor::load_with(|s| video.gl_get_proc_address(s) as *const _)? };
//! let mut ctx = ShaderContext::initialize(visitor, ShaderContextParams::default())?;
//!
//! let shader = ctx.compile_from_files("shaders/crt.vs", "shaders/crt.fs")?;
//! ctx.draw_textured_quad(&mut texture, shader, None, Some(Rect::from_xywh(0, 0, 640, 480)))?;
//! ```

#[macro_use]
extern crate log;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate serde;

pub extern crate gl;

#[cfg(test)]
#[macro_use]
extern crate approx;

pub mod errors;
#[macro_use]
pub mod utils;
pub mod math;
pub mod video;

pub mod prelude {
    pub use crate::errors::{Error, Result};
    pub use crate::utils::Rect;
    pub use crate::video::backends::gl::GLVisitor;
    pub use crate::video::backends::headless::HeadlessVisitor;
    pub use crate::video::backends::Visitor;
    pub use crate::video::context::ShaderContext;
    pub use crate::video::params::ShaderContextParams;
    pub use crate::video::shader::{ShaderHandle, ShaderStage};
    pub use crate::video::texture::{GLTexture, Texture};
}
