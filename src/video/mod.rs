//! Shader programs and shaded quad drawing on top of a host-owned OpenGL context.
//!
//! The `ShaderContext` never owns the GL context itself. Everything it touches that
//! is global to the context (the current program, the viewport, the bound framebuffer
//! and the vertex attribute arrays) is queried before use and restored afterwards, so
//! the host renderer keeps working with its own state.
//!
//! All the GL calls are issued through a `Visitor`. `GLVisitor` talks to the driver
//! with entry points resolved at runtime, while `HeadlessVisitor` simulates the small
//! part of the GL state machine we depend on.

pub mod backends;
pub mod buffers;
pub mod context;
pub mod params;
pub mod quad;
pub mod shader;
pub mod texture;

pub mod prelude {
    pub use super::backends::{BlendState, VertexAttribute, Visitor};
    pub use super::buffers::{BufferRing, BufferWrite};
    pub use super::context::ShaderContext;
    pub use super::params::ShaderContextParams;
    pub use super::shader::{ShaderHandle, ShaderStage};
    pub use super::texture::{GLTexture, Texture};
}
