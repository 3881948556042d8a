use gl::types::*;

use crate::errors::*;
use crate::math::Vector2;

/// A texture owned by the host renderer that can be sampled by a shaded quad.
///
/// SDL hosts usually implement this on top of `SDL_GL_BindTexture` and
/// `SDL_GL_UnbindTexture`.
pub trait Texture {
    /// Dimensions in pixels, used to normalize source rectangles.
    fn dimensions(&self) -> Vector2<u32>;

    /// Binds the texture to the active texture unit, which is `GL_TEXTURE0` during a
    /// draw. The binding the host had before is restored after `unbind`.
    ///
    /// *Safety*: the GL context the texture belongs to must be current in the thread.
    unsafe fn bind(&mut self) -> Result<()>;

    /// Reverts the binding made by `bind`.
    unsafe fn unbind(&mut self);
}

/// A plain 2D texture object created by the host.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GLTexture {
    pub id: GLuint,
    pub dimensions: Vector2<u32>,
}

impl GLTexture {
    pub fn new(id: GLuint, dimensions: Vector2<u32>) -> Self {
        GLTexture { id, dimensions }
    }
}

impl Texture for GLTexture {
    fn dimensions(&self) -> Vector2<u32> {
        self.dimensions
    }

    unsafe fn bind(&mut self) -> Result<()> {
        if self.id == 0 {
            return Err(Error::TextureBind("texture name 0 is reserved".into()).into());
        }

        gl::BindTexture(gl::TEXTURE_2D, self.id);
        match gl::GetError() {
            gl::NO_ERROR => Ok(()),
            code => Err(Error::TextureBind(format!("GL error 0x{:X}", code)).into()),
        }
    }

    unsafe fn unbind(&mut self) {
        gl::BindTexture(gl::TEXTURE_2D, 0);
    }
}
