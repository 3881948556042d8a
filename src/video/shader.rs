use gl::types::*;

impl_handle!(ShaderHandle);

/// The programmable stages a program is linked from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl Into<GLenum> for ShaderStage {
    fn into(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

/// A linked program with the uniform locations we set on every bind. A location of
/// `-1` means the uniform is not active in the program, which GL silently ignores.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct GLShaderData {
    pub id: GLuint,
    pub u_projection: GLint,
    pub u_texture: GLint,
}
