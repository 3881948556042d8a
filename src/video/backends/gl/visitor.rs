use std::ffi::CString;
use std::os::raw::c_void;
use std::ptr;

use gl::types::*;

use crate::errors::*;

use super::super::super::buffers::BufferWrite;
use super::super::super::shader::ShaderStage;
use super::super::{BlendState, VertexAttribute, Visitor};
use super::capabilities::{Capabilities, EntryPoints};

pub struct GLVisitor {
    entry_points: EntryPoints,
    capabilities: Capabilities,
}

impl GLVisitor {
    /// Resolves the GL entry points with `loader` and creates a visitor on top of them.
    ///
    /// *Safety*: the OpenGL context must be current in the thread.
    pub unsafe fn load_with<F>(loader: F) -> Result<Self>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        let entry_points = EntryPoints::load_with(loader)?;
        Self::new(entry_points)
    }

    pub unsafe fn new(entry_points: EntryPoints) -> Result<Self> {
        let capabilities = Capabilities::parse(&entry_points)?;
        info!("GLVisitor {:#?}", capabilities);

        Ok(GLVisitor {
            entry_points,
            capabilities,
        })
    }

    #[inline]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    #[inline]
    pub fn entry_points(&self) -> &EntryPoints {
        &self.entry_points
    }
}

impl Visitor for GLVisitor {
    unsafe fn create_stage(&mut self, stage: ShaderStage, src: &str) -> Result<GLuint> {
        let c_str = CString::new(src.as_bytes())
            .map_err(|_| format_err!("{:?} shader source contains a nul byte.", stage))?;

        let shader = gl::CreateShader(stage.into());
        if shader == 0 {
            check()?;
            bail!("Failed to create {:?} shader object.", stage);
        }

        gl::ShaderSource(shader, 1, &c_str.as_ptr(), ptr::null());
        gl::CompileShader(shader);

        // Get the compile status
        let mut status = GLint::from(gl::FALSE);
        gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut status);

        // Fail on error
        if status != GLint::from(gl::TRUE) {
            let mut len = 0;
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
            let mut buf = vec![0u8; len.max(1) as usize];
            gl::GetShaderInfoLog(
                shader,
                buf.len() as GLsizei,
                ptr::null_mut(),
                buf.as_mut_ptr() as *mut GLchar,
            );

            gl::DeleteShader(shader);
            bail!("{}", info_log(buf, "compilation failed without diagnostic"));
        }

        Ok(shader)
    }

    unsafe fn delete_stage(&mut self, id: GLuint) {
        gl::DeleteShader(id);
    }

    unsafe fn create_program(
        &mut self,
        stages: &[GLuint],
        attributes: &[(GLuint, &str)],
    ) -> Result<GLuint> {
        let attributes = attributes
            .iter()
            .map(|&(location, name)| {
                CString::new(name.as_bytes())
                    .map(|c_name| (location, c_name))
                    .map_err(|_| format_err!("Attribute name {:?} contains a nul byte.", name))
            })
            .collect::<Result<Vec<_>>>()?;

        let program = gl::CreateProgram();
        if program == 0 {
            check()?;
            bail!("Failed to create program object.");
        }

        for &stage in stages {
            gl::AttachShader(program, stage);
        }

        for (location, c_name) in &attributes {
            gl::BindAttribLocation(program, *location, c_name.as_ptr());
        }

        gl::LinkProgram(program);
        for &stage in stages {
            gl::DetachShader(program, stage);
        }

        // Get the link status
        let mut status = GLint::from(gl::FALSE);
        gl::GetProgramiv(program, gl::LINK_STATUS, &mut status);

        // Fail on error
        if status != GLint::from(gl::TRUE) {
            let log = program_info_log(program, "link failed without diagnostic");
            gl::DeleteProgram(program);
            bail!("{}", log);
        }

        gl::ValidateProgram(program);
        gl::GetProgramiv(program, gl::VALIDATE_STATUS, &mut status);
        if status != GLint::from(gl::TRUE) {
            // Validation reflects the GL state at call time, not fatal.
            warn!(
                "Program {} did not validate: {}",
                program,
                program_info_log(program, "no diagnostic")
            );
        }

        if let Err(err) = check() {
            gl::DeleteProgram(program);
            return Err(err);
        }

        Ok(program)
    }

    unsafe fn delete_program(&mut self, id: GLuint) {
        gl::DeleteProgram(id);
    }

    unsafe fn uniform_location(&mut self, program: GLuint, name: &str) -> Result<GLint> {
        let c_name = CString::new(name.as_bytes())
            .map_err(|_| format_err!("Uniform name {:?} contains a nul byte.", name))?;
        let location = gl::GetUniformLocation(program, c_name.as_ptr());
        check()?;
        Ok(location)
    }

    unsafe fn current_program(&mut self) -> GLuint {
        let mut id = 0;
        gl::GetIntegerv(gl::CURRENT_PROGRAM, &mut id);
        id as GLuint
    }

    unsafe fn use_program(&mut self, id: GLuint) -> Result<()> {
        gl::UseProgram(id);
        check()
    }

    unsafe fn viewport(&mut self) -> [i32; 4] {
        let mut viewport = [0; 4];
        gl::GetIntegerv(gl::VIEWPORT, viewport.as_mut_ptr());
        viewport
    }

    unsafe fn framebuffer(&mut self) -> GLuint {
        let mut id = 0;
        gl::GetIntegerv(gl::FRAMEBUFFER_BINDING, &mut id);
        id as GLuint
    }

    unsafe fn active_texture(&mut self) -> GLenum {
        let mut unit = 0;
        gl::GetIntegerv(gl::ACTIVE_TEXTURE, &mut unit);
        unit as GLenum
    }

    unsafe fn set_active_texture(&mut self, unit: GLenum) {
        gl::ActiveTexture(unit);
    }

    unsafe fn texture_binding(&mut self) -> GLuint {
        let mut id = 0;
        gl::GetIntegerv(gl::TEXTURE_BINDING_2D, &mut id);
        id as GLuint
    }

    unsafe fn bind_texture(&mut self, id: GLuint) {
        gl::BindTexture(gl::TEXTURE_2D, id);
    }

    unsafe fn blend(&mut self) -> BlendState {
        let factor = |name| {
            let mut v = 0;
            gl::GetIntegerv(name, &mut v);
            v as GLenum
        };

        BlendState {
            enabled: gl::IsEnabled(gl::BLEND) == gl::TRUE,
            src_rgb: factor(gl::BLEND_SRC_RGB),
            dst_rgb: factor(gl::BLEND_DST_RGB),
            src_alpha: factor(gl::BLEND_SRC_ALPHA),
            dst_alpha: factor(gl::BLEND_DST_ALPHA),
        }
    }

    unsafe fn set_blend(&mut self, state: &BlendState) {
        if state.enabled {
            gl::Enable(gl::BLEND);
        } else {
            gl::Disable(gl::BLEND);
        }

        gl::BlendFuncSeparate(
            state.src_rgb,
            state.dst_rgb,
            state.src_alpha,
            state.dst_alpha,
        );
    }

    unsafe fn set_uniform_i32(&mut self, location: GLint, value: i32) -> Result<()> {
        gl::Uniform1i(location, value);
        check()
    }

    unsafe fn set_uniform_matrix4(&mut self, location: GLint, value: &[f32; 16]) -> Result<()> {
        gl::UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr());
        check()
    }

    unsafe fn create_buffers(&mut self, num: usize) -> Result<Vec<GLuint>> {
        let mut ids = vec![0; num];
        gl::GenBuffers(num as GLsizei, ids.as_mut_ptr());
        check()?;

        if ids.iter().any(|&id| id == 0) {
            gl::DeleteBuffers(num as GLsizei, ids.as_ptr());
            bail!("Failed to create {} vertex buffers.", num);
        }

        Ok(ids)
    }

    unsafe fn delete_buffers(&mut self, ids: &[GLuint]) {
        gl::DeleteBuffers(ids.len() as GLsizei, ids.as_ptr());
    }

    unsafe fn array_buffer(&mut self) -> GLuint {
        let mut id = 0;
        gl::GetIntegerv(gl::ARRAY_BUFFER_BINDING, &mut id);
        id as GLuint
    }

    unsafe fn bind_array_buffer(&mut self, id: GLuint) {
        gl::BindBuffer(gl::ARRAY_BUFFER, id);
    }

    unsafe fn write_buffer(
        &mut self,
        id: GLuint,
        write: BufferWrite,
        bytes: &[u8],
    ) -> Result<()> {
        gl::BindBuffer(gl::ARRAY_BUFFER, id);

        let data = bytes.as_ptr() as *const c_void;
        match write {
            BufferWrite::Allocate => {
                gl::BufferData(
                    gl::ARRAY_BUFFER,
                    bytes.len() as GLsizeiptr,
                    data,
                    gl::STREAM_DRAW,
                );
            }
            BufferWrite::Update => {
                gl::BufferSubData(gl::ARRAY_BUFFER, 0, bytes.len() as GLsizeiptr, data);
            }
        }

        check()
    }

    unsafe fn is_attribute_enabled(&mut self, location: GLuint) -> bool {
        let mut enabled = 0;
        gl::GetVertexAttribiv(location, gl::VERTEX_ATTRIB_ARRAY_ENABLED, &mut enabled);
        enabled != 0
    }

    unsafe fn set_attribute_enabled(&mut self, location: GLuint, enabled: bool) {
        if enabled {
            gl::EnableVertexAttribArray(location);
        } else {
            gl::DisableVertexAttribArray(location);
        }
    }

    unsafe fn attribute(&mut self, location: GLuint) -> VertexAttribute {
        let param = |name| {
            let mut v = 0;
            gl::GetVertexAttribiv(location, name, &mut v);
            v
        };

        let mut pointer: *mut c_void = ptr::null_mut();
        gl::GetVertexAttribPointerv(location, gl::VERTEX_ATTRIB_ARRAY_POINTER, &mut pointer);

        VertexAttribute {
            buffer: param(gl::VERTEX_ATTRIB_ARRAY_BUFFER_BINDING) as GLuint,
            size: param(gl::VERTEX_ATTRIB_ARRAY_SIZE),
            kind: param(gl::VERTEX_ATTRIB_ARRAY_TYPE) as GLenum,
            normalized: param(gl::VERTEX_ATTRIB_ARRAY_NORMALIZED) != 0,
            stride: param(gl::VERTEX_ATTRIB_ARRAY_STRIDE),
            offset: pointer as usize,
        }
    }

    unsafe fn attribute_pointer(
        &mut self,
        location: GLuint,
        attribute: &VertexAttribute,
    ) -> Result<()> {
        gl::BindBuffer(gl::ARRAY_BUFFER, attribute.buffer);
        gl::VertexAttribPointer(
            location,
            attribute.size,
            attribute.kind,
            if attribute.normalized {
                gl::TRUE
            } else {
                gl::FALSE
            },
            attribute.stride,
            attribute.offset as *const c_void,
        );
        check()
    }

    unsafe fn draw_triangle_strip(&mut self, count: usize) -> Result<()> {
        gl::DrawArrays(gl::TRIANGLE_STRIP, 0, count as GLsizei);
        check()
    }
}

unsafe fn program_info_log(program: GLuint, fallback: &str) -> String {
    let mut len = 0;
    gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
    let mut buf = vec![0u8; len.max(1) as usize];
    gl::GetProgramInfoLog(
        program,
        buf.len() as GLsizei,
        ptr::null_mut(),
        buf.as_mut_ptr() as *mut GLchar,
    );

    info_log(buf, fallback)
}

fn info_log(mut buf: Vec<u8>, fallback: &str) -> String {
    // Skips the trailing null character and everything after it.
    if let Some(end) = buf.iter().position(|&v| v == 0) {
        buf.truncate(end);
    }

    let log = String::from_utf8_lossy(&buf);
    let log = log.trim();
    if log.is_empty() {
        fallback.to_owned()
    } else {
        log.to_owned()
    }
}

unsafe fn check() -> Result<()> {
    let err = match gl::GetError() {
        gl::NO_ERROR => return Ok(()),
        gl::INVALID_ENUM => "An unacceptable value is specified for an enumerated argument.",
        gl::INVALID_VALUE => "A numeric argument is out of range.",
        gl::INVALID_OPERATION => "The specified operation is not allowed in the current state.",
        gl::INVALID_FRAMEBUFFER_OPERATION => {
            "The command is trying to render to or read from the framebuffer while the \
             currently bound framebuffer is not framebuffer complete."
        }
        gl::OUT_OF_MEMORY => "There is not enough memory left to execute the command.",
        _ => "Oops, Unknown OpenGL error.",
    };

    Err(Error::GL(err.to_owned()).into())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn logs() {
        assert_eq!(info_log(b"0:1: error\n\0\0".to_vec(), "none"), "0:1: error");
        assert_eq!(info_log(vec![0], "none"), "none");
        assert_eq!(info_log(Vec::new(), "none"), "none");
    }
}
