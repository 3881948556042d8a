//! A visitor without any driver underneath. It keeps track of the objects and of the
//! small part of the GL state the shader context reads and writes, and records the
//! state-changing calls, so the context can run (and be inspected) without a window.

use std::collections::{HashMap, HashSet};

use gl::types::*;

use super::super::buffers::BufferWrite;
use super::super::shader::ShaderStage;
use super::{BlendState, VertexAttribute, Visitor};
use crate::errors::*;

/// A state-changing call received by the `HeadlessVisitor`.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    UseProgram(GLuint),
    ActiveTexture(GLenum),
    BindTexture(GLuint),
    Blend(BlendState),
    BindBuffer(GLuint),
    Uniform1i(GLint, i32),
    UniformMatrix4fv(GLint, [f32; 16]),
    BufferData(GLuint, usize),
    BufferSubData(GLuint, usize),
    EnableVertexAttribArray(GLuint),
    DisableVertexAttribArray(GLuint),
    VertexAttribPointer(GLuint, VertexAttribute),
    DrawArrays(usize),
}

#[derive(Debug, Clone)]
struct HeadlessProgram {
    source: String,
    attributes: Vec<(GLuint, String)>,
    uniforms: Vec<String>,
}

pub struct HeadlessVisitor {
    names: GLuint,
    stages: HashMap<GLuint, (ShaderStage, String)>,
    programs: HashMap<GLuint, HeadlessProgram>,
    buffers: HashMap<GLuint, Vec<u8>>,
    host_programs: HashSet<GLuint>,
    current_program: GLuint,
    viewport: [i32; 4],
    framebuffer: GLuint,
    texture_unit: GLenum,
    textures: HashMap<GLenum, GLuint>,
    blend: BlendState,
    array_buffer: GLuint,
    attributes: HashSet<GLuint>,
    pointers: HashMap<GLuint, VertexAttribute>,
    commands: Vec<Command>,
}

impl HeadlessVisitor {
    pub fn new() -> Self {
        HeadlessVisitor {
            names: 0,
            stages: HashMap::new(),
            programs: HashMap::new(),
            buffers: HashMap::new(),
            host_programs: HashSet::new(),
            current_program: 0,
            viewport: [0, 0, 640, 480],
            framebuffer: 0,
            texture_unit: gl::TEXTURE0,
            textures: HashMap::new(),
            blend: BlendState::default(),
            array_buffer: 0,
            attributes: HashSet::new(),
            pointers: HashMap::new(),
            commands: Vec::new(),
        }
    }

    /// Pretends the host renderer made `id` the current program.
    pub fn set_current_program(&mut self, id: GLuint) {
        self.host_programs.insert(id);
        self.current_program = id;
    }

    pub fn set_viewport(&mut self, viewport: [i32; 4]) {
        self.viewport = viewport;
    }

    /// Pretends the host renderer bound a render target, `0` for the window.
    pub fn set_framebuffer(&mut self, id: GLuint) {
        self.framebuffer = id;
    }

    /// Pretends the host renderer enabled a vertex attribute array.
    pub fn enable_attribute(&mut self, location: GLuint) {
        self.attributes.insert(location);
    }

    /// Pretends the host renderer pointed a vertex attribute array somewhere.
    pub fn set_attribute(&mut self, location: GLuint, attribute: VertexAttribute) {
        self.pointers.insert(location, attribute);
    }

    /// Pretends the host renderer activated `unit` and bound `texture` to it.
    pub fn set_texture_unit(&mut self, unit: GLenum, texture: GLuint) {
        self.texture_unit = unit;
        self.textures.insert(unit, texture);
    }

    pub fn set_blend_state(&mut self, state: BlendState) {
        self.blend = state;
    }

    /// Pretends the host renderer bound `id` to `GL_ARRAY_BUFFER`.
    pub fn set_array_buffer(&mut self, id: GLuint) {
        self.array_buffer = id;
    }

    #[inline]
    pub fn texture_unit(&self) -> GLenum {
        self.texture_unit
    }

    /// The 2D texture bound to `unit`.
    pub fn texture(&self, unit: GLenum) -> GLuint {
        self.textures.get(&unit).cloned().unwrap_or(0)
    }

    #[inline]
    pub fn blend_state(&self) -> BlendState {
        self.blend
    }

    #[inline]
    pub fn bound_array_buffer(&self) -> GLuint {
        self.array_buffer
    }

    pub fn attribute_state(&self, location: GLuint) -> VertexAttribute {
        self.pointers.get(&location).cloned().unwrap_or_default()
    }

    #[inline]
    pub fn program(&self) -> GLuint {
        self.current_program
    }

    #[inline]
    pub fn enabled_attributes(&self) -> &HashSet<GLuint> {
        &self.attributes
    }

    /// Number of stage objects which are still alive.
    #[inline]
    pub fn stages(&self) -> usize {
        self.stages.len()
    }

    /// Number of program objects which are still alive.
    #[inline]
    pub fn programs(&self) -> usize {
        self.programs.len()
    }

    /// Returns the attribute locations bound before linking `program`.
    pub fn program_attributes(&self, program: GLuint) -> Option<&[(GLuint, String)]> {
        self.programs.get(&program).map(|v| v.attributes.as_slice())
    }

    /// Returns the current content of a vertex buffer.
    pub fn buffer(&self, id: GLuint) -> Option<&[u8]> {
        self.buffers.get(&id).map(|v| v.as_slice())
    }

    /// Number of buffer objects which are still alive.
    #[inline]
    pub fn buffers(&self) -> usize {
        self.buffers.len()
    }

    #[inline]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Drains the recorded commands.
    pub fn take_commands(&mut self) -> Vec<Command> {
        ::std::mem::replace(&mut self.commands, Vec::new())
    }

    fn name(&mut self) -> GLuint {
        self.names += 1;
        self.names
    }
}

impl Default for HeadlessVisitor {
    fn default() -> Self {
        HeadlessVisitor::new()
    }
}

impl Visitor for HeadlessVisitor {
    unsafe fn create_stage(&mut self, stage: ShaderStage, src: &str) -> Result<GLuint> {
        // The only syntax we know about is an entry point.
        if !src.contains("void main") {
            bail!("0:1(1): error: {:?} shader has no `void main()` entry point", stage);
        }

        let id = self.name();
        self.stages.insert(id, (stage, src.to_owned()));
        Ok(id)
    }

    unsafe fn delete_stage(&mut self, id: GLuint) {
        self.stages.remove(&id);
    }

    unsafe fn create_program(
        &mut self,
        stages: &[GLuint],
        attributes: &[(GLuint, &str)],
    ) -> Result<GLuint> {
        let mut vs = String::new();
        let mut fs = String::new();
        for id in stages {
            let (stage, src) = self
                .stages
                .get(id)
                .ok_or_else(|| format_err!("error: shader object {} does not exist", id))?;

            match stage {
                ShaderStage::Vertex => vs.push_str(src),
                ShaderStage::Fragment => fs.push_str(src),
            }
        }

        if vs.is_empty() || fs.is_empty() {
            bail!("error: linking requires both a vertex and a fragment shader");
        }

        let outputs = varyings(&vs);
        for name in varyings(&fs) {
            if !outputs.contains(&name) {
                bail!(
                    "error: fragment shader varying {} not written by vertex shader",
                    name
                );
            }
        }

        let mut source = vs;
        source.push_str(&fs);

        let id = self.name();
        let program = HeadlessProgram {
            source,
            attributes: attributes
                .iter()
                .map(|&(location, name)| (location, name.to_owned()))
                .collect(),
            uniforms: Vec::new(),
        };

        self.programs.insert(id, program);
        Ok(id)
    }

    unsafe fn delete_program(&mut self, id: GLuint) {
        self.programs.remove(&id);
        if self.current_program == id {
            self.current_program = 0;
        }
    }

    unsafe fn uniform_location(&mut self, program: GLuint, name: &str) -> Result<GLint> {
        let program = self
            .programs
            .get_mut(&program)
            .ok_or_else(|| Error::GL(format!("program {} does not exist", program)))?;

        if !program.source.contains(name) {
            return Ok(-1);
        }

        if let Some(location) = program.uniforms.iter().position(|v| v == name) {
            return Ok(location as GLint);
        }

        program.uniforms.push(name.to_owned());
        Ok(program.uniforms.len() as GLint - 1)
    }

    unsafe fn current_program(&mut self) -> GLuint {
        self.current_program
    }

    unsafe fn use_program(&mut self, id: GLuint) -> Result<()> {
        if id != 0 && !self.programs.contains_key(&id) && !self.host_programs.contains(&id) {
            return Err(Error::GL(format!("program {} does not exist", id)).into());
        }

        self.current_program = id;
        self.commands.push(Command::UseProgram(id));
        Ok(())
    }

    unsafe fn viewport(&mut self) -> [i32; 4] {
        self.viewport
    }

    unsafe fn framebuffer(&mut self) -> GLuint {
        self.framebuffer
    }

    unsafe fn active_texture(&mut self) -> GLenum {
        self.texture_unit
    }

    unsafe fn set_active_texture(&mut self, unit: GLenum) {
        self.texture_unit = unit;
        self.commands.push(Command::ActiveTexture(unit));
    }

    unsafe fn texture_binding(&mut self) -> GLuint {
        self.texture(self.texture_unit)
    }

    unsafe fn bind_texture(&mut self, id: GLuint) {
        self.textures.insert(self.texture_unit, id);
        self.commands.push(Command::BindTexture(id));
    }

    unsafe fn blend(&mut self) -> BlendState {
        self.blend
    }

    unsafe fn set_blend(&mut self, state: &BlendState) {
        self.blend = *state;
        self.commands.push(Command::Blend(*state));
    }

    unsafe fn set_uniform_i32(&mut self, location: GLint, value: i32) -> Result<()> {
        self.commands.push(Command::Uniform1i(location, value));
        Ok(())
    }

    unsafe fn set_uniform_matrix4(&mut self, location: GLint, value: &[f32; 16]) -> Result<()> {
        self.commands.push(Command::UniformMatrix4fv(location, *value));
        Ok(())
    }

    unsafe fn create_buffers(&mut self, num: usize) -> Result<Vec<GLuint>> {
        let ids: Vec<_> = (0..num).map(|_| self.name()).collect();
        for &id in &ids {
            self.buffers.insert(id, Vec::new());
        }

        Ok(ids)
    }

    unsafe fn delete_buffers(&mut self, ids: &[GLuint]) {
        for id in ids {
            self.buffers.remove(id);
            if self.array_buffer == *id {
                self.array_buffer = 0;
            }
        }
    }

    unsafe fn array_buffer(&mut self) -> GLuint {
        self.array_buffer
    }

    unsafe fn bind_array_buffer(&mut self, id: GLuint) {
        self.array_buffer = id;
        self.commands.push(Command::BindBuffer(id));
    }

    unsafe fn write_buffer(
        &mut self,
        id: GLuint,
        write: BufferWrite,
        bytes: &[u8],
    ) -> Result<()> {
        let buffer = self
            .buffers
            .get_mut(&id)
            .ok_or_else(|| Error::GL(format!("buffer {} does not exist", id)))?;

        self.array_buffer = id;
        match write {
            BufferWrite::Allocate => {
                *buffer = bytes.to_vec();
                self.commands.push(Command::BufferData(id, bytes.len()));
            }
            BufferWrite::Update => {
                if bytes.len() > buffer.len() {
                    return Err(Error::GL(format!(
                        "{} bytes do not fit into buffer {} of {} bytes",
                        bytes.len(),
                        id,
                        buffer.len()
                    ))
                    .into());
                }

                buffer[..bytes.len()].copy_from_slice(bytes);
                self.commands.push(Command::BufferSubData(id, bytes.len()));
            }
        }

        Ok(())
    }

    unsafe fn is_attribute_enabled(&mut self, location: GLuint) -> bool {
        self.attributes.contains(&location)
    }

    unsafe fn set_attribute_enabled(&mut self, location: GLuint, enabled: bool) {
        if enabled {
            self.attributes.insert(location);
            self.commands.push(Command::EnableVertexAttribArray(location));
        } else {
            self.attributes.remove(&location);
            self.commands.push(Command::DisableVertexAttribArray(location));
        }
    }

    unsafe fn attribute(&mut self, location: GLuint) -> VertexAttribute {
        self.attribute_state(location)
    }

    unsafe fn attribute_pointer(
        &mut self,
        location: GLuint,
        attribute: &VertexAttribute,
    ) -> Result<()> {
        if attribute.buffer != 0 && !self.buffers.contains_key(&attribute.buffer) {
            return Err(Error::GL(format!("buffer {} does not exist", attribute.buffer)).into());
        }

        self.array_buffer = attribute.buffer;
        self.pointers.insert(location, *attribute);
        self.commands
            .push(Command::VertexAttribPointer(location, *attribute));
        Ok(())
    }

    unsafe fn draw_triangle_strip(&mut self, count: usize) -> Result<()> {
        if self.current_program == 0 {
            return Err(Error::GL("no program is in use".into()).into());
        }

        self.commands.push(Command::DrawArrays(count));
        Ok(())
    }
}

/// Names of the `varying` declarations of a GLSL source.
fn varyings(src: &str) -> Vec<String> {
    src.lines()
        .map(|line| line.trim())
        .filter(|line| line.starts_with("varying "))
        .filter_map(|line| line.trim_end_matches(';').split_whitespace().last())
        .map(|name| name.to_owned())
        .collect()
}
