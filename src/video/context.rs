use std::fs;
use std::path::Path;

use gl::types::*;

use crate::errors::*;
use crate::math::{Matrix4, Vector2};
use crate::utils::{HandleObjectPool, Rect};

use super::backends::{BlendState, VertexAttribute, Visitor};
use super::buffers::{BufferRing, BufferWrite};
use super::params::ShaderContextParams;
use super::quad;
use super::shader::{GLShaderData, ShaderHandle, ShaderStage};
use super::texture::Texture;

/// Facility to compile GLSL programs and to draw textured quads with them, on top of
/// a GL context owned by the host renderer.
///
/// Programs and vertex buffers live as long as the context, and are released all at
/// once when it is dropped.
pub struct ShaderContext<V: Visitor> {
    visitor: V,
    params: ShaderContextParams,
    shaders: HandleObjectPool<GLShaderData>,
    buffers: BufferRing,
    projection: Matrix4<f32>,
    previous_program: Option<GLuint>,
}

impl<V: Visitor> ShaderContext<V> {
    /// Creates a shader context and allocates its vertex buffers up front.
    ///
    /// With a `GLVisitor`, the entry points have already been resolved when the visitor
    /// was created, so any missing one is reported before reaching this point.
    pub fn initialize(mut visitor: V, params: ShaderContextParams) -> Result<Self> {
        params.validate()?;

        let ids = unsafe { visitor.create_buffers(params.buffers)? };
        info!(
            "ShaderContext initialized with {} vertex buffers.",
            ids.len()
        );

        Ok(ShaderContext {
            visitor,
            params,
            shaders: HandleObjectPool::new(),
            buffers: BufferRing::new(ids),
            projection: Matrix4::from_scale(1.0),
            previous_program: None,
        })
    }

    /// Compiles a new shader program from vertex and fragment sources.
    ///
    /// A stage failing to compile fails the whole program. The error carries the
    /// diagnostics of the driver.
    pub fn compile(&mut self, vs: &str, fs: &str) -> Result<ShaderHandle> {
        let stages = [(ShaderStage::Vertex, vs), (ShaderStage::Fragment, fs)];

        let mut ids = Vec::with_capacity(stages.len());
        let mut errors = Vec::new();
        for &(stage, src) in &stages {
            match unsafe { self.visitor.create_stage(stage, src) } {
                Ok(id) => ids.push(id),
                Err(err) => {
                    error!("{:?} shader failed to compile. Log: {}", stage, err);
                    errors.push(format!("{:?}: {}", stage, err));
                }
            }
        }

        if !errors.is_empty() {
            for id in ids {
                unsafe { self.visitor.delete_stage(id) };
            }

            return Err(Error::ShaderCreationFailure(errors.join("\n")).into());
        }

        let attributes = [
            (self.params.position.location, self.params.position.name.as_str()),
            (self.params.texcoord.location, self.params.texcoord.name.as_str()),
        ];

        let program = unsafe { self.visitor.create_program(&ids, &attributes) };
        for id in ids {
            unsafe { self.visitor.delete_stage(id) };
        }

        let id = program.map_err(|err| {
            error!("Shader program failed to link. Log: {}", err);
            Error::ShaderCreationFailure(format!("{}", err))
        })?;

        let shader = match unsafe { self.uniform_locations(id) } {
            Ok(shader) => shader,
            Err(err) => {
                unsafe { self.visitor.delete_program(id) };
                return Err(err);
            }
        };

        let handle: ShaderHandle = self.shaders.create(shader).into();
        info!("Created {} (program {}).", handle, id);
        Ok(handle)
    }

    /// Compiles a new shader program from the content of two files.
    ///
    /// A file which could not be read is compiled as empty source.
    pub fn compile_from_files<P1, P2>(&mut self, vs: P1, fs: P2) -> Result<ShaderHandle>
    where
        P1: AsRef<Path>,
        P2: AsRef<Path>,
    {
        let vs = read_source(vs.as_ref());
        let fs = read_source(fs.as_ref());
        self.compile(&vs, &fs)
    }

    /// Starts using a shader. The program in use before is restored by `unbind`.
    ///
    /// Binds do not nest: binding again before `unbind` switches to the new shader,
    /// and `unbind` still restores the program the host had before the first bind.
    pub fn bind(&mut self, handle: ShaderHandle) -> Result<()> {
        let shader = match self.shaders.get(handle) {
            Some(shader) => *shader,
            None => {
                warn!("Failed to bind {}.", handle);
                return Err(Error::ShaderHandleInvalid(handle).into());
            }
        };

        unsafe {
            let previous = self.visitor.current_program();
            let viewport = self.visitor.viewport();
            let flip_y = self.visitor.framebuffer() == 0;

            self.visitor.use_program(shader.id)?;
            if self.previous_program.is_none() {
                self.previous_program = Some(previous);
            }
            self.projection = quad::projection(viewport, flip_y);

            if let Err(err) = self.bind_uniforms(shader) {
                self.unbind();
                return Err(err);
            }
        }

        Ok(())
    }

    /// Restores the program that was in use before the last `bind`. Does nothing if
    /// there is nothing left to restore.
    pub fn unbind(&mut self) {
        if let Some(previous) = self.previous_program.take() {
            if let Err(err) = unsafe { self.visitor.use_program(previous) } {
                warn!("Failed to restore program {}. {}", previous, err);
            }
        }
    }

    /// Draws `texture` with a shader, the same way `SDL_RenderCopy` would draw it
    /// without one. `src` defaults to the whole texture and `dst` to the whole viewport.
    pub fn draw_textured_quad<T>(
        &mut self,
        texture: &mut T,
        handle: ShaderHandle,
        src: Option<Rect>,
        dst: Option<Rect>,
    ) -> Result<()>
    where
        T: Texture + ?Sized,
    {
        unsafe {
            let unit = self.visitor.active_texture();
            self.visitor.set_active_texture(gl::TEXTURE0);
            let binding = self.visitor.texture_binding();

            if let Err(err) = texture.bind() {
                self.restore_texture(unit, binding);
                return Err(err);
            }

            if let Err(err) = self.bind(handle) {
                texture.unbind();
                self.restore_texture(unit, binding);
                return Err(err);
            }

            let result = self.submit(texture.dimensions(), src, dst);

            self.unbind();
            texture.unbind();
            self.restore_texture(unit, binding);
            result
        }
    }

    /// The projection computed by the last successful `bind`.
    #[inline]
    pub fn projection(&self) -> Matrix4<f32> {
        self.projection
    }

    #[inline]
    pub fn params(&self) -> &ShaderContextParams {
        &self.params
    }

    #[inline]
    pub fn buffers(&self) -> &BufferRing {
        &self.buffers
    }

    /// Returns true if `handle` names a program compiled by this context.
    #[inline]
    pub fn contains(&self, handle: ShaderHandle) -> bool {
        self.shaders.is_alive(handle)
    }

    /// Returns the GL name of a program compiled by this context.
    #[inline]
    pub fn program(&self, handle: ShaderHandle) -> Option<GLuint> {
        self.shaders.get(handle).map(|v| v.id)
    }

    #[inline]
    pub fn visitor(&self) -> &V {
        &self.visitor
    }

    #[inline]
    pub fn visitor_mut(&mut self) -> &mut V {
        &mut self.visitor
    }

    /// Releases every program and vertex buffer. Handles compiled before are invalid
    /// afterwards. Called on drop.
    pub fn release(&mut self) {
        self.unbind();

        for shader in self.shaders.drain() {
            unsafe { self.visitor.delete_program(shader.id) };
        }

        let ids = self.buffers.take();
        if !ids.is_empty() {
            unsafe { self.visitor.delete_buffers(&ids) };
        }
    }

    unsafe fn uniform_locations(&mut self, id: GLuint) -> Result<GLShaderData> {
        let u_projection = self
            .visitor
            .uniform_location(id, &self.params.projection_uniform)?;
        let u_texture = self
            .visitor
            .uniform_location(id, &self.params.texture_uniform)?;

        if u_projection == -1 {
            warn!(
                "Uniform {:?} is not active in program {}.",
                self.params.projection_uniform, id
            );
        }

        Ok(GLShaderData {
            id,
            u_projection,
            u_texture,
        })
    }

    unsafe fn bind_uniforms(&mut self, shader: GLShaderData) -> Result<()> {
        self.visitor.set_uniform_i32(shader.u_texture, 0)?;

        let projection: &[f32; 16] = self.projection.as_ref();
        self.visitor.set_uniform_matrix4(shader.u_projection, projection)
    }

    unsafe fn submit(
        &mut self,
        dimensions: Vector2<u32>,
        src: Option<Rect>,
        dst: Option<Rect>,
    ) -> Result<()> {
        let dst = match dst {
            Some(dst) => dst,
            None => {
                let viewport = self.visitor.viewport();
                Rect::from_xywh(0, 0, viewport[2], viewport[3])
            }
        };

        let xy = quad::vertex_coords(dst);
        let uv = quad::uv_coords(src, dimensions);
        let vertices = quad::interleave(xy, uv);
        let bytes = quad::as_bytes(&vertices);

        let (id, write) = self
            .buffers
            .next(bytes.len())
            .ok_or_else(|| format_err!("ShaderContext has no vertex buffer left."))?;

        // Everything below is global to the GL context, and belongs to the host
        // renderer once the quad is drawn.
        let host_buffer = self.visitor.array_buffer();
        let host_blend = self.visitor.blend();

        let locations = [self.params.position.location, self.params.texcoord.location];
        let mut enabled = [false; 2];
        let mut pointers = [VertexAttribute::default(); 2];
        for (i, &location) in locations.iter().enumerate() {
            enabled[i] = self.visitor.is_attribute_enabled(location);
            pointers[i] = self.visitor.attribute(location);
            if !enabled[i] {
                self.visitor.set_attribute_enabled(location, true);
            }
        }

        self.visitor.set_blend(&BlendState::alpha());
        let result = self.draw_arrays(id, write, bytes);

        for (i, &location) in locations.iter().enumerate() {
            if let Err(err) = self.visitor.attribute_pointer(location, &pointers[i]) {
                warn!("Failed to restore vertex attribute {}. {}", location, err);
            }

            if !enabled[i] {
                self.visitor.set_attribute_enabled(location, false);
            }
        }

        self.visitor.bind_array_buffer(host_buffer);
        self.visitor.set_blend(&host_blend);
        result
    }

    unsafe fn draw_arrays(&mut self, id: GLuint, write: BufferWrite, bytes: &[u8]) -> Result<()> {
        self.visitor.write_buffer(id, write, bytes)?;

        let position = VertexAttribute::floats(id, 2, quad::STRIDE, 0);
        let texcoord = VertexAttribute::floats(id, 2, quad::STRIDE, quad::TEXCOORD_OFFSET);
        self.visitor
            .attribute_pointer(self.params.position.location, &position)?;
        self.visitor
            .attribute_pointer(self.params.texcoord.location, &texcoord)?;

        self.visitor.draw_triangle_strip(quad::VERTICES)
    }

    unsafe fn restore_texture(&mut self, unit: GLenum, binding: GLuint) {
        self.visitor.set_active_texture(gl::TEXTURE0);
        self.visitor.bind_texture(binding);
        self.visitor.set_active_texture(unit);
    }
}

impl<V: Visitor> Drop for ShaderContext<V> {
    fn drop(&mut self) {
        self.release();
    }
}

fn read_source(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            warn!(
                "Failed to read shader source {:?}, compiling empty source. {}",
                path, err
            );
            String::new()
        }
    }
}
