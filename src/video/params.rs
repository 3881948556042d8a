//! Configuration of a `ShaderContext`.

use gl::types::GLuint;
use serde::{Deserialize, Serialize};

use crate::errors::*;

/// A structure containing configuration data for the shader context. The attribute
/// and uniform names must match the ones declared in the GLSL sources that are
/// compiled with this context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderContextParams {
    /// Number of vertex buffers allocated up front and cycled across draws.
    pub buffers: usize,
    /// The vertex attribute receiving the quad positions in window coordinates.
    pub position: AttributeParams,
    /// The vertex attribute receiving the texture coordinates.
    pub texcoord: AttributeParams,
    /// Name of the `mat4` uniform receiving the orthographic projection.
    pub projection_uniform: String,
    /// Name of the `sampler2D` uniform, always set to texture unit 0.
    pub texture_uniform: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeParams {
    pub name: String,
    pub location: GLuint,
}

impl Default for ShaderContextParams {
    fn default() -> Self {
        ShaderContextParams {
            buffers: 8,
            position: AttributeParams {
                name: "a_position".to_owned(),
                location: 0,
            },
            texcoord: AttributeParams {
                name: "a_texcoord".to_owned(),
                location: 1,
            },
            projection_uniform: "u_projection".to_owned(),
            texture_uniform: "u_texture".to_owned(),
        }
    }
}

impl ShaderContextParams {
    /// Parses params from a JSON document. Missing fields keep their default values.
    pub fn from_json(json: &str) -> Result<Self> {
        let params: ShaderContextParams = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.buffers == 0 {
            bail!("At least one vertex buffer is required.");
        }

        let names = [
            &self.position.name,
            &self.texcoord.name,
            &self.projection_uniform,
            &self.texture_uniform,
        ];

        for name in &names {
            if name.is_empty() || name.contains('\0') {
                bail!("{:?} is not a valid GLSL identifier.", name);
            }
        }

        if self.position.location == self.texcoord.location {
            bail!(
                "Attributes {} and {} share the location {}.",
                self.position.name,
                self.texcoord.name,
                self.position.location
            );
        }

        Ok(())
    }
}
