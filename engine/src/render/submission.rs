//! Mesh Submission
//!
//! The seam between scene evaluation and whatever draws it. A submission is
//! a borrowed set of vertex attribute arrays, a triangle index list, typed
//! uniforms for one shader family and an ordered list of texture bindings.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SceneError};
use crate::mesh::validate_triangles;

/// Named vertex attribute arrays. Every present array must have one entry
/// per position.
#[derive(Clone, Copy, Debug, Default)]
pub struct VertexAttributes<'a> {
    pub positions: &'a [Vec3],
    pub normals: Option<&'a [Vec3]>,
    pub tex_coords: Option<&'a [Vec2]>,
    pub bone_ids: Option<&'a [[u32; 4]]>,
    pub bone_weights: Option<&'a [[f32; 4]]>,
}

impl<'a> VertexAttributes<'a> {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_skinned(&self) -> bool {
        self.bone_ids.is_some() && self.bone_weights.is_some()
    }

    /// Check attribute lengths and that `indices` forms valid triangles.
    pub fn validate(&self, indices: &[u32]) -> Result<()> {
        let expected = self.positions.len();
        let lengths = [
            ("normal", self.normals.map(<[_]>::len)),
            ("tex_coord", self.tex_coords.map(<[_]>::len)),
            ("bone_ids", self.bone_ids.map(<[_]>::len)),
            ("bone_weights", self.bone_weights.map(<[_]>::len)),
        ];
        for (name, len) in lengths {
            if let Some(actual) = len {
                if actual != expected {
                    return Err(SceneError::AttributeLengthMismatch {
                        name,
                        expected,
                        actual,
                    });
                }
            }
        }
        if self.bone_ids.is_some() != self.bone_weights.is_some() {
            return Err(SceneError::AttributeLengthMismatch {
                name: if self.bone_ids.is_some() {
                    "bone_weights"
                } else {
                    "bone_ids"
                },
                expected,
                actual: 0,
            });
        }
        validate_triangles(indices, expected)
    }
}

/// Shader families the scene draws with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShaderFamily {
    /// Phong lighting with per-vertex color.
    Lit,
    /// Phong lighting with a diffuse texture.
    Textured,
    /// Textured Phong with bone matrices.
    Skinned,
    /// Cube-mapped background, drawn at max depth.
    Skybox,
}

/// Directional light parameters shared by the lit families.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightUniforms {
    pub light_dir: Vec3,
    pub shininess: f32,
}

impl Default for LightUniforms {
    fn default() -> Self {
        Self {
            light_dir: Vec3::new(1.0, -1.0, 1.0),
            shininess: 2.0,
        }
    }
}

/// Typed uniform values per shader family.
#[derive(Clone, Debug, PartialEq)]
pub enum ShaderUniforms {
    Lit(LightUniforms),
    Textured(LightUniforms),
    Skinned {
        light: LightUniforms,
        bone_matrices: Vec<Mat4>,
    },
    Skybox,
}

impl ShaderUniforms {
    pub fn family(&self) -> ShaderFamily {
        match self {
            ShaderUniforms::Lit(_) => ShaderFamily::Lit,
            ShaderUniforms::Textured(_) => ShaderFamily::Textured,
            ShaderUniforms::Skinned { .. } => ShaderFamily::Skinned,
            ShaderUniforms::Skybox => ShaderFamily::Skybox,
        }
    }

    pub fn light(&self) -> Option<&LightUniforms> {
        match self {
            ShaderUniforms::Lit(light) | ShaderUniforms::Textured(light) => Some(light),
            ShaderUniforms::Skinned { light, .. } => Some(light),
            ShaderUniforms::Skybox => None,
        }
    }

    pub fn bone_matrices(&self) -> &[Mat4] {
        match self {
            ShaderUniforms::Skinned { bone_matrices, .. } => bone_matrices,
            _ => &[],
        }
    }
}

/// Opaque reference to a texture owned by the renderer (a file path or
/// an asset key); decoding and upload happen outside the core.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextureHandle(pub String);

impl TextureHandle {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

/// A sampler uniform name and the texture bound to it. The texture unit is
/// the binding's position in the submission's list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextureBinding {
    pub uniform: &'static str,
    pub texture: TextureHandle,
}

impl TextureBinding {
    pub fn diffuse(texture: TextureHandle) -> Self {
        Self {
            uniform: "diffuse_map",
            texture,
        }
    }

    pub fn cube_map(texture: TextureHandle) -> Self {
        Self {
            uniform: "cube_map",
            texture,
        }
    }
}

/// One draw's worth of data.
#[derive(Clone, Copy, Debug)]
pub struct MeshSubmission<'a> {
    pub label: &'a str,
    pub model: Mat4,
    pub attributes: VertexAttributes<'a>,
    pub indices: &'a [u32],
    pub uniforms: &'a ShaderUniforms,
    pub textures: &'a [TextureBinding],
}

impl MeshSubmission<'_> {
    pub fn validate(&self) -> Result<()> {
        self.attributes.validate(self.indices)
    }
}

/// Receiver of mesh submissions (a GPU uploader, a recorder, ...).
///
/// Implementations must reject submissions whose arrays are inconsistent.
pub trait MeshSink {
    fn submit(&mut self, submission: &MeshSubmission<'_>) -> Result<()>;

    /// Called by frame drivers before the first submission of a frame.
    fn begin_frame(&mut self) {}
}
