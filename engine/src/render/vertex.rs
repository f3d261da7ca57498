//! GPU Vertex and Uniform Layouts
//!
//! Interleaved vertex structs and the uniform block written for each
//! submission. Layouts must match the WGSL side exactly.

use glam::Mat4;

use super::submission::{MeshSubmission, ShaderUniforms, VertexAttributes};
use crate::animation::MAX_BONES;

/// Static mesh vertex.
///
/// Layout (32 bytes):
///   offset  0: position  (vec3<f32>)
///   offset 12: normal    (vec3<f32>)
///   offset 24: tex_coord (vec2<f32>)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

/// Skinned mesh vertex (64 bytes): the static layout plus four bone slots.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SkinnedMeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
    pub bone_ids: [u32; 4],
    pub bone_weights: [f32; 4],
}

/// Per-draw uniform block.
///
/// Layout (96 bytes):
///   offset  0: model      (mat4x4<f32>)
///   offset 64: light_dir  (vec3<f32>)
///   offset 76: shininess  (f32)
///   offset 80: family     (u32) 0 = lit, 1 = textured, 2 = skinned, 3 = skybox
///   offset 84: bone_count (u32)
///   offset 88: _pad       (2 x u32)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniforms {
    pub model: [[f32; 4]; 4],
    pub light_dir: [f32; 3],
    pub shininess: f32,
    pub family: u32,
    pub bone_count: u32,
    pub _pad: [u32; 2],
}

static_assertions::assert_eq_size!(MeshVertex, [u8; 32]);
static_assertions::assert_eq_size!(SkinnedMeshVertex, [u8; 64]);
static_assertions::assert_eq_size!(DrawUniforms, [u8; 96]);

impl Default for DrawUniforms {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY.to_cols_array_2d(),
            light_dir: [1.0, -1.0, 1.0],
            shininess: 2.0,
            family: 0,
            bone_count: 0,
            _pad: [0; 2],
        }
    }
}

impl DrawUniforms {
    pub fn from_submission(submission: &MeshSubmission<'_>) -> Self {
        let mut uniforms = Self {
            model: submission.model.to_cols_array_2d(),
            ..Default::default()
        };
        if let Some(light) = submission.uniforms.light() {
            uniforms.light_dir = light.light_dir.to_array();
            uniforms.shininess = light.shininess;
        }
        uniforms.family = match submission.uniforms {
            ShaderUniforms::Lit(_) => 0,
            ShaderUniforms::Textured(_) => 1,
            ShaderUniforms::Skinned { .. } => 2,
            ShaderUniforms::Skybox => 3,
        };
        uniforms.bone_count = submission.uniforms.bone_matrices().len().min(MAX_BONES) as u32;
        uniforms
    }
}

/// Interleave attribute arrays into static vertices. Missing normals and
/// texture coordinates are zero-filled.
pub fn interleave(attributes: &VertexAttributes<'_>) -> Vec<MeshVertex> {
    (0..attributes.vertex_count())
        .map(|i| MeshVertex {
            position: attributes.positions[i].to_array(),
            normal: attributes.normals.map_or([0.0; 3], |n| n[i].to_array()),
            tex_coord: attributes.tex_coords.map_or([0.0; 2], |t| t[i].to_array()),
        })
        .collect()
}

/// Interleave attribute arrays into skinned vertices.
pub fn interleave_skinned(attributes: &VertexAttributes<'_>) -> Vec<SkinnedMeshVertex> {
    interleave(attributes)
        .into_iter()
        .enumerate()
        .map(|(i, v)| SkinnedMeshVertex {
            position: v.position,
            normal: v.normal,
            tex_coord: v.tex_coord,
            bone_ids: attributes.bone_ids.map_or([0; 4], |ids| ids[i]),
            bone_weights: attributes.bone_weights.map_or([0.0; 4], |w| w[i]),
        })
        .collect()
}

/// Bone matrices padded to the fixed uniform array size.
pub fn bone_matrix_block(bone_matrices: &[Mat4]) -> Vec<[[f32; 4]; 4]> {
    let mut block = vec![Mat4::IDENTITY.to_cols_array_2d(); MAX_BONES];
    for (slot, m) in block.iter_mut().zip(bone_matrices) {
        *slot = m.to_cols_array_2d();
    }
    block
}
