//! Recording Sink
//!
//! Keeps owned copies of every submission. Used by the headless driver to
//! report what a frame drew and by tests to inspect scene output.

use glam::{Mat4, Vec2, Vec3};

use super::submission::{MeshSink, MeshSubmission, ShaderUniforms, TextureBinding};
use crate::error::Result;

/// Owned copy of one submission.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedMesh {
    pub label: String,
    pub model: Mat4,
    pub positions: Vec<Vec3>,
    pub normals: Option<Vec<Vec3>>,
    pub tex_coords: Option<Vec<Vec2>>,
    pub bone_ids: Option<Vec<[u32; 4]>>,
    pub bone_weights: Option<Vec<[f32; 4]>>,
    pub indices: Vec<u32>,
    pub uniforms: ShaderUniforms,
    pub textures: Vec<TextureBinding>,
}

impl RecordedMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Positions with the model matrix applied.
    pub fn world_positions(&self) -> Vec<Vec3> {
        self.positions
            .iter()
            .map(|p| self.model.transform_point3(*p))
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    meshes: Vec<RecordedMesh>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn meshes(&self) -> &[RecordedMesh] {
        &self.meshes
    }

    /// Drop recorded meshes, typically at the start of a frame.
    pub fn clear(&mut self) {
        self.meshes.clear();
    }

    pub fn find(&self, label: &str) -> Option<&RecordedMesh> {
        self.meshes.iter().find(|m| m.label == label)
    }

    pub fn with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a RecordedMesh> {
        self.meshes.iter().filter(move |m| m.label.starts_with(prefix))
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(RecordedMesh::triangle_count).sum()
    }
}

impl MeshSink for RecordingSink {
    fn submit(&mut self, submission: &MeshSubmission<'_>) -> Result<()> {
        submission.validate()?;
        let attributes = &submission.attributes;
        self.meshes.push(RecordedMesh {
            label: submission.label.to_string(),
            model: submission.model,
            positions: attributes.positions.to_vec(),
            normals: attributes.normals.map(<[_]>::to_vec),
            tex_coords: attributes.tex_coords.map(<[_]>::to_vec),
            bone_ids: attributes.bone_ids.map(<[_]>::to_vec),
            bone_weights: attributes.bone_weights.map(<[_]>::to_vec),
            indices: submission.indices.to_vec(),
            uniforms: submission.uniforms.clone(),
            textures: submission.textures.to_vec(),
        });
        Ok(())
    }

    /// Each frame replaces the previous recording.
    fn begin_frame(&mut self) {
        self.clear();
    }
}
