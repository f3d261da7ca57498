//! Mesh Module
//!
//! CPU-side triangle meshes, vertex normal synthesis and the procedural
//! primitives the scene is assembled from.

pub mod normals;
pub mod primitives;

use glam::{Vec2, Vec3};

use crate::error::Result;
use crate::render::VertexAttributes;

pub use normals::{FALLBACK_NORMAL, NORMAL_EPSILON, compute_vertex_normals, validate_triangles};
pub use primitives::{
    CylinderParams, SphereParams, leaf_quad, skybox_cube, textured_cylinder, textured_plane,
    textured_sphere,
};

/// Indexed triangle mesh with per-vertex normals and texture coordinates.
///
/// Meshes are snapshots: regenerating a terrain produces a new `Mesh`
/// rather than patching one a renderer may still hold.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh and synthesize its normals from the triangle list.
    pub fn with_computed_normals(
        positions: Vec<Vec3>,
        tex_coords: Vec<Vec2>,
        indices: Vec<u32>,
    ) -> Result<Self> {
        let normals = compute_vertex_normals(&positions, &indices)?;
        Ok(Self {
            positions,
            normals,
            tex_coords,
            indices,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Borrowed attribute view for submission. Empty optional arrays are
    /// left out.
    pub fn attributes(&self) -> VertexAttributes<'_> {
        VertexAttributes {
            positions: &self.positions,
            normals: (!self.normals.is_empty()).then_some(self.normals.as_slice()),
            tex_coords: (!self.tex_coords.is_empty()).then_some(self.tex_coords.as_slice()),
            bone_ids: None,
            bone_weights: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Mesh {
        Mesh::with_computed_normals(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![Vec2::ZERO, Vec2::X, Vec2::Y],
            vec![0, 1, 2],
        )
        .unwrap()
    }

    #[test]
    fn test_attributes_validate() {
        let mesh = triangle();
        assert!(mesh.attributes().validate(&mesh.indices).is_ok());
    }
}
