//! Vertex Normal Synthesis
//!
//! Smooth per-vertex normals from positions and a triangle list. Every
//! triangle adds its unnormalized face normal (the edge cross product, so
//! larger triangles weigh more) to its three vertices; the sums are
//! normalized at the end.

use glam::Vec3;

use crate::error::{Result, SceneError};

/// Squared length below which an accumulated normal is considered zero.
pub const NORMAL_EPSILON: f32 = 1e-12;

/// Normal assigned to vertices whose accumulated normal vanishes.
pub const FALLBACK_NORMAL: Vec3 = Vec3::Y;

/// Check that `indices` forms whole triangles over `vertex_count` vertices.
pub fn validate_triangles(indices: &[u32], vertex_count: usize) -> Result<()> {
    if indices.len() % 3 != 0 {
        return Err(SceneError::IncompleteTriangle(indices.len()));
    }
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(SceneError::IndexOutOfRange {
            index,
            vertex_count,
        });
    }
    Ok(())
}

/// Area-weighted smooth normals.
///
/// Isolated vertices and vertices whose face normals cancel out get
/// [`FALLBACK_NORMAL`] instead of a NaN.
pub fn compute_vertex_normals(positions: &[Vec3], indices: &[u32]) -> Result<Vec<Vec3>> {
    validate_triangles(indices, positions.len())?;

    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }

    let mut degenerate = 0usize;
    for n in &mut normals {
        let len_sq = n.length_squared();
        if len_sq <= NORMAL_EPSILON || !len_sq.is_finite() {
            *n = FALLBACK_NORMAL;
            degenerate += 1;
        } else {
            *n /= len_sq.sqrt();
        }
    }
    if degenerate > 0 {
        log::warn!(
            "{degenerate} of {} vertices had a zero-length normal, using fallback",
            positions.len()
        );
    }

    Ok(normals)
}
