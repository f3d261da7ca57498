//! Procedural Scatter
//!
//! Random placement on terrain vertices that avoid lakes, and polar jitter
//! around a point for secondary foliage.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;

use super::lake::LakeRegion;
use super::terrain::{GridCell, TerrainMesh};

/// Rejection attempts before falling back to an explicit candidate list.
pub const MAX_REJECTION_ATTEMPTS: usize = 256;

/// An accepted placement on the terrain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GrassPoint {
    pub vertex: usize,
    pub cell: GridCell,
    pub position: Vec3,
}

fn on_any_lake(lakes: &[LakeRegion], cell: GridCell) -> bool {
    lakes.iter().any(|lake| lake.contains(cell))
}

/// Uniformly random terrain vertex whose cell is not claimed by any lake.
///
/// Returns `None` only when every vertex lies on a lake.
pub fn random_grass_point<R: Rng + ?Sized>(
    terrain: &TerrainMesh,
    lakes: &[LakeRegion],
    rng: &mut R,
) -> Option<GrassPoint> {
    let positions = &terrain.mesh.positions;
    if positions.is_empty() {
        return None;
    }

    let accept = |vertex: usize| {
        let cell = terrain.cell_of_vertex(vertex);
        (!on_any_lake(lakes, cell)).then(|| GrassPoint {
            vertex,
            cell,
            position: positions[vertex],
        })
    };

    for _ in 0..MAX_REJECTION_ATTEMPTS {
        if let Some(point) = accept(rng.random_range(0..positions.len())) {
            return Some(point);
        }
    }

    // Mostly water: sample from the survivors directly.
    let candidates: Vec<usize> = (0..positions.len())
        .filter(|&v| !on_any_lake(lakes, terrain.cell_of_vertex(v)))
        .collect();
    if candidates.is_empty() {
        log::warn!("no grass left on a {}x{} terrain", terrain.rows, terrain.cols);
        return None;
    }
    accept(candidates[rng.random_range(0..candidates.len())])
}

/// Up to `count` grass points; stops early if the terrain has none.
pub fn scatter_on_grass<R: Rng + ?Sized>(
    terrain: &TerrainMesh,
    lakes: &[LakeRegion],
    count: usize,
    rng: &mut R,
) -> Vec<GrassPoint> {
    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        match random_grass_point(terrain, lakes, rng) {
            Some(point) => points.push(point),
            None => break,
        }
    }
    points
}

/// Offset `center` in the XZ plane by a uniform angle and a uniform radius
/// in `[0, max_radius)`.
pub fn jitter_in_disc<R: Rng + ?Sized>(center: Vec3, max_radius: f32, rng: &mut R) -> Vec3 {
    let angle = rng.random::<f32>() * TAU;
    let radius = rng.random::<f32>() * max_radius.max(0.0);
    center + Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin())
}

/// A uniformly random element of `positions`.
pub fn random_vertex<R: Rng + ?Sized>(positions: &[Vec3], rng: &mut R) -> Option<Vec3> {
    (!positions.is_empty()).then(|| positions[rng.random_range(0..positions.len())])
}
