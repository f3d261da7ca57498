//! World Module
//!
//! Heightfield terrain, lake carving and scatter placement.
//!
//! ## Pipeline
//! A random heightfield is generated, lakes are grown and lowered into it,
//! then `LakeTerrain::rebuild` produces a fresh mesh snapshot with
//! synthesized normals. Scatter draws grass points from that snapshot.

pub mod lake;
pub mod scatter;
pub mod terrain;

pub use lake::{LakeConfig, LakeExtents, LakeRegion, LakeTerrain, WaterPlane};
pub use scatter::{GrassPoint, jitter_in_disc, random_grass_point, random_vertex, scatter_on_grass};
pub use terrain::{
    GridCell, Heightfield, TerrainConfig, TerrainMesh, Winding, build_terrain_mesh,
    terrain_indices, terrain_positions, terrain_tex_coords,
};
