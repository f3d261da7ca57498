//! Game Module
//!
//! Scene assembly on top of the engine: trees with falling leaves, water
//! planes over carved lakes, animated props, a skinned reed and the skybox,
//! combined into the lake forest scene.

pub mod forest;
pub mod leaves;
pub mod props;
pub mod skybox;
pub mod trees;
pub mod water;

use std::sync::Arc;

use crate::config::TextureConfig;
use crate::mesh::{Mesh, leaf_quad};
use crate::render::{LightUniforms, TextureHandle};

pub use forest::{LakeForest, build_lake_forest, build_lake_forest_with_rng};
pub use leaves::{add_falling_leaves, falling_leaf_track};
pub use props::{add_circling_prop, add_landmark, add_swaying_reed, circling_track, reed_sway_track};
pub use skybox::add_skybox;
pub use trees::{TreeSummary, add_tree};
pub use water::{add_water_plane, water_drift_track};

/// Shared light, texture keys and meshes used while assembling a scene.
#[derive(Clone, Debug)]
pub struct SceneAssets {
    pub light: LightUniforms,
    pub grass: TextureHandle,
    pub water: TextureHandle,
    pub trunk: TextureHandle,
    pub leaves: TextureHandle,
    pub leaf: TextureHandle,
    pub skybox: TextureHandle,
    pub prop: TextureHandle,
    pub landmark: TextureHandle,
    /// One quad shared by every falling leaf.
    pub leaf_mesh: Arc<Mesh>,
}

impl SceneAssets {
    pub fn new(textures: &TextureConfig, light: LightUniforms) -> Self {
        Self {
            light,
            grass: TextureHandle::new(&textures.grass),
            water: TextureHandle::new(&textures.water),
            trunk: TextureHandle::new(&textures.trunk),
            leaves: TextureHandle::new(&textures.leaves),
            leaf: TextureHandle::new(&textures.leaf),
            skybox: TextureHandle::new(&textures.skybox),
            prop: TextureHandle::new(&textures.prop),
            landmark: TextureHandle::new(&textures.landmark),
            leaf_mesh: Arc::new(leaf_quad(1.0)),
        }
    }
}

impl Default for SceneAssets {
    fn default() -> Self {
        Self::new(&TextureConfig::default(), LightUniforms::default())
    }
}
