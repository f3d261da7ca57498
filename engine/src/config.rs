//! Scene Configuration
//!
//! JSON-loadable settings for the lake forest scene. Every field has a
//! default, so a config file only needs the values it changes.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::render::LightUniforms;
use crate::scene::SkinningMode;
use crate::world::{LakeConfig, TerrainConfig};

/// Tree and foliage scatter limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Hard cap on trees; the drawn count is `U{0..=rows/10 * cols/10}`.
    pub max_trees: usize,
    pub max_secondary_canopies: usize,
    pub max_leaves_per_canopy: usize,
    /// Trunk height is `trunk_height + U[0, 1)`.
    pub trunk_height: f32,
    /// Main canopy radius is `canopy_radius + U[0, 1)`.
    pub canopy_radius: f32,
    /// Leaves stop this far above the ground.
    pub leaf_ground_clearance: f32,
    /// Upper bound of the random leaf time shift, in whole seconds.
    pub max_leaf_shift: u32,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            max_trees: 10,
            max_secondary_canopies: 3,
            max_leaves_per_canopy: 2,
            trunk_height: 5.0,
            canopy_radius: 2.0,
            leaf_ground_clearance: 0.5,
            max_leaf_shift: 9,
        }
    }
}

/// Scene light.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub light: LightUniforms,
}

/// Circling prop and landmark.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropsConfig {
    /// Height of the circling prop's path.
    pub altitude: f32,
    pub path_radius: f32,
    /// Seconds per lap.
    pub lap_time: f32,
    pub landmark_scale: f32,
}

impl Default for PropsConfig {
    fn default() -> Self {
        Self {
            altitude: 11.0,
            path_radius: 2.0,
            lap_time: 8.0,
            landmark_scale: 6.0,
        }
    }
}

/// Texture keys handed to the renderer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    pub grass: String,
    pub water: String,
    pub trunk: String,
    pub leaves: String,
    pub leaf: String,
    pub skybox: String,
    pub prop: String,
    pub landmark: String,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            grass: "textures/grass.png".into(),
            water: "textures/water.jpg".into(),
            trunk: "textures/trunk.jpg".into(),
            leaves: "textures/leaves.jpg".into(),
            leaf: "textures/leaf.png".into(),
            skybox: "textures/skybox/".into(),
            prop: "textures/prop.jpg".into(),
            landmark: "textures/lava.jpg".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub seed: u64,
    pub terrain: TerrainConfig,
    pub lakes: LakeConfig,
    pub forest: ForestConfig,
    pub lighting: LightingConfig,
    pub props: PropsConfig,
    pub textures: TextureConfig,
    pub skinning: SkinningMode,
    /// Where the swaying reed stands.
    pub reed_position: Vec3,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            terrain: TerrainConfig::default(),
            lakes: LakeConfig::default(),
            forest: ForestConfig::default(),
            lighting: LightingConfig::default(),
            props: PropsConfig::default(),
            textures: TextureConfig::default(),
            skinning: SkinningMode::Cpu,
            reed_position: Vec3::new(4.0, 1.0, 4.0),
        }
    }
}

impl SceneConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_json_str(&text)?;
        log::info!("loaded scene config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
