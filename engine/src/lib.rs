//! Lake Forest Engine Library
//!
//! Procedural scene toolkit: keyframe animation with quaternion slerp,
//! linear blend skinning, vertex normal synthesis, heightfield terrain with
//! flood-filled lakes and scatter placement, all feeding a typed
//! mesh-submission interface.
//!
//! # Modules
//!
//! - [`animation`] - Keyframe tracks, TRS transforms, keyframe control, skinning
//! - [`mesh`] - Triangle meshes, normal synthesis and procedural primitives
//! - [`world`] - Heightfield terrain, lake carving and scatter
//! - [`scene`] - Node arena with drawable and animation components
//! - [`render`] - Mesh submission, recording sink and wgpu upload
//! - [`config`] - JSON scene configuration
//! - [`clock`] - Time sources
//!
//! # Example
//!
//! ```ignore
//! use lake_forest_engine::game::build_lake_forest;
//! use lake_forest_engine::render::RecordingSink;
//! use lake_forest_engine::SceneConfig;
//!
//! let config = SceneConfig::default();
//! let mut scene = build_lake_forest(&config)?;
//! let mut sink = RecordingSink::new();
//! let stats = scene.graph.draw(1.5, &mut sink)?;
//! ```

pub mod animation;
pub mod clock;
pub mod config;
pub mod error;
pub mod mesh;
pub mod render;
pub mod scene;
pub mod world;

// Scene assembly (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

pub use clock::{ManualClock, SystemClock, TimeSource};
pub use config::{ForestConfig, LightingConfig, PropsConfig, SceneConfig, TextureConfig};
pub use error::{Result, SceneError};
pub use mesh::Mesh;
pub use scene::{Drawable, NodeId, SceneGraph, SceneNode};
