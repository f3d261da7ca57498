//! Scene Module
//!
//! Node hierarchy with composed payloads: each node may carry a drawable
//! and a keyframe control. Drawing animates, derives world transforms top
//! down and pushes every drawable through a `MeshSink`.

pub mod drawable;
pub mod node;

pub use drawable::{Drawable, SkinnedDrawable, SkinningMode};
pub use node::{DrawStats, NodeId, SceneGraph, SceneNode};
