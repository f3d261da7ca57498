//! Skybox
//!
//! Unit cube drawn with the cube-map family. The renderer keeps it at max
//! depth and strips the view translation.

use std::sync::Arc;

use super::SceneAssets;
use crate::mesh::skybox_cube;
use crate::scene::{Drawable, NodeId, SceneGraph, SceneNode};

pub fn add_skybox(graph: &mut SceneGraph, assets: &SceneAssets) -> NodeId {
    graph.add_root(
        SceneNode::new("skybox")
            .with_drawable(Drawable::skybox(Arc::new(skybox_cube()), assets.skybox.clone())),
    )
}
