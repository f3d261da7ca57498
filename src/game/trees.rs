//! Procedural Trees
//!
//! Trunk cylinder, a main canopy sphere at the trunk top and up to a few
//! smaller canopies on random points of the main one. Every canopy sheds
//! its own falling leaves.

use std::sync::Arc;

use glam::Vec3;
use rand::Rng;

use super::SceneAssets;
use super::leaves::add_falling_leaves;
use crate::config::ForestConfig;
use crate::error::Result;
use crate::mesh::{CylinderParams, SphereParams, textured_cylinder, textured_sphere};
use crate::scene::{Drawable, NodeId, SceneGraph, SceneNode};
use crate::world::random_vertex;

/// What `add_tree` generated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeSummary {
    pub node: NodeId,
    pub trunk_height: f32,
    pub canopy_radius: f32,
    pub canopies: usize,
    pub leaves: usize,
}

/// Grow a tree standing on `base`.
pub fn add_tree<R: Rng + ?Sized>(
    graph: &mut SceneGraph,
    parent: NodeId,
    name: &str,
    base: Vec3,
    forest: &ForestConfig,
    assets: &SceneAssets,
    rng: &mut R,
) -> Result<TreeSummary> {
    let trunk_height = forest.trunk_height + rng.random::<f32>();
    let canopy_radius = forest.canopy_radius + rng.random::<f32>();
    let tree = graph.add_child(parent, SceneNode::new(name))?;

    let trunk = textured_cylinder(&CylinderParams {
        center: base + Vec3::Y * (trunk_height / 2.0),
        height: trunk_height,
        ..Default::default()
    })?;
    graph.add_child(
        tree,
        SceneNode::new(format!("{name}/trunk")).with_drawable(Drawable::textured(
            Arc::new(trunk),
            assets.light,
            assets.trunk.clone(),
        )),
    )?;

    let top = base + Vec3::Y * trunk_height;
    let canopy = textured_sphere(&SphereParams {
        center: top,
        radius: canopy_radius,
        ..Default::default()
    })?;
    let mut leaves = add_falling_leaves(
        graph,
        tree,
        &format!("{name}/canopy0"),
        top,
        trunk_height - forest.leaf_ground_clearance,
        canopy_radius,
        forest,
        assets,
        rng,
    )?;

    let secondary = rng.random_range(0..=forest.max_secondary_canopies);
    let mut extra_canopies = Vec::with_capacity(secondary);
    for i in 1..=secondary {
        let Some(anchor) = random_vertex(&canopy.positions, rng) else {
            break;
        };
        let radius = rng.random::<f32>();
        let mesh = textured_sphere(&SphereParams {
            center: anchor,
            radius,
            ..Default::default()
        })?;
        extra_canopies.push((i, mesh));
        leaves += add_falling_leaves(
            graph,
            tree,
            &format!("{name}/canopy{i}"),
            anchor,
            anchor.y - base.y - forest.leaf_ground_clearance,
            radius,
            forest,
            assets,
            rng,
        )?;
    }

    let canopies = 1 + extra_canopies.len();
    for (i, mesh) in std::iter::once((0, canopy)).chain(extra_canopies) {
        graph.add_child(
            tree,
            SceneNode::new(format!("{name}/canopy{i}")).with_drawable(Drawable::textured(
                Arc::new(mesh),
                assets.light,
                assets.leaves.clone(),
            )),
        )?;
    }

    log::debug!("{name}: trunk {trunk_height:.2}, {canopies} canopies, {leaves} leaves");
    Ok(TreeSummary {
        node: tree,
        trunk_height,
        canopy_radius,
        canopies,
        leaves,
    })
}
