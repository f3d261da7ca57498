//! Falling Leaves
//!
//! A handful of leaf quads scattered under a canopy, each dropping to the
//! ground on a looping four-key track with its own phase.

use glam::{Quat, Vec3};
use rand::Rng;

use super::SceneAssets;
use crate::animation::{KeyFrameControl, TransformKeyFrames};
use crate::config::ForestConfig;
use crate::error::Result;
use crate::scene::{Drawable, NodeId, SceneGraph, SceneNode};
use crate::world::jitter_in_disc;

/// Fall from `start` by `fall_height` over five seconds, slowing near the
/// ground.
pub fn falling_leaf_track(start: Vec3, fall_height: f32) -> Result<TransformKeyFrames> {
    let drop = |fraction: f32| start - Vec3::Y * (fall_height * fraction);
    TransformKeyFrames::new(
        [
            (0.0, start),
            (3.0, drop(0.9)),
            (4.0, drop(0.98)),
            (5.0, drop(1.0)),
        ],
        [(0.0, Quat::IDENTITY), (5.0, Quat::IDENTITY)],
        [(0.0, 1.0_f32), (5.0, 1.0)],
    )
}

/// Add `0..=max_leaves_per_canopy` leaves jittered within `radius / 2` of
/// `center`. Returns how many were added.
#[allow(clippy::too_many_arguments)]
pub fn add_falling_leaves<R: Rng + ?Sized>(
    graph: &mut SceneGraph,
    parent: NodeId,
    name: &str,
    center: Vec3,
    fall_height: f32,
    radius: f32,
    forest: &ForestConfig,
    assets: &SceneAssets,
    rng: &mut R,
) -> Result<usize> {
    let count = rng.random_range(0..=forest.max_leaves_per_canopy);
    for i in 0..count {
        let start = jitter_in_disc(center, radius / 2.0, rng);
        let shift = rng.random_range(0..=forest.max_leaf_shift) as f32;
        let control = KeyFrameControl::new(falling_leaf_track(start, fall_height)?)
            .repeating()
            .with_shift(shift);

        let leaf = SceneNode::new(format!("{name}/leaf{i}"))
            .with_drawable(Drawable::textured(
                assets.leaf_mesh.clone(),
                assets.light,
                assets.leaf.clone(),
            ))
            .with_animation(control);
        graph.add_child(parent, leaf)?;
    }
    Ok(count)
}
