//! Water Planes
//!
//! A textured plane over each lake, drifting diagonally and back every
//! five seconds.

use std::sync::Arc;

use glam::{Quat, Vec3};

use super::SceneAssets;
use crate::animation::{KeyFrameControl, TransformKeyFrames};
use crate::error::Result;
use crate::mesh::textured_plane;
use crate::scene::{Drawable, NodeId, SceneGraph, SceneNode};
use crate::world::WaterPlane;

pub fn water_drift_track() -> Result<TransformKeyFrames> {
    TransformKeyFrames::new(
        [
            (0.0, Vec3::ZERO),
            (3.0, Vec3::new(-0.1, 0.0, -0.1)),
            (4.0, Vec3::new(-0.2, 0.0, -0.2)),
            (5.0, Vec3::ZERO),
        ],
        [(0.0, Quat::IDENTITY), (5.0, Quat::IDENTITY)],
        [(0.0, 1.0_f32), (5.0, 1.0)],
    )
}

pub fn add_water_plane(
    graph: &mut SceneGraph,
    parent: NodeId,
    name: &str,
    plane: &WaterPlane,
    assets: &SceneAssets,
) -> Result<NodeId> {
    let mesh = textured_plane(plane.center, plane.length, plane.width)?;
    let node = SceneNode::new(name)
        .with_drawable(Drawable::textured(
            Arc::new(mesh),
            assets.light,
            assets.water.clone(),
        ))
        .with_animation(KeyFrameControl::new(water_drift_track()?).repeating());
    graph.add_child(parent, node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSink;

    #[test]
    fn test_water_drifts_and_loops() {
        let mut graph = SceneGraph::new();
        let root = graph.add_root(SceneNode::new("lakes"));
        let plane = WaterPlane {
            center: Vec3::new(2.0, 0.0, -1.0),
            length: 4.0,
            width: 3.0,
        };
        add_water_plane(&mut graph, root, "water0", &plane, &SceneAssets::default()).unwrap();

        let mut sink = RecordingSink::new();
        graph.draw(9.0, &mut sink).unwrap();
        let water = sink.find("water0").unwrap();
        // 9s wraps to 4s on the 5s loop.
        assert!(water.model.w_axis.truncate().abs_diff_eq(Vec3::new(-0.2, 0.0, -0.2), 1e-6));
        let xs: Vec<f32> = water.positions.iter().map(|p| p.x).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 0.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 4.0);
    }
}
