//! Animated Props
//!
//! A small prop flying a circular path, a large static landmark and a reed
//! bent by a two-bone skin.

use std::f32::consts::FRAC_PI_4;
use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};

use super::SceneAssets;
use crate::animation::{BoneBinding, KeyFrameControl, Skin, TransformKeyFrames, VertexInfluence};
use crate::config::PropsConfig;
use crate::error::Result;
use crate::mesh::{CylinderParams, SphereParams, textured_cylinder, textured_sphere};
use crate::render::TextureBinding;
use crate::scene::{Drawable, NodeId, SceneGraph, SceneNode, SkinnedDrawable, SkinningMode};

const PATH_SEGMENTS: usize = 8;
const PROP_SCALE: f32 = 0.3;

const REED_HEIGHT: f32 = 2.0;
const REED_RADIUS: f32 = 0.08;
const REED_SWAY: f32 = 0.35;

/// Eight segments around a circle of `radius` at `altitude`, yawing to
/// follow the path, one lap per `lap_time` seconds.
pub fn circling_track(altitude: f32, radius: f32, lap_time: f32) -> Result<TransformKeyFrames> {
    let step = lap_time / PATH_SEGMENTS as f32;
    let key = |i: usize| {
        let angle = (i % PATH_SEGMENTS) as f32 * FRAC_PI_4;
        (
            i as f32 * step,
            Vec3::new(radius * angle.cos(), altitude, radius * angle.sin()),
            Quat::from_rotation_y(-angle),
        )
    };
    let keys: Vec<_> = (0..=PATH_SEGMENTS).map(key).collect();

    TransformKeyFrames::new(
        keys.iter().map(|(t, p, _)| (*t, *p)),
        keys.iter().map(|(t, _, r)| (*t, *r)),
        keys.iter().map(|(t, _, _)| (*t, PROP_SCALE)),
    )
}

pub fn add_circling_prop(
    graph: &mut SceneGraph,
    props: &PropsConfig,
    assets: &SceneAssets,
) -> Result<NodeId> {
    let track = circling_track(props.altitude, props.path_radius, props.lap_time)?;
    let mesh = textured_sphere(&SphereParams::default())?;
    Ok(graph.add_root(
        SceneNode::new("prop")
            .with_drawable(Drawable::textured(Arc::new(mesh), assets.light, assets.prop.clone()))
            .with_animation(KeyFrameControl::new(track).repeating()),
    ))
}

/// Landmark held at a constant uniform scale.
pub fn add_landmark(
    graph: &mut SceneGraph,
    props: &PropsConfig,
    assets: &SceneAssets,
) -> Result<NodeId> {
    let track = TransformKeyFrames::constant(Vec3::ZERO, Quat::IDENTITY, props.landmark_scale)?;
    let mesh = textured_cylinder(&CylinderParams {
        center: Vec3::new(0.0, 0.5, 0.0),
        radius: 1.0,
        ..Default::default()
    })?;
    Ok(graph.add_root(
        SceneNode::new("landmark")
            .with_drawable(Drawable::textured(
                Arc::new(mesh),
                assets.light,
                assets.landmark.clone(),
            ))
            .with_animation(KeyFrameControl::new(track)),
    ))
}

/// Tip bone rocking around Z: upright, left, upright, right, upright.
pub fn reed_sway_track() -> Result<TransformKeyFrames> {
    let lift = Vec3::Y * (REED_HEIGHT / 2.0);
    TransformKeyFrames::new(
        [(0.0, lift), (4.0, lift)],
        [
            (0.0, Quat::IDENTITY),
            (1.0, Quat::from_rotation_z(REED_SWAY)),
            (2.0, Quat::IDENTITY),
            (3.0, Quat::from_rotation_z(-REED_SWAY)),
            (4.0, Quat::IDENTITY),
        ],
        [(0.0, 1.0_f32), (4.0, 1.0)],
    )
}

/// Tip-bone weight for a vertex at height `y` above the reed base.
fn tip_weight(y: f32) -> f32 {
    ((y - REED_HEIGHT * 0.25) / (REED_HEIGHT * 0.5)).clamp(0.0, 1.0)
}

/// Reed standing at `position` with a base bone and a swaying tip bone.
/// Returns the base bone node.
pub fn add_swaying_reed(
    graph: &mut SceneGraph,
    position: Vec3,
    mode: SkinningMode,
    assets: &SceneAssets,
) -> Result<NodeId> {
    let base = graph.add_root(SceneNode::new("reed").with_transform(Mat4::from_translation(position)));
    let tip = graph.add_child(
        base,
        SceneNode::new("reed/tip").with_animation(KeyFrameControl::new(reed_sway_track()?).repeating()),
    )?;

    let mesh = textured_cylinder(&CylinderParams {
        center: Vec3::Y * (REED_HEIGHT / 2.0),
        height: REED_HEIGHT,
        radius: REED_RADIUS,
        divisions: 12,
    })?;
    let influences = mesh
        .positions
        .iter()
        .map(|p| {
            let w = tip_weight(p.y);
            VertexInfluence::pair(0, 1.0 - w, 1, w)
        })
        .collect();
    let bones = vec![
        BoneBinding {
            node: base,
            offset: Mat4::IDENTITY,
        },
        BoneBinding {
            node: tip,
            offset: Mat4::from_translation(-Vec3::Y * (REED_HEIGHT / 2.0)),
        },
    ];
    let skin = Skin::new(bones, influences, mesh.vertex_count())?;
    let skinned = SkinnedDrawable::new(
        Arc::new(mesh),
        skin,
        assets.light,
        vec![TextureBinding::diffuse(assets.leaves.clone())],
        mode,
    );

    graph.add_child(base, SceneNode::new("reed/mesh").with_drawable(Drawable::Skinned(skinned)))?;
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RecordingSink, ShaderFamily};

    #[test]
    fn test_circling_track_closes_loop() {
        let track = circling_track(11.0, 2.0, 8.0).unwrap();
        let start = track.value(0.0);
        let end = track.value(8.0);
        assert!(start.abs_diff_eq(end, 1e-5));
        let quarter = track.value(2.0).w_axis.truncate();
        assert!(quarter.abs_diff_eq(Vec3::new(0.0, 11.0, 2.0), 1e-5));
    }

    #[test]
    fn test_landmark_scale() {
        let mut graph = SceneGraph::new();
        let id = add_landmark(&mut graph, &PropsConfig::default(), &SceneAssets::default()).unwrap();
        graph.animate(0.5);
        let world = graph.world_transform(id).unwrap();
        assert!(world.abs_diff_eq(Mat4::from_scale(Vec3::splat(6.0)), 1e-6));
    }

    #[test]
    fn test_reed_rest_pose_matches_bind_pose() {
        let mut graph = SceneGraph::new();
        let position = Vec3::new(3.0, 1.0, -2.0);
        add_swaying_reed(&mut graph, position, SkinningMode::Cpu, &SceneAssets::default()).unwrap();

        let mut sink = RecordingSink::new();
        graph.draw(0.0, &mut sink).unwrap();
        let reed = sink.find("reed/mesh").unwrap();
        assert_eq!(reed.uniforms.family(), ShaderFamily::Textured);
        // Top cap center.
        assert!(reed.positions[0].abs_diff_eq(position + Vec3::Y * REED_HEIGHT, 1e-5));
    }

    #[test]
    fn test_reed_tip_bends() {
        let mut graph = SceneGraph::new();
        add_swaying_reed(&mut graph, Vec3::ZERO, SkinningMode::Cpu, &SceneAssets::default()).unwrap();
        let mut sink = RecordingSink::new();
        graph.draw(1.0, &mut sink).unwrap();
        let reed = sink.find("reed/mesh").unwrap();
        // Tip leans toward -X under a positive Z rotation.
        assert!(reed.positions[0].x < -0.1);
        // Bottom cap center is fully on the base bone.
        let bottom = reed.positions[13];
        assert!(bottom.abs_diff_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn test_reed_gpu_mode_sends_bones() {
        let mut graph = SceneGraph::new();
        add_swaying_reed(&mut graph, Vec3::ZERO, SkinningMode::Gpu, &SceneAssets::default()).unwrap();
        let mut sink = RecordingSink::new();
        graph.draw(1.0, &mut sink).unwrap();
        let reed = sink.find("reed/mesh").unwrap();
        assert_eq!(reed.uniforms.family(), ShaderFamily::Skinned);
        assert_eq!(reed.uniforms.bone_matrices().len(), 2);
        assert!(reed.bone_ids.is_some());
        assert_eq!(reed.positions[0], Vec3::Y * REED_HEIGHT);
    }
}
