//! Animation Tests - Keyframes, Transform Tracks and Skinning
//!
//! Clamping and knot laws over generated tracks, slerp norm preservation,
//! TRS composition order and skinning against scene-graph bones.

use std::collections::BTreeMap;
use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Mat4, Quat, Vec3};
use lake_forest_engine::animation::{
    BoneBinding, KeyFrameControl, KeyFrames, Skin, TransformKeyFrames, VertexInfluence, slerp,
};
use lake_forest_engine::scene::{SceneGraph, SceneNode};
use lake_forest_engine::SceneError;
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// Strictly increasing sample times paired with arbitrary values.
fn track_samples() -> impl Strategy<Value = Vec<(f32, f32)>> {
    (
        -50.0f32..50.0,
        prop::collection::vec((0.01f32..10.0, -1000.0f32..1000.0), 2..8),
    )
        .prop_map(|(start, steps)| {
            let mut t = start;
            steps
                .into_iter()
                .map(|(gap, value)| {
                    t += gap;
                    (t, value)
                })
                .collect()
        })
}

fn unit_quat() -> impl Strategy<Value = Quat> {
    (-1.0f32..1.0, -1.0f32..1.0, -1.0f32..1.0, -PI..PI).prop_map(|(x, y, z, angle)| {
        let axis = Vec3::new(x, y, z).try_normalize().unwrap_or(Vec3::Y);
        Quat::from_axis_angle(axis, angle)
    })
}

// ============================================================================
// Keyframe Properties
// ============================================================================

proptest! {
    #[test]
    fn test_clamping_law(samples in track_samples(), before in 0.0f32..100.0, after in 0.0f32..100.0) {
        let track = KeyFrames::new(samples.clone()).unwrap();
        let first = samples[0].1;
        let last = samples[samples.len() - 1].1;

        prop_assert_eq!(track.value(track.min_time() - before), first);
        prop_assert_eq!(track.value(track.max_time() + after), last);
    }

    #[test]
    fn test_knots_are_exact(samples in track_samples()) {
        let track = KeyFrames::new(samples.clone()).unwrap();
        for (time, value) in &samples {
            prop_assert_eq!(track.value(*time), *value);
        }
    }

    #[test]
    fn test_values_stay_within_neighbors(samples in track_samples(), fraction in 0.0f32..1.0) {
        let track = KeyFrames::new(samples.clone()).unwrap();
        let t = track.min_time() + (track.max_time() - track.min_time()) * fraction;
        let lo = samples.iter().map(|s| s.1).fold(f32::MAX, f32::min);
        let hi = samples.iter().map(|s| s.1).fold(f32::MIN, f32::max);
        let v = track.value(t);
        prop_assert!(v >= lo - 1e-2 && v <= hi + 1e-2);
    }

    #[test]
    fn test_slerp_preserves_unit_norm(a in unit_quat(), b in unit_quat(), fraction in 0.0f32..=1.0) {
        let q = slerp(a, b, fraction);
        prop_assert!((q.length() - 1.0).abs() < 1e-4);
    }
}

// ============================================================================
// Keyframe Construction
// ============================================================================

#[test]
fn test_spec_example_track() {
    let track = KeyFrames::new([(0.0, 0.0_f32), (5.0, 10.0)]).unwrap();
    assert_eq!(track.value(0.0), 0.0);
    assert_eq!(track.value(5.0), 10.0);
    assert_eq!(track.value(2.5), 5.0);
}

#[test]
fn test_mapping_input_is_sorted() {
    let keys = BTreeMap::from([(3, 30.0_f32), (1, 10.0), (2, 20.0)]);
    let reversed: Vec<(f32, f32)> = keys.iter().rev().map(|(t, v)| (*t as f32, *v)).collect();
    let track = KeyFrames::new(reversed).unwrap();
    assert_eq!(track.times(), &[1.0, 2.0, 3.0]);
    assert_eq!(track.value(1.5), 15.0);
}

#[test]
fn test_single_sample_rejected() {
    let err = KeyFrames::new([(1.0, 1.0_f32)]).unwrap_err();
    assert!(matches!(err, SceneError::InvalidTrack(_)));
}

#[test]
fn test_duplicate_time_rejected() {
    let err = KeyFrames::new([(0.0, 1.0_f32), (2.0, 3.0), (2.0, 4.0)]).unwrap_err();
    assert!(matches!(err, SceneError::DegenerateInterval { time } if time == 2.0));
}

#[test]
fn test_slerp_takes_short_arc() {
    let a = Quat::from_rotation_y(0.1);
    // Same orientation as rotation_y(0.3), opposite hemisphere.
    let b = -Quat::from_rotation_y(0.3);
    let mid = slerp(a, b, 0.5);
    let expected = Quat::from_rotation_y(0.2);
    assert!(mid.dot(expected).abs() > 1.0 - 1e-5);
}

// ============================================================================
// Transform Tracks
// ============================================================================

#[test]
fn test_trs_order() {
    let track = TransformKeyFrames::new(
        [(0.0, Vec3::new(10.0, 0.0, 0.0)), (1.0, Vec3::new(10.0, 0.0, 0.0))],
        [
            (0.0, Quat::from_rotation_z(FRAC_PI_2)),
            (1.0, Quat::from_rotation_z(FRAC_PI_2)),
        ],
        [(0.0, 2.0_f32), (1.0, 2.0)],
    )
    .unwrap();
    let p = track.value(0.5).transform_point3(Vec3::X);
    assert!(p.abs_diff_eq(Vec3::new(10.0, 2.0, 0.0), 1e-5));
}

#[test]
fn test_valid_range_is_intersection() {
    let track = TransformKeyFrames::new(
        [(0.0, Vec3::ZERO), (10.0, Vec3::new(10.0, 0.0, 0.0))],
        [(2.0, Quat::IDENTITY), (8.0, Quat::IDENTITY)],
        [(1.0, Vec3::ONE), (9.0, Vec3::ONE)],
    )
    .unwrap();
    assert_eq!(track.min_time(), 2.0);
    assert_eq!(track.max_time(), 8.0);
    // Clamped to 8 rather than reading the translation track at 12.
    assert_eq!(track.value(12.0).w_axis.x, 8.0);
    assert_eq!(track.value(-4.0).w_axis.x, 2.0);
}

#[test]
fn test_non_overlapping_tracks_rejected() {
    let err = TransformKeyFrames::new(
        [(0.0, Vec3::ZERO), (1.0, Vec3::ONE)],
        [(2.0, Quat::IDENTITY), (3.0, Quat::IDENTITY)],
        [(0.0, 1.0_f32), (3.0, 1.0)],
    )
    .unwrap_err();
    assert!(matches!(err, SceneError::InvalidTrack(_)));
}

#[test]
fn test_rotation_keys_are_normalized() {
    let track = TransformKeyFrames::new(
        [(0.0, Vec3::ZERO), (1.0, Vec3::ZERO)],
        [(0.0, Quat::from_xyzw(0.0, 0.0, 0.0, 3.0)), (1.0, Quat::IDENTITY)],
        [(0.0, 1.0_f32), (1.0, 1.0)],
    )
    .unwrap();
    assert!(track.value(0.0).abs_diff_eq(Mat4::IDENTITY, 1e-6));
}

#[test]
fn test_repeating_control_with_shift() {
    let track = TransformKeyFrames::new(
        [(0.0, Vec3::ZERO), (5.0, Vec3::new(0.0, -5.0, 0.0))],
        [(0.0, Quat::IDENTITY), (5.0, Quat::IDENTITY)],
        [(0.0, 1.0_f32), (5.0, 1.0)],
    )
    .unwrap();
    let control = KeyFrameControl::new(track).repeating().with_shift(2.0);
    // 11 + 2 = 13 wraps to 3.
    assert!((control.transform_at(11.0).w_axis.y + 3.0).abs() < 1e-5);
}

// ============================================================================
// Skinning Through the Scene Graph
// ============================================================================

#[test]
fn test_skin_follows_bone_nodes() {
    let mut graph = SceneGraph::new();
    let root = graph.add_root(SceneNode::new("root"));
    let bone = graph
        .add_child(
            root,
            SceneNode::new("bone").with_transform(Mat4::from_translation(Vec3::new(0.0, 3.0, 0.0))),
        )
        .unwrap();

    let skin = Skin::new(
        vec![
            BoneBinding {
                node: root,
                offset: Mat4::IDENTITY,
            },
            BoneBinding {
                node: bone,
                offset: Mat4::IDENTITY,
            },
        ],
        vec![VertexInfluence::single(0), VertexInfluence::pair(0, 0.5, 1, 0.5)],
        2,
    )
    .unwrap();

    let worlds = graph.world_transforms();
    let matrices = skin.bone_matrices(&worlds).unwrap();
    let (positions, normals) = skin.deform(&[Vec3::ZERO, Vec3::X], &[Vec3::Y, Vec3::Y], &matrices);
    assert_eq!(positions[0], Vec3::ZERO);
    assert_eq!(positions[1], Vec3::new(1.0, 1.5, 0.0));
    assert_eq!(normals[1], Vec3::Y);
}

#[test]
fn test_skin_rejects_too_many_bones() {
    let binding = BoneBinding {
        node: lake_forest_engine::NodeId::from_index(0),
        offset: Mat4::IDENTITY,
    };
    let err = Skin::new(vec![binding; 129], vec![], 0).unwrap_err();
    assert!(matches!(err, SceneError::InvalidSkin(_)));
}
