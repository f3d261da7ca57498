//! Animation Module
//!
//! Keyframe interpolation, TRS transform tracks, per-node keyframe control
//! and linear blend skinning.
//!
//! Everything here is evaluated once per frame on the render thread and is
//! side-effect free: the same time always yields the same transform.

pub mod control;
pub mod interpolate;
pub mod keyframes;
pub mod skinning;
pub mod transform;

pub use control::KeyFrameControl;
pub use interpolate::{Interpolate, InterpolateFn, lerp, slerp};
pub use keyframes::KeyFrames;
pub use skinning::{
    BoneBinding, MAX_BONES, MAX_INFLUENCES, Skin, VertexInfluence, skin_normals, skin_positions,
    skinning_matrices,
};
pub use transform::{IntoScale, TransformKeyFrames};
