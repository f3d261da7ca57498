//! Transform Tracks
//!
//! Translation, rotation and scale keyframe tracks composed into a single
//! `Translate * Rotate * Scale` matrix.

use glam::{Mat4, Quat, Vec3};

use super::keyframes::KeyFrames;
use crate::error::{Result, SceneError};

/// Scale keys may be uniform scalars or per-axis vectors.
pub trait IntoScale {
    fn into_scale(self) -> Vec3;
}

impl IntoScale for f32 {
    fn into_scale(self) -> Vec3 {
        Vec3::splat(self)
    }
}

impl IntoScale for Vec3 {
    fn into_scale(self) -> Vec3 {
        self
    }
}

/// Three keyframe tracks evaluated together over their common time range.
#[derive(Clone, Debug)]
pub struct TransformKeyFrames {
    translation: KeyFrames<Vec3>,
    rotation: KeyFrames<Quat>,
    scale: KeyFrames<Vec3>,
    min_time: f32,
    max_time: f32,
}

impl TransformKeyFrames {
    /// Build the three component tracks from raw keys.
    ///
    /// Rotation keys are normalized; the rotation track interpolates with
    /// slerp, the others linearly.
    pub fn new<S: IntoScale>(
        translate_keys: impl IntoIterator<Item = (f32, Vec3)>,
        rotate_keys: impl IntoIterator<Item = (f32, Quat)>,
        scale_keys: impl IntoIterator<Item = (f32, S)>,
    ) -> Result<Self> {
        let translation = KeyFrames::new(translate_keys)?;
        let rotation = KeyFrames::new(rotate_keys.into_iter().map(|(t, q)| (t, q.normalize())))?;
        let scale = KeyFrames::new(scale_keys.into_iter().map(|(t, s)| (t, s.into_scale())))?;
        Self::from_tracks(translation, rotation, scale)
    }

    /// Combine prebuilt tracks; fails when their time ranges do not overlap.
    pub fn from_tracks(
        translation: KeyFrames<Vec3>,
        rotation: KeyFrames<Quat>,
        scale: KeyFrames<Vec3>,
    ) -> Result<Self> {
        let min_time = translation
            .min_time()
            .max(rotation.min_time())
            .max(scale.min_time());
        let max_time = translation
            .max_time()
            .min(rotation.max_time())
            .min(scale.max_time());

        if min_time > max_time {
            return Err(SceneError::InvalidTrack(format!(
                "translation/rotation/scale ranges do not overlap (start {min_time} > end {max_time})"
            )));
        }

        Ok(Self {
            translation,
            rotation,
            scale,
            min_time,
            max_time,
        })
    }

    /// Constant transform, valid over `[0, 1]`.
    pub fn constant(translation: Vec3, rotation: Quat, scale: impl IntoScale) -> Result<Self> {
        let scale = scale.into_scale();
        Self::new(
            [(0.0, translation), (1.0, translation)],
            [(0.0, rotation), (1.0, rotation)],
            [(0.0, scale), (1.0, scale)],
        )
    }

    /// Start of the range shared by all three tracks.
    pub fn min_time(&self) -> f32 {
        self.min_time
    }

    /// End of the range shared by all three tracks.
    pub fn max_time(&self) -> f32 {
        self.max_time
    }

    pub fn translation(&self) -> &KeyFrames<Vec3> {
        &self.translation
    }

    pub fn rotation(&self) -> &KeyFrames<Quat> {
        &self.rotation
    }

    pub fn scale(&self) -> &KeyFrames<Vec3> {
        &self.scale
    }

    /// Transform matrix at `time`, clamped to the valid range.
    pub fn value(&self, time: f32) -> Mat4 {
        let time = if time.is_nan() {
            self.min_time
        } else {
            time.clamp(self.min_time, self.max_time)
        };

        let t = Mat4::from_translation(self.translation.value(time));
        let r = Mat4::from_quat(self.rotation.value(time));
        let s = Mat4::from_scale(self.scale.value(time));
        t * r * s
    }
}
