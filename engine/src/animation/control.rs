//! Keyframe Control
//!
//! Drives a node's local transform from a transform track, optionally
//! looping and with a per-node time shift so identical tracks fall out of
//! phase.

use glam::Mat4;

use super::transform::TransformKeyFrames;

#[derive(Clone, Debug)]
pub struct KeyFrameControl {
    pub keyframes: TransformKeyFrames,
    /// Loop over the valid range instead of holding the last key.
    pub repeat: bool,
    /// Added to the clock before evaluation.
    pub time_shift: f32,
}

impl KeyFrameControl {
    pub fn new(keyframes: TransformKeyFrames) -> Self {
        Self {
            keyframes,
            repeat: false,
            time_shift: 0.0,
        }
    }

    pub fn repeating(mut self) -> Self {
        self.repeat = true;
        self
    }

    pub fn with_shift(mut self, time_shift: f32) -> Self {
        self.time_shift = time_shift;
        self
    }

    /// Track time used for a clock reading.
    pub fn local_time(&self, now: f32) -> f32 {
        let t = now + self.time_shift;
        if !self.repeat {
            return t;
        }

        let start = self.keyframes.min_time();
        let span = self.keyframes.max_time() - start;
        if span <= 0.0 {
            return start;
        }
        start + (t - start).rem_euclid(span)
    }

    pub fn transform_at(&self, now: f32) -> Mat4 {
        self.keyframes.value(self.local_time(now))
    }
}
