//! Keyframe Tracks
//!
//! A time-sorted set of samples with an interpolation function. Queries are
//! clamped to the sampled range; nothing is extrapolated.

use super::interpolate::{Interpolate, InterpolateFn};
use crate::error::{Result, SceneError};

/// Immutable keyframe track over values of type `T`.
#[derive(Clone)]
pub struct KeyFrames<T> {
    times: Vec<f32>,
    values: Vec<T>,
    interpolate: InterpolateFn<T>,
}

impl<T: Interpolate> KeyFrames<T> {
    /// Build a track using the value type's default interpolation.
    pub fn new(samples: impl IntoIterator<Item = (f32, T)>) -> Result<Self> {
        Self::with_interpolation(samples, T::interpolate)
    }
}

impl<T: Clone> KeyFrames<T> {
    /// Build a track with an explicit interpolation function.
    ///
    /// Samples may arrive in any order (a map's iteration order, for
    /// instance) and are sorted by time here.
    pub fn with_interpolation(
        samples: impl IntoIterator<Item = (f32, T)>,
        interpolate: InterpolateFn<T>,
    ) -> Result<Self> {
        let mut samples: Vec<(f32, T)> = samples.into_iter().collect();

        if let Some((time, _)) = samples.iter().find(|(time, _)| !time.is_finite()) {
            return Err(SceneError::InvalidTrack(format!(
                "sample time {time} is not finite"
            )));
        }
        if samples.len() < 2 {
            return Err(SceneError::InvalidTrack(format!(
                "need at least 2 keyframes, got {}",
                samples.len()
            )));
        }

        samples.sort_by(|a, b| a.0.total_cmp(&b.0));

        if let Some(pair) = samples.windows(2).find(|pair| pair[0].0 == pair[1].0) {
            return Err(SceneError::DegenerateInterval { time: pair[0].0 });
        }

        let (times, values) = samples.into_iter().unzip();
        Ok(Self {
            times,
            values,
            interpolate,
        })
    }

    pub fn min_time(&self) -> f32 {
        self.times[0]
    }

    pub fn max_time(&self) -> f32 {
        self.times[self.times.len() - 1]
    }

    pub fn times(&self) -> &[f32] {
        &self.times
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Interpolated value at `time`.
    ///
    /// Times outside `[min_time, max_time]` return the boundary sample; times
    /// that hit a sample exactly return that sample unchanged.
    pub fn value(&self, time: f32) -> T {
        let time = if time.is_nan() {
            self.min_time()
        } else {
            time.clamp(self.min_time(), self.max_time())
        };

        // First sample time >= query time.
        let after = self.times.partition_point(|&t| t < time);
        if self.times[after] == time {
            return self.values[after].clone();
        }

        // `after` is at least 1 here: index 0 would have matched exactly.
        let before = after - 1;
        let span = self.times[after] - self.times[before];
        debug_assert!(span > 0.0, "validated track has a zero-length interval");
        let fraction = (time - self.times[before]) / span;

        (self.interpolate)(&self.values[before], &self.values[after], fraction)
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for KeyFrames<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyFrames")
            .field("times", &self.times)
            .field("values", &self.values)
            .finish()
    }
}
