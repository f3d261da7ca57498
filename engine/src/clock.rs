//! Time Sources
//!
//! Animated nodes read the current time once per frame, in seconds and in
//! the same units as keyframe times.

use std::time::Instant;

pub trait TimeSource {
    fn now(&self) -> f32;
}

/// Wall clock measured from creation or the last `reset`.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Restart animation time at zero.
    pub fn reset(&mut self) {
        self.start = Instant::now();
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Clock stepped by hand, for headless runs and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ManualClock {
    time: f32,
}

impl ManualClock {
    pub fn new(time: f32) -> Self {
        Self { time }
    }

    pub fn set(&mut self, time: f32) {
        self.time = time;
    }

    /// Move forward by `dt`; negative steps are ignored so time never
    /// runs backwards.
    pub fn advance(&mut self, dt: f32) {
        if dt > 0.0 {
            self.time += dt;
        }
    }

    pub fn reset(&mut self) {
        self.time = 0.0;
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> f32 {
        self.time
    }
}
