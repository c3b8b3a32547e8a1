#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::time::Duration;

use crate::dsp::ramp::RampShape;

/// Settings fixed for the lifetime of one streaming session.
///
/// Changing any of these takes effect on the next `start()`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Stream sample rate in Hz.
    pub sample_rate: u32,
    /// Frames the device asks for per callback. `None` lets the device pick.
    pub frames_per_callback: Option<u32>,
    /// Gain fade for start/stop and volume changes, in milliseconds.
    pub fade_ms: f32,
    /// Carrier and beat glide time, in milliseconds.
    pub glide_ms: f32,
    /// Curve used for frequency glides.
    pub glide_shape: RampShape,
    /// Frames kept for the oscilloscope.
    pub scope_capacity: usize,
}

impl EngineConfig {
    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate.max(1);
        self
    }

    pub fn with_frames_per_callback(mut self, frames: Option<u32>) -> Self {
        self.frames_per_callback = frames.filter(|&f| f > 0);
        self
    }

    pub fn with_fade_ms(mut self, fade_ms: f32) -> Self {
        self.fade_ms = fade_ms.max(0.0);
        self
    }

    pub fn with_glide_ms(mut self, glide_ms: f32) -> Self {
        self.glide_ms = glide_ms.max(0.0);
        self
    }

    pub fn with_glide_shape(mut self, shape: RampShape) -> Self {
        self.glide_shape = shape;
        self
    }

    pub fn with_scope_capacity(mut self, frames: usize) -> Self {
        self.scope_capacity = frames.max(1);
        self
    }

    /// Frames in one gain fade.
    pub fn fade_frames(&self) -> u32 {
        (self.fade_ms * self.sample_rate as f32 / 1000.0).round() as u32
    }

    /// Wall-clock time the device allows for rendering `frames`.
    pub fn deadline(&self, frames: usize) -> Duration {
        Duration::from_secs_f64(frames as f64 / self.sample_rate as f64)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            frames_per_callback: Some(1024),
            fade_ms: 10.0,
            glide_ms: 50.0,
            glide_shape: RampShape::Linear,
            scope_capacity: 2048,
        }
    }
}
