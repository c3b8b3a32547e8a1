//! Parameter clamping and the startup parameter set.
//!
//! Every value entering the synth passes through one of these clamps, so
//! out-of-range input is never an error: it is pulled to the nearest legal
//! value. NaN maps to the bottom of the range.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::ops::RangeInclusive;

use crate::{BEAT_RANGE, CARRIER_RANGE, GAIN_RANGE};

#[inline]
fn clamp_to(value: f32, range: RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        *range.start()
    } else {
        value.clamp(*range.start(), *range.end())
    }
}

/// Clamp a carrier frequency to 50–2000 Hz.
pub fn clamp_carrier(hz: f32) -> f32 {
    clamp_to(hz, CARRIER_RANGE)
}

/// Clamp a beat offset to 0.1–40 Hz.
pub fn clamp_beat(hz: f32) -> f32 {
    clamp_to(hz, BEAT_RANGE)
}

/// Clamp an output gain to 0–1.
pub fn clamp_gain(level: f32) -> f32 {
    clamp_to(level, GAIN_RANGE)
}

/// Carrier, beat and volume targets.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    pub carrier_hz: f32,
    pub beat_hz: f32,
    pub volume: f32,
}

impl SynthParams {
    pub fn new(carrier_hz: f32, beat_hz: f32, volume: f32) -> Self {
        Self {
            carrier_hz,
            beat_hz,
            volume,
        }
        .clamped()
    }

    pub fn clamped(self) -> Self {
        Self {
            carrier_hz: clamp_carrier(self.carrier_hz),
            beat_hz: clamp_beat(self.beat_hz),
            volume: clamp_gain(self.volume),
        }
    }

    /// Frequency played to the left ear.
    pub fn left_hz(&self) -> f32 {
        self.carrier_hz
    }

    /// Frequency played to the right ear.
    pub fn right_hz(&self) -> f32 {
        self.carrier_hz + self.beat_hz
    }
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            carrier_hz: 100.0,
            beat_hz: 4.0,
            volume: 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn carrier_is_clamped() {
        assert_eq!(clamp_carrier(10.0), 50.0);
        assert_eq!(clamp_carrier(440.0), 440.0);
        assert_eq!(clamp_carrier(1.0e6), 2000.0);
        assert_eq!(clamp_carrier(f32::NAN), 50.0);
        assert_eq!(clamp_carrier(f32::INFINITY), 2000.0);
    }

    #[test]
    fn beat_is_clamped() {
        assert_eq!(clamp_beat(0.0), 0.1);
        assert_eq!(clamp_beat(-5.0), 0.1);
        assert_eq!(clamp_beat(7.5), 7.5);
        assert_eq!(clamp_beat(100.0), 40.0);
    }

    #[test]
    fn gain_is_clamped() {
        assert_eq!(clamp_gain(1.5), 1.0);
        assert_eq!(clamp_gain(-0.1), 0.0);
        assert_eq!(clamp_gain(f32::NAN), 0.0);
    }

    #[test]
    fn right_ear_is_carrier_plus_beat() {
        let params = SynthParams::new(200.0, 10.0, 0.5);
        assert_eq!(params.left_hz(), 200.0);
        assert_eq!(params.right_hz(), 210.0);
    }
}
