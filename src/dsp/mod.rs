//! Low-level DSP primitives used by the synthesizer.
//!
//! These components are allocation-free and realtime-safe, so they can live
//! directly inside the audio callback. They stay focused on the signal math;
//! the synth layer decides which values feed them and when.

/// Phase-continuous sine oscillator.
pub mod oscillator;
/// Bounded-duration interpolation for gain and frequency targets.
pub mod ramp;

pub use oscillator::SineOscillator;
pub use ramp::{Ramp, RampShape};
