pub mod dsp; // Oscillator and ramp primitives
pub mod engine; // Device stream, state machine, pull callback
pub mod error;
pub mod scope; // Lock-free oscilloscope ring
pub mod synth; // Stereo binaural frame synthesis

use std::ops::RangeInclusive;

pub use engine::{config::EngineConfig, state::EngineState, Engine};
pub use error::EngineError;
pub use synth::{binaural::BinauralSynth, frame::StereoFrame, params::SynthParams};

pub const MAX_BLOCK_SIZE: usize = 2048;

/// Valid carrier (left ear) frequencies in Hz.
pub const CARRIER_RANGE: RangeInclusive<f32> = 50.0..=2000.0;
/// Valid beat offsets in Hz; the right ear plays carrier + beat.
pub const BEAT_RANGE: RangeInclusive<f32> = 0.1..=40.0;
/// Valid output gain.
pub const GAIN_RANGE: RangeInclusive<f32> = 0.0..=1.0;
