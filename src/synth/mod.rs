// Purpose: stereo frame synthesis and the control messages that steer it.
// This layer sits above the dsp primitives and below the engine.

pub mod binaural;
pub mod frame;
pub mod message;
pub mod params;
