//! Real-world scenario benchmarks.
//!
//! These drive the synth and the pull callback the way a device does,
//! including scope writes and message draining.

mod stream;
mod synth;

pub use stream::bench_stream;
pub use synth::bench_synth;
