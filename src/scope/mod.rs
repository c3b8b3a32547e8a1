//! Audio → UI visualization path.
//!
//! The audio thread writes every produced frame into a fixed ring; the UI
//! reads the latest window at its own pace. Neither side ever waits on the
//! other, and the ring overwrites its oldest frames when full since only the
//! most recent picture matters.

/// Overwrite-oldest frame ring shared between the two threads.
pub mod ring;
/// Read side: snapshots and display resampling.
pub mod sampler;

pub use ring::ScopeBuffer;
pub use sampler::{resample, ScopeSampler};
