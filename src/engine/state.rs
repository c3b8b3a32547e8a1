//! Transport state and the counters shared with the audio thread.
//!
//! Everything here is a plain atomic: the audio thread reads and writes it
//! without ever taking a lock.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

/// Lifecycle of one streaming session.
///
/// ```text
///   Idle ──start()──► Starting ──first callback──► Running
///    ▲                   │                            │
///    │                   └──────────stop()────────────┤
///    │                                                ▼
///    └──────────── fade-out landed on zero ────── Stopping
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EngineState {
    Idle = 0,
    Starting = 1,
    Running = 2,
    Stopping = 3,
}

impl EngineState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Starting,
            2 => Self::Running,
            3 => Self::Stopping,
            _ => Self::Idle,
        }
    }
}

impl fmt::Display for EngineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "Idle",
            Self::Starting => "Starting",
            Self::Running => "Running",
            Self::Stopping => "Stopping",
        };
        f.write_str(name)
    }
}

/// Counters published by the audio thread.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Diagnostics {
    /// Callbacks served.
    pub callbacks: u64,
    /// Callbacks whose render time exceeded the block's real-time length.
    pub underruns: u64,
    /// Callbacks that hit an internal fault and emitted silence instead.
    pub faults: u64,
    /// Non-terminal errors reported by the audio backend.
    pub backend_errors: u64,
}

/// State shared between the engine (control thread) and its pull callback.
///
/// Every `stop()` opens a new stop epoch. The callback reads the epoch
/// before it drains the message queue and tags its drained signal with it,
/// so a signal raised for a fade-out that was later cancelled by a restart
/// can never match the next stop.
#[derive(Debug)]
pub struct SharedState {
    state: AtomicU8,
    /// Current stop epoch; 0 until the first stop.
    stop_epoch: AtomicU64,
    /// Epoch whose fade-out has landed on silence; 0 for none.
    drained: AtomicU64,

    callbacks: AtomicU64,
    underruns: AtomicU64,
    faults: AtomicU64,
    backend_errors: AtomicU64,
}

impl SharedState {
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(EngineState::Idle as u8),
            stop_epoch: AtomicU64::new(0),
            drained: AtomicU64::new(0),
            callbacks: AtomicU64::new(0),
            underruns: AtomicU64::new(0),
            faults: AtomicU64::new(0),
            backend_errors: AtomicU64::new(0),
        }
    }

    pub fn state(&self) -> EngineState {
        EngineState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Move `from` → `to` only if the state is still `from`.
    pub fn transition(&self, from: EngineState, to: EngineState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Unconditional move, for the control thread only.
    pub fn force(&self, to: EngineState) {
        self.state.store(to as u8, Ordering::Release);
    }

    /// Control side: open a new stop epoch. Call after queueing the
    /// fade-out and before moving to `Stopping`.
    pub fn begin_stop(&self) -> u64 {
        self.stop_epoch.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// The epoch of the most recent stop.
    pub fn stop_epoch(&self) -> u64 {
        self.stop_epoch.load(Ordering::Acquire)
    }

    /// Audio side: the fade-out of `epoch` has finished and only silence
    /// remains.
    pub fn mark_drained(&self, epoch: u64) {
        self.drained.store(epoch, Ordering::Release);
    }

    /// Control side: consume the drained signal for the current stop.
    /// Signals left over from earlier stops are discarded.
    pub fn take_drained(&self) -> bool {
        let drained = self.drained.swap(0, Ordering::AcqRel);
        drained != 0 && drained == self.stop_epoch()
    }

    pub fn is_drained(&self) -> bool {
        let drained = self.drained.load(Ordering::Acquire);
        drained != 0 && drained == self.stop_epoch()
    }

    pub fn record_callback(&self) {
        self.callbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_underrun(&self) {
        self.underruns.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fault(&self) {
        self.faults.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_backend_error(&self) {
        self.backend_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            callbacks: self.callbacks.load(Ordering::Relaxed),
            underruns: self.underruns.load(Ordering::Relaxed),
            faults: self.faults.load(Ordering::Relaxed),
            backend_errors: self.backend_errors.load(Ordering::Relaxed),
        }
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
