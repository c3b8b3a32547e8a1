//! Error types for the streaming engine.
//!
//! Bad parameter values are not errors here (they are clamped), and missed
//! callback deadlines are counted in diagnostics rather than reported.

use thiserror::Error;

/// Errors surfaced by [`Engine`](crate::Engine).
#[derive(Debug, Error)]
pub enum EngineError {
    /// No output device to open. The engine stays idle.
    #[error("no output device available")]
    DeviceUnavailable,

    /// The device would not report a default output configuration.
    #[error("failed to query output config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    /// The device rejected the requested stream.
    #[error("failed to build output stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    /// The stream was built but would not start.
    #[error("failed to start output stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    /// The device only offers a sample format we do not render.
    #[error("unsupported sample format: {0:?}")]
    UnsupportedFormat(cpal::SampleFormat),

    /// The running stream died (device unplugged, backend failure). Terminal:
    /// the engine has already returned to idle when this is reported.
    #[error("output stream failed: {0}")]
    Stream(#[from] cpal::StreamError),
}
