//! Audio streaming engine: owns the device stream and drives its lifecycle.
//!
//! The engine lives on the control (UI) thread. It talks to the audio thread
//! through three lock-free channels only:
//!
//! - an `rtrb` queue of [`SynthMessage`]s (UI → audio),
//! - the atomics in [`SharedState`] (state, drain signal, counters),
//! - the [`ScopeBuffer`] ring (audio → UI frames).
//!
//! Stream teardown and error reporting happen in [`Engine::poll`], which the
//! UI calls from its refresh timer.

pub mod callback;
pub mod config;
pub mod state;

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use log::{debug, info, warn};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    error::EngineError,
    scope::{ring::ScopeBuffer, sampler::ScopeSampler},
    synth::{
        binaural::BinauralSynth,
        message::SynthMessage,
        params::{clamp_beat, clamp_carrier, clamp_gain, SynthParams},
    },
    MAX_BLOCK_SIZE,
};

use self::{
    callback::StreamCallback,
    config::EngineConfig,
    state::{Diagnostics, EngineState, SharedState},
};

/// Capacity of the UI → audio message queue.
const MESSAGE_CAPACITY: usize = 256;
/// Capacity of the backend error queue.
const FAULT_CAPACITY: usize = 16;
/// Messages needed to resend the whole parameter set.
const RESYNC_MESSAGES: usize = 4;

type ErrorHandler = Box<dyn FnMut(&EngineError)>;

/// One open device stream and the producer side of its queues.
struct Session {
    stream: cpal::Stream,
    tx: Producer<SynthMessage>,
    faults: Consumer<cpal::StreamError>,
    sample_rate: u32,
    channels: u16,
    /// A message was dropped on a full queue; resend everything.
    resync: bool,
}

/// Binaural beat streaming engine.
///
/// ```no_run
/// use binaural_dsp::{Engine, EngineConfig};
///
/// let mut engine = Engine::new(EngineConfig::default());
/// engine.set_carrier_frequency(200.0);
/// engine.set_beat_frequency(10.0);
/// engine.start().expect("no audio device");
/// // ... from the UI timer:
/// let state = engine.poll();
/// let scope = engine.oscilloscope_snapshot();
/// engine.stop();
/// ```
pub struct Engine {
    config: EngineConfig,
    params: SynthParams,
    shared: Arc<SharedState>,
    scope: Arc<ScopeBuffer>,
    session: Option<Session>,
    error_handler: Option<ErrorHandler>,
    pending_error: Option<EngineError>,
    last_warning: Option<String>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            params: SynthParams::default(),
            shared: Arc::new(SharedState::new()),
            scope: Arc::new(ScopeBuffer::new(config.scope_capacity)),
            session: None,
            error_handler: None,
            pending_error: None,
            last_warning: None,
        }
    }

    /// Builder-style initial parameters, applied on the next `start()`.
    pub fn with_params(mut self, params: SynthParams) -> Self {
        self.params = params.clamped();
        self
    }

    /// Sample rate the default output device prefers.
    pub fn default_output_sample_rate() -> Result<u32, EngineError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(EngineError::DeviceUnavailable)?;
        let config = device.default_output_config()?;
        Ok(config.sample_rate().0)
    }

    // --- Transport -------------------------------------------------------

    /// Open the device and fade in.
    ///
    /// A no-op while already starting or running. During a fade-out the
    /// stream is still open, so the gate simply reopens and the gain ramps
    /// back up from wherever it is.
    pub fn start(&mut self) -> Result<(), EngineError> {
        match self.state() {
            EngineState::Starting | EngineState::Running => return Ok(()),
            EngineState::Stopping => {
                if self.shared.take_drained() {
                    self.close_session();
                } else {
                    debug!("start during fade-out, reopening the gate");
                    self.send(SynthMessage::FadeIn);
                    self.shared
                        .transition(EngineState::Stopping, EngineState::Running);
                    // The fade may have landed between the check above and
                    // the reopen; that signal belongs to the cancelled stop.
                    self.shared.take_drained();
                    return Ok(());
                }
            }
            EngineState::Idle => {}
        }

        self.shared.take_drained();
        self.shared.force(EngineState::Starting);
        match self.open_session() {
            Ok(session) => {
                self.session = Some(session);
                Ok(())
            }
            Err(err) => {
                warn!("failed to open output stream: {err}");
                self.shared.force(EngineState::Idle);
                Err(err)
            }
        }
    }

    /// Fade out. The stream closes once the fade lands on zero, observed by
    /// a later [`poll`](Self::poll).
    pub fn stop(&mut self) {
        let active = matches!(self.state(), EngineState::Starting | EngineState::Running);
        if self.session.is_none() || !active {
            return;
        }

        self.send(SynthMessage::FadeOut);
        self.shared.begin_stop();
        loop {
            let current = self.state();
            if !matches!(current, EngineState::Starting | EngineState::Running) {
                break;
            }
            if self.shared.transition(current, EngineState::Stopping) {
                break;
            }
        }
    }

    /// Advance the control side of the state machine.
    ///
    /// Closes the stream after a finished fade-out, reports terminal stream
    /// errors to the handler registered with
    /// [`on_stream_error`](Self::on_stream_error), and resends parameters
    /// that were dropped on a full queue.
    pub fn poll(&mut self) -> EngineState {
        let faults = match &mut self.session {
            Some(session) => drain_faults(&mut session.faults, &self.shared),
            None => StreamFaults::default(),
        };
        if let Some(warning) = faults.warning {
            self.last_warning = Some(warning);
        }
        if let Some(err) = faults.terminal {
            self.fail(err);
            return EngineState::Idle;
        }

        if self.state() == EngineState::Stopping && self.shared.take_drained() {
            debug!("fade-out drained");
            self.close_session();
        }

        self.flush_resync();
        self.state()
    }

    /// Fade out, wait for the fade to drain, and close the device.
    ///
    /// The wait is bounded so a stalled device cannot hang teardown.
    pub fn shutdown(&mut self) {
        if self.session.is_none() {
            self.shared.force(EngineState::Idle);
            return;
        }

        self.stop();
        let limit = Instant::now() + self.drain_timeout();
        while self.poll() != EngineState::Idle && Instant::now() < limit {
            thread::sleep(Duration::from_millis(2));
        }
        if self.session.is_some() {
            warn!("fade-out did not drain in time, closing anyway");
        }
        self.close_session();
    }

    pub fn state(&self) -> EngineState {
        self.shared.state()
    }

    // --- Parameters --------------------------------------------------------

    pub fn set_carrier_frequency(&mut self, hz: f32) {
        self.params.carrier_hz = clamp_carrier(hz);
        self.send(SynthMessage::SetCarrier {
            hz: self.params.carrier_hz,
        });
    }

    pub fn set_beat_frequency(&mut self, hz: f32) {
        self.params.beat_hz = clamp_beat(hz);
        self.send(SynthMessage::SetBeat {
            hz: self.params.beat_hz,
        });
    }

    /// Output level the fade-in settles at.
    pub fn set_gain(&mut self, level: f32) {
        self.params.volume = clamp_gain(level);
        self.send(SynthMessage::SetVolume {
            level: self.params.volume,
        });
    }

    pub fn apply_preset(&mut self, beat_hz: f32) {
        self.set_beat_frequency(beat_hz);
    }

    /// Target parameters, as last set.
    pub fn params(&self) -> SynthParams {
        self.params
    }

    pub fn left_frequency(&self) -> f32 {
        self.params.left_hz()
    }

    pub fn right_frequency(&self) -> f32 {
        self.params.right_hz()
    }

    // --- Observation -------------------------------------------------------

    pub fn sampler(&self) -> ScopeSampler {
        ScopeSampler::new(self.scope.clone())
    }

    pub fn oscilloscope_snapshot(&self) -> Vec<f32> {
        self.sampler().snapshot()
    }

    /// Register the handler for terminal stream errors. It runs inside
    /// [`poll`](Self::poll), after the engine has already gone idle.
    pub fn on_stream_error<F>(&mut self, handler: F)
    where
        F: FnMut(&EngineError) + 'static,
    {
        self.error_handler = Some(Box::new(handler));
    }

    /// Take a terminal error that arrived while no handler was registered.
    pub fn take_error(&mut self) -> Option<EngineError> {
        self.pending_error.take()
    }

    /// Most recent non-terminal backend message.
    pub fn last_warning(&self) -> Option<&str> {
        self.last_warning.as_deref()
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.shared.diagnostics()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Sample rate of the open stream.
    pub fn sample_rate(&self) -> Option<u32> {
        self.session.as_ref().map(|s| s.sample_rate)
    }

    /// Channel count of the open stream.
    pub fn channels(&self) -> Option<u16> {
        self.session.as_ref().map(|s| s.channels)
    }

    // --- Internals ---------------------------------------------------------

    fn open_session(&self) -> Result<Session, EngineError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(EngineError::DeviceUnavailable)?;
        let supported = device.default_output_config()?;

        let mut stream_config = cpal::StreamConfig {
            channels: supported.channels(),
            sample_rate: cpal::SampleRate(self.config.sample_rate),
            buffer_size: match self.config.frames_per_callback {
                Some(frames) => cpal::BufferSize::Fixed(frames),
                None => cpal::BufferSize::Default,
            },
        };

        let session = match self.build_session(&device, &stream_config, supported.sample_format()) {
            Err(EngineError::BuildStream(cpal::BuildStreamError::StreamConfigNotSupported))
                if matches!(stream_config.buffer_size, cpal::BufferSize::Fixed(_)) =>
            {
                // Some backends refuse fixed block sizes; let the device pick.
                info!("fixed buffer size rejected, using the device default");
                stream_config.buffer_size = cpal::BufferSize::Default;
                self.build_session(&device, &stream_config, supported.sample_format())?
            }
            other => other?,
        };

        session.stream.play()?;
        info!(
            "output stream open: {} Hz, {} channels, {:?}",
            session.sample_rate,
            session.channels,
            supported.sample_format()
        );
        Ok(session)
    }

    fn build_session(
        &self,
        device: &cpal::Device,
        stream_config: &cpal::StreamConfig,
        format: cpal::SampleFormat,
    ) -> Result<Session, EngineError> {
        let (mut tx, rx) = RingBuffer::<SynthMessage>::new(MESSAGE_CAPACITY);
        let (fault_tx, faults) = RingBuffer::<cpal::StreamError>::new(FAULT_CAPACITY);

        // Queued before the stream exists, so the first callback fades in.
        let _ = tx.push(SynthMessage::FadeIn);

        let stream = match format {
            cpal::SampleFormat::F32 => {
                self.build_stream::<f32>(device, stream_config, rx, fault_tx)?
            }
            cpal::SampleFormat::I16 => {
                self.build_stream::<i16>(device, stream_config, rx, fault_tx)?
            }
            cpal::SampleFormat::U16 => {
                self.build_stream::<u16>(device, stream_config, rx, fault_tx)?
            }
            other => return Err(EngineError::UnsupportedFormat(other)),
        };

        Ok(Session {
            stream,
            tx,
            faults,
            sample_rate: stream_config.sample_rate.0,
            channels: stream_config.channels,
            resync: false,
        })
    }

    fn build_stream<T>(
        &self,
        device: &cpal::Device,
        stream_config: &cpal::StreamConfig,
        rx: Consumer<SynthMessage>,
        mut fault_tx: Producer<cpal::StreamError>,
    ) -> Result<cpal::Stream, EngineError>
    where
        T: SizedSample + FromSample<f32>,
    {
        let sample_rate = stream_config.sample_rate.0 as f32;
        let synth = BinauralSynth::new(sample_rate, &self.config, self.params)
            .with_scope(self.scope.clone());
        let mut callback = StreamCallback::new(
            synth,
            rx,
            self.shared.clone(),
            stream_config.channels as usize,
        );

        let stream = device.build_output_stream(
            stream_config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| callback.render(data),
            move |err| {
                // Full queue: the engine is already tearing down.
                let _ = fault_tx.push(err);
            },
            None,
        )?;
        Ok(stream)
    }

    /// Drop the stream, clear the scope and return to idle.
    fn close_session(&mut self) {
        if let Some(session) = self.session.take() {
            let _ = session.stream.pause();
            info!("output stream closed");
        }
        // The callback is gone with the stream; nothing writes the ring now.
        self.scope.clear();
        self.shared.take_drained();
        self.shared.force(EngineState::Idle);
    }

    fn send(&mut self, msg: SynthMessage) {
        if let Some(session) = &mut self.session {
            if session.tx.push(msg).is_err() {
                debug!("message queue full, resync pending");
                session.resync = true;
            }
        }
    }

    fn flush_resync(&mut self) {
        let gate = match self.state() {
            EngineState::Starting | EngineState::Running => SynthMessage::FadeIn,
            _ => SynthMessage::FadeOut,
        };
        let params = self.params;

        let Some(session) = &mut self.session else {
            return;
        };
        if !session.resync || session.tx.slots() < RESYNC_MESSAGES {
            return;
        }

        for msg in [
            SynthMessage::SetCarrier {
                hz: params.carrier_hz,
            },
            SynthMessage::SetBeat { hz: params.beat_hz },
            SynthMessage::SetVolume {
                level: params.volume,
            },
            gate,
        ] {
            let _ = session.tx.push(msg);
        }
        session.resync = false;
    }

    /// Tear down after a terminal stream error, then report it.
    fn fail(&mut self, err: cpal::StreamError) {
        warn!("output stream failed, closing: {err}");
        self.close_session();
        self.report(EngineError::from(err));
    }

    fn report(&mut self, err: EngineError) {
        match &mut self.error_handler {
            Some(handler) => handler(&err),
            None => self.pending_error = Some(err),
        }
    }

    fn drain_timeout(&self) -> Duration {
        let block = self
            .config
            .frames_per_callback
            .map(|f| f as usize)
            .unwrap_or(MAX_BLOCK_SIZE);
        Duration::try_from_secs_f32(self.config.fade_ms / 1000.0).unwrap_or_default()
            + self.config.deadline(block) * 4
            + Duration::from_millis(100)
    }
}

/// Backend errors collected by one [`drain_faults`] pass.
#[derive(Debug, Default)]
struct StreamFaults {
    /// First error that ends the stream.
    terminal: Option<cpal::StreamError>,
    /// Latest non-terminal backend message.
    warning: Option<String>,
}

/// Sort everything the error callback queued into terminal and
/// non-terminal. `BackendSpecific` errors are transient: they are counted
/// and logged, and the stream keeps running.
fn drain_faults(faults: &mut Consumer<cpal::StreamError>, shared: &SharedState) -> StreamFaults {
    let mut out = StreamFaults::default();
    while let Ok(err) = faults.pop() {
        if matches!(err, cpal::StreamError::BackendSpecific { .. }) {
            shared.record_backend_error();
            warn!("audio backend: {err}");
            out.warning = Some(err.to_string());
        } else if out.terminal.is_none() {
            out.terminal = Some(err);
        }
    }
    out
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
