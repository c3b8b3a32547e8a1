//! The pull function handed to the audio device.
//!
//! `StreamCallback` knows nothing about cpal streams or devices: it fills an
//! interleaved slice of any cpal sample type, so it can be driven by a real
//! device or by a test with a plain `Vec`.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use cpal::{FromSample, Sample};

use crate::{
    engine::state::{EngineState, SharedState},
    synth::{binaural::BinauralSynth, frame::StereoFrame, message::MessageReceiver},
    MAX_BLOCK_SIZE,
};

pub struct StreamCallback<R: MessageReceiver> {
    synth: BinauralSynth,
    rx: R,
    shared: Arc<SharedState>,
    channels: usize,
    sample_rate: f64,
    // Render scratch, sized once so the callback never allocates
    frames: Vec<StereoFrame>,
}

impl<R: MessageReceiver> StreamCallback<R> {
    pub fn new(synth: BinauralSynth, rx: R, shared: Arc<SharedState>, channels: usize) -> Self {
        let sample_rate = synth.sample_rate() as f64;
        Self {
            synth,
            rx,
            shared,
            channels: channels.max(1),
            sample_rate,
            frames: vec![StereoFrame::SILENCE; MAX_BLOCK_SIZE],
        }
    }

    /// Fill one device buffer.
    ///
    /// A panic inside the render is caught here and turned into a silent
    /// buffer; unwinding into the audio driver is not an option.
    pub fn render<T>(&mut self, data: &mut [T])
    where
        T: Sample + FromSample<f32>,
    {
        let started = Instant::now();

        let rendered = panic::catch_unwind(AssertUnwindSafe(|| self.render_block(data)));
        if rendered.is_err() {
            data.fill(T::EQUILIBRIUM);
            self.shared.record_fault();
        }

        let frames = data.len() / self.channels;
        if started.elapsed() > self.deadline(frames) {
            self.shared.record_underrun();
        }
        self.shared.record_callback();
    }

    pub fn synth(&self) -> &BinauralSynth {
        &self.synth
    }

    fn deadline(&self, frames: usize) -> Duration {
        Duration::from_secs_f64(frames as f64 / self.sample_rate)
    }

    fn render_block<T>(&mut self, data: &mut [T])
    where
        T: Sample + FromSample<f32>,
    {
        self.shared
            .transition(EngineState::Starting, EngineState::Running);

        // Read before draining: the fade-out of this epoch was queued
        // before the epoch was published, so it is handled below.
        let epoch = self.shared.stop_epoch();
        while let Some(msg) = self.rx.pop() {
            self.synth.handle(msg);
        }

        let channels = self.channels;
        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
            let block = &mut self.frames[..frames_to_render];
            self.synth.produce(block);

            let out_off = frames_written * channels;
            let out = &mut data[out_off..out_off + frames_to_render * channels];
            for (slot, &frame) in out.chunks_exact_mut(channels).zip(block.iter()) {
                write_frame(slot, frame);
            }

            frames_written += frames_to_render;
        }

        // A trailing partial frame never reaches a speaker, keep it quiet.
        data[total_frames * channels..].fill(T::EQUILIBRIUM);

        if self.shared.state() == EngineState::Stopping && self.synth.is_silent() {
            self.shared.mark_drained(epoch);
        }
    }
}

/// Map one stereo frame onto a device frame of any width.
///
/// Channel 0 is left, channel 1 right, extra channels stay silent, and a
/// mono device gets the channel mean.
#[inline]
fn write_frame<T>(slot: &mut [T], frame: StereoFrame)
where
    T: Sample + FromSample<f32>,
{
    match slot {
        [] => {}
        [mono] => *mono = T::from_sample(frame.mono()),
        [left, right, rest @ ..] => {
            *left = T::from_sample(frame.left);
            *right = T::from_sample(frame.right);
            rest.fill(T::EQUILIBRIUM);
        }
    }
}
