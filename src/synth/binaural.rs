use std::sync::Arc;

use crate::{
    dsp::{oscillator::SineOscillator, ramp::Ramp},
    engine::config::EngineConfig,
    scope::ring::ScopeBuffer,
    synth::{
        frame::StereoFrame,
        message::SynthMessage,
        params::{clamp_beat, clamp_carrier, clamp_gain, SynthParams},
    },
};

/*
Binaural Frame Synthesis
========================

Two sine oscillators, one per ear:

    left  = sin(carrier)
    right = sin(carrier + beat)

Nothing mixes the two. Each ear gets its own pure tone and the beat is
perceived centrally, so the stereo separation is the whole effect. Summing
the channels would produce an acoustic beat instead, a different thing.

Signal path per frame
---------------------

    gain ramp ─────────────────────────────┐
    carrier ramp ──┬──► left osc ──► × ────┼──► clip ──► left
                   │                       │
    beat ramp ──► (+) ─► right osc ──► × ──┴──► clip ──► right

All three ramps advance once per frame, before the oscillators read them,
so a glide reaches the oscillators sample by sample.

Gate
----

The gain ramp doubles as the start/stop fade. `fade_in` opens the gate and
ramps toward the volume; `fade_out` closes it and ramps toward zero. The
engine only tears the stream down once `is_silent` reports the fade-out has
landed on zero.
*/

pub struct BinauralSynth {
    sample_rate: f32,
    left: SineOscillator,
    right: SineOscillator,

    carrier: Ramp,
    beat: Ramp,
    gain: Ramp,

    volume: f32,
    gate: bool,
    fade_ms: f32,
    glide_ms: f32,

    scope: Option<Arc<ScopeBuffer>>,
}

impl BinauralSynth {
    /// A silent synth with the gate closed, tuned to `params`.
    pub fn new(sample_rate: f32, config: &EngineConfig, params: SynthParams) -> Self {
        let params = params.clamped();

        Self {
            sample_rate,
            left: SineOscillator::new(sample_rate),
            right: SineOscillator::new(sample_rate),
            carrier: Ramp::new(params.carrier_hz, sample_rate).with_shape(config.glide_shape),
            beat: Ramp::new(params.beat_hz, sample_rate).with_shape(config.glide_shape),
            gain: Ramp::new(0.0, sample_rate),
            volume: params.volume,
            gate: false,
            fade_ms: config.fade_ms,
            glide_ms: config.glide_ms,
            scope: None,
        }
    }

    /// Mirror every produced frame into `scope`.
    pub fn with_scope(mut self, scope: Arc<ScopeBuffer>) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn handle(&mut self, msg: SynthMessage) {
        match msg {
            SynthMessage::SetCarrier { hz } => self.set_carrier(hz),
            SynthMessage::SetBeat { hz } => self.set_beat(hz),
            SynthMessage::SetVolume { level } => self.set_volume(level),
            SynthMessage::FadeIn => self.fade_in(),
            SynthMessage::FadeOut => self.fade_out(),
        }
    }

    pub fn set_carrier(&mut self, hz: f32) {
        self.carrier.set_target(clamp_carrier(hz), self.glide_ms);
    }

    pub fn set_beat(&mut self, hz: f32) {
        self.beat.set_target(clamp_beat(hz), self.glide_ms);
    }

    /// Set the level the gain settles at while the gate is open.
    pub fn set_volume(&mut self, level: f32) {
        self.volume = clamp_gain(level);
        if self.gate {
            self.gain.set_target(self.volume, self.fade_ms);
        }
    }

    pub fn fade_in(&mut self) {
        self.gate = true;
        self.gain.set_target(self.volume, self.fade_ms);
    }

    pub fn fade_out(&mut self) {
        self.gate = false;
        self.gain.set_target(0.0, self.fade_ms);
    }

    /// Advance every ramp and both oscillators by one frame.
    #[inline]
    pub fn next_frame(&mut self) -> StereoFrame {
        let gain = self.gain.tick();
        let carrier = self.carrier.tick();
        let beat = self.beat.tick();

        let left = self.left.next_sample(carrier);
        let right = self.right.next_sample(carrier + beat);

        StereoFrame::new(left * gain, right * gain).clipped()
    }

    /// Fill `out` with consecutive frames and copy them to the scope ring.
    pub fn produce(&mut self, out: &mut [StereoFrame]) {
        for frame in out.iter_mut() {
            *frame = self.next_frame();
        }

        if let Some(scope) = &self.scope {
            scope.push_slice(out);
        }
    }

    /// True once a fade-out has fully landed on zero.
    pub fn is_silent(&self) -> bool {
        !self.gate && self.gain.is_settled() && self.gain.target() == 0.0
    }

    pub fn gain(&self) -> f32 {
        self.gain.value()
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn carrier(&self) -> f32 {
        self.carrier.value()
    }

    pub fn beat(&self) -> f32 {
        self.beat.value()
    }

    pub fn target_carrier(&self) -> f32 {
        self.carrier.target()
    }

    pub fn target_beat(&self) -> f32 {
        self.beat.target()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    const SAMPLE_RATE: f32 = 44_100.0;

    fn synth(params: SynthParams) -> BinauralSynth {
        BinauralSynth::new(SAMPLE_RATE, &EngineConfig::default(), params)
    }

    fn render(synth: &mut BinauralSynth, frames: usize) -> Vec<StereoFrame> {
        let mut out = vec![StereoFrame::SILENCE; frames];
        synth.produce(&mut out);
        out
    }

    #[test]
    fn starts_silent_with_gate_closed() {
        let mut synth = synth(SynthParams::default());
        assert!(synth.is_silent());
        let frames = render(&mut synth, 256);
        assert!(frames.iter().all(|f| *f == StereoFrame::SILENCE));
    }

    #[test]
    fn targets_are_clamped_and_reached() {
        let mut synth = synth(SynthParams::default());
        for (input, expected) in [(10.0, 50.0), (440.0, 440.0), (9000.0, 2000.0)] {
            synth.set_carrier(input);
            render(&mut synth, 4096);
            assert_eq!(synth.target_carrier(), expected);
            assert_eq!(synth.carrier(), expected);
        }
        for (input, expected) in [(0.0, 0.1), (12.5, 12.5), (99.0, 40.0)] {
            synth.set_beat(input);
            render(&mut synth, 4096);
            assert_eq!(synth.target_beat(), expected);
            assert_eq!(synth.beat(), expected);
        }
    }

    #[test]
    fn fade_in_reaches_volume_then_holds() {
        let mut synth = synth(SynthParams::new(200.0, 10.0, 0.5));
        synth.fade_in();

        let fade_frames = (EngineConfig::default().fade_ms * SAMPLE_RATE / 1000.0) as usize;
        render(&mut synth, fade_frames);
        assert_eq!(synth.gain(), 0.5);

        let frames = render(&mut synth, 2048);
        let peak = frames
            .iter()
            .fold(0.0f32, |acc, f| acc.max(f.left.abs()).max(f.right.abs()));
        assert!(peak > 0.49 && peak <= 0.5, "peak {peak}");
    }

    #[test]
    fn gain_moves_at_most_one_step_per_frame() {
        let config = EngineConfig::default();
        let mut synth = synth(SynthParams::new(200.0, 10.0, 1.0));
        let gain_step = 1.0 / (config.fade_ms * SAMPLE_RATE / 1000.0);

        synth.fade_in();
        let mut previous = synth.gain();
        for i in 0..2000 {
            if i == 150 {
                synth.fade_out();
            }
            if i == 400 {
                synth.fade_in();
            }
            synth.next_frame();
            let delta = (synth.gain() - previous).abs();
            assert!(delta <= 2.0 * gain_step, "frame {i}: gain moved {delta}");
            previous = synth.gain();
        }
    }

    #[test]
    fn fade_out_lands_on_silence() {
        let mut synth = synth(SynthParams::default());
        synth.fade_in();
        render(&mut synth, 1000);
        synth.fade_out();
        assert!(!synth.is_silent());

        render(&mut synth, 1000);
        assert!(synth.is_silent());
        let tail = render(&mut synth, 64);
        assert!(tail.iter().all(|f| *f == StereoFrame::SILENCE));
    }

    #[test]
    fn volume_change_while_closed_waits_for_gate() {
        let mut synth = synth(SynthParams::default());
        synth.set_volume(0.8);
        render(&mut synth, 1000);
        assert_eq!(synth.gain(), 0.0);

        synth.fade_in();
        render(&mut synth, 1000);
        assert_eq!(synth.gain(), 0.8);
    }

    #[test]
    fn channels_carry_separate_frequencies() {
        let mut synth = synth(SynthParams::new(200.0, 10.0, 1.0));
        synth.fade_in();
        render(&mut synth, 441);

        // With the gain settled each channel must match a lone oscillator.
        let frames = render(&mut synth, 4);

        let mut left_osc = SineOscillator::new(SAMPLE_RATE);
        let mut right_osc = SineOscillator::new(SAMPLE_RATE);
        for _ in 0..441 {
            left_osc.next_sample(200.0);
            right_osc.next_sample(210.0);
        }
        for frame in frames {
            assert!((frame.left - left_osc.next_sample(200.0)).abs() < 1e-4);
            assert!((frame.right - right_osc.next_sample(210.0)).abs() < 1e-4);
        }
    }

    #[test]
    fn scope_receives_produced_frames() {
        let scope = Arc::new(ScopeBuffer::new(64));
        let mut synth = synth(SynthParams::default()).with_scope(scope.clone());
        synth.fade_in();
        render(&mut synth, 100);
        assert_eq!(scope.written(), 100);
        assert_eq!(scope.len(), 64);
    }

    #[test]
    fn glide_never_jumps_the_waveform() {
        let mut synth = synth(SynthParams::new(100.0, 4.0, 1.0));
        synth.fade_in();
        render(&mut synth, 1000);

        synth.set_carrier(2000.0);
        let frames = render(&mut synth, 4096);
        let max_step = TAU * 2040.0 / SAMPLE_RATE;
        for pair in frames.windows(2) {
            assert!((pair[1].left - pair[0].left).abs() <= max_step + 1e-4);
            assert!((pair[1].right - pair[0].right).abs() <= max_step + 1e-4);
        }
    }
}
