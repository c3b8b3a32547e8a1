use std::f32::consts::TAU;

/*
Phase-Continuous Sine Oscillator
================================

The oscillator keeps a single piece of state: its phase, an angle in
[0, 2π). Every sample it emits sin(phase) and then advances the phase by

    increment = 2π · frequency / sample_rate

Vocabulary
----------

  phase       Where we are inside one cycle, in radians. 0 is the upward
              zero crossing, π/2 the positive peak.

  increment   How far the phase moves per sample. At 200 Hz and 44.1 kHz
              that is 2π · 200 / 44100 ≈ 0.0285 rad.

  wrap        Subtracting 2π once the phase passes it. sin() does not care,
              but a phase that grows forever loses f32 precision and the
              tone slowly goes out of tune.


Why the phase must never jump
-----------------------------

A naive oscillator computes sin(2π · f · t) from a time counter. That works
until f changes: the new product f · t lands somewhere unrelated on the
sine and the waveform jumps, which is heard as a click.

    f · t form:     ╱╲  ╱╲ |╲  ╱╲      (jump at the change)
    phase form:     ╱╲  ╱╲  ╱ ╲  ╱ ╲   (slope changes, level does not)

Accumulating the phase means a frequency change only alters how fast we
move from here on. The level at the boundary is untouched.


Per-sample frequency
--------------------

`advance_with` pulls a new frequency for every sample instead of once per
block. During a glide the frequency moves every sample, so sampling it per
block would turn a smooth glide into a staircase with one step per
callback.
*/

#[derive(Debug, Clone)]
pub struct SineOscillator {
    phase: f32,
    sample_rate: f32,
}

impl SineOscillator {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            sample_rate,
        }
    }

    /// Emit one sample at `frequency` and advance the phase.
    #[inline]
    pub fn next_sample(&mut self, frequency: f32) -> f32 {
        let sample = self.phase.sin();

        self.phase += TAU * frequency / self.sample_rate;
        if self.phase >= TAU {
            self.phase -= TAU;
        }
        // Only reachable with frequencies above the sample rate.
        if !(0.0..TAU).contains(&self.phase) {
            self.phase = self.phase.rem_euclid(TAU);
            if self.phase >= TAU || !self.phase.is_finite() {
                self.phase = 0.0;
            }
        }

        sample
    }

    /// Fill `out` at a fixed frequency.
    pub fn advance(&mut self, out: &mut [f32], frequency: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(frequency);
        }
    }

    /// Fill `out`, asking `frequency` for the value in effect at each sample.
    pub fn advance_with<F>(&mut self, out: &mut [f32], mut frequency: F)
    where
        F: FnMut() -> f32,
    {
        for sample in out.iter_mut() {
            *sample = self.next_sample(frequency());
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}
