#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Ramp Controller
===============

A ramp moves a value from where it is now to a target over a fixed number
of sample frames. The synth keeps three of them: carrier frequency, beat
offset, and output gain. Setting any of these directly would step the
value in one sample, which is heard as a click (gain) or a zipper (pitch).

Vocabulary
----------

  start       The value at the moment the current ramp began.

  target      Where the ramp is heading. Once reached, every further tick
              returns exactly this value.

  steps       How many frames the ramp lasts: duration_ms · sample_rate / 1000.
              A 10 ms ramp at 44.1 kHz is 441 frames.


Retargeting
-----------

If a new target arrives mid-ramp, the new ramp begins from the value the
listener is hearing right now, not from the old target:

    value
      1.0 ┤        ╱‾‾‾‾ old target (never reached)
          │      ╱
      0.5 ┤    ╱ ← retarget here
          │  ╱   ╲
      0.0 ┼╱       ╲___ new target
          └──────────────→ frames

Starting from the old target would jump by the remaining distance.


No accumulation
---------------

Each tick recomputes the value from `start`, `target` and the fraction of
frames elapsed instead of adding a per-frame step. Repeated addition drifts,
and with a small step on a large value (a slow glide near 2 kHz) the step
can vanish in rounding entirely, leaving the whole distance to the final
frame. Interpolation is done in f64 and clamped to the span between start
and target, so the sequence is monotonic and cannot overshoot.


Shapes
------

  Linear        start + (target - start) · t
  Exponential   start · (target / start)^t

Exponential moves by equal ratios per frame, which sounds like an even pitch
glide. It needs both endpoints strictly positive; otherwise linear is used.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RampShape {
    #[default]
    Linear,
    Exponential,
}

#[derive(Debug, Clone)]
pub struct Ramp {
    sample_rate: f32,
    shape: RampShape,

    // Current ramp segment
    start: f64,
    current: f64,
    target: f64,
    total_steps: u32,
    steps_remaining: u32,
}

impl Ramp {
    /// A settled ramp sitting at `value`.
    pub fn new(value: f32, sample_rate: f32) -> Self {
        let value = value as f64;
        Self {
            sample_rate,
            shape: RampShape::Linear,
            start: value,
            current: value,
            target: value,
            total_steps: 0,
            steps_remaining: 0,
        }
    }

    pub fn with_shape(mut self, shape: RampShape) -> Self {
        self.shape = shape;
        self
    }

    /// Begin a ramp from the current value to `value` over `duration_ms`.
    ///
    /// A duration shorter than one frame jumps straight to the target.
    pub fn set_target(&mut self, value: f32, duration_ms: f32) {
        self.start = self.current;
        self.target = value as f64;

        let steps = self.frames_for(duration_ms);
        if steps == 0 || self.start == self.target {
            self.settle();
            return;
        }

        self.total_steps = steps;
        self.steps_remaining = steps;
    }

    /// Move to `value` immediately, cancelling any ramp in flight.
    pub fn jump_to(&mut self, value: f32) {
        self.target = value as f64;
        self.settle();
    }

    /// Advance one frame and return the value for that frame.
    #[inline]
    pub fn tick(&mut self) -> f32 {
        if self.steps_remaining == 0 {
            return self.target as f32;
        }

        self.steps_remaining -= 1;
        if self.steps_remaining == 0 {
            self.current = self.target;
        } else {
            let elapsed = self.total_steps - self.steps_remaining;
            let t = elapsed as f64 / self.total_steps as f64;
            self.current = self.interpolate(t);
        }

        self.current as f32
    }

    /// The value produced by the most recent tick.
    pub fn value(&self) -> f32 {
        self.current as f32
    }

    pub fn target(&self) -> f32 {
        self.target as f32
    }

    pub fn steps_remaining(&self) -> u32 {
        self.steps_remaining
    }

    pub fn is_settled(&self) -> bool {
        self.steps_remaining == 0
    }

    pub fn shape(&self) -> RampShape {
        self.shape
    }

    fn frames_for(&self, duration_ms: f32) -> u32 {
        let frames = (duration_ms as f64 * self.sample_rate as f64 / 1000.0).round();
        if frames.is_finite() && frames >= 1.0 {
            frames.min(u32::MAX as f64) as u32
        } else {
            0
        }
    }

    fn settle(&mut self) {
        self.start = self.target;
        self.current = self.target;
        self.total_steps = 0;
        self.steps_remaining = 0;
    }

    fn interpolate(&self, t: f64) -> f64 {
        let (start, target) = (self.start, self.target);
        let value = match self.shape {
            RampShape::Exponential if start > 0.0 && target > 0.0 => {
                start * (target / start).powf(t)
            }
            _ => start + (target - start) * t,
        };

        let (lo, hi) = if start <= target {
            (start, target)
        } else {
            (target, start)
        };
        value.clamp(lo, hi)
    }
}
