#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One interleaved stereo sample pair.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StereoFrame {
    pub left: f32,
    pub right: f32,
}

impl StereoFrame {
    pub const SILENCE: Self = Self {
        left: 0.0,
        right: 0.0,
    };

    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Bound both channels to [-1.0, 1.0]; non-finite samples become silence.
    #[inline]
    pub fn clipped(self) -> Self {
        Self {
            left: clip(self.left),
            right: clip(self.right),
        }
    }

    /// Channel mean, used for the mono oscilloscope trace.
    #[inline]
    pub fn mono(self) -> f32 {
        0.5 * (self.left + self.right)
    }

    /// Pack both channels into one word so a frame can be stored atomically.
    #[inline]
    pub fn to_bits(self) -> u64 {
        ((self.left.to_bits() as u64) << 32) | self.right.to_bits() as u64
    }

    #[inline]
    pub fn from_bits(bits: u64) -> Self {
        Self {
            left: f32::from_bits((bits >> 32) as u32),
            right: f32::from_bits(bits as u32),
        }
    }
}

#[inline]
fn clip(sample: f32) -> f32 {
    if sample.is_finite() {
        sample.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipping_bounds_and_silences_garbage() {
        let frame = StereoFrame::new(1.7, f32::NAN).clipped();
        assert_eq!(frame, StereoFrame::new(1.0, 0.0));

        let frame = StereoFrame::new(-3.0, f32::NEG_INFINITY).clipped();
        assert_eq!(frame, StereoFrame::new(-1.0, 0.0));

        let frame = StereoFrame::new(0.25, -0.5).clipped();
        assert_eq!(frame, StereoFrame::new(0.25, -0.5));
    }

    #[test]
    fn packed_frame_keeps_both_channels() {
        let frame = StereoFrame::new(-0.123, 0.987);
        assert_eq!(StereoFrame::from_bits(frame.to_bits()), frame);
        assert_eq!(StereoFrame::from_bits(0), StereoFrame::SILENCE);
    }

    #[test]
    fn mono_is_channel_mean() {
        assert_eq!(StereoFrame::new(0.5, -0.25).mono(), 0.125);
    }
}
