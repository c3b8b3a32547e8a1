use std::sync::Arc;

use crate::{scope::ring::ScopeBuffer, synth::frame::StereoFrame};

/// UI-side handle onto the scope ring.
///
/// Cheap to clone; every clone reads the same ring. Reads never block the
/// audio thread.
#[derive(Clone)]
pub struct ScopeSampler {
    buffer: Arc<ScopeBuffer>,
}

impl ScopeSampler {
    pub fn new(buffer: Arc<ScopeBuffer>) -> Self {
        Self { buffer }
    }

    /// Latest mono amplitudes, oldest first, at most `capacity()` values.
    pub fn snapshot(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.buffer.capacity());
        self.snapshot_into(&mut out);
        out
    }

    /// Like [`snapshot`](Self::snapshot) but reuses `out`.
    pub fn snapshot_into(&self, out: &mut Vec<f32>) {
        out.clear();
        self.buffer.for_each_recent(|frame| out.push(frame.mono()));
    }

    /// Both channels of the same window, for per-channel traces.
    pub fn snapshot_frames(&self, out: &mut Vec<StereoFrame>) {
        out.clear();
        self.buffer.for_each_recent(|frame| out.push(frame));
    }

    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }
}

/// Stretch or squeeze `input` to `width` points by linear interpolation.
///
/// Endpoints map to endpoints, so a snapshot of any length fills a display of
/// any width. An empty input yields a flat zero line.
pub fn resample(input: &[f32], width: usize) -> Vec<f32> {
    match (input.len(), width) {
        (_, 0) => Vec::new(),
        (0, _) => vec![0.0; width],
        (1, _) => vec![input[0]; width],
        (n, w) if n == w => input.to_vec(),
        (n, 1) => vec![input[n - 1]],
        (n, w) => {
            let scale = (n - 1) as f64 / (w - 1) as f64;
            (0..w)
                .map(|i| {
                    let pos = i as f64 * scale;
                    let lo = (pos.floor() as usize).min(n - 1);
                    let hi = (lo + 1).min(n - 1);
                    let frac = (pos - lo as f64) as f32;
                    input[lo] + (input[hi] - input[lo]) * frac
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_is_channel_mean() {
        let buffer = Arc::new(ScopeBuffer::new(4));
        buffer.push(StereoFrame::new(1.0, 0.0));
        buffer.push(StereoFrame::new(0.5, 0.5));
        let sampler = ScopeSampler::new(buffer);

        assert_eq!(sampler.snapshot(), vec![0.5, 0.5]);
    }

    #[test]
    fn frames_keep_channels_apart_and_reuse_the_buffer() {
        let buffer = Arc::new(ScopeBuffer::new(2));
        buffer.push(StereoFrame::new(1.0, -1.0));
        buffer.push(StereoFrame::new(0.5, 0.25));
        buffer.push(StereoFrame::new(0.75, 0.0));
        let sampler = ScopeSampler::new(buffer);

        let mut frames = vec![StereoFrame::new(9.0, 9.0); 8];
        sampler.snapshot_frames(&mut frames);
        assert_eq!(
            frames,
            vec![StereoFrame::new(0.5, 0.25), StereoFrame::new(0.75, 0.0)]
        );
    }

    #[test]
    fn snapshot_never_exceeds_capacity() {
        let buffer = Arc::new(ScopeBuffer::new(16));
        let frames = vec![StereoFrame::new(0.1, 0.1); 100];
        buffer.push_slice(&frames);
        let sampler = ScopeSampler::new(buffer);
        assert_eq!(sampler.snapshot().len(), 16);
    }

    #[test]
    fn resample_stretches_linearly() {
        assert_eq!(resample(&[0.0, 1.0], 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn resample_squeezes_keeping_endpoints() {
        let input: Vec<f32> = (0..9).map(|i| i as f32).collect();
        assert_eq!(resample(&input, 3), vec![0.0, 4.0, 8.0]);
    }

    #[test]
    fn resample_degenerate_inputs() {
        assert!(resample(&[1.0, 2.0], 0).is_empty());
        assert_eq!(resample(&[], 3), vec![0.0; 3]);
        assert_eq!(resample(&[0.7], 2), vec![0.7, 0.7]);
    }
}
