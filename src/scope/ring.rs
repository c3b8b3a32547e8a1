use std::sync::atomic::{AtomicU64, Ordering};

use crate::synth::frame::StereoFrame;

/// Fixed-capacity ring of stereo frames, single writer, any number of readers.
///
/// Each slot is one `AtomicU64` holding both channels, so a reader sees either
/// the old frame or the new one, never half of each. `head` counts frames
/// written since the last clear and is published with `Release` after the
/// slots it covers. It is 64-bit on every target so it never wraps in
/// practice. A reader racing the writer may see a window whose oldest
/// frames were just overwritten; that is fine for drawing.
pub struct ScopeBuffer {
    slots: Box<[AtomicU64]>,
    head: AtomicU64,
}

impl ScopeBuffer {
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity.max(1)).map(|_| AtomicU64::new(0)).collect();
        Self {
            slots,
            head: AtomicU64::new(0),
        }
    }

    /// Writer side. Must only be called from one thread at a time.
    #[inline]
    pub fn push(&self, frame: StereoFrame) {
        let head = self.head.load(Ordering::Relaxed);
        self.slots[self.index(head)].store(frame.to_bits(), Ordering::Relaxed);
        self.head.store(head.wrapping_add(1), Ordering::Release);
    }

    /// Writer side, one publish for the whole block.
    pub fn push_slice(&self, frames: &[StereoFrame]) {
        let mut head = self.head.load(Ordering::Relaxed);
        for frame in frames {
            self.slots[self.index(head)].store(frame.to_bits(), Ordering::Relaxed);
            head = head.wrapping_add(1);
        }
        self.head.store(head, Ordering::Release);
    }

    /// Zero the ring. Call only while no writer is running.
    pub fn clear(&self) {
        for slot in self.slots.iter() {
            slot.store(0, Ordering::Relaxed);
        }
        self.head.store(0, Ordering::Release);
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Frames written since the last clear.
    pub fn written(&self) -> u64 {
        self.head.load(Ordering::Acquire)
    }

    /// Frames currently readable.
    pub fn len(&self) -> usize {
        self.written().min(self.capacity() as u64) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.written() == 0
    }

    /// Visit the readable frames, oldest first.
    pub fn for_each_recent<F>(&self, mut visit: F)
    where
        F: FnMut(StereoFrame),
    {
        let head = self.head.load(Ordering::Acquire);
        let len = head.min(self.slots.len() as u64);
        let first = head - len;

        for pos in first..head {
            let slot = &self.slots[self.index(pos)];
            visit(StereoFrame::from_bits(slot.load(Ordering::Relaxed)));
        }
    }

    #[inline]
    fn index(&self, pos: u64) -> usize {
        (pos % self.slots.len() as u64) as usize
    }

    #[cfg(test)]
    fn with_head(capacity: usize, head: u64) -> Self {
        let buffer = Self::new(capacity);
        buffer.head.store(head, Ordering::Relaxed);
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(i: usize) -> StereoFrame {
        StereoFrame::new(i as f32, -(i as f32))
    }

    fn recent(buffer: &ScopeBuffer) -> Vec<StereoFrame> {
        let mut out = Vec::new();
        buffer.for_each_recent(|f| out.push(f));
        out
    }

    #[test]
    fn partial_fill_reads_in_order() {
        let buffer = ScopeBuffer::new(8);
        for i in 0..5 {
            buffer.push(frame(i));
        }
        assert_eq!(buffer.len(), 5);
        assert_eq!(recent(&buffer), (0..5).map(frame).collect::<Vec<_>>());
    }

    #[test]
    fn full_ring_overwrites_oldest() {
        let buffer = ScopeBuffer::new(4);
        let frames: Vec<_> = (0..10).map(frame).collect();
        buffer.push_slice(&frames[..7]);
        buffer.push_slice(&frames[7..]);

        assert_eq!(buffer.written(), 10);
        assert_eq!(buffer.len(), 4);
        assert_eq!(recent(&buffer), (6..10).map(frame).collect::<Vec<_>>());
    }

    #[test]
    fn order_survives_crossing_32_bit_frame_counts() {
        // About 27 h of audio at 44.1 kHz, with a capacity that does not
        // divide 2^32.
        let start = u32::MAX as u64 - 2;
        let buffer = ScopeBuffer::with_head(5, start);
        let frames: Vec<_> = (0..9).map(frame).collect();
        buffer.push_slice(&frames[..4]);
        for &f in &frames[4..] {
            buffer.push(f);
        }

        assert_eq!(buffer.written(), start + 9);
        assert_eq!(buffer.len(), 5);
        assert_eq!(recent(&buffer), (4..9).map(frame).collect::<Vec<_>>());
    }

    #[test]
    fn clear_empties_the_ring() {
        let buffer = ScopeBuffer::new(4);
        buffer.push(frame(1));
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(recent(&buffer).is_empty());
    }

    #[test]
    fn zero_capacity_is_bumped_to_one() {
        let buffer = ScopeBuffer::new(0);
        buffer.push(frame(3));
        buffer.push(frame(4));
        assert_eq!(recent(&buffer), vec![frame(4)]);
    }

    #[test]
    fn concurrent_reader_never_sees_mixed_frames() {
        use std::sync::Arc;
        use std::thread;

        let buffer = Arc::new(ScopeBuffer::new(256));
        let writer = {
            let buffer = buffer.clone();
            thread::spawn(move || {
                for i in 0..200_000usize {
                    let v = (i % 1000) as f32;
                    buffer.push(StereoFrame::new(v, -v));
                }
            })
        };

        for _ in 0..200 {
            buffer.for_each_recent(|f| assert_eq!(f.left, -f.right));
        }
        writer.join().unwrap();
    }
}
