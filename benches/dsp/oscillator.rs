//! Benchmarks for sine generation.

use std::hint::black_box;

use binaural_dsp::dsp::{oscillator::SineOscillator, ramp::Ramp};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Fixed frequency - one sin() per sample
        let mut osc = SineOscillator::new(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("fixed", size), &size, |b, _| {
            b.iter(|| {
                osc.advance(black_box(&mut buffer), black_box(200.0));
            })
        });

        // Gliding - frequency pulled from a ramp every sample
        let mut osc = SineOscillator::new(SAMPLE_RATE);
        let mut glide = Ramp::new(100.0, SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("glide", size), &size, |b, _| {
            b.iter(|| {
                if glide.is_settled() {
                    let next = if glide.target() > 1000.0 { 100.0 } else { 2000.0 };
                    glide.set_target(next, 50.0);
                }
                osc.advance_with(black_box(&mut buffer), || glide.tick());
            })
        });
    }

    group.finish();
}
