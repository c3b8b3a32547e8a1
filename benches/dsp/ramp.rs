//! Benchmarks for the ramp controller.

use std::hint::black_box;

use binaural_dsp::dsp::ramp::{Ramp, RampShape};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_ramp(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/ramp");

    for &size in BLOCK_SIZES {
        let shapes = [
            ("linear", RampShape::Linear),
            ("exponential", RampShape::Exponential),
        ];
        for (name, shape) in shapes {
            let mut ramp = Ramp::new(50.0, SAMPLE_RATE).with_shape(shape);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, &size| {
                b.iter(|| {
                    if ramp.is_settled() {
                        let next = if ramp.target() > 1000.0 { 50.0 } else { 2000.0 };
                        ramp.set_target(next, 1000.0);
                    }
                    for _ in 0..size {
                        black_box(ramp.tick());
                    }
                })
            });
        }

        // Settled - the common case once a glide is over
        let mut ramp = Ramp::new(0.3, SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("settled", size), &size, |b, &size| {
            b.iter(|| {
                for _ in 0..size {
                    black_box(ramp.tick());
                }
            })
        });
    }

    group.finish();
}
