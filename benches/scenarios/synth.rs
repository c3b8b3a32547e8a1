//! Benchmarks for stereo frame production.

use std::hint::black_box;
use std::sync::Arc;

use binaural_dsp::{
    scope::ring::ScopeBuffer, BinauralSynth, EngineConfig, StereoFrame, SynthParams,
};
use criterion::{BenchmarkId, Criterion};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_synth(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/synth");
    let config = EngineConfig::default();

    for &size in BLOCK_SIZES {
        let mut frames = vec![StereoFrame::SILENCE; size];

        // Steady tone, no scope
        let mut synth =
            BinauralSynth::new(SAMPLE_RATE, &config, SynthParams::new(200.0, 10.0, 0.3));
        synth.fade_in();
        group.bench_with_input(BenchmarkId::new("steady", size), &size, |b, _| {
            b.iter(|| {
                synth.produce(black_box(&mut frames));
            })
        });

        // Steady tone mirrored into the scope ring
        let scope = Arc::new(ScopeBuffer::new(config.scope_capacity));
        let mut synth =
            BinauralSynth::new(SAMPLE_RATE, &config, SynthParams::new(200.0, 10.0, 0.3))
                .with_scope(scope);
        synth.fade_in();
        group.bench_with_input(BenchmarkId::new("steady+scope", size), &size, |b, _| {
            b.iter(|| {
                synth.produce(black_box(&mut frames));
            })
        });

        // Continuous carrier and beat glides
        let mut synth = BinauralSynth::new(SAMPLE_RATE, &config, SynthParams::default());
        synth.fade_in();
        let mut up = true;
        group.bench_with_input(BenchmarkId::new("gliding", size), &size, |b, _| {
            b.iter(|| {
                if synth.carrier() == synth.target_carrier() {
                    synth.set_carrier(if up { 1500.0 } else { 100.0 });
                    synth.set_beat(if up { 40.0 } else { 0.5 });
                    up = !up;
                }
                synth.produce(black_box(&mut frames));
            })
        });
    }

    group.finish();
}
