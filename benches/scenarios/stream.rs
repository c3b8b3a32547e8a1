//! Benchmarks for the device pull callback.

use std::hint::black_box;
use std::sync::Arc;

use binaural_dsp::{
    engine::{callback::StreamCallback, state::SharedState},
    scope::ring::ScopeBuffer,
    synth::message::SynthMessage,
    BinauralSynth, EngineConfig, SynthParams,
};
use criterion::{BenchmarkId, Criterion};
use rtrb::RingBuffer;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_stream(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/stream");
    let config = EngineConfig::default();

    for &size in BLOCK_SIZES {
        // f32 stereo, the common desktop format
        let (mut tx, rx) = RingBuffer::new(256);
        let scope = Arc::new(ScopeBuffer::new(config.scope_capacity));
        let synth = BinauralSynth::new(SAMPLE_RATE, &config, SynthParams::new(200.0, 10.0, 0.3))
            .with_scope(scope);
        let mut callback = StreamCallback::new(synth, rx, Arc::new(SharedState::new()), 2);
        let _ = tx.push(SynthMessage::FadeIn);

        let mut data = vec![0.0f32; 2 * size];
        group.bench_with_input(BenchmarkId::new("f32_stereo", size), &size, |b, _| {
            b.iter(|| {
                let _ = tx.push(SynthMessage::SetCarrier { hz: 200.0 });
                callback.render(black_box(&mut data));
            })
        });

        // i16 stereo, conversion on every sample
        let (mut tx, rx) = RingBuffer::new(256);
        let synth = BinauralSynth::new(SAMPLE_RATE, &config, SynthParams::new(200.0, 10.0, 0.3));
        let mut callback = StreamCallback::new(synth, rx, Arc::new(SharedState::new()), 2);
        let _ = tx.push(SynthMessage::FadeIn);

        let mut data = vec![0i16; 2 * size];
        group.bench_with_input(BenchmarkId::new("i16_stereo", size), &size, |b, _| {
            b.iter(|| {
                callback.render(black_box(&mut data));
            })
        });
    }

    group.finish();
}
