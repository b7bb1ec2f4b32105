//! Benchmarks for rendering the voice pool.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pocket_synth::{SynthConfig, Synthesizer, MAX_VOICES};

use crate::BLOCK_SIZES;

/// A synth with `voices` held notes spread over a few channels.
fn synth_with_voices(voices: usize) -> Synthesizer {
    let mut synth = Synthesizer::with_config(SynthConfig::new().noise_seed(0));
    for i in 0..voices {
        synth.note_on((i % 4) as u8, 48 + (i as u8) * 3, 0.8);
    }
    synth
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === SINGLE: one held note ===
        let mut single = synth_with_voices(1);
        group.bench_with_input(BenchmarkId::new("1_voice", size), &size, |b, _| {
            b.iter(|| single.render(black_box(&mut buffer)))
        });

        // === FULL: every voice sounding ===
        let mut full = synth_with_voices(MAX_VOICES);
        group.bench_with_input(BenchmarkId::new("full_pool", size), &size, |b, _| {
            b.iter(|| full.render(black_box(&mut buffer)))
        });

        // === STEALING: a note-on per block against a full pool ===
        let mut stealing = synth_with_voices(MAX_VOICES);
        let mut note = 40u8;
        group.bench_with_input(BenchmarkId::new("steal_per_block", size), &size, |b, _| {
            b.iter(|| {
                note = if note >= 90 { 40 } else { note + 1 };
                stealing.note_on(0, note, 0.8);
                stealing.render(black_box(&mut buffer));
            })
        });

        // === OUTPUT: full pool to interleaved 16-bit stereo ===
        let mut i16_out = vec![0i16; size * 2];
        let mut output = synth_with_voices(MAX_VOICES);
        group.bench_with_input(BenchmarkId::new("full_pool_i16", size), &size, |b, _| {
            b.iter(|| output.render_i16_into(black_box(&mut i16_out)))
        });
    }

    group.finish();
}
