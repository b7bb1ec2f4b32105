//! Benchmarks for the sine oscillator and the Gaussian noise source.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pocket_synth::dsp::oscillator::{NoiseSource, SineOscillator};
use pocket_synth::SAMPLE_RATE;

use crate::BLOCK_SIZES;

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");
    let sample_rate = SAMPLE_RATE as f32;

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        let mut osc = SineOscillator::new();
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| osc.render(black_box(&mut buffer), black_box(440.0), sample_rate))
        });

        let mut noise = NoiseSource::from_seed(0);
        group.bench_with_input(BenchmarkId::new("noise", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    *out = noise.next_sample();
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
