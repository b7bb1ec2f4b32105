//! Benchmarks for ADSR envelope evaluation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pocket_synth::dsp::envelope::Envelope;
use pocket_synth::SAMPLE_RATE;

use crate::BLOCK_SIZES;

const DT: f64 = 1.0 / SAMPLE_RATE as f64;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];
        let env = Envelope::adsr(0.1, 0.1, 0.7, 0.3);

        // Attack phase (ramping up)
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                for (i, out) in buffer.iter_mut().enumerate() {
                    *out = env.gate_gain(black_box(i as f64 * DT));
                }
            })
        });

        // Sustain phase (holding steady)
        group.bench_with_input(BenchmarkId::new("sustain", size), &size, |b, _| {
            b.iter(|| {
                for (i, out) in buffer.iter_mut().enumerate() {
                    *out = env.gate_gain(black_box(1.0 + i as f64 * DT));
                }
            })
        });

        // Release phase (ramping down from sustain)
        group.bench_with_input(BenchmarkId::new("release", size), &size, |b, _| {
            b.iter(|| {
                for (i, out) in buffer.iter_mut().enumerate() {
                    *out = env.release_gain(0.7, black_box(i as f64 * DT));
                }
            })
        });
    }

    group.finish();
}
