//! Benchmarks for drum synthesis and mixing.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use pocket_synth::drums::{DrumEngine, DrumKit, DrumPreset};
use pocket_synth::{SynthConfig, Synthesizer};

use crate::BLOCK_SIZES;

pub fn bench_drums(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/drums");

    // Synthesis cost is per hit, independent of block size.
    let kit = DrumKit::default();
    let mut engine = DrumEngine::seeded(0);
    for preset in [DrumPreset::Kick, DrumPreset::HiHat, DrumPreset::Crash] {
        group.bench_function(BenchmarkId::new("synthesize", preset), |b| {
            b.iter(|| black_box(engine.synthesize(kit.get(preset), 0.8)))
        });
    }

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === KIT: every preset ringing at once, retriggered when done ===
        let mut synth = Synthesizer::with_config(SynthConfig::new().noise_seed(0));
        group.bench_with_input(BenchmarkId::new("full_kit_mix", size), &size, |b, _| {
            b.iter(|| {
                if synth.active_drum_hits() == 0 {
                    for preset in DrumPreset::ALL {
                        synth.play_drum_default(preset);
                    }
                }
                synth.render(black_box(&mut buffer));
            })
        });
    }

    group.finish();
}
