use std::f64::consts::TAU;

use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Sine oscillator driven by a normalized phase accumulator.
///
/// The frequency is passed per sample so a voice can be retuned without
/// touching the oscillator. A frequency of 0 Hz holds the phase at zero and
/// produces silence.
#[derive(Debug, Clone, Default)]
pub struct SineOscillator {
    phase: f64, // 0.0 ..< 1.0
}

impl SineOscillator {
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Restart the waveform at phase zero.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let sample = (TAU * self.phase).sin();
        self.phase = (self.phase + frequency as f64 / sample_rate as f64).fract();
        sample as f32
    }

    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }
}

/// White noise with a standard normal distribution.
pub struct NoiseSource {
    rng: StdRng,
}

impl NoiseSource {
    /// Reproducible noise; identical seeds give identical streams.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        self.rng.sample(StandardNormal)
    }
}

impl std::fmt::Debug for NoiseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseSource").finish_non_exhaustive()
    }
}
