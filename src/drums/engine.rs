use std::f64::consts::TAU;

use log::debug;

use crate::drums::preset::DrumSound;
use crate::dsp::oscillator::NoiseSource;
use crate::SAMPLE_RATE;

/// Decay rate of the exponential amplitude curve, per second.
const DECAY_RATE: f64 = 5.0;

/// A pre-rendered hit and how far through it playback is.
#[derive(Debug, Clone)]
pub struct DrumHit {
    samples: Vec<f32>,
    position: usize,
}

impl DrumHit {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.samples.len() - self.position
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.samples.len()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

/// Renders drum hits and mixes every unfinished one.
///
/// Hits are independent: any number may overlap, none can be cut short.
#[derive(Debug)]
pub struct DrumEngine {
    noise: NoiseSource,
    hits: Vec<DrumHit>,
}

impl DrumEngine {
    pub fn new(noise: NoiseSource) -> Self {
        Self {
            noise,
            hits: Vec::new(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(NoiseSource::from_seed(seed))
    }

    /// Render `floor(duration * SAMPLE_RATE)` samples of `sound` at `velocity`.
    ///
    /// Tonal sounds are `velocity * sin(2 pi f t)`, noise sounds
    /// `velocity * N(0, 1)`; both decay as `exp(-5 t)`.
    pub fn synthesize(&mut self, sound: &DrumSound, velocity: f32) -> Vec<f32> {
        let sr = SAMPLE_RATE as f64;
        let len = (sound.duration as f64 * sr).floor() as usize;
        let velocity = velocity as f64;
        let freq = sound.frequency as f64;

        (0..len)
            .map(|i| {
                let t = i as f64 / sr;
                let source = if sound.is_noise {
                    self.noise.next_sample() as f64
                } else {
                    (TAU * freq * t).sin()
                };
                (velocity * source * (-DECAY_RATE * t).exp()) as f32
            })
            .collect()
    }

    /// Synthesize and queue a hit.
    pub fn trigger(&mut self, sound: &DrumSound, velocity: f32) {
        let samples = self.synthesize(sound, velocity);
        debug!(
            "drum hit: {} samples at {} Hz (noise: {}), velocity {velocity}",
            samples.len(),
            sound.frequency,
            sound.is_noise
        );
        self.hits.push(DrumHit {
            samples,
            position: 0,
        });
    }

    /// Add every queued hit into `out`, scaled by `gain`, then drop the
    /// finished ones.
    pub fn mix_into(&mut self, out: &mut [f32], gain: f32) {
        for hit in &mut self.hits {
            let chunk = &hit.samples[hit.position..];
            for (o, s) in out.iter_mut().zip(chunk) {
                *o += s * gain;
            }
            hit.position += chunk.len().min(out.len());
        }
        self.hits.retain(|hit| !hit.is_finished());
    }

    pub fn active_hits(&self) -> usize {
        self.hits.len()
    }

    pub fn hits(&self) -> &[DrumHit] {
        &self.hits
    }

    pub fn clear(&mut self) {
        self.hits.clear();
    }
}
