#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::envelope::Envelope;

/// Construction-time settings for a [`Synthesizer`](crate::Synthesizer).
///
/// Sample rate, pool size and channel count are fixed constants and are not
/// part of the config.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SynthConfig {
    /// Envelope handed to every new note.
    pub default_envelope: Envelope,
    /// Final gain stage, clamped to [0, 1].
    pub master_volume: f32,
    /// Seed for the drum noise generator. `None` seeds from the OS.
    pub noise_seed: Option<u64>,
}

impl SynthConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn default_envelope(mut self, envelope: Envelope) -> Self {
        self.default_envelope = envelope;
        self
    }

    pub fn master_volume(mut self, volume: f32) -> Self {
        self.master_volume = crate::clamp_unit(volume);
        self
    }

    pub fn noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = Some(seed);
        self
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            default_envelope: Envelope::default(),
            master_volume: 1.0,
            noise_seed: None,
        }
    }
}
