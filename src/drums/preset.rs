use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::SynthError;
use crate::{MAX_TIME, MIN_TIME};

/// The closed set of drums in the kit.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrumPreset {
    Kick,
    Snare,
    HiHat,
    Crash,
    Ride,
    TomHigh,
    TomMid,
    TomLow,
}

impl DrumPreset {
    pub const ALL: [DrumPreset; 8] = [
        DrumPreset::Kick,
        DrumPreset::Snare,
        DrumPreset::HiHat,
        DrumPreset::Crash,
        DrumPreset::Ride,
        DrumPreset::TomHigh,
        DrumPreset::TomMid,
        DrumPreset::TomLow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DrumPreset::Kick => "kick",
            DrumPreset::Snare => "snare",
            DrumPreset::HiHat => "hihat",
            DrumPreset::Crash => "crash",
            DrumPreset::Ride => "ride",
            DrumPreset::TomHigh => "tom_high",
            DrumPreset::TomMid => "tom_mid",
            DrumPreset::TomLow => "tom_low",
        }
    }

    /// General MIDI percussion key map (channel 10 in 1-based numbering).
    ///
    /// Nearby GM keys collapse onto the closest drum in the kit.
    pub fn from_gm_note(note: u8) -> Option<Self> {
        match note {
            35 | 36 => Some(DrumPreset::Kick),
            38 | 40 => Some(DrumPreset::Snare),
            42 | 44 | 46 => Some(DrumPreset::HiHat),
            49 | 57 => Some(DrumPreset::Crash),
            51 | 59 => Some(DrumPreset::Ride),
            48 | 50 => Some(DrumPreset::TomHigh),
            45 | 47 => Some(DrumPreset::TomMid),
            41 | 43 => Some(DrumPreset::TomLow),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DrumPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DrumPreset {
    type Err = SynthError;

    /// Case-insensitive; `-` and `_` are interchangeable.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        DrumPreset::ALL
            .into_iter()
            .find(|preset| preset.name() == wanted)
            .ok_or_else(|| SynthError::UnknownPreset(s.to_string()))
    }
}

/// A percussive one-shot: a sine or noise burst with a fixed exponential
/// decay over `duration` seconds.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrumSound {
    /// Tone frequency in Hz. Unused by noise sounds.
    pub frequency: f32,
    /// Length of the rendered hit in seconds.
    pub duration: f32,
    /// Default loudness when played without an explicit velocity.
    pub volume: f32,
    /// Noise burst instead of a sine tone.
    pub is_noise: bool,
}

impl DrumSound {
    /// Duration is clamped to [0.001, 2.0] s, volume to [0, 1], frequency to
    /// a non-negative value.
    pub fn new(frequency: f32, duration: f32, volume: f32, is_noise: bool) -> Self {
        let duration = if duration.is_nan() {
            MIN_TIME
        } else {
            duration.clamp(MIN_TIME, MAX_TIME)
        };
        let frequency = if frequency.is_nan() {
            0.0
        } else {
            frequency.max(0.0)
        };

        Self {
            frequency,
            duration,
            volume: crate::clamp_unit(volume),
            is_noise,
        }
    }

    pub const fn tone(frequency: f32, duration: f32, volume: f32) -> Self {
        Self {
            frequency,
            duration,
            volume,
            is_noise: false,
        }
    }

    pub const fn noise(frequency: f32, duration: f32, volume: f32) -> Self {
        Self {
            frequency,
            duration,
            volume,
            is_noise: true,
        }
    }
}

/// The fixed preset table. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct DrumKit {
    sounds: [DrumSound; 8],
}

impl DrumKit {
    /// The standard kit, indexed in [`DrumPreset::ALL`] order.
    pub const STANDARD: DrumKit = DrumKit {
        sounds: [
            DrumSound::tone(60.0, 0.2, 0.8),     // kick: low, long
            DrumSound::noise(200.0, 0.1, 0.7),   // snare
            DrumSound::noise(8000.0, 0.05, 0.6), // hihat: short
            DrumSound::noise(5000.0, 0.3, 0.9),  // crash: long
            DrumSound::noise(3000.0, 0.15, 0.7), // ride
            DrumSound::tone(400.0, 0.12, 0.7),   // tom high
            DrumSound::tone(200.0, 0.15, 0.8),   // tom mid
            DrumSound::tone(100.0, 0.2, 0.9),    // tom low
        ],
    };

    pub fn get(&self, preset: DrumPreset) -> &DrumSound {
        &self.sounds[preset.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (DrumPreset, &DrumSound)> {
        DrumPreset::ALL.into_iter().zip(self.sounds.iter())
    }
}

impl Default for DrumKit {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_kit_matches_table() {
        let kit = DrumKit::default();
        assert_eq!(*kit.get(DrumPreset::Kick), DrumSound::tone(60.0, 0.2, 0.8));
        assert_eq!(*kit.get(DrumPreset::HiHat), DrumSound::noise(8000.0, 0.05, 0.6));
        assert_eq!(*kit.get(DrumPreset::TomLow), DrumSound::tone(100.0, 0.2, 0.9));

        let noisy: Vec<_> = kit
            .iter()
            .filter(|(_, sound)| sound.is_noise)
            .map(|(preset, _)| preset)
            .collect();
        assert_eq!(
            noisy,
            [DrumPreset::Snare, DrumPreset::HiHat, DrumPreset::Crash, DrumPreset::Ride]
        );
    }

    #[test]
    fn parses_names() {
        assert_eq!("KICK".parse::<DrumPreset>(), Ok(DrumPreset::Kick));
        assert_eq!("tom-high".parse::<DrumPreset>(), Ok(DrumPreset::TomHigh));
        assert_eq!(" ride ".parse::<DrumPreset>(), Ok(DrumPreset::Ride));
        for preset in DrumPreset::ALL {
            assert_eq!(preset.to_string().parse::<DrumPreset>(), Ok(preset));
        }
    }

    #[test]
    fn unknown_name_is_reported() {
        assert_eq!(
            "cowbell".parse::<DrumPreset>(),
            Err(SynthError::UnknownPreset("cowbell".into()))
        );
    }

    #[test]
    fn gm_note_map() {
        assert_eq!(DrumPreset::from_gm_note(36), Some(DrumPreset::Kick));
        assert_eq!(DrumPreset::from_gm_note(42), Some(DrumPreset::HiHat));
        assert_eq!(DrumPreset::from_gm_note(41), Some(DrumPreset::TomLow));
        assert_eq!(DrumPreset::from_gm_note(56), None);
    }

    #[test]
    fn custom_sound_is_clamped() {
        let sound = DrumSound::new(-10.0, 9.0, 3.0, true);
        assert_eq!(sound.frequency, 0.0);
        assert_eq!(sound.duration, 2.0);
        assert_eq!(sound.volume, 1.0);
    }
}
