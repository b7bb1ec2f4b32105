//! Polyphonic ADSR synthesizer core.
//!
//! A fixed pool of [`MAX_VOICES`] sine voices shaped by linear ADSR envelopes,
//! a one-shot drum engine, and a mix stage with per-channel and master gain.
//! Time is a sample clock advanced by render calls.

pub mod drums; // Fixed drum kit and one-shot percussion synthesis
pub mod dsp;
pub mod error;
pub mod io;
pub mod sequencing; // Step patterns and the playback loop
pub mod synth; // Voice pool, note routing and mixing

pub use drums::{DrumPreset, DrumSound};
pub use dsp::envelope::Envelope;
pub use error::{Result, SynthError};
pub use sequencing::{Pattern, PlaybackLoop, Sequencer};
pub use synth::{SharedSynth, SynthConfig, Synthesizer};

/// Output sample rate in Hz. Fixed, not configurable.
pub const SAMPLE_RATE: u32 = 44_100;
/// Size of the voice pool.
pub const MAX_VOICES: usize = 8;
/// Number of logical gain channels.
pub const MAX_CHANNELS: usize = 16;
pub const MAX_BLOCK_SIZE: usize = 2048;

pub(crate) const MIN_TIME: f32 = 0.001;
pub(crate) const MAX_TIME: f32 = 2.0;

/// Clamp to [0, 1], mapping NaN to 0.
#[inline]
pub(crate) fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
