// Voice management, note routing and mixing.
// Sits above the dsp primitives and owns the sample clock.

pub mod config;
pub mod message;
pub mod pool;
pub mod shared;
pub mod synthesizer;
pub mod voice;

pub use config::SynthConfig;
pub use message::{MessageReceiver, SynthMessage};
pub use shared::SharedSynth;
pub use synthesizer::Synthesizer;
pub use voice::{Voice, VoiceState};

/// Equal-tempered pitch with A4 (note 69) at 440 Hz.
///
/// Note 0 maps to 0 Hz, which renders as silence.
pub fn midi_note_to_freq(note: u8) -> f32 {
    if note == 0 {
        return 0.0;
    }
    440.0 * 2f32.powf((note as f32 - 69.0) / 12.0)
}
