// External interfaces: decoded MIDI, the computer keyboard, sample formats.

pub mod converter;
pub mod keyboard;
pub mod midi;

pub use converter::{midi_to_synth, sample_to_i16};
pub use keyboard::Keyboard;
pub use midi::MidiEvent;
