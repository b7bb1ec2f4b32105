use log::debug;

use crate::synth::message::SynthMessage;
use crate::MAX_CHANNELS;

pub const KEYBOARD_KEYS: usize = 16;
/// Note played by key 0 at octave 0 (C4).
pub const BASE_NOTE: u8 = 60;
pub const MIN_OCTAVE: i8 = -2;
pub const MAX_OCTAVE: i8 = 2;
/// Velocity used for every key press.
pub const KEY_VELOCITY: f32 = 0.5;

/// A 16-key chromatic controller.
///
/// Key `k` plays `60 + k + 12 * octave`. Each key remembers the note it
/// started, so changing octave or channel while a key is down still releases
/// the right voice.
#[derive(Debug, Clone)]
pub struct Keyboard {
    octave: i8,
    channel: u8,
    held: [Option<(u8, u8)>; KEYBOARD_KEYS], // (channel, note)
}

impl Keyboard {
    pub fn new() -> Self {
        Self {
            octave: 0,
            channel: 0,
            held: [None; KEYBOARD_KEYS],
        }
    }

    /// Note a key would play right now, if it is on the keyboard and in MIDI
    /// range.
    pub fn note_for_key(&self, key: usize) -> Option<u8> {
        if key >= KEYBOARD_KEYS {
            return None;
        }
        let note = BASE_NOTE as i32 + key as i32 + 12 * self.octave as i32;
        u8::try_from(note).ok().filter(|n| *n <= 127)
    }

    /// Press a key. Holding an already-down key does not retrigger.
    pub fn press(&mut self, key: usize) -> Option<SynthMessage> {
        let note = self.note_for_key(key)?;
        let slot = &mut self.held[key];
        if slot.is_some() {
            return None;
        }
        *slot = Some((self.channel, note));
        debug!("key {key} -> note {note} on ch {}", self.channel);
        Some(SynthMessage::NoteOn {
            channel: self.channel,
            note,
            velocity: KEY_VELOCITY,
        })
    }

    pub fn release(&mut self, key: usize) -> Option<SynthMessage> {
        let (channel, note) = self.held.get_mut(key)?.take()?;
        Some(SynthMessage::NoteOff { channel, note })
    }

    pub fn is_pressed(&self, key: usize) -> bool {
        self.held.get(key).is_some_and(Option::is_some)
    }

    /// Octaves outside [-2, 2] are ignored.
    pub fn set_octave(&mut self, octave: i8) {
        if (MIN_OCTAVE..=MAX_OCTAVE).contains(&octave) {
            self.octave = octave;
        }
    }

    pub fn octave(&self) -> i8 {
        self.octave
    }

    /// Channels past the last synth channel are ignored.
    pub fn set_channel(&mut self, channel: u8) {
        if (channel as usize) < MAX_CHANNELS {
            self.channel = channel;
        }
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }
}

impl Default for Keyboard {
    fn default() -> Self {
        Self::new()
    }
}
