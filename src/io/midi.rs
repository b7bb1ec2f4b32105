/// MIDI channel (0-based) reserved for percussion by General MIDI.
pub const DRUM_CHANNEL: u8 = 9;

/// Controller numbers understood by the converter.
pub const CC_CHANNEL_VOLUME: u8 = 7;
pub const CC_ALL_NOTES_OFF: u8 = 123;

/// An already-decoded MIDI channel message. Channels are 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
}

impl MidiEvent {
    pub fn channel(&self) -> u8 {
        match *self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. } => channel,
        }
    }
}

/// 7-bit MIDI value to [0, 1].
#[inline]
pub fn unit_from_7bit(value: u8) -> f32 {
    value.min(127) as f32 / 127.0
}
