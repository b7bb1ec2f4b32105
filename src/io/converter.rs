use crate::io::midi::{unit_from_7bit, MidiEvent, CC_ALL_NOTES_OFF, CC_CHANNEL_VOLUME, DRUM_CHANNEL};
use crate::synth::message::SynthMessage;

/// Full-scale f32 to signed 16-bit. Out-of-range samples saturate.
#[inline]
pub fn sample_to_i16(sample: f32) -> i16 {
    (sample * i16::MAX as f32) as i16
}

/// Mono f32 to interleaved 16-bit stereo, both sides identical.
pub fn to_i16_stereo(mono: &[f32]) -> Vec<i16> {
    mono.iter()
        .flat_map(|s| {
            let v = sample_to_i16(*s);
            [v, v]
        })
        .collect()
}

/// Translate a decoded MIDI event into a synth operation.
///
/// Note-ons on the drum channel go to the drum engine by GM key. A note-on
/// with velocity 0 is a note-off. Controllers other than channel volume and
/// all-notes-off are dropped.
pub fn midi_to_synth(midi: MidiEvent) -> Option<SynthMessage> {
    match midi {
        MidiEvent::NoteOn {
            channel: DRUM_CHANNEL,
            key,
            velocity,
        } if velocity > 0 => Some(SynthMessage::DrumNote {
            note: key,
            velocity: unit_from_7bit(velocity),
        }),
        // Drums are one-shots; there is nothing to release.
        MidiEvent::NoteOn {
            channel: DRUM_CHANNEL,
            ..
        }
        | MidiEvent::NoteOff {
            channel: DRUM_CHANNEL,
            ..
        } => None,
        MidiEvent::NoteOn {
            channel,
            key,
            velocity: 0,
        }
        | MidiEvent::NoteOff { channel, key, .. } => Some(SynthMessage::NoteOff { channel, note: key }),
        MidiEvent::NoteOn {
            channel,
            key,
            velocity,
        } => Some(SynthMessage::NoteOn {
            channel,
            note: key,
            velocity: unit_from_7bit(velocity),
        }),
        MidiEvent::ControlChange {
            channel,
            controller: CC_CHANNEL_VOLUME,
            value,
        } => Some(SynthMessage::SetChannelVolume {
            channel,
            volume: unit_from_7bit(value),
        }),
        MidiEvent::ControlChange {
            controller: CC_ALL_NOTES_OFF,
            ..
        } => Some(SynthMessage::AllNotesOff),
        MidiEvent::ControlChange { .. } => None,
    }
}
