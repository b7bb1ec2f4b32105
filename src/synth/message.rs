#[cfg(feature = "rtrb")]
use rtrb::{Consumer, Producer, RingBuffer};

use crate::drums::DrumPreset;
use crate::dsp::envelope::Envelope;

/// A synthesizer operation, queued from a control thread and applied on the
/// audio thread before the next block is rendered.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SynthMessage {
    NoteOn { channel: u8, note: u8, velocity: f32 },
    NoteOff { channel: u8, note: u8 },
    AllNotesOff,
    SetAdsr { channel: u8, envelope: Envelope },
    SetMasterVolume(f32),
    SetChannelVolume { channel: u8, volume: f32 },
    Drum { preset: DrumPreset, velocity: f32 },
    /// Drum addressed by General MIDI percussion key.
    DrumNote { note: u8, velocity: f32 },
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<SynthMessage>;
}

#[cfg(feature = "rtrb")]
impl MessageReceiver for Consumer<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        Consumer::pop(self).ok()
    }
}

/// Plain queues work too, mostly useful in tests.
impl MessageReceiver for std::collections::VecDeque<SynthMessage> {
    fn pop(&mut self) -> Option<SynthMessage> {
        self.pop_front()
    }
}

/// Producer half of the lock-free control queue.
#[cfg(feature = "rtrb")]
pub struct SynthSender {
    tx: Producer<SynthMessage>,
}

#[cfg(feature = "rtrb")]
impl SynthSender {
    /// Never blocks. A full queue drops the message and reports it.
    pub fn send(&mut self, msg: SynthMessage) -> crate::Result<()> {
        self.tx.push(msg).map_err(|_| {
            log::warn!("synth queue full, dropping {msg:?}");
            crate::SynthError::QueueFull
        })
    }

    pub fn slots(&self) -> usize {
        self.tx.slots()
    }
}

/// Create a bounded single-producer/single-consumer control queue.
#[cfg(feature = "rtrb")]
pub fn channel(capacity: usize) -> (SynthSender, Consumer<SynthMessage>) {
    let (tx, rx) = RingBuffer::new(capacity);
    (SynthSender { tx }, rx)
}
