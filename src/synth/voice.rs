use crate::dsp::envelope::{Envelope, EnvelopeStage};
use crate::dsp::oscillator::SineOscillator;
use crate::SAMPLE_RATE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Active,    // Note held, envelope in attack/decay/sustain
    Releasing, // Note released, envelope in release
}

/// One pool slot: a sine oscillator shaped by its own copy of the envelope.
///
/// The envelope is captured at note-on, so later edits to the synthesizer's
/// default only reach voices started afterwards.
#[derive(Debug, Clone)]
pub struct Voice {
    frequency: f32,
    velocity: f32,
    channel: u8,
    start_time: f64,
    release_time: f64,
    release_from: f32, // envelope gain captured at note-off
    state: VoiceState,
    envelope: Envelope,
    osc: SineOscillator,
}

impl Voice {
    pub fn new() -> Self {
        Self {
            frequency: 0.0,
            velocity: 0.0,
            channel: 0,
            start_time: 0.0,
            release_time: 0.0,
            release_from: 0.0,
            state: VoiceState::Free,
            envelope: Envelope::default(),
            osc: SineOscillator::new(),
        }
    }

    /// (Re)start the voice. Any previous note in this slot is discarded.
    pub fn start(
        &mut self,
        channel: u8,
        frequency: f32,
        velocity: f32,
        envelope: Envelope,
        now: f64,
    ) {
        self.frequency = frequency;
        self.velocity = velocity;
        self.channel = channel;
        self.start_time = now;
        self.release_time = 0.0;
        self.release_from = 0.0;
        self.state = VoiceState::Active;
        self.envelope = envelope;
        self.osc.reset();
    }

    /// Enter release from whatever gain the envelope has reached at `now`.
    pub fn release(&mut self, now: f64) {
        if self.state == VoiceState::Active {
            self.release_from = self.envelope.gate_gain(now - self.start_time);
            self.release_time = now;
            self.state = VoiceState::Releasing;
        }
    }

    /// Swap the envelope in place. Timing and any captured release gain are
    /// kept.
    pub fn set_envelope(&mut self, envelope: Envelope) {
        self.envelope = envelope;
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
        self.frequency = 0.0;
        self.velocity = 0.0;
    }

    /// Envelope gain at `now`, in [0, 1].
    pub fn gain(&self, now: f64) -> f32 {
        match self.state {
            VoiceState::Free => 0.0,
            VoiceState::Active => self.envelope.gate_gain(now - self.start_time),
            VoiceState::Releasing => self
                .envelope
                .release_gain(self.release_from, now - self.release_time),
        }
    }

    /// Audible level: envelope gain scaled by velocity.
    pub fn level(&self, now: f64) -> f32 {
        self.gain(now) * self.velocity
    }

    pub fn stage(&self, now: f64) -> EnvelopeStage {
        match self.state {
            VoiceState::Free => EnvelopeStage::Idle,
            VoiceState::Active => self.envelope.stage(now - self.start_time, None),
            VoiceState::Releasing => self
                .envelope
                .stage(now - self.start_time, Some(now - self.release_time)),
        }
    }

    /// Next unscaled sample (before channel and master gain).
    ///
    /// A releasing voice whose gain has reached zero frees itself here and
    /// returns silence.
    #[inline]
    pub fn next_sample(&mut self, now: f64) -> f32 {
        if self.state == VoiceState::Free {
            return 0.0;
        }

        let gain = self.gain(now);
        if self.state == VoiceState::Releasing && gain <= 0.0 {
            self.free();
            return 0.0;
        }

        self.osc.next_sample(self.frequency, SAMPLE_RATE as f32) * self.velocity * gain
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, VoiceState::Active | VoiceState::Releasing)
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// When the note was released, if it has been.
    pub fn release_time(&self) -> Option<f64> {
        (self.state == VoiceState::Releasing).then_some(self.release_time)
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}
