use log::{debug, trace, warn};

use crate::drums::{DrumEngine, DrumKit, DrumPreset, DrumSound};
use crate::dsp::envelope::Envelope;
use crate::dsp::oscillator::NoiseSource;
use crate::error::{Result, SynthError};
use crate::io::converter::sample_to_i16;
use crate::synth::config::SynthConfig;
use crate::synth::message::{MessageReceiver, SynthMessage};
use crate::synth::midi_note_to_freq;
use crate::synth::pool::{Allocation, VoicePool};
use crate::synth::voice::Voice;
use crate::{MAX_BLOCK_SIZE, MAX_CHANNELS, SAMPLE_RATE};

/// The whole instrument: voice pool, drum engine, gain stages and the
/// sample clock.
///
/// Time only moves forward when audio is rendered. `now()` is the number of
/// frames rendered so far divided by the sample rate, so every note-on,
/// note-off and envelope evaluation is stamped on the same timeline as the
/// output.
#[derive(Debug)]
pub struct Synthesizer {
    pool: VoicePool,
    channel_volumes: [f32; MAX_CHANNELS],
    master_volume: f32,
    default_envelope: Envelope,
    kit: DrumKit,
    drums: DrumEngine,
    frames_rendered: u64,
    scratch: Vec<f32>,
}

impl Synthesizer {
    pub fn new() -> Self {
        Self::with_config(SynthConfig::default())
    }

    pub fn with_config(config: SynthConfig) -> Self {
        let noise = match config.noise_seed {
            Some(seed) => NoiseSource::from_seed(seed),
            None => NoiseSource::from_os_rng(),
        };

        Self {
            pool: VoicePool::new(),
            channel_volumes: [1.0; MAX_CHANNELS],
            master_volume: crate::clamp_unit(config.master_volume),
            default_envelope: config.default_envelope,
            kit: DrumKit::default(),
            drums: DrumEngine::new(noise),
            frames_rendered: 0,
            scratch: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Seconds on the synth clock.
    pub fn now(&self) -> f64 {
        self.frames_rendered as f64 / SAMPLE_RATE as f64
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    // ---- Notes ----

    /// Start a note. Out-of-range channels or notes are ignored; velocity is
    /// clamped to [0, 1]. With every voice busy the oldest one is stolen.
    pub fn note_on(&mut self, channel: u8, note: u8, velocity: f32) {
        if channel as usize >= MAX_CHANNELS || note > 127 {
            warn!("note on ignored: channel {channel}, note {note}");
            return;
        }

        let now = self.now();
        let velocity = crate::clamp_unit(velocity);
        let frequency = midi_note_to_freq(note);
        let allocation = self.pool.allocate();

        if let Allocation::Stolen(idx) = allocation {
            debug!("voice pool full, stealing voice {idx}");
        }
        if let Some(voice) = self.pool.get_mut(allocation.index()) {
            voice.start(channel, frequency, velocity, self.default_envelope, now);
            debug!(
                "note on: ch {channel} note {note} ({frequency:.2} Hz) vel {velocity:.2} -> voice {}",
                allocation.index()
            );
        }
    }

    /// Release the first held voice on `channel` playing `note`.
    pub fn note_off(&mut self, channel: u8, note: u8) {
        if channel as usize >= MAX_CHANNELS || note > 127 {
            warn!("note off ignored: channel {channel}, note {note}");
            return;
        }

        let now = self.now();
        let frequency = midi_note_to_freq(note);
        match self.pool.find_releasable(channel, frequency) {
            Some(idx) => {
                if let Some(voice) = self.pool.get_mut(idx) {
                    voice.release(now);
                    debug!("note off: ch {channel} note {note} -> voice {idx} releasing");
                }
            }
            None => trace!("note off: ch {channel} note {note} matched no voice"),
        }
    }

    /// Silence every voice immediately. Drum hits keep playing.
    pub fn all_notes_off(&mut self) {
        self.pool.free_all();
        debug!("all notes off");
    }

    // ---- Envelopes ----

    /// Replace the envelope of every sounding voice on `channel`.
    ///
    /// New notes keep getting the default envelope.
    pub fn set_adsr(&mut self, channel: u8, envelope: Envelope) {
        self.edit_channel_envelopes(channel, |_| envelope);
    }

    pub fn set_attack(&mut self, channel: u8, attack: f32) {
        self.edit_channel_envelopes(channel, |env| env.with_attack(attack));
    }

    pub fn set_decay(&mut self, channel: u8, decay: f32) {
        self.edit_channel_envelopes(channel, |env| env.with_decay(decay));
    }

    pub fn set_sustain(&mut self, channel: u8, sustain: f32) {
        self.edit_channel_envelopes(channel, |env| env.with_sustain(sustain));
    }

    pub fn set_release(&mut self, channel: u8, release: f32) {
        self.edit_channel_envelopes(channel, |env| env.with_release(release));
    }

    fn edit_channel_envelopes(&mut self, channel: u8, edit: impl Fn(Envelope) -> Envelope) {
        if channel as usize >= MAX_CHANNELS {
            warn!("envelope edit ignored: channel {channel}");
            return;
        }

        let mut edited = 0;
        for voice in self
            .pool
            .iter_mut()
            .filter(|v| v.is_active() && v.channel() == channel)
        {
            voice.set_envelope(edit(*voice.envelope()));
            edited += 1;
        }
        debug!("envelope edit on ch {channel}: {edited} voices");
    }

    /// Envelope handed to future note-ons.
    pub fn default_envelope(&self) -> Envelope {
        self.default_envelope
    }

    pub fn set_default_envelope(&mut self, envelope: Envelope) {
        self.default_envelope = envelope;
    }

    // ---- Gain ----

    pub fn set_master_volume(&mut self, volume: f32) {
        self.master_volume = crate::clamp_unit(volume);
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn set_channel_volume(&mut self, channel: u8, volume: f32) {
        match self.channel_volumes.get_mut(channel as usize) {
            Some(slot) => *slot = crate::clamp_unit(volume),
            None => warn!("channel volume ignored: channel {channel}"),
        }
    }

    pub fn channel_volume(&self, channel: u8) -> Option<f32> {
        self.channel_volumes.get(channel as usize).copied()
    }

    // ---- Drums ----

    pub fn play_drum(&mut self, preset: DrumPreset, velocity: f32) {
        let sound = *self.kit.get(preset);
        debug!("drum: {preset}");
        self.drums.trigger(&sound, crate::clamp_unit(velocity));
    }

    /// Play a preset at its own default volume.
    pub fn play_drum_default(&mut self, preset: DrumPreset) {
        let volume = self.kit.get(preset).volume;
        self.play_drum(preset, volume);
    }

    /// Play a preset by name. Unknown names leave the synthesizer untouched.
    pub fn play_drum_named(&mut self, name: &str, velocity: f32) -> Result<()> {
        let preset = name.parse::<DrumPreset>().inspect_err(|err| warn!("{err}"))?;
        self.play_drum(preset, velocity);
        Ok(())
    }

    /// Play the drum mapped to a General MIDI percussion key.
    pub fn play_drum_note(&mut self, note: u8, velocity: f32) -> Result<()> {
        let preset = DrumPreset::from_gm_note(note).ok_or_else(|| {
            warn!("no drum mapped to note {note}");
            SynthError::UnknownDrumNote(note)
        })?;
        self.play_drum(preset, velocity);
        Ok(())
    }

    pub fn play_custom_drum(&mut self, sound: DrumSound, velocity: f32) {
        let sound = DrumSound::new(sound.frequency, sound.duration, sound.volume, sound.is_noise);
        self.drums.trigger(&sound, crate::clamp_unit(velocity));
    }

    pub fn drum_kit(&self) -> &DrumKit {
        &self.kit
    }

    pub fn active_drum_hits(&self) -> usize {
        self.drums.active_hits()
    }

    // ---- Rendering ----

    /// Render the mono mix into `out`, overwriting it, and advance the clock
    /// by `out.len()` frames.
    pub fn render(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        let start = self.frames_rendered;
        let sr = SAMPLE_RATE as f64;

        for voice in self.pool.iter_mut().filter(|v| v.is_active()) {
            let gain = self
                .channel_volumes
                .get(voice.channel() as usize)
                .copied()
                .unwrap_or(0.0)
                * self.master_volume;

            for (i, o) in out.iter_mut().enumerate() {
                let now = (start + i as u64) as f64 / sr;
                *o += voice.next_sample(now) * gain;
                if voice.is_free() {
                    trace!("voice released to pool at {now:.4}s");
                    break;
                }
            }
        }

        self.drums.mix_into(out, self.master_volume);
        self.frames_rendered += out.len() as u64;
    }

    /// Render `frames` frames as interleaved 16-bit stereo (both channels
    /// carry the same mono mix).
    pub fn render_i16(&mut self, frames: usize) -> Vec<i16> {
        let mut out = vec![0i16; frames * 2];
        self.render_i16_into(&mut out);
        out
    }

    /// Fill an interleaved 16-bit stereo buffer. A trailing odd sample is
    /// left at zero.
    pub fn render_i16_into(&mut self, out: &mut [i16]) {
        let mut scratch = std::mem::take(&mut self.scratch);
        for frames in out.chunks_mut(MAX_BLOCK_SIZE * 2) {
            let block = &mut scratch[..frames.len() / 2];
            self.render(block);
            for (frame, sample) in frames.chunks_exact_mut(2).zip(block.iter()) {
                let value = sample_to_i16(*sample);
                frame[0] = value;
                frame[1] = value;
            }
        }
        if out.len() % 2 == 1 {
            if let Some(last) = out.last_mut() {
                *last = 0;
            }
        }
        self.scratch = scratch;
    }

    /// Fill an interleaved f32 buffer with `channels` copies of the mono mix.
    pub fn render_interleaved(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let mut scratch = std::mem::take(&mut self.scratch);
        for frames in out.chunks_mut(MAX_BLOCK_SIZE * channels) {
            let block = &mut scratch[..frames.len() / channels];
            self.render(block);
            for (frame, sample) in frames.chunks_exact_mut(channels).zip(block.iter()) {
                frame.fill(*sample);
            }
        }
        self.scratch = scratch;
    }

    // ---- Messages ----

    /// Apply every queued message. Failures are logged, never propagated into
    /// the audio path.
    pub fn process_messages<R: MessageReceiver + ?Sized>(&mut self, rx: &mut R) {
        while let Some(msg) = rx.pop() {
            if let Err(err) = self.handle_message(msg) {
                warn!("dropped {msg:?}: {err}");
            }
        }
    }

    pub fn handle_message(&mut self, msg: SynthMessage) -> Result<()> {
        match msg {
            SynthMessage::NoteOn {
                channel,
                note,
                velocity,
            } => self.note_on(channel, note, velocity),
            SynthMessage::NoteOff { channel, note } => self.note_off(channel, note),
            SynthMessage::AllNotesOff => self.all_notes_off(),
            SynthMessage::SetAdsr { channel, envelope } => self.set_adsr(channel, envelope),
            SynthMessage::SetMasterVolume(volume) => self.set_master_volume(volume),
            SynthMessage::SetChannelVolume { channel, volume } => {
                self.set_channel_volume(channel, volume)
            }
            SynthMessage::Drum { preset, velocity } => self.play_drum(preset, velocity),
            SynthMessage::DrumNote { note, velocity } => self.play_drum_note(note, velocity)?,
        }
        Ok(())
    }

    // ---- Introspection ----

    /// Voices currently held or releasing.
    pub fn active_voices(&self) -> usize {
        self.pool.active_count()
    }

    pub fn is_channel_active(&self, channel: u8) -> bool {
        self.pool.is_channel_active(channel)
    }

    pub fn voices(&self) -> &[Voice] {
        self.pool.as_slice()
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::voice::VoiceState;
    use std::collections::VecDeque;

    fn synth() -> Synthesizer {
        Synthesizer::with_config(SynthConfig::new().noise_seed(1))
    }

    fn advance(synth: &mut Synthesizer, seconds: f64) {
        let mut buf = vec![0.0; (seconds * SAMPLE_RATE as f64).round() as usize];
        synth.render(&mut buf);
    }

    #[test]
    fn clock_follows_rendered_frames() {
        let mut synth = synth();
        assert_eq!(synth.now(), 0.0);
        advance(&mut synth, 0.5);
        assert_eq!(synth.frames_rendered(), 22_050);
        assert!((synth.now() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn out_of_range_notes_are_ignored() {
        let mut synth = synth();
        synth.note_on(16, 60, 1.0);
        synth.note_on(0, 128, 1.0);
        assert_eq!(synth.active_voices(), 0);
    }

    #[test]
    fn velocity_is_clamped() {
        let mut synth = synth();
        synth.note_on(0, 60, 7.0);
        assert_eq!(synth.voices()[0].velocity(), 1.0);
    }

    #[test]
    fn set_adsr_only_touches_sounding_voices_on_channel() {
        let mut synth = synth();
        let custom = Envelope::adsr(0.5, 0.5, 0.2, 1.0);
        synth.note_on(1, 60, 1.0);
        synth.note_on(2, 60, 1.0);
        synth.set_adsr(1, custom);

        assert_eq!(*synth.voices()[0].envelope(), custom);
        assert_eq!(*synth.voices()[1].envelope(), Envelope::default());

        synth.note_on(1, 64, 1.0);
        assert_eq!(*synth.voices()[2].envelope(), Envelope::default());
    }

    #[test]
    fn single_parameter_edits() {
        let mut synth = synth();
        synth.note_on(4, 60, 1.0);
        synth.set_sustain(4, 0.25);
        synth.set_release(4, 5.0);
        let env = *synth.voices()[0].envelope();
        assert_eq!(env.sustain(), 0.25);
        assert_eq!(env.release(), 2.0);
        assert_eq!(env.attack(), Envelope::default().attack());
    }

    #[test]
    fn channel_volume_scales_only_that_channel() {
        let mut synth = synth();
        synth.set_channel_volume(3, 0.0);
        synth.note_on(3, 69, 1.0);
        let mut buf = vec![0.0; 2048];
        synth.render(&mut buf);
        assert!(buf.iter().all(|s| *s == 0.0));

        synth.note_on(0, 69, 1.0);
        synth.render(&mut buf);
        assert!(buf.iter().any(|s| *s != 0.0));

        synth.set_channel_volume(99, 0.5);
        assert_eq!(synth.channel_volume(99), None);
        assert_eq!(synth.channel_volume(3), Some(0.0));
    }

    #[test]
    fn unknown_drum_leaves_state_untouched() {
        let mut synth = synth();
        assert_eq!(
            synth.play_drum_named("gong", 1.0),
            Err(SynthError::UnknownPreset("gong".into()))
        );
        assert_eq!(synth.play_drum_note(20, 1.0), Err(SynthError::UnknownDrumNote(20)));
        assert_eq!(synth.active_drum_hits(), 0);
        assert_eq!(synth.active_voices(), 0);

        synth.play_drum_named("snare", 1.0).unwrap();
        assert_eq!(synth.active_drum_hits(), 1);
    }

    #[test]
    fn drums_survive_all_notes_off() {
        let mut synth = synth();
        synth.play_drum_default(DrumPreset::Kick);
        synth.note_on(0, 60, 1.0);
        synth.all_notes_off();
        assert_eq!(synth.active_voices(), 0);
        assert_eq!(synth.active_drum_hits(), 1);
    }

    #[test]
    fn drum_hit_is_exhausted_after_its_duration() {
        let mut synth = synth();
        synth.play_drum(DrumPreset::HiHat, 1.0);
        advance(&mut synth, 0.049);
        assert_eq!(synth.active_drum_hits(), 1);
        advance(&mut synth, 0.002);
        assert_eq!(synth.active_drum_hits(), 0);
    }

    #[test]
    fn i16_output_is_stereo_duplicated_and_saturates() {
        let mut synth = synth();
        for note in [60, 64, 67, 72] {
            synth.note_on(0, note, 1.0);
        }
        let out = synth.render_i16(4096);
        assert_eq!(out.len(), 8192);
        assert!(out.chunks(2).all(|f| f[0] == f[1]));
        assert!(out.iter().any(|s| *s == i16::MAX || *s == -i16::MAX || *s == i16::MIN));
        assert_eq!(synth.frames_rendered(), 4096);
    }

    #[test]
    fn messages_are_applied_in_order() {
        let mut synth = synth();
        let mut queue = VecDeque::from([
            SynthMessage::NoteOn {
                channel: 0,
                note: 60,
                velocity: 1.0,
            },
            SynthMessage::DrumNote {
                note: 0,
                velocity: 1.0,
            },
            SynthMessage::NoteOff { channel: 0, note: 60 },
            SynthMessage::SetMasterVolume(0.25),
            SynthMessage::Drum {
                preset: DrumPreset::Ride,
                velocity: 0.5,
            },
        ]);
        synth.process_messages(&mut queue);

        assert!(queue.is_empty());
        assert_eq!(synth.voices()[0].state(), VoiceState::Releasing);
        assert_eq!(synth.master_volume(), 0.25);
        assert_eq!(synth.active_drum_hits(), 1);
    }
}
