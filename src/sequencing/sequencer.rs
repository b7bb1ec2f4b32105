use log::debug;

use crate::sequencing::pattern::{LaneKind, Pattern};
use crate::synth::Synthesizer;

pub const MIN_BPM: u32 = 60;
pub const MAX_BPM: u32 = 240;
pub const DEFAULT_BPM: u32 = 120;
pub const DEFAULT_VOLUME: f32 = 0.8;

/// Steps a pattern through a synthesizer on the synth clock.
///
/// Steps are sixteenth notes: `60 / (bpm * 4)` seconds. The sequencer holds
/// no clock of its own; call [`advance`](Self::advance) as often as
/// convenient and it fires whichever steps have come due since the last call.
#[derive(Debug, Clone)]
pub struct Sequencer {
    pattern: Pattern,
    bpm: u32,
    volume: f32,
    playing: bool,
    current_step: usize,
    next_step_at: Option<f64>,
    sounding: Vec<Option<(u8, u8)>>, // per lane: note started on the previous step
}

impl Sequencer {
    pub fn new() -> Self {
        Self::with_pattern(Pattern::default_beat())
    }

    pub fn with_pattern(pattern: Pattern) -> Self {
        let lanes = pattern.lanes().len();
        Self {
            pattern,
            bpm: DEFAULT_BPM,
            volume: DEFAULT_VOLUME,
            playing: false,
            current_step: 0,
            next_step_at: None,
            sounding: vec![None; lanes],
        }
    }

    /// Clamped to [60, 240].
    pub fn set_bpm(&mut self, bpm: u32) {
        self.bpm = bpm.clamp(MIN_BPM, MAX_BPM);
    }

    pub fn bpm(&self) -> u32 {
        self.bpm
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = crate::clamp_unit(volume);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Length of one step in seconds.
    pub fn step_duration(&self) -> f64 {
        60.0 / (self.bpm as f64 * 4.0)
    }

    /// Start (or resume) playback. The current step fires on the next
    /// `advance`.
    pub fn play(&mut self) {
        if !self.playing {
            debug!("sequencer: play from step {} at {} bpm", self.current_step, self.bpm);
        }
        self.playing = true;
        self.next_step_at = None;
    }

    /// Stop advancing but keep the position. Notes started by note lanes are
    /// released.
    pub fn pause(&mut self, synth: &mut Synthesizer) {
        self.playing = false;
        self.next_step_at = None;
        self.release_sounding(synth);
    }

    /// Stop, rewind to step 0 and silence every voice.
    pub fn stop(&mut self, synth: &mut Synthesizer) {
        self.playing = false;
        self.next_step_at = None;
        self.current_step = 0;
        self.sounding.iter_mut().for_each(|s| *s = None);
        synth.all_notes_off();
        debug!("sequencer: stop");
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Step that fires next.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Swap the pattern. Notes from the old one are released and the
    /// position wraps into the new length.
    pub fn set_pattern(&mut self, pattern: Pattern, synth: &mut Synthesizer) {
        self.release_sounding(synth);
        self.current_step %= pattern.steps();
        self.sounding = vec![None; pattern.lanes().len()];
        self.pattern = pattern;
    }

    /// Fire every step whose start time has passed. Returns how many fired.
    ///
    /// Falling more than a whole pattern behind (a stalled audio clock, a
    /// long lock) drops the backlog and resynchronizes to now.
    pub fn advance(&mut self, synth: &mut Synthesizer) -> usize {
        if !self.playing {
            return 0;
        }

        let now = synth.now();
        let step_len = self.step_duration();
        let mut due = *self.next_step_at.get_or_insert(now);

        if now - due > step_len * self.pattern.steps() as f64 {
            debug!("sequencer: {:.3}s behind, resyncing", now - due);
            due = now;
        }

        let mut fired = 0;
        while due <= now {
            self.fire_step(synth);
            due += step_len;
            fired += 1;
        }
        self.next_step_at = Some(due);
        fired
    }

    fn fire_step(&mut self, synth: &mut Synthesizer) {
        let step = self.current_step;
        for (lane, sounding) in self.pattern.lanes().iter().zip(self.sounding.iter_mut()) {
            if let Some((channel, note)) = sounding.take() {
                synth.note_off(channel, note);
            }
            if !lane.hit(step) {
                continue;
            }

            match lane.kind {
                LaneKind::Drum {
                    preset,
                    velocity_scale,
                } => synth.play_drum(preset, self.volume * velocity_scale),
                LaneKind::Note { channel, note } => {
                    synth.note_on(channel, note, self.volume);
                    *sounding = Some((channel, note));
                }
            }
        }
        self.current_step = (step + 1) % self.pattern.steps();
    }

    fn release_sounding(&mut self, synth: &mut Synthesizer) {
        for (channel, note) in self.sounding.iter_mut().filter_map(Option::take) {
            synth.note_off(channel, note);
        }
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}
