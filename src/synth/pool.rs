use crate::synth::voice::{Voice, VoiceState};
use crate::MAX_VOICES;

/// How a slot was obtained for a new note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    Free(usize),
    Stolen(usize),
}

impl Allocation {
    pub fn index(self) -> usize {
        match self {
            Allocation::Free(idx) | Allocation::Stolen(idx) => idx,
        }
    }
}

/// Fixed-size voice pool. Never grows, never shrinks.
#[derive(Debug, Clone)]
pub struct VoicePool {
    voices: [Voice; MAX_VOICES],
}

impl VoicePool {
    pub fn new() -> Self {
        Self {
            voices: std::array::from_fn(|_| Voice::new()),
        }
    }

    /// Pick a slot for a new note.
    ///
    /// The lowest-indexed free slot wins. With none free, the voice with the
    /// earliest start time is stolen, whether held or releasing; ties go to
    /// the lowest index.
    pub fn allocate(&self) -> Allocation {
        if let Some(idx) = self.voices.iter().position(Voice::is_free) {
            return Allocation::Free(idx);
        }

        // min_by keeps the first of equal elements
        let oldest = self
            .voices
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.start_time().total_cmp(&b.start_time()))
            .map(|(idx, _)| idx)
            .unwrap_or(0);

        Allocation::Stolen(oldest)
    }

    /// First held voice on `channel` sounding within 1 Hz of `frequency`.
    pub fn find_releasable(&self, channel: u8, frequency: f32) -> Option<usize> {
        self.voices.iter().position(|v| {
            v.state() == VoiceState::Active
                && v.channel() == channel
                && (v.frequency() - frequency).abs() < 1.0
        })
    }

    pub fn get(&self, idx: usize) -> Option<&Voice> {
        self.voices.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Voice> {
        self.voices.get_mut(idx)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Voice> {
        self.voices.iter_mut()
    }

    pub fn as_slice(&self) -> &[Voice] {
        &self.voices
    }

    pub fn free_all(&mut self) {
        self.voices.iter_mut().for_each(Voice::free);
    }

    /// Voices that are held or still releasing.
    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_active()).count()
    }

    pub fn is_channel_active(&self, channel: u8) -> bool {
        self.voices
            .iter()
            .any(|v| v.is_active() && v.channel() == channel)
    }
}

impl Default for VoicePool {
    fn default() -> Self {
        Self::new()
    }
}
