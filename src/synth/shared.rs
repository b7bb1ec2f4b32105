use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::synth::synthesizer::Synthesizer;

/// Cloneable handle to one synthesizer shared by the audio callback, the
/// playback loop and any control surface.
#[derive(Clone)]
pub struct SharedSynth(Arc<Mutex<Synthesizer>>);

impl SharedSynth {
    pub fn new(synth: Synthesizer) -> Self {
        Self(Arc::new(Mutex::new(synth)))
    }

    /// Lock the synthesizer. A panic on another thread while holding the lock
    /// does not take the audio path down with it; the state is used as is.
    pub fn lock(&self) -> MutexGuard<'_, Synthesizer> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` under the lock.
    pub fn with<R>(&self, f: impl FnOnce(&mut Synthesizer) -> R) -> R {
        f(&mut self.lock())
    }
}

impl From<Synthesizer> for SharedSynth {
    fn from(synth: Synthesizer) -> Self {
        Self::new(synth)
    }
}

impl std::fmt::Debug for SharedSynth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SharedSynth(..)")
    }
}
