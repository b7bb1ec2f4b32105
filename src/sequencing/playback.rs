use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

use crate::sequencing::sequencer::Sequencer;
use crate::synth::SharedSynth;

/// How long the loop sleeps between polls.
pub const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// A background thread that keeps a sequencer advancing against a shared
/// synthesizer.
///
/// Timing is only as tight as the poll interval and the audio block size;
/// steps are never early but may land up to one block late.
pub struct PlaybackLoop {
    sequencer: Arc<Mutex<Sequencer>>,
    synth: SharedSynth,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

fn lock(sequencer: &Mutex<Sequencer>) -> MutexGuard<'_, Sequencer> {
    sequencer.lock().unwrap_or_else(PoisonError::into_inner)
}

impl PlaybackLoop {
    /// Put the sequencer in play and start driving it.
    pub fn start(sequencer: Arc<Mutex<Sequencer>>, synth: SharedSynth) -> Self {
        lock(&sequencer).play();
        let running = Arc::new(AtomicBool::new(true));

        let handle = {
            let sequencer = Arc::clone(&sequencer);
            let synth = synth.clone();
            let running = Arc::clone(&running);
            thread::Builder::new()
                .name("sequencer".into())
                .spawn(move || {
                    while running.load(Ordering::Acquire) {
                        {
                            let mut seq = lock(&sequencer);
                            let mut synth = synth.lock();
                            seq.advance(&mut synth);
                        }
                        thread::sleep(POLL_INTERVAL);
                    }
                })
        };

        let handle = match handle {
            Ok(handle) => Some(handle),
            Err(err) => {
                warn!("could not spawn sequencer thread: {err}");
                running.store(false, Ordering::Release);
                None
            }
        };
        debug!("playback loop started");

        Self {
            sequencer,
            synth,
            running,
            handle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire) && self.handle.is_some()
    }

    /// Stop the thread, wait for it, then stop the sequencer (rewinding it
    /// and silencing every voice).
    pub fn stop(mut self) {
        self.join();
        // Same order as the loop: sequencer, then synth.
        let mut seq = lock(&self.sequencer);
        seq.stop(&mut self.synth.lock());
    }

    fn join(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("sequencer thread panicked");
            }
            debug!("playback loop stopped");
        }
    }
}

impl Drop for PlaybackLoop {
    fn drop(&mut self) {
        self.join();
    }
}

impl std::fmt::Debug for PlaybackLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackLoop")
            .field("running", &self.is_running())
            .finish()
    }
}
