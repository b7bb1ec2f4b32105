//! Low-level DSP primitives used by the voice pool and the drum engine.
//!
//! These components are allocation-free once constructed and hold no
//! knowledge of notes, channels or mixing. They stay focused on the signal
//! math so the synth layer can own orchestration.

/// Attack/decay/sustain/release envelope evaluated from elapsed time.
pub mod envelope;
/// Sine phase accumulator and Gaussian noise source.
pub mod oscillator;

pub use envelope::{Envelope, EnvelopeStage};
