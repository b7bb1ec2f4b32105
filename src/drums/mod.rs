//! Percussion: a fixed preset table and a one-shot synthesis engine.
//!
//! Drum hits never touch the voice pool. Each hit is rendered up front into
//! its own buffer and mixed until it runs out.

pub mod engine;
pub mod preset;

pub use engine::{DrumEngine, DrumHit};
pub use preset::{DrumKit, DrumPreset, DrumSound};
