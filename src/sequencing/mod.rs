// Step sequencing on top of the synthesizer: patterns, the step clock and a
// background playback driver.

pub mod pattern;
pub mod playback;
pub mod sequencer;

pub use pattern::{Lane, LaneKind, Pattern};
pub use playback::PlaybackLoop;
pub use sequencer::Sequencer;
