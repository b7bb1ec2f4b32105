use thiserror::Error;

/// Conditions reported to callers.
///
/// Out-of-range notes, channels and gains are never errors: they are clamped
/// or ignored. Running out of voices is never an error either, the oldest
/// voice is stolen.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthError {
    #[error("unrecognized drum preset `{0}`")]
    UnknownPreset(String),

    #[error("no drum preset mapped to note {0}")]
    UnknownDrumNote(u8),

    #[error("synth message queue is full")]
    QueueFull,
}

pub type Result<T> = std::result::Result<T, SynthError>;
