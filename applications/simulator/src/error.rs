/// Simulator error types
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input '{input}': {reason}")]
    Input { input: String, reason: String },

    #[error(transparent)]
    Playback(#[from] duet_playback::PlaybackError),
}

pub type Result<T> = std::result::Result<T, SimError>;
