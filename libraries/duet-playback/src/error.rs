//! Error types for playback management

use thiserror::Error;

/// Playback errors
///
/// Only `MissingMedia` is fatal, and only at host setup. Everything else is
/// recovered inside the manager: logged, turned into a `PlayerEvent`, and
/// playback carries on.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// A required media surface could not be found when the host was set up
    #[error("Media element not found: {0}")]
    MissingMedia(String),

    /// The media surface refused to start (e.g. autoplay blocked)
    #[error("Playback rejected: {0}")]
    Playback(String),

    /// A track could not be bound to a playable source
    #[error("Source error: {0}")]
    Source(String),

    /// Metadata resolution failed
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// An artwork resource could not be created
    #[error("Artwork error: {0}")]
    Artwork(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
