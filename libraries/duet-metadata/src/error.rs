//! Tag reading errors
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("No such audio file: {0}")]
    FileNotFound(String),

    /// Bytes did not match any container lofty knows
    #[error("Unknown audio format")]
    UnknownFormat,

    /// Embedded picture above the reader's limit: (actual, limit)
    #[error("Picture too large: {0} bytes (limit {1} bytes)")]
    TooLarge(usize, usize),

    #[error("I/O error while reading tags: {0}")]
    Io(#[from] std::io::Error),

    #[error("Tag parse error: {0}")]
    Lofty(#[from] lofty::error::LoftyError),
}

pub type Result<T> = std::result::Result<T, MetadataError>;

/// Tag failures reach the player as `Metadata` errors, which keep the
/// current display and are reported as `MetadataFailed`
impl From<MetadataError> for duet_playback::PlaybackError {
    fn from(err: MetadataError) -> Self {
        duet_playback::PlaybackError::Metadata(err.to_string())
    }
}
