//! Platform collaborator traits
//!
//! The manager never touches a platform API directly. Hosts implement these
//! traits (browser: `HtmlAudioElement` and object URLs; simulator: in-memory
//! decks) and hand them to [`PlaybackManager`](crate::PlaybackManager).

use crate::error::Result;
use crate::types::EmbeddedPicture;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A temporary resource URL (e.g. a `blob:` object URL)
///
/// Deliberately not `Clone`: whoever holds the value owns the resource and
/// must hand it back to the store that created it exactly once.
#[derive(Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A playback surface owned by one slot
pub trait MediaElement {
    /// Start or resume playback
    ///
    /// Fire-and-forget: an `Err` (or an asynchronous rejection the host logs
    /// itself) is never fatal.
    fn play(&mut self) -> Result<()>;

    /// Pause playback
    fn pause(&mut self);

    /// Whether the surface is currently paused
    fn is_paused(&self) -> bool;

    /// Set output volume (0.0 to 1.0)
    fn set_volume(&mut self, volume: f32);

    /// Current output volume
    fn volume(&self) -> f32;

    /// Point the surface at a source, or remove its source with `None`
    fn load_source(&mut self, source: Option<&ObjectUrl>);
}

/// Turns a host file handle into a playable URL
pub trait SourceBinder<F> {
    /// Create a playable URL for `file`
    fn acquire(&mut self, file: &F) -> Result<ObjectUrl>;

    /// Release a URL created by [`acquire`](Self::acquire)
    fn release(&mut self, url: ObjectUrl);
}

/// Creates displayable resources for cover art
pub trait ArtworkStore {
    /// Create a displayable URL for `picture`
    fn acquire(&mut self, picture: &EmbeddedPicture) -> Result<ObjectUrl>;

    /// Release a URL created by [`acquire`](Self::acquire)
    fn release(&mut self, url: ObjectUrl);
}
