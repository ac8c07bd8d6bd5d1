//! Core types for playback management

use crate::crossfade::CrossfadeSettings;
use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Longest crossfade window accepted by [`PlayerConfig::validate`] (10 minutes)
pub const MAX_CROSSFADE_WINDOW_MS: u32 = 600_000;

/// Unique track identifier
///
/// Assigned by the manager at enqueue time. Staleness checks compare ids,
/// never references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(u64);

impl TrackId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track-{}", self.0)
    }
}

/// A queued playable item
///
/// `F` is the host's raw file handle. The track is immutable once enqueued.
#[derive(Debug, Clone)]
pub struct Track<F> {
    id: TrackId,
    name: String,
    file: F,
}

impl<F> Track<F> {
    pub fn new(id: TrackId, name: impl Into<String>, file: F) -> Self {
        Self {
            id,
            name: name.into(),
            file,
        }
    }

    pub fn id(&self) -> TrackId {
        self.id
    }

    /// Display name (usually the file name)
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file(&self) -> &F {
        &self.file
    }
}

/// One of the two fixed playback slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotId {
    A,
    B,
}

impl SlotId {
    /// The sibling slot
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            SlotId::A => SlotId::B,
            SlotId::B => SlotId::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            SlotId::A => 0,
            SlotId::B => 1,
        }
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotId::A => f.write_str("A"),
            SlotId::B => f.write_str("B"),
        }
    }
}

/// Playback position report from a media surface
///
/// Both values are in seconds, as browsers report them. `duration` may be
/// NaN or infinite while the media is still loading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeUpdate {
    pub current_time: f64,
    pub duration: f64,
}

impl TimeUpdate {
    pub fn new(current_time: f64, duration: f64) -> Self {
        Self {
            current_time,
            duration,
        }
    }

    /// Milliseconds left until the end of the media
    ///
    /// May be slightly negative right at the end, or non-finite when the
    /// duration is unknown.
    pub fn remaining_ms(&self) -> f64 {
        self.duration * 1000.0 - self.current_time * 1000.0
    }
}

/// Embedded picture (cover art) found in a track's tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedPicture {
    /// Raw image bytes
    pub data: Vec<u8>,
    /// MIME type (e.g., "image/jpeg")
    pub mime_type: String,
    /// Optional description from the tag
    pub description: Option<String>,
}

impl EmbeddedPicture {
    pub fn new(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            mime_type: mime_type.into(),
            description: None,
        }
    }
}

/// Resolved tag data for a track
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub genre: Option<String>,
    pub year: Option<u32>,
    pub track_number: Option<u32>,
    pub disc_number: Option<u32>,
    pub duration: Option<Duration>,
    /// Embedded pictures in tag order
    pub pictures: Vec<EmbeddedPicture>,
}

impl TrackMetadata {
    /// Text fields only, for display and events
    pub fn tags(&self) -> DisplayTags {
        DisplayTags {
            title: self.title.clone(),
            artist: self.artist.clone(),
            album: self.album.clone(),
            year: self.year,
            track_number: self.track_number,
            duration_ms: self.duration.map(|d| d.as_millis() as u64),
        }
    }
}

/// Displayed tag fields of the active track
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<u32>,
    pub track_number: Option<u32>,
    pub duration_ms: Option<u64>,
}

/// Configuration for the playback manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Crossfade window and curve
    pub crossfade: CrossfadeSettings,

    /// Delay before a displayed artwork resource is released (default: 1000)
    pub artwork_release_delay_ms: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            crossfade: CrossfadeSettings::default(),
            artwork_release_delay_ms: 1000,
        }
    }
}

impl PlayerConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.crossfade.window_ms > MAX_CROSSFADE_WINDOW_MS {
            return Err(PlaybackError::Config(format!(
                "crossfade window {}ms exceeds maximum of {}ms",
                self.crossfade.window_ms, MAX_CROSSFADE_WINDOW_MS
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = PlayerConfig::default();
        assert_eq!(config.crossfade.window_ms, 30_000);
        assert_eq!(config.artwork_release_delay_ms, 1000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn oversized_window_is_rejected() {
        let mut config = PlayerConfig::default();
        config.crossfade.window_ms = MAX_CROSSFADE_WINDOW_MS + 1;
        assert!(matches!(config.validate(), Err(PlaybackError::Config(_))));
    }

    #[test]
    fn remaining_ms_can_go_negative() {
        let update = TimeUpdate::new(200.05, 200.0);
        assert!(update.remaining_ms() < 0.0);
        assert!((TimeUpdate::new(175.0, 200.0).remaining_ms() - 25_000.0).abs() < 1e-6);
    }

    #[test]
    fn slot_other_is_involution() {
        assert_eq!(SlotId::A.other(), SlotId::B);
        assert_eq!(SlotId::B.other().other(), SlotId::B);
    }

    #[test]
    fn config_deserializes_partial_json() {
        let config: PlayerConfig =
            serde_json::from_str(r#"{ "crossfade": { "window_ms": 5000 } }"#).unwrap();
        assert_eq!(config.crossfade.window_ms, 5000);
        assert_eq!(config.artwork_release_delay_ms, 1000);
    }
}
