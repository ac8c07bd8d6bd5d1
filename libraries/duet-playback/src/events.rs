//! Player Events
//!
//! Event-based communication for UI synchronization. The manager pushes
//! events while handling inputs; hosts drain them after each call:
//! - Queue and slot changes (enqueue, fill, finish, swap)
//! - Crossfade start and per-tick progress
//! - Now-playing and artwork changes
//! - Recovered failures (rejected playback, unbindable source, bad tags)

use crate::display::ArtworkId;
use crate::types::{DisplayTags, SlotId, TrackId};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback manager
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerEvent {
    /// Track appended to the queue
    TrackQueued {
        track_id: TrackId,
        name: String,
        /// Queue length after the append
        queue_len: usize,
    },

    /// A queued track was assigned to a slot
    SlotFilled { slot: SlotId, track_id: TrackId },

    /// A slot's media was asked to start
    PlaybackStarted { slot: SlotId, track_id: TrackId },

    /// A slot's media refused to start (e.g. autoplay blocked)
    PlaybackRejected { slot: SlotId, message: String },

    /// A track could not be bound to a playable source and was dropped
    SourceFailed { track_id: TrackId, message: String },

    /// First transitioning tick for the active track
    CrossfadeStarted {
        /// Outgoing track
        from_track_id: TrackId,
        /// Incoming track, if the inactive slot holds one
        to_track_id: Option<TrackId>,
        window_ms: u32,
    },

    /// Crossfade progress update (every transitioning tick)
    CrossfadeProgress {
        /// Progress from 0.0 (just started) to 1.0 (end of track)
        progress: f32,
        active_volume: f32,
        inactive_volume: f32,
    },

    /// A slot's track played to the end and was cleared
    TrackFinished { slot: SlotId, track_id: TrackId },

    /// The inactive slot became active
    SlotsSwapped { active: SlotId },

    /// Displayed tags changed
    NowPlayingChanged { track_id: TrackId, tags: DisplayTags },

    /// The playlist ran out; nothing is displayed
    NowPlayingCleared,

    /// Tag resolution failed; the display keeps its previous contents
    MetadataFailed { track_id: TrackId, message: String },

    /// New cover art is displayed
    ///
    /// The host should call `expire_artwork(id)` after `release_after_ms`.
    ArtworkShown {
        id: ArtworkId,
        url: String,
        release_after_ms: u64,
    },

    /// A cover-art resource was released
    ArtworkReleased { id: ArtworkId },

    /// Cover art could not be turned into a displayable resource
    ArtworkFailed { track_id: TrackId, message: String },
}

impl PlayerEvent {
    /// Short event name, for logs and JS dispatch
    pub fn kind(&self) -> &'static str {
        match self {
            PlayerEvent::TrackQueued { .. } => "track_queued",
            PlayerEvent::SlotFilled { .. } => "slot_filled",
            PlayerEvent::PlaybackStarted { .. } => "playback_started",
            PlayerEvent::PlaybackRejected { .. } => "playback_rejected",
            PlayerEvent::SourceFailed { .. } => "source_failed",
            PlayerEvent::CrossfadeStarted { .. } => "crossfade_started",
            PlayerEvent::CrossfadeProgress { .. } => "crossfade_progress",
            PlayerEvent::TrackFinished { .. } => "track_finished",
            PlayerEvent::SlotsSwapped { .. } => "slots_swapped",
            PlayerEvent::NowPlayingChanged { .. } => "now_playing_changed",
            PlayerEvent::NowPlayingCleared => "now_playing_cleared",
            PlayerEvent::MetadataFailed { .. } => "metadata_failed",
            PlayerEvent::ArtworkShown { .. } => "artwork_shown",
            PlayerEvent::ArtworkReleased { .. } => "artwork_released",
            PlayerEvent::ArtworkFailed { .. } => "artwork_failed",
        }
    }
}
