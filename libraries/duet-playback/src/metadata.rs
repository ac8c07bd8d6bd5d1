//! Per-track metadata tasks
//!
//! Resolution is requested when a track is enqueued and completes whenever
//! the host's resolver finishes. The result is parked in the track's
//! [`MetadataTask`] until the track becomes active, then consumed once.

use crate::error::Result;
use crate::types::{Track, TrackId, TrackMetadata};

/// Asynchronously resolves tags and embedded pictures for a track
///
/// `request` must not block. The host delivers the outcome later through
/// [`PlaybackManager::on_metadata_resolved`](crate::PlaybackManager::on_metadata_resolved),
/// keyed by the track's id.
pub trait MetadataResolver<F> {
    fn request(&mut self, track: &Track<F>);
}

/// Resolver that never produces anything
///
/// For hosts that have no tag reader; the display simply never updates.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMetadata;

impl<F> MetadataResolver<F> for NoMetadata {
    fn request(&mut self, _track: &Track<F>) {}
}

/// State of a metadata task
#[derive(Debug, Clone, PartialEq)]
pub enum TaskState {
    /// Resolution requested, no result yet
    Pending,

    /// Result arrived and has not been displayed
    Resolved(TrackMetadata),

    /// Resolution failed
    Failed(String),

    /// Result was displayed
    Consumed,
}

/// Metadata resolution bound to one track id
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataTask {
    track_id: TrackId,
    state: TaskState,
}

impl MetadataTask {
    pub fn pending(track_id: TrackId) -> Self {
        Self {
            track_id,
            state: TaskState::Pending,
        }
    }

    pub fn track_id(&self) -> TrackId {
        self.track_id
    }

    pub fn state(&self) -> &TaskState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, TaskState::Pending)
    }

    /// Store the resolver's outcome
    ///
    /// Only a pending task accepts a result; a second delivery is ignored and
    /// reported as `false`.
    pub fn complete(&mut self, result: Result<TrackMetadata>) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.state = match result {
            Ok(metadata) => TaskState::Resolved(metadata),
            Err(e) => TaskState::Failed(e.to_string()),
        };
        true
    }

    /// Take the resolved metadata, marking the task consumed
    ///
    /// Returns `None` unless the task is `Resolved`.
    pub fn consume(&mut self) -> Option<TrackMetadata> {
        match std::mem::replace(&mut self.state, TaskState::Consumed) {
            TaskState::Resolved(metadata) => Some(metadata),
            other => {
                self.state = other;
                None
            }
        }
    }
}
