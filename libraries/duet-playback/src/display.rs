//! Now-playing projection
//!
//! Mirrors the active track's resolved tags and owns the cover-art lease.
//! A lease is released exactly once: when replaced, when its release delay
//! expires, or at shutdown, whichever comes first.

use crate::media::{ArtworkStore, ObjectUrl};
use crate::types::{DisplayTags, EmbeddedPicture, TrackId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an artwork lease
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtworkId(u64);

impl ArtworkId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ArtworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "artwork-{}", self.0)
    }
}

/// A displayed cover-art resource
#[derive(Debug)]
pub struct ArtworkLease {
    id: ArtworkId,
    url: ObjectUrl,
}

impl ArtworkLease {
    pub fn id(&self) -> ArtworkId {
        self.id
    }

    pub fn url(&self) -> &ObjectUrl {
        &self.url
    }
}

/// What the UI shows for the active track
#[derive(Debug, Default)]
pub struct NowPlaying {
    track_id: Option<TrackId>,
    tags: Option<DisplayTags>,
    artwork: Option<ArtworkLease>,
    next_artwork_id: u64,
}

impl NowPlaying {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track whose metadata is displayed
    pub fn track_id(&self) -> Option<TrackId> {
        self.track_id
    }

    pub fn tags(&self) -> Option<&DisplayTags> {
        self.tags.as_ref()
    }

    pub fn artwork(&self) -> Option<&ArtworkLease> {
        self.artwork.as_ref()
    }

    /// Replace the displayed tags
    pub fn show_tags(&mut self, track_id: TrackId, tags: DisplayTags) {
        self.track_id = Some(track_id);
        self.tags = Some(tags);
    }

    /// Forget the displayed tags, returning the track they belonged to
    ///
    /// Artwork is released separately through the store.
    pub fn clear_tags(&mut self) -> Option<TrackId> {
        self.tags = None;
        self.track_id.take()
    }

    /// Replace the displayed artwork with `picture`
    ///
    /// The previous lease is released first. Returns the new lease id, or the
    /// store's error (the display is then left without artwork).
    pub fn show_artwork(
        &mut self,
        picture: &EmbeddedPicture,
        store: &mut dyn ArtworkStore,
    ) -> crate::Result<ArtworkId> {
        self.release_artwork(store);

        let url = store.acquire(picture)?;
        self.next_artwork_id += 1;
        let id = ArtworkId::new(self.next_artwork_id);
        self.artwork = Some(ArtworkLease { id, url });
        Ok(id)
    }

    /// Release the current lease, if any
    pub fn release_artwork(&mut self, store: &mut dyn ArtworkStore) -> Option<ArtworkId> {
        let lease = self.artwork.take()?;
        store.release(lease.url);
        Some(lease.id)
    }

    /// Release the lease `id` if it is still held
    ///
    /// Returns `false` when the lease was already released or replaced.
    pub fn expire_artwork(&mut self, id: ArtworkId, store: &mut dyn ArtworkStore) -> bool {
        match self.artwork.as_ref() {
            Some(lease) if lease.id == id => self.release_artwork(store).is_some(),
            _ => false,
        }
    }
}
