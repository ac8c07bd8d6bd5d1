//! Playback slot: a media surface plus the track assigned to it

use crate::error::Result;
use crate::media::{MediaElement, ObjectUrl, SourceBinder};
use crate::metadata::MetadataTask;
use crate::queue::QueuedTrack;
use crate::types::{Track, TrackId};

/// One of the two persistent playback surfaces
///
/// The media handle lives as long as the slot. Only the assigned track, its
/// metadata task and the bound source URL change.
#[derive(Debug)]
pub struct PlaybackSlot<M, F> {
    media: M,
    track: Option<Track<F>>,
    metadata: Option<MetadataTask>,
    source: Option<ObjectUrl>,
}

impl<M: MediaElement, F> PlaybackSlot<M, F> {
    pub fn new(media: M) -> Self {
        Self {
            media,
            track: None,
            metadata: None,
            source: None,
        }
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn track(&self) -> Option<&Track<F>> {
        self.track.as_ref()
    }

    pub fn track_id(&self) -> Option<TrackId> {
        self.track.as_ref().map(Track::id)
    }

    pub fn is_empty(&self) -> bool {
        self.track.is_none()
    }

    /// Whether this slot currently holds `track_id`
    pub fn holds(&self, track_id: TrackId) -> bool {
        self.track_id() == Some(track_id)
    }

    pub fn metadata(&self) -> Option<&MetadataTask> {
        self.metadata.as_ref()
    }

    /// Metadata task, only if it belongs to `track_id`
    pub fn task_for(&mut self, track_id: TrackId) -> Option<&mut MetadataTask> {
        self.metadata
            .as_mut()
            .filter(|task| task.track_id() == track_id)
    }

    pub fn metadata_mut(&mut self) -> Option<&mut MetadataTask> {
        self.metadata.as_mut()
    }

    pub fn source(&self) -> Option<&ObjectUrl> {
        self.source.as_ref()
    }

    /// Assign a queued track: bind its file and load it into the media
    ///
    /// On a binding failure the slot stays empty and the entry is dropped.
    pub fn assign(
        &mut self,
        entry: QueuedTrack<F>,
        binder: &mut dyn SourceBinder<F>,
    ) -> Result<()> {
        debug_assert!(self.is_empty(), "assign into an occupied slot");

        let url = binder.acquire(entry.track.file())?;
        self.media.load_source(Some(&url));
        self.source = Some(url);
        self.track = Some(entry.track);
        self.metadata = Some(entry.metadata);
        Ok(())
    }

    /// Clear the finished track and release its source
    ///
    /// Returns the track that was assigned, if any.
    pub fn clear(&mut self, binder: &mut dyn SourceBinder<F>) -> Option<Track<F>> {
        self.metadata = None;
        if let Some(url) = self.source.take() {
            self.media.load_source(None);
            binder.release(url);
        }
        self.track.take()
    }
}
