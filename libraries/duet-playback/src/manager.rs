//! Playback manager - core orchestration
//!
//! Owns the two playback slots, the pending queue and the now-playing
//! projection, and reacts to the host's inputs:
//!
//! - `enqueue` / `enqueue_all`: file selection
//! - `on_time_update`: position reports from a slot's media
//! - `on_ended`: a slot's media reached the end
//! - `on_metadata_resolved`: a tag read finished
//! - `expire_artwork`: the artwork release timer fired
//!
//! Every input is handled to completion before the next one; nothing here
//! blocks or spawns. Outputs are calls on the collaborator traits plus
//! [`PlayerEvent`]s collected for [`drain_events`](PlaybackManager::drain_events).

use crate::{
    crossfade::{CrossfadeSettings, TransitionPhase},
    display::{ArtworkId, NowPlaying},
    error::Result,
    events::PlayerEvent,
    media::{ArtworkStore, MediaElement, SourceBinder},
    metadata::{MetadataResolver, MetadataTask},
    queue::{QueuedTrack, TrackQueue},
    slot::PlaybackSlot,
    toggle::SlotToggle,
    types::{PlayerConfig, SlotId, TimeUpdate, Track, TrackId, TrackMetadata},
};
use tracing::{debug, info, trace, warn};

/// Gapless crossfade player core
///
/// `M` is the host's media surface, `F` its raw file handle. Two slots exist
/// for the manager's whole lifetime; tracks flow from the queue into whichever
/// slot is empty, the active one first.
pub struct PlaybackManager<M: MediaElement, F> {
    config: PlayerConfig,

    // Slots and queue
    slots: SlotToggle<PlaybackSlot<M, F>>,
    queue: TrackQueue<F>,
    next_track_id: u64,

    // Collaborators
    binder: Box<dyn SourceBinder<F>>,
    resolver: Box<dyn MetadataResolver<F>>,
    artwork: Box<dyn ArtworkStore>,

    // Display
    now_playing: NowPlaying,

    // Active track for which `CrossfadeStarted` was emitted
    crossfading: Option<TrackId>,

    // Event queue for UI synchronization
    pending_events: Vec<PlayerEvent>,

    shut_down: bool,
}

impl<M: MediaElement, F> PlaybackManager<M, F> {
    /// Create a manager over two media surfaces
    ///
    /// `media_a` backs slot A, which starts out active.
    pub fn new(
        config: PlayerConfig,
        media_a: M,
        media_b: M,
        binder: Box<dyn SourceBinder<F>>,
        resolver: Box<dyn MetadataResolver<F>>,
        artwork: Box<dyn ArtworkStore>,
    ) -> Result<Self> {
        config.validate()?;

        info!(
            "Playback manager ready (window {}ms, curve {})",
            config.crossfade.window_ms,
            config.crossfade.curve.display_name()
        );

        Ok(Self {
            config,
            slots: SlotToggle::new(PlaybackSlot::new(media_a), PlaybackSlot::new(media_b)),
            queue: TrackQueue::new(),
            next_track_id: 0,
            binder,
            resolver,
            artwork,
            now_playing: NowPlaying::new(),
            crossfading: None,
            pending_events: Vec::new(),
            shut_down: false,
        })
    }

    // ===== Queue =====

    /// Queue one file and fill any empty slot
    pub fn enqueue(&mut self, name: impl Into<String>, file: F) -> TrackId {
        let id = self.push_track(name, file);
        self.fill_slots();
        id
    }

    /// Queue a batch of files in selection order, then fill empty slots once
    pub fn enqueue_all<I, N>(&mut self, files: I) -> Vec<TrackId>
    where
        I: IntoIterator<Item = (N, F)>,
        N: Into<String>,
    {
        let ids: Vec<TrackId> = files
            .into_iter()
            .map(|(name, file)| self.push_track(name, file))
            .collect();
        debug!("Enqueued batch of {} tracks", ids.len());
        self.fill_slots();
        ids
    }

    fn push_track(&mut self, name: impl Into<String>, file: F) -> TrackId {
        self.next_track_id += 1;
        let track = Track::new(TrackId::new(self.next_track_id), name, file);
        let track_id = track.id();
        let name = track.name().to_string();

        self.resolver.request(&track);
        self.queue.enqueue(QueuedTrack::new(track));

        debug!("Queued {} ({})", track_id, name);
        self.emit(PlayerEvent::TrackQueued {
            track_id,
            name,
            queue_len: self.queue.len(),
        });
        track_id
    }

    // ===== Slot Filler =====

    /// Move queued tracks into empty slots and start the active one
    ///
    /// Active is filled before inactive. A track whose source cannot be bound
    /// is dropped and the next queued track is tried for the same slot.
    pub fn fill_slots(&mut self) {
        if self.shut_down {
            return;
        }

        self.fill_slot(self.slots.active_id());
        self.fill_slot(self.slots.inactive_id());
        self.start_active_if_paused();
        self.refresh_now_playing();
    }

    fn fill_slot(&mut self, slot_id: SlotId) {
        while self.slots.get(slot_id).is_empty() {
            let Some(entry) = self.queue.dequeue_front() else {
                break;
            };
            let track_id = entry.track.id();
            let name = entry.track.name().to_string();

            match self
                .slots
                .get_mut(slot_id)
                .assign(entry, self.binder.as_mut())
            {
                Ok(()) => {
                    info!("Slot {} filled with {}", slot_id, track_id);
                    self.emit(PlayerEvent::SlotFilled {
                        slot: slot_id,
                        track_id,
                    });
                }
                Err(e) => {
                    warn!(
                        "Dropping {} ({}): could not bind source: {}",
                        track_id, name, e
                    );
                    self.emit(PlayerEvent::SourceFailed {
                        track_id,
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    fn start_active_if_paused(&mut self) {
        let slot_id = self.slots.active_id();
        let slot = self.slots.active_mut();
        let Some(track_id) = slot.track_id() else {
            return;
        };
        if !slot.media().is_paused() {
            return;
        }

        slot.media_mut().set_volume(1.0);
        self.start_slot(slot_id, track_id);
    }

    /// Ask a slot's media to play; a refusal is logged and reported, never fatal
    fn start_slot(&mut self, slot_id: SlotId, track_id: TrackId) {
        match self.slots.get_mut(slot_id).media_mut().play() {
            Ok(()) => {
                debug!("Started slot {} ({})", slot_id, track_id);
                self.emit(PlayerEvent::PlaybackStarted {
                    slot: slot_id,
                    track_id,
                });
            }
            Err(e) => {
                warn!("Slot {} refused to play {}: {}", slot_id, track_id, e);
                self.emit(PlayerEvent::PlaybackRejected {
                    slot: slot_id,
                    message: e.to_string(),
                });
            }
        }
    }

    // ===== Crossfade Scheduler =====

    /// Handle a position report from `slot`
    ///
    /// Only the active slot drives the ramp. Volumes are recomputed from the
    /// report alone, so repeated or jittery ticks never accumulate drift.
    pub fn on_time_update(&mut self, slot: SlotId, update: TimeUpdate) {
        if self.shut_down || !self.slots.is_active(slot) {
            return;
        }
        let Some(outgoing) = self.slots.active().track_id() else {
            return;
        };

        let settings = self.config.crossfade;
        let progress = match settings.phase(update) {
            TransitionPhase::Idle => {
                trace!(
                    "Slot {} idle at {:.3}s of {:.3}s",
                    slot,
                    update.current_time,
                    update.duration
                );
                return;
            }
            TransitionPhase::Transitioning { progress } => progress,
        };

        let ramp = settings.ramp(progress);
        let incoming = self.slots.inactive().track_id();

        if self.crossfading != Some(outgoing) {
            self.crossfading = Some(outgoing);
            info!(
                "Crossfade started: {} -> {}",
                outgoing,
                incoming.map_or_else(|| "end of queue".to_string(), |id| id.to_string())
            );
            self.emit(PlayerEvent::CrossfadeStarted {
                from_track_id: outgoing,
                to_track_id: incoming,
                window_ms: settings.window_ms,
            });
        }

        {
            let (active, inactive) = self.slots.pair_mut();
            active.media_mut().set_volume(ramp.active);
            inactive.media_mut().set_volume(ramp.inactive);
        }

        if let Some(track_id) = incoming {
            if self.slots.inactive().media().is_paused() {
                self.start_slot(self.slots.inactive_id(), track_id);
            }
        }

        debug!(
            "Crossfade progress {:.3} (active {:.3}, inactive {:.3})",
            progress, ramp.active, ramp.inactive
        );
        self.emit(PlayerEvent::CrossfadeProgress {
            progress,
            active_volume: ramp.active,
            inactive_volume: ramp.inactive,
        });
    }

    /// Handle the end of playback on `slot`
    ///
    /// Clears the slot and releases its source. If it was the active slot
    /// the sibling takes over at full volume. Then refills from the queue.
    pub fn on_ended(&mut self, slot: SlotId) {
        if self.shut_down {
            return;
        }

        let was_active = self.slots.is_active(slot);
        let finished = {
            let target = self.slots.get_mut(slot);
            let finished = target.clear(self.binder.as_mut());
            if finished.is_some() {
                target.media_mut().set_volume(0.0);
            }
            finished
        };
        let Some(track) = finished else {
            debug!("Ignoring ended event from empty slot {}", slot);
            return;
        };

        info!("Slot {} finished {} ({})", slot, track.id(), track.name());
        self.emit(PlayerEvent::TrackFinished {
            slot,
            track_id: track.id(),
        });

        if was_active {
            self.slots.swap();
            self.crossfading = None;
            self.slots.active_mut().media_mut().set_volume(1.0);

            let active = self.slots.active_id();
            info!("Slot {} is now active", active);
            self.emit(PlayerEvent::SlotsSwapped { active });
        }

        self.fill_slots();
    }

    // ===== Metadata Display =====

    /// Deliver a tag read for `track_id`
    ///
    /// Results for tracks no longer held by a slot or the queue are stale and
    /// discarded. A result for the active track updates the display at once;
    /// others wait until their track becomes active.
    pub fn on_metadata_resolved(&mut self, track_id: TrackId, result: Result<TrackMetadata>) {
        let failure = result.as_ref().err().map(ToString::to_string);

        let Some(task) = self.task_mut(track_id) else {
            debug!("Discarding stale metadata for {}", track_id);
            return;
        };
        if !task.complete(result) {
            debug!("Metadata for {} already delivered", track_id);
            return;
        }

        if let Some(message) = failure {
            warn!("Metadata for {} failed: {}", track_id, message);
            self.emit(PlayerEvent::MetadataFailed { track_id, message });
            return;
        }

        if self.slots.active().holds(track_id) {
            self.refresh_now_playing();
        }
    }

    fn task_mut(&mut self, track_id: TrackId) -> Option<&mut MetadataTask> {
        for slot_id in [SlotId::A, SlotId::B] {
            if self.slots.get(slot_id).holds(track_id) {
                return self.slots.get_mut(slot_id).task_for(track_id);
            }
        }
        self.queue.task_mut(track_id)
    }

    /// Show the active track's metadata if it arrived and was not shown yet
    ///
    /// An empty active slot clears the display.
    fn refresh_now_playing(&mut self) {
        let slot = self.slots.active_mut();
        let Some(track_id) = slot.track_id() else {
            self.clear_now_playing();
            return;
        };
        let Some(metadata) = slot.metadata_mut().and_then(MetadataTask::consume) else {
            return;
        };

        let tags = metadata.tags();
        info!(
            "Now playing {}: {}",
            track_id,
            tags.title.as_deref().unwrap_or("<untitled>")
        );
        self.now_playing.show_tags(track_id, tags.clone());
        self.emit(PlayerEvent::NowPlayingChanged { track_id, tags });

        self.release_artwork();
        let Some(picture) = metadata.pictures.first() else {
            return;
        };
        match self.now_playing.show_artwork(picture, self.artwork.as_mut()) {
            Ok(id) => {
                let url = self
                    .now_playing
                    .artwork()
                    .map(|lease| lease.url().to_string())
                    .unwrap_or_default();
                debug!("Showing {} for {}", id, track_id);
                self.emit(PlayerEvent::ArtworkShown {
                    id,
                    url,
                    release_after_ms: self.config.artwork_release_delay_ms,
                });
            }
            Err(e) => {
                warn!("Artwork for {} unavailable: {}", track_id, e);
                self.emit(PlayerEvent::ArtworkFailed {
                    track_id,
                    message: e.to_string(),
                });
            }
        }
    }

    fn clear_now_playing(&mut self) {
        let Some(track_id) = self.now_playing.clear_tags() else {
            return;
        };
        info!("Nothing left to play after {}", track_id);
        self.release_artwork();
        self.emit(PlayerEvent::NowPlayingCleared);
    }

    fn release_artwork(&mut self) {
        if let Some(id) = self.now_playing.release_artwork(self.artwork.as_mut()) {
            debug!("Released {}", id);
            self.emit(PlayerEvent::ArtworkReleased { id });
        }
    }

    /// Release artwork lease `id` once its display delay has passed
    ///
    /// A lease that was already replaced or released is left alone.
    pub fn expire_artwork(&mut self, id: ArtworkId) {
        if self.now_playing.expire_artwork(id, self.artwork.as_mut()) {
            debug!("Expired {}", id);
            self.emit(PlayerEvent::ArtworkReleased { id });
        } else {
            trace!("{} already released", id);
        }
    }

    // ===== Lifecycle =====

    /// Pause both media and release every outstanding resource
    ///
    /// Idempotent. Later inputs are ignored except metadata deliveries, which
    /// find nothing to update.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;

        for slot_id in [SlotId::A, SlotId::B] {
            let slot = self.slots.get_mut(slot_id);
            slot.media_mut().pause();
            slot.clear(self.binder.as_mut());
        }
        self.release_artwork();

        info!(
            "Playback manager shut down ({} tracks left in queue)",
            self.queue.len()
        );
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    // ===== Settings =====

    /// Replace crossfade settings; applies from the next time update
    pub fn set_crossfade_settings(&mut self, settings: CrossfadeSettings) -> Result<()> {
        let config = PlayerConfig {
            crossfade: settings,
            ..self.config.clone()
        };
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    // ===== Queries =====

    pub fn active_slot(&self) -> SlotId {
        self.slots.active_id()
    }

    pub fn slot(&self, id: SlotId) -> &PlaybackSlot<M, F> {
        self.slots.get(id)
    }

    pub fn media(&self, id: SlotId) -> &M {
        self.slots.get(id).media()
    }

    pub fn queue(&self) -> &TrackQueue<F> {
        &self.queue
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn now_playing(&self) -> &NowPlaying {
        &self.now_playing
    }

    /// Nothing playing and nothing left to play
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty() && self.slots.active().is_empty() && self.slots.inactive().is_empty()
    }

    // ===== Events =====

    fn emit(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }

    /// Take all events emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }
}

impl<M: MediaElement, F> Drop for PlaybackManager<M, F> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
