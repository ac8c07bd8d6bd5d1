//! Tick loop that plays a playlist through the manager
//!
//! Each tick handles the decks one at a time: advance the playhead, report
//! `timeupdate`, then `ended` if it reached its end. A deck never sits paused
//! at its end while the other deck's events are handled, as in a browser.
//! Metadata completions and artwork timers are delivered between ticks.

use crate::config::SimConfig;
use crate::error::Result;
use crate::host::{
    Advance, Catalog, CatalogBinder, ChannelResolver, DeckState, Resolution, SimArtwork,
    SimMedia, TrackSource,
};
use duet_playback::{ArtworkId, PlaybackManager, PlayerEvent, SlotId, TrackId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// What happened during a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    /// Tracks whose media was started, once per start
    pub started: Vec<String>,
    /// Tracks that played to their end, in order
    pub played: Vec<String>,
    /// Tracks dropped because they could not be bound
    pub failed: Vec<String>,
    pub crossfades: usize,
    pub swaps: usize,
    pub ticks: u64,
    /// Simulated media time
    pub media_time: Duration,
}

pub struct Simulator {
    config: SimConfig,
    manager: PlaybackManager<SimMedia, TrackSource>,
    decks: [Rc<RefCell<DeckState>>; 2],
    results: mpsc::UnboundedReceiver<Resolution>,
    names: HashMap<TrackId, String>,
    /// Artwork to release, with the elapsed tick time it is due at
    artwork_due: Vec<(ArtworkId, u64)>,
    elapsed_ms: u64,
    summary: Summary,
}

impl Simulator {
    /// Set up both decks and queue every track
    ///
    /// Must be called from inside a tokio runtime; tag reads are spawned
    /// onto its blocking pool.
    pub fn new(config: SimConfig, tracks: Vec<TrackSource>) -> Result<Self> {
        config.validate()?;

        let catalog = Catalog::default();
        let decks: [Rc<RefCell<DeckState>>; 2] = Default::default();
        let (sender, results) = mpsc::unbounded_channel();

        let mut manager = PlaybackManager::new(
            config.player.clone(),
            SimMedia::new(Rc::clone(&decks[SlotId::A.index()]), Rc::clone(&catalog)),
            SimMedia::new(Rc::clone(&decks[SlotId::B.index()]), Rc::clone(&catalog)),
            Box::new(CatalogBinder::new(catalog)),
            Box::new(ChannelResolver::new(sender)),
            Box::new(SimArtwork::default()),
        )?;

        let entries: Vec<(String, TrackSource)> = tracks
            .into_iter()
            .map(|track| (track.display_name(), track))
            .collect();
        let names: Vec<String> = entries.iter().map(|(name, _)| name.clone()).collect();
        let ids = manager.enqueue_all(entries);

        let mut simulator = Self {
            config,
            manager,
            decks,
            results,
            names: ids.into_iter().zip(names).collect(),
            artwork_due: Vec::new(),
            elapsed_ms: 0,
            summary: Summary::default(),
        };
        simulator.process_events();
        Ok(simulator)
    }

    /// Play until both slots are empty and nothing is queued
    pub async fn run(mut self) -> Summary {
        let mut interval = tokio::time::interval(Duration::from_millis(self.config.tick_ms));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Playing {} tracks (window {}ms, {} curve, {}x)",
            self.names.len(),
            self.config.player.crossfade.window_ms,
            self.config.player.crossfade.curve.display_name(),
            self.config.speed
        );

        while !self.is_finished() {
            if self.config.realtime {
                interval.tick().await;
            } else {
                tokio::task::yield_now().await;
            }
            self.step();

            if !self.is_finished() && !self.any_deck_playing() {
                warn!("Both decks stopped with tracks still loaded; giving up");
                break;
            }
        }

        self.finish()
    }

    /// Advance the simulation by one tick
    pub fn step(&mut self) {
        self.summary.ticks += 1;
        self.elapsed_ms += self.config.tick_ms;

        while let Ok((track_id, result)) = self.results.try_recv() {
            self.manager.on_metadata_resolved(track_id, result);
        }

        let now = self.elapsed_ms;
        let (due, pending): (Vec<_>, Vec<_>) =
            self.artwork_due.drain(..).partition(|(_, at)| *at <= now);
        self.artwork_due = pending;
        for (id, _) in due {
            self.manager.expire_artwork(id);
        }

        let step_ms = self.config.media_step_ms();
        self.summary.media_time += Duration::from_secs_f64(step_ms / 1000.0);

        for slot in [SlotId::A, SlotId::B] {
            // Release the deck before the manager borrows it through SimMedia
            let advance = self.decks[slot.index()]
                .borrow_mut()
                .advance(step_ms / 1000.0);
            let Some(Advance { update, ended }) = advance else {
                continue;
            };

            self.manager.on_time_update(slot, update);
            if ended {
                self.manager.on_ended(slot);
            }
        }

        self.process_events();
    }

    pub fn is_finished(&self) -> bool {
        self.manager.is_idle()
    }

    pub fn deck(&self, slot: SlotId) -> DeckState {
        self.decks[slot.index()].borrow().clone()
    }

    pub fn manager(&self) -> &PlaybackManager<SimMedia, TrackSource> {
        &self.manager
    }

    /// Shut the manager down and hand back the summary
    pub fn finish(mut self) -> Summary {
        self.manager.shutdown();
        self.process_events();
        std::mem::take(&mut self.summary)
    }

    fn any_deck_playing(&self) -> bool {
        self.decks.iter().any(|deck| deck.borrow().is_playing())
    }

    fn name(&self, track_id: TrackId) -> String {
        self.names
            .get(&track_id)
            .cloned()
            .unwrap_or_else(|| track_id.to_string())
    }

    fn process_events(&mut self) {
        for event in self.manager.drain_events() {
            match event {
                PlayerEvent::TrackQueued {
                    track_id,
                    name,
                    queue_len,
                } => debug!("Queued {} as {} ({} waiting)", name, track_id, queue_len),
                PlayerEvent::SlotFilled { slot, track_id } => {
                    debug!("Slot {} <- {}", slot, self.name(track_id));
                }
                PlayerEvent::PlaybackStarted { slot, track_id } => {
                    let name = self.name(track_id);
                    info!("Playing {} on slot {}", name, slot);
                    self.summary.started.push(name);
                }
                PlayerEvent::PlaybackRejected { slot, message } => {
                    warn!("Slot {} refused to play: {}", slot, message);
                }
                PlayerEvent::SourceFailed { track_id, message } => {
                    let name = self.name(track_id);
                    warn!("Skipping {}: {}", name, message);
                    self.summary.failed.push(name);
                }
                PlayerEvent::CrossfadeStarted {
                    from_track_id,
                    to_track_id,
                    window_ms,
                } => {
                    self.summary.crossfades += 1;
                    match to_track_id {
                        Some(to) => info!(
                            "Crossfade {} -> {} over {}ms",
                            self.name(from_track_id),
                            self.name(to),
                            window_ms
                        ),
                        None => info!("Fading out {}", self.name(from_track_id)),
                    }
                }
                PlayerEvent::CrossfadeProgress {
                    progress,
                    active_volume,
                    inactive_volume,
                } => debug!(
                    "  {:>5.1}%  out {:.3}  in {:.3}",
                    progress * 100.0,
                    active_volume,
                    inactive_volume
                ),
                PlayerEvent::TrackFinished { slot, track_id } => {
                    let name = self.name(track_id);
                    debug!("Slot {} finished {}", slot, name);
                    self.summary.played.push(name);
                }
                PlayerEvent::SlotsSwapped { active } => {
                    self.summary.swaps += 1;
                    debug!("Slot {} is now active", active);
                }
                PlayerEvent::NowPlayingChanged { track_id, tags } => info!(
                    "Now playing: {} - {} ({})",
                    tags.artist.as_deref().unwrap_or("Unknown Artist"),
                    tags.title.unwrap_or_else(|| self.name(track_id)),
                    tags.album.as_deref().unwrap_or("Unknown Album")
                ),
                PlayerEvent::NowPlayingCleared => info!("Nothing playing"),
                PlayerEvent::MetadataFailed { track_id, message } => {
                    debug!("No tags for {}: {}", self.name(track_id), message);
                }
                PlayerEvent::ArtworkShown {
                    id,
                    url,
                    release_after_ms,
                } => {
                    info!("Cover art {} at {}", id, url);
                    self.artwork_due.push((id, self.elapsed_ms + release_after_ms));
                }
                PlayerEvent::ArtworkReleased { id } => debug!("Released {}", id),
                PlayerEvent::ArtworkFailed { track_id, message } => {
                    warn!("No cover art for {}: {}", self.name(track_id), message);
                }
            }
        }
    }
}
