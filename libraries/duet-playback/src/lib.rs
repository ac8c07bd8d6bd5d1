//! Duet Player - Playback Management
//!
//! Platform-agnostic two-slot crossfade playback for Duet Player.
//!
//! This crate provides:
//! - Slot toggle (two fixed slots, one active)
//! - Pending track queue (strict FIFO)
//! - Slot filler (active first, then inactive)
//! - Crossfade scheduling driven by media time-updates
//! - Now-playing projection with cover-art lease management
//!
//! # Architecture
//!
//! `duet-playback` never touches a platform API:
//! - No dependency on web-sys (browser media elements)
//! - No dependency on lofty (tag reading)
//! - No async runtime
//!
//! Platform-specific code (media surfaces, object URLs, tag reading) is
//! provided via traits: [`MediaElement`], [`SourceBinder`], [`ArtworkStore`]
//! and [`MetadataResolver`].
//!
//! # Example: Basic Playback
//!
//! ```rust
//! use duet_playback::{
//!     ArtworkStore, EmbeddedPicture, MediaElement, NoMetadata, ObjectUrl, PlaybackManager,
//!     PlayerConfig, Result, SlotId, SourceBinder, TimeUpdate,
//! };
//!
//! #[derive(Default)]
//! struct Deck {
//!     paused: bool,
//!     volume: f32,
//! }
//!
//! impl MediaElement for Deck {
//!     fn play(&mut self) -> Result<()> {
//!         self.paused = false;
//!         Ok(())
//!     }
//!     fn pause(&mut self) {
//!         self.paused = true;
//!     }
//!     fn is_paused(&self) -> bool {
//!         self.paused
//!     }
//!     fn set_volume(&mut self, volume: f32) {
//!         self.volume = volume;
//!     }
//!     fn volume(&self) -> f32 {
//!         self.volume
//!     }
//!     fn load_source(&mut self, _source: Option<&ObjectUrl>) {
//!         self.paused = true;
//!     }
//! }
//!
//! struct Paths;
//!
//! impl SourceBinder<String> for Paths {
//!     fn acquire(&mut self, file: &String) -> Result<ObjectUrl> {
//!         Ok(ObjectUrl::new(format!("file://{file}")))
//!     }
//!     fn release(&mut self, _url: ObjectUrl) {}
//! }
//!
//! struct NoArt;
//!
//! impl ArtworkStore for NoArt {
//!     fn acquire(&mut self, _picture: &EmbeddedPicture) -> Result<ObjectUrl> {
//!         Ok(ObjectUrl::new("about:blank"))
//!     }
//!     fn release(&mut self, _url: ObjectUrl) {}
//! }
//!
//! let mut manager = PlaybackManager::new(
//!     PlayerConfig::default(),
//!     Deck::default(),
//!     Deck::default(),
//!     Box::new(Paths),
//!     Box::new(NoMetadata),
//!     Box::new(NoArt),
//! )?;
//!
//! manager.enqueue_all([
//!     ("one.mp3", "/music/one.mp3".to_string()),
//!     ("two.mp3", "/music/two.mp3".to_string()),
//! ]);
//!
//! // 25s left in a 30s window: the incoming slot starts at ~17% volume
//! manager.on_time_update(SlotId::A, TimeUpdate::new(175.0, 200.0));
//! assert!(!manager.media(SlotId::B).is_paused());
//!
//! // Track one ends: slot B takes over
//! manager.on_ended(SlotId::A);
//! assert_eq!(manager.active_slot(), SlotId::B);
//!
//! for event in manager.drain_events() {
//!     println!("{}", event.kind());
//! }
//! # Ok::<(), duet_playback::PlaybackError>(())
//! ```

pub mod crossfade;
mod display;
mod error;
pub mod events;
mod manager;
mod media;
mod metadata;
mod queue;
mod slot;
mod toggle;
pub mod types;

// Public exports
pub use crossfade::{CrossfadeSettings, FadeCurve, TransitionPhase, VolumeRamp};
pub use display::{ArtworkId, ArtworkLease, NowPlaying};
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use manager::PlaybackManager;
pub use media::{ArtworkStore, MediaElement, ObjectUrl, SourceBinder};
pub use metadata::{MetadataResolver, MetadataTask, NoMetadata, TaskState};
pub use queue::{QueuedTrack, TrackQueue};
pub use slot::PlaybackSlot;
pub use toggle::SlotToggle;
pub use types::{
    DisplayTags, EmbeddedPicture, PlayerConfig, SlotId, TimeUpdate, Track, TrackId,
    TrackMetadata,
};
