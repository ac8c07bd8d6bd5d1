//! Simulated media surfaces and collaborators
//!
//! A [`SimMedia`] is a playhead over a known duration. Durations come from
//! the [`Catalog`], which the [`CatalogBinder`] fills as sources are bound,
//! so loading a source URL into a deck is all a deck needs to know.

use crate::error::{Result, SimError};
use duet_metadata::{probe_duration, LoftyTagReader};
use duet_playback::{
    ArtworkStore, EmbeddedPicture, MediaElement, MetadataResolver, ObjectUrl, PlaybackError,
    SourceBinder, TimeUpdate, Track, TrackId, TrackMetadata,
};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

const SYNTHETIC_PREFIX: &str = "synthetic:";

/// What a queued track plays
#[derive(Debug, Clone, PartialEq)]
pub enum TrackSource {
    /// An audio file on disk; duration and tags are read with lofty
    File(PathBuf),
    /// A named track of fixed length with no file behind it
    Synthetic { name: String, seconds: f64 },
}

impl TrackSource {
    /// Parse a path or `synthetic:NAME:SECONDS`
    pub fn parse(input: &str) -> Result<Self> {
        let Some(rest) = input.strip_prefix(SYNTHETIC_PREFIX) else {
            return Ok(TrackSource::File(PathBuf::from(input)));
        };

        let invalid = |reason: &str| SimError::Input {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let (name, seconds) = rest
            .rsplit_once(':')
            .ok_or_else(|| invalid("expected synthetic:NAME:SECONDS"))?;
        if name.is_empty() {
            return Err(invalid("name is empty"));
        }
        let seconds: f64 = seconds
            .parse()
            .map_err(|_| invalid("SECONDS is not a number"))?;
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(invalid("SECONDS must be zero or positive"));
        }

        Ok(TrackSource::Synthetic {
            name: name.to_string(),
            seconds,
        })
    }

    /// Name shown in the queue
    pub fn display_name(&self) -> String {
        match self {
            TrackSource::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            TrackSource::Synthetic { name, .. } => name.clone(),
        }
    }
}

impl fmt::Display for TrackSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackSource::File(path) => write!(f, "{}", path.display()),
            TrackSource::Synthetic { name, seconds } => {
                write!(f, "{SYNTHETIC_PREFIX}{name}:{seconds}")
            }
        }
    }
}

/// Duration in seconds of every bound source URL
pub type Catalog = Rc<RefCell<HashMap<String, f64>>>;

// ===== Media =====

/// Playhead state of one simulated deck
#[derive(Debug, Clone)]
pub struct DeckState {
    pub source: Option<String>,
    pub position: f64,
    pub duration: f64,
    pub paused: bool,
    pub volume: f32,
}

impl Default for DeckState {
    fn default() -> Self {
        Self {
            source: None,
            position: 0.0,
            duration: f64::NAN,
            paused: true,
            volume: 1.0,
        }
    }
}

/// Result of advancing a deck by one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advance {
    pub update: TimeUpdate,
    pub ended: bool,
}

impl DeckState {
    pub fn is_playing(&self) -> bool {
        !self.paused && self.source.is_some()
    }

    /// Move the playhead forward; `None` while paused or unloaded
    pub fn advance(&mut self, seconds: f64) -> Option<Advance> {
        if !self.is_playing() {
            return None;
        }

        self.position += seconds;
        let ended = self.duration.is_finite() && self.position >= self.duration;
        if ended {
            self.position = self.duration;
            self.paused = true;
        }

        Some(Advance {
            update: TimeUpdate::new(self.position, self.duration),
            ended,
        })
    }
}

/// A deck the playback manager drives; the simulator reads the same state
pub struct SimMedia {
    state: Rc<RefCell<DeckState>>,
    catalog: Catalog,
}

impl SimMedia {
    pub fn new(state: Rc<RefCell<DeckState>>, catalog: Catalog) -> Self {
        Self { state, catalog }
    }
}

impl MediaElement for SimMedia {
    fn play(&mut self) -> duet_playback::Result<()> {
        let mut state = self.state.borrow_mut();
        if state.source.is_none() {
            return Err(PlaybackError::Playback("no source loaded".to_string()));
        }
        state.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.state.borrow_mut().paused = true;
    }

    fn is_paused(&self) -> bool {
        self.state.borrow().paused
    }

    fn set_volume(&mut self, volume: f32) {
        self.state.borrow_mut().volume = volume.clamp(0.0, 1.0);
    }

    fn volume(&self) -> f32 {
        self.state.borrow().volume
    }

    fn load_source(&mut self, source: Option<&ObjectUrl>) {
        let mut state = self.state.borrow_mut();
        state.position = 0.0;
        state.paused = true;
        match source {
            Some(url) => {
                state.duration = self
                    .catalog
                    .borrow()
                    .get(url.as_str())
                    .copied()
                    .unwrap_or(f64::NAN);
                state.source = Some(url.to_string());
            }
            None => {
                state.duration = f64::NAN;
                state.source = None;
            }
        }
    }
}

// ===== Sources =====

/// Binds tracks to `sim://` URLs and records their durations
pub struct CatalogBinder {
    catalog: Catalog,
    next_id: u64,
}

impl CatalogBinder {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            next_id: 0,
        }
    }
}

impl SourceBinder<TrackSource> for CatalogBinder {
    fn acquire(&mut self, file: &TrackSource) -> duet_playback::Result<ObjectUrl> {
        let seconds = match file {
            TrackSource::File(path) => probe_duration(path)
                .map_err(|e| PlaybackError::Source(format!("{}: {}", path.display(), e)))?
                .as_secs_f64(),
            TrackSource::Synthetic { seconds, .. } => *seconds,
        };

        self.next_id += 1;
        let url = format!("sim://source/{}", self.next_id);
        self.catalog.borrow_mut().insert(url.clone(), seconds);
        debug!("Bound {} to {} ({:.1}s)", file, url, seconds);

        Ok(ObjectUrl::new(url))
    }

    fn release(&mut self, url: ObjectUrl) {
        if self.catalog.borrow_mut().remove(url.as_str()).is_none() {
            warn!("Released unknown source {}", url);
        }
    }
}

/// Hands out `sim://art/N` URLs and tracks which are still live
#[derive(Debug, Default)]
pub struct SimArtwork {
    next_id: u64,
    live: HashSet<String>,
}

impl SimArtwork {
    pub fn live(&self) -> usize {
        self.live.len()
    }
}

impl ArtworkStore for SimArtwork {
    fn acquire(&mut self, picture: &EmbeddedPicture) -> duet_playback::Result<ObjectUrl> {
        if picture.data.is_empty() {
            return Err(PlaybackError::Artwork("picture has no data".to_string()));
        }

        self.next_id += 1;
        let url = format!("sim://art/{}", self.next_id);
        debug!(
            "Artwork {} ({}, {} bytes)",
            url,
            picture.mime_type,
            picture.data.len()
        );
        self.live.insert(url.clone());
        Ok(ObjectUrl::new(url))
    }

    fn release(&mut self, url: ObjectUrl) {
        if !self.live.remove(url.as_str()) {
            warn!("Released unknown artwork {}", url);
        }
    }
}

// ===== Metadata =====

pub type Resolution = (TrackId, duet_playback::Result<TrackMetadata>);

/// Reads tags off the async runtime and reports back over a channel
///
/// Must be used from inside a tokio runtime.
pub struct ChannelResolver {
    reader: LoftyTagReader,
    results: mpsc::UnboundedSender<Resolution>,
}

impl ChannelResolver {
    pub fn new(results: mpsc::UnboundedSender<Resolution>) -> Self {
        Self {
            reader: LoftyTagReader::new(),
            results,
        }
    }
}

impl MetadataResolver<TrackSource> for ChannelResolver {
    fn request(&mut self, track: &Track<TrackSource>) {
        let track_id = track.id();
        let results = self.results.clone();

        match track.file() {
            TrackSource::File(path) => {
                let path = path.clone();
                let reader = self.reader.clone();
                tokio::task::spawn_blocking(move || {
                    let result = reader.read_path(&path).map_err(PlaybackError::from);
                    // Receiver gone means the simulation already finished
                    let _ = results.send((track_id, result));
                });
            }
            TrackSource::Synthetic { name, seconds } => {
                let metadata = TrackMetadata {
                    title: Some(name.clone()),
                    duration: Some(Duration::from_secs_f64(*seconds)),
                    ..TrackMetadata::default()
                };
                let _ = results.send((track_id, Ok(metadata)));
            }
        }
    }
}
