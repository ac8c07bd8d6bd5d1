//! Shared test doubles for the playback manager
//!
//! Media surfaces keep their state inline (read back through
//! `PlaybackManager::media`). Binder, artwork store and resolver are boxed
//! into the manager, so they report into a shared `Ledger`.

#![allow(dead_code)]

use duet_playback::{
    ArtworkStore, EmbeddedPicture, MediaElement, MetadataResolver, ObjectUrl, PlaybackError,
    PlaybackManager, PlayerConfig, Result, SourceBinder, Track, TrackId, TrackMetadata,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug)]
pub struct TestMedia {
    pub paused: bool,
    pub volume: f32,
    pub source: Option<String>,
    pub play_calls: u32,
    pub refuse_play: bool,
}

impl Default for TestMedia {
    fn default() -> Self {
        Self {
            paused: true,
            volume: 1.0,
            source: None,
            play_calls: 0,
            refuse_play: false,
        }
    }
}

impl MediaElement for TestMedia {
    fn play(&mut self) -> Result<()> {
        self.play_calls += 1;
        if self.refuse_play {
            return Err(PlaybackError::Playback("NotAllowedError".to_string()));
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn load_source(&mut self, source: Option<&ObjectUrl>) {
        self.source = source.map(|url| url.as_str().to_string());
        self.paused = true;
    }
}

#[derive(Debug, Default)]
pub struct Ledger {
    pub sources_acquired: Vec<String>,
    pub sources_released: Vec<String>,
    pub art_acquired: Vec<String>,
    pub art_released: Vec<String>,
    pub metadata_requests: Vec<TrackId>,
}

impl Ledger {
    pub fn outstanding_sources(&self) -> usize {
        self.sources_acquired.len() - self.sources_released.len()
    }

    pub fn outstanding_art(&self) -> usize {
        self.art_acquired.len() - self.art_released.len()
    }
}

/// Binds `String` file names; names ending in `.bad` fail
pub struct TestBinder(pub Rc<RefCell<Ledger>>);

impl SourceBinder<String> for TestBinder {
    fn acquire(&mut self, file: &String) -> Result<ObjectUrl> {
        if file.ends_with(".bad") {
            return Err(PlaybackError::Source(format!("cannot read {file}")));
        }
        let mut ledger = self.0.borrow_mut();
        let url = format!("blob:src-{}-{}", ledger.sources_acquired.len() + 1, file);
        ledger.sources_acquired.push(url.clone());
        Ok(ObjectUrl::new(url))
    }

    fn release(&mut self, url: ObjectUrl) {
        self.0
            .borrow_mut()
            .sources_released
            .push(url.as_str().to_string());
    }
}

pub struct TestArtwork(pub Rc<RefCell<Ledger>>);

impl ArtworkStore for TestArtwork {
    fn acquire(&mut self, picture: &EmbeddedPicture) -> Result<ObjectUrl> {
        if picture.data.is_empty() {
            return Err(PlaybackError::Artwork("empty picture".to_string()));
        }
        let mut ledger = self.0.borrow_mut();
        let url = format!("blob:art-{}", ledger.art_acquired.len() + 1);
        ledger.art_acquired.push(url.clone());
        Ok(ObjectUrl::new(url))
    }

    fn release(&mut self, url: ObjectUrl) {
        self.0.borrow_mut().art_released.push(url.as_str().to_string());
    }
}

/// Records requests; tests deliver results by hand
pub struct TestResolver(pub Rc<RefCell<Ledger>>);

impl MetadataResolver<String> for TestResolver {
    fn request(&mut self, track: &Track<String>) {
        self.0.borrow_mut().metadata_requests.push(track.id());
    }
}

pub type TestManager = PlaybackManager<TestMedia, String>;

pub fn harness() -> (TestManager, Rc<RefCell<Ledger>>) {
    harness_with(PlayerConfig::default())
}

pub fn harness_with(config: PlayerConfig) -> (TestManager, Rc<RefCell<Ledger>>) {
    let ledger = Rc::new(RefCell::new(Ledger::default()));
    let manager = PlaybackManager::new(
        config,
        TestMedia::default(),
        TestMedia::default(),
        Box::new(TestBinder(Rc::clone(&ledger))),
        Box::new(TestResolver(Rc::clone(&ledger))),
        Box::new(TestArtwork(Rc::clone(&ledger))),
    )
    .unwrap();
    (manager, ledger)
}

pub fn files(names: &[&str]) -> Vec<(String, String)> {
    names
        .iter()
        .map(|name| (name.to_string(), name.to_string()))
        .collect()
}

pub fn tags(title: &str) -> TrackMetadata {
    TrackMetadata {
        title: Some(title.to_string()),
        artist: Some("Test Artist".to_string()),
        ..Default::default()
    }
}

pub fn tags_with_cover(title: &str) -> TrackMetadata {
    TrackMetadata {
        pictures: vec![EmbeddedPicture::new(vec![0x89, 0x50, 0x4E, 0x47], "image/png")],
        ..tags(title)
    }
}
