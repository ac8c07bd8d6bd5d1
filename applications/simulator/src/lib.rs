//! Duet Player - Simulator
//!
//! Runs a playlist through `duet-playback` against simulated media decks on a
//! tick clock, logging every transition. Tracks are real audio files (length
//! and tags read with lofty) or `synthetic:NAME:SECONDS` placeholders.

pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod simulator;

pub use config::{Overrides, SimConfig};
pub use error::{Result, SimError};
pub use host::TrackSource;
pub use simulator::{Simulator, Summary};
