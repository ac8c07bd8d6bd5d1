//! Duet Player Metadata
//!
//! Tag and cover-art reading for Duet Player.
//!
//! This crate provides:
//! - Tag reading from audio files (MP3, FLAC, OGG, WAV, AAC, OPUS)
//! - Embedded picture extraction, in tag order, with a size limit
//! - Duration probing from container headers
//!
//! Results are [`duet_playback::TrackMetadata`] values, ready to hand to
//! `PlaybackManager::on_metadata_resolved`.
//!
//! # Example
//!
//! ```rust,no_run
//! use duet_metadata::LoftyTagReader;
//! use std::path::Path;
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = LoftyTagReader::new();
//!
//! // From disk
//! let metadata = reader.read_path(Path::new("/music/song.mp3"))?;
//! println!("{:?} by {:?}", metadata.title, metadata.artist);
//!
//! // From a buffer (e.g. a browser File's contents)
//! let bytes = std::fs::read("/music/song.flac")?;
//! let metadata = reader.read_bytes(&bytes)?;
//! println!("{} pictures", metadata.pictures.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod reader;

pub use error::{MetadataError, Result};
pub use reader::{probe_duration, LoftyTagReader, MAX_PICTURE_SIZE};
