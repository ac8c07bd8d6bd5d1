//! Integration tests for tag reading
//!
//! Builds a minimal WAV file on disk, optionally tags it with ID3v2, and reads
//! it back through both entry points.

use duet_metadata::{probe_duration, LoftyTagReader, MetadataError};
use duet_playback::PlaybackError;
use lofty::{ItemKey, Tag, TagExt, TagType};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// One second of 8kHz mono 16-bit silence
fn write_wav(dir: &Path, name: &str) -> PathBuf {
    let sample_rate: u32 = 8000;
    let data_len: u32 = sample_rate * 2;

    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes()); // byte rate
    bytes.extend_from_slice(&2u16.to_le_bytes()); // block align
    bytes.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + data_len as usize, 0);

    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

fn write_tagged_wav(dir: &Path) -> PathBuf {
    let path = write_wav(dir, "tagged.wav");

    let mut tag = Tag::new(TagType::Id3v2);
    tag.insert_text(ItemKey::TrackTitle, "Night Drive".to_string());
    tag.insert_text(ItemKey::TrackArtist, "The Testers".to_string());
    tag.insert_text(ItemKey::AlbumTitle, "Fixtures".to_string());
    tag.insert_text(ItemKey::TrackNumber, "4".to_string());
    tag.save_to_path(&path).unwrap();

    path
}

fn assert_about_one_second(duration: Duration) {
    let ms = duration.as_millis();
    assert!((980..=1020).contains(&ms), "unexpected duration {ms}ms");
}

#[test]
fn untagged_wav_has_duration_only() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "plain.wav");

    let metadata = LoftyTagReader::new().read_path(&path).unwrap();

    assert_eq!(metadata.title, None);
    assert!(metadata.pictures.is_empty());
    assert_about_one_second(metadata.duration.unwrap());
}

#[test]
fn tagged_wav_from_path() {
    let dir = TempDir::new().unwrap();
    let path = write_tagged_wav(dir.path());

    let metadata = LoftyTagReader::new().read_path(&path).unwrap();

    assert_eq!(metadata.title.as_deref(), Some("Night Drive"));
    assert_eq!(metadata.artist.as_deref(), Some("The Testers"));
    assert_eq!(metadata.album.as_deref(), Some("Fixtures"));
    assert_eq!(metadata.track_number, Some(4));
}

#[test]
fn tagged_wav_from_bytes_matches_path() {
    let dir = TempDir::new().unwrap();
    let path = write_tagged_wav(dir.path());
    let reader = LoftyTagReader::new();

    let from_path = reader.read_path(&path).unwrap();
    let from_bytes = reader.read_bytes(&std::fs::read(&path).unwrap()).unwrap();

    assert_eq!(from_bytes, from_path);
}

#[test]
fn display_tags_projection() {
    let dir = TempDir::new().unwrap();
    let path = write_tagged_wav(dir.path());

    let tags = LoftyTagReader::new().read_path(&path).unwrap().tags();

    assert_eq!(tags.title.as_deref(), Some("Night Drive"));
    assert_eq!(tags.track_number, Some(4));
    assert!(tags.duration_ms.is_some());
}

#[test]
fn probe_duration_of_wav() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "probe.wav");

    assert_about_one_second(probe_duration(&path).unwrap());
}

#[test]
fn probe_duration_missing_file() {
    let result = probe_duration(Path::new("/definitely/does/not/exist.wav"));
    assert!(matches!(result, Err(MetadataError::FileNotFound(_))));
}

#[test]
fn truncated_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_wav(dir.path(), "full.wav");
    let bytes = std::fs::read(&path).unwrap();

    let result = LoftyTagReader::new().read_bytes(&bytes[..20]);
    assert!(result.is_err());
}

#[test]
fn errors_convert_to_playback_errors() {
    let err: PlaybackError = MetadataError::UnknownFormat.into();
    assert!(matches!(err, PlaybackError::Metadata(msg) if msg.contains("Unknown audio format")));
}
