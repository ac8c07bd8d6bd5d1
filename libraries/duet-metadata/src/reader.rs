/// Tag reader implementation using lofty
use crate::error::{MetadataError, Result};
use duet_playback::{EmbeddedPicture, TrackMetadata};
use lofty::{AudioFile, Probe, TaggedFileExt};
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Default limit for a single embedded picture (5MB)
pub const MAX_PICTURE_SIZE: usize = 5 * 1024 * 1024;

/// Tag reader using the lofty library
///
/// Reads from an in-memory buffer (browser `File` contents) or from a path.
#[derive(Debug, Clone)]
pub struct LoftyTagReader {
    max_picture_size: usize,
}

impl LoftyTagReader {
    /// Create a new tag reader
    pub fn new() -> Self {
        Self {
            max_picture_size: MAX_PICTURE_SIZE,
        }
    }

    /// Skip embedded pictures larger than `bytes`
    pub fn with_max_picture_size(bytes: usize) -> Self {
        Self {
            max_picture_size: bytes,
        }
    }

    /// Read tags, pictures and duration from a complete file buffer
    pub fn read_bytes(&self, bytes: &[u8]) -> Result<TrackMetadata> {
        let probe = Probe::new(Cursor::new(bytes)).guess_file_type()?;
        if probe.file_type().is_none() {
            return Err(MetadataError::UnknownFormat);
        }

        let tagged_file = probe.read()?;
        Ok(self.extract(&tagged_file))
    }

    /// Read tags, pictures and duration from a file on disk
    pub fn read_path(&self, path: &Path) -> Result<TrackMetadata> {
        if !path.exists() {
            return Err(MetadataError::FileNotFound(path.display().to_string()));
        }

        let tagged_file = lofty::read_from_path(path)?;
        Ok(self.extract(&tagged_file))
    }

    fn extract(&self, tagged_file: &lofty::TaggedFile) -> TrackMetadata {
        let duration = tagged_file.properties().duration();

        // Get primary tag or first available tag
        let tag = tagged_file
            .primary_tag()
            .or_else(|| tagged_file.first_tag());

        let mut metadata = match tag {
            Some(tag) => {
                let mut metadata = extract_from_tag(tag);
                metadata.pictures = self.pictures(tag);
                metadata
            }
            None => {
                debug!("No tags found, returning duration only");
                TrackMetadata::default()
            }
        };

        if !duration.is_zero() {
            metadata.duration = Some(duration);
        }
        metadata
    }

    /// Embedded pictures in tag order, oversized ones dropped
    fn pictures(&self, tag: &lofty::Tag) -> Vec<EmbeddedPicture> {
        tag.pictures()
            .iter()
            .filter_map(|picture| {
                let data = picture.data();
                if let Err(e) = self.check_size(data.len()) {
                    warn!("Skipping embedded picture: {}", e);
                    return None;
                }

                // Default to "image/jpeg" if not specified
                let mime_type = picture
                    .mime_type()
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_else(|| "image/jpeg".to_string());

                Some(EmbeddedPicture {
                    data: data.to_vec(),
                    mime_type,
                    description: picture.description().map(ToString::to_string),
                })
            })
            .collect()
    }

    fn check_size(&self, len: usize) -> Result<()> {
        if len > self.max_picture_size {
            return Err(MetadataError::TooLarge(len, self.max_picture_size));
        }
        Ok(())
    }
}

impl Default for LoftyTagReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract text fields from a lofty tag
fn extract_from_tag(tag: &lofty::Tag) -> TrackMetadata {
    let mut metadata = TrackMetadata::default();

    // lofty 0.18 API - iterate through items
    for item in tag.items() {
        let Some(text) = item.value().text() else {
            continue;
        };
        match item.key() {
            lofty::ItemKey::TrackTitle => metadata.title = Some(text.to_string()),
            lofty::ItemKey::TrackArtist => metadata.artist = Some(text.to_string()),
            lofty::ItemKey::AlbumTitle => metadata.album = Some(text.to_string()),
            lofty::ItemKey::AlbumArtist => metadata.album_artist = Some(text.to_string()),
            lofty::ItemKey::Genre => metadata.genre = Some(text.to_string()),
            lofty::ItemKey::Year | lofty::ItemKey::RecordingDate if metadata.year.is_none() => {
                metadata.year = parse_leading_number(text);
            }
            lofty::ItemKey::TrackNumber => metadata.track_number = parse_leading_number(text),
            lofty::ItemKey::DiscNumber => metadata.disc_number = parse_leading_number(text),
            _ => {}
        }
    }

    metadata
}

/// Parse "3", "3/12" or "2024-05-01" into its leading number
fn parse_leading_number(text: &str) -> Option<u32> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Duration of an audio file, read from its container headers
pub fn probe_duration(path: &Path) -> Result<Duration> {
    if !path.exists() {
        return Err(MetadataError::FileNotFound(path.display().to_string()));
    }
    let tagged_file = Probe::open(path)?.read()?;
    Ok(tagged_file.properties().duration())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_number_parsing() {
        assert_eq!(parse_leading_number("7"), Some(7));
        assert_eq!(parse_leading_number("3/12"), Some(3));
        assert_eq!(parse_leading_number(" 2024-05-01"), Some(2024));
        assert_eq!(parse_leading_number("side A"), None);
        assert_eq!(parse_leading_number(""), None);
    }

    #[test]
    fn first_date_field_sets_year() {
        let mut tag = lofty::Tag::new(lofty::TagType::VorbisComments);
        assert!(tag.insert_text(lofty::ItemKey::RecordingDate, "2024-05-01".to_string()));
        assert!(tag.insert_text(lofty::ItemKey::Year, "1999".to_string()));

        assert_eq!(extract_from_tag(&tag).year, Some(2024));
    }

    #[test]
    fn garbage_bytes_are_unknown_format() {
        let reader = LoftyTagReader::new();
        let result = reader.read_bytes(b"definitely not an audio file");
        assert!(matches!(result, Err(MetadataError::UnknownFormat)));
    }

    #[test]
    fn read_nonexistent_path_returns_error() {
        let reader = LoftyTagReader::new();
        let result = reader.read_path(Path::new("/definitely/does/not/exist.mp3"));
        assert!(matches!(result, Err(MetadataError::FileNotFound(_))));
    }

    #[test]
    fn size_limit() {
        let reader = LoftyTagReader::with_max_picture_size(10);
        assert!(reader.check_size(10).is_ok());
        assert!(matches!(
            reader.check_size(11),
            Err(MetadataError::TooLarge(11, 10))
        ));
    }
}
