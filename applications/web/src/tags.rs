//! Tag resolution for picked files
//!
//! Reads the whole file into memory, parses it with lofty and reports back
//! to the player on a later turn of the event loop.

use crate::dom::js_message;
use crate::player::{self, Backlink};
use duet_metadata::LoftyTagReader;
use duet_playback::{MetadataResolver, PlaybackError, Result, Track, TrackMetadata};
use js_sys::Uint8Array;
use tracing::{debug, warn};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::File;

pub struct FileTagReader {
    player: Backlink,
    reader: LoftyTagReader,
}

impl FileTagReader {
    pub fn new(player: Backlink) -> Self {
        Self {
            player,
            reader: LoftyTagReader::new(),
        }
    }
}

impl MetadataResolver<File> for FileTagReader {
    fn request(&mut self, track: &Track<File>) {
        let Some(player) = self.player.get().cloned() else {
            warn!("Tag request for {} before the player was ready", track.id());
            return;
        };

        let track_id = track.id();
        let file = track.file().clone();
        let reader = self.reader.clone();

        spawn_local(async move {
            let result = read_file(&reader, &file).await;
            if let Err(e) = &result {
                debug!("No tags for {} ({}): {}", file.name(), track_id, e);
            }

            // The player may have been freed while the file was being read
            if let Some(shared) = player.upgrade() {
                player::run(&shared, |manager| {
                    manager.on_metadata_resolved(track_id, result);
                });
            }
        });
    }
}

async fn read_file(reader: &LoftyTagReader, file: &File) -> Result<TrackMetadata> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| PlaybackError::Metadata(js_message(&e)))?;
    let bytes = Uint8Array::new(&buffer).to_vec();

    Ok(reader.read_bytes(&bytes)?)
}
