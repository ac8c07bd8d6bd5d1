//! DOM implementations of the playback traits

use duet_playback::{
    ArtworkStore, EmbeddedPicture, MediaElement, ObjectUrl, PlaybackError, Result, SourceBinder,
};
use js_sys::{Array, Uint8Array};
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Blob, BlobPropertyBag, File, HtmlAudioElement, Url};

/// Best-effort readable text for a thrown JS value
pub fn js_message(value: &JsValue) -> String {
    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    format!("{value:?}")
}

/// Look up an `<audio>` element by CSS selector
pub fn find_audio(selector: &str) -> Result<HtmlAudioElement> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| PlaybackError::MissingMedia("no document available".to_string()))?;

    let element = document
        .query_selector(selector)
        .map_err(|e| PlaybackError::MissingMedia(format!("{selector}: {}", js_message(&e))))?
        .ok_or_else(|| PlaybackError::MissingMedia(selector.to_string()))?;

    element
        .dyn_into::<HtmlAudioElement>()
        .map_err(|_| PlaybackError::MissingMedia(format!("{selector} is not an <audio> element")))
}

/// An `<audio>` element as a playback surface
pub struct DomAudio {
    element: HtmlAudioElement,
}

impl DomAudio {
    pub fn new(element: HtmlAudioElement) -> Self {
        Self { element }
    }
}

impl MediaElement for DomAudio {
    fn play(&mut self) -> Result<()> {
        let promise = self
            .element
            .play()
            .map_err(|e| PlaybackError::Playback(js_message(&e)))?;

        // Autoplay policy rejections arrive later; they are only logged
        let source = self.element.current_src();
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                warn!("play() rejected for {}: {}", source, js_message(&e));
            }
        });
        Ok(())
    }

    fn pause(&mut self) {
        if let Err(e) = self.element.pause() {
            warn!("pause() failed: {}", js_message(&e));
        }
    }

    fn is_paused(&self) -> bool {
        self.element.paused()
    }

    fn set_volume(&mut self, volume: f32) {
        self.element.set_volume(f64::from(volume.clamp(0.0, 1.0)));
    }

    fn volume(&self) -> f32 {
        self.element.volume() as f32
    }

    fn load_source(&mut self, source: Option<&ObjectUrl>) {
        match source {
            Some(url) => self.element.set_src(url.as_str()),
            None => {
                // Setting src to "" would make the element request the page URL
                if let Err(e) = self.element.remove_attribute("src") {
                    warn!("Failed to detach source: {}", js_message(&e));
                }
            }
        }
        self.element.load();
    }
}

/// Binds picked files to `blob:` URLs
#[derive(Debug, Default)]
pub struct ObjectUrlBinder;

impl SourceBinder<File> for ObjectUrlBinder {
    fn acquire(&mut self, file: &File) -> Result<ObjectUrl> {
        let url = Url::create_object_url_with_blob(file)
            .map_err(|e| PlaybackError::Source(format!("{}: {}", file.name(), js_message(&e))))?;
        debug!("Created source URL {} for {}", url, file.name());
        Ok(ObjectUrl::new(url))
    }

    fn release(&mut self, url: ObjectUrl) {
        if let Err(e) = Url::revoke_object_url(url.as_str()) {
            warn!("Failed to revoke {}: {}", url, js_message(&e));
        }
    }
}

/// Turns embedded cover art into `blob:` URLs for an `<img>`
#[derive(Debug, Default)]
pub struct BlobArtwork;

impl ArtworkStore for BlobArtwork {
    fn acquire(&mut self, picture: &EmbeddedPicture) -> Result<ObjectUrl> {
        let bytes = Uint8Array::from(picture.data.as_slice());
        let parts = Array::of1(&bytes);

        let options = BlobPropertyBag::new();
        options.set_type(&picture.mime_type);

        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)
            .map_err(|e| PlaybackError::Artwork(js_message(&e)))?;
        let url = Url::create_object_url_with_blob(&blob)
            .map_err(|e| PlaybackError::Artwork(js_message(&e)))?;
        Ok(ObjectUrl::new(url))
    }

    fn release(&mut self, url: ObjectUrl) {
        if let Err(e) = Url::revoke_object_url(url.as_str()) {
            warn!("Failed to revoke artwork {}: {}", url, js_message(&e));
        }
    }
}
