//! WASM bindings for the two-slot player
//!
//! `WebPlayer` owns the playback manager behind an `Rc<RefCell<..>>` so the
//! element listeners, tag reads and artwork timers can reach it later. Every
//! entry point borrows the manager, applies one input, drains the resulting
//! events and only then calls back into JavaScript, so a listener may call
//! straight back into the player.

use crate::console;
use crate::dom::{find_audio, BlobArtwork, DomAudio, ObjectUrlBinder};
use crate::tags::FileTagReader;
use duet_playback::{
    ArtworkId, CrossfadeSettings, DisplayTags, FadeCurve, PlaybackError, PlaybackManager,
    PlayerConfig, PlayerEvent, SlotId, TimeUpdate, TrackId,
};
use js_sys::Function;
use serde::{Deserialize, Serialize};
use std::cell::{OnceCell, RefCell};
use std::rc::{Rc, Weak};
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{File, FileList, HtmlAudioElement};

pub type Manager = PlaybackManager<DomAudio, File>;

pub struct Shared {
    manager: Manager,
    listener: Option<Function>,
}

/// Late-bound weak handle, set once the player exists
///
/// The tag reader is built before the manager that owns it, so it cannot be
/// handed the finished `Rc` directly.
pub type Backlink = Rc<OnceCell<Weak<RefCell<Shared>>>>;

/// Apply one input to the manager and deliver the events it produced
pub fn run(shared: &Rc<RefCell<Shared>>, action: impl FnOnce(&mut Manager)) {
    let (events, listener) = {
        let Ok(mut inner) = shared.try_borrow_mut() else {
            warn!("Player is busy; dropping re-entrant input");
            return;
        };
        action(&mut inner.manager);
        (inner.manager.drain_events(), inner.listener.clone())
    };

    for event in events {
        if let PlayerEvent::ArtworkShown {
            id,
            release_after_ms,
            ..
        } = &event
        {
            schedule_expiry(shared, *id, *release_after_ms);
        }

        if let Some(callback) = &listener {
            let value = serde_wasm_bindgen::to_value(&event).unwrap_or(JsValue::NULL);
            if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                warn!("Event listener threw on {}: {:?}", event.kind(), e);
            }
        }
    }
}

/// Release displayed artwork once the page has had time to load it
fn schedule_expiry(shared: &Rc<RefCell<Shared>>, id: ArtworkId, delay_ms: u64) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let player = Rc::downgrade(shared);
    let callback = Closure::once_into_js(move || {
        if let Some(shared) = player.upgrade() {
            run(&shared, |manager| manager.expire_artwork(id));
        }
    });

    let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    if let Err(e) =
        window.set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
    {
        warn!("Failed to schedule release of {}: {:?}", id, e);
    }
}

/// Forward `timeupdate` and `ended` from one element to its slot
fn wire_slot(
    shared: &Rc<RefCell<Shared>>,
    slot: SlotId,
    element: &HtmlAudioElement,
) -> [Closure<dyn FnMut()>; 2] {
    let player = Rc::downgrade(shared);
    let source = element.clone();
    let on_time_update = Closure::wrap(Box::new(move || {
        let Some(shared) = player.upgrade() else {
            return;
        };
        let update = TimeUpdate::new(source.current_time(), source.duration());
        run(&shared, |manager| manager.on_time_update(slot, update));
    }) as Box<dyn FnMut()>);
    element.set_ontimeupdate(Some(on_time_update.as_ref().unchecked_ref()));

    let player = Rc::downgrade(shared);
    let on_ended = Closure::wrap(Box::new(move || {
        if let Some(shared) = player.upgrade() {
            run(&shared, |manager| manager.on_ended(slot));
        }
    }) as Box<dyn FnMut()>);
    element.set_onended(Some(on_ended.as_ref().unchecked_ref()));

    [on_time_update, on_ended]
}

fn to_js(error: PlaybackError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Constructor options; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WebOptions {
    #[serde(flatten)]
    player: PlayerConfig,

    /// `tracing` filter directives, e.g. `"duet_playback=debug"`
    log: Option<String>,
}

#[derive(Debug, Serialize)]
struct NowPlayingView {
    track_id: Option<TrackId>,
    tags: Option<DisplayTags>,
    artwork_url: Option<String>,
}

/// Two-slot crossfading player bound to two `<audio>` elements
#[wasm_bindgen]
pub struct WebPlayer {
    shared: Rc<RefCell<Shared>>,
    elements: [HtmlAudioElement; 2],
    // Must outlive the element handlers that point at them
    _handlers: Vec<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl WebPlayer {
    /// Bind to the two `<audio>` elements matched by the selectors
    ///
    /// Fails if either element is missing or `options` is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(selector_a: &str, selector_b: &str, options: JsValue) -> Result<WebPlayer, JsValue> {
        console_error_panic_hook::set_once();

        let options: WebOptions = if options.is_undefined() || options.is_null() {
            WebOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| JsValue::from_str(&format!("Invalid player options: {e}")))?
        };
        console::init(options.log.as_deref().unwrap_or(console::DEFAULT_FILTER));

        let audio_a = find_audio(selector_a).map_err(to_js)?;
        let audio_b = find_audio(selector_b).map_err(to_js)?;

        let backlink = Backlink::default();
        let manager = PlaybackManager::new(
            options.player,
            DomAudio::new(audio_a.clone()),
            DomAudio::new(audio_b.clone()),
            Box::new(ObjectUrlBinder),
            Box::new(FileTagReader::new(Rc::clone(&backlink))),
            Box::new(BlobArtwork),
        )
        .map_err(to_js)?;

        let shared = Rc::new(RefCell::new(Shared {
            manager,
            listener: None,
        }));
        let _ = backlink.set(Rc::downgrade(&shared));

        let mut handlers = Vec::with_capacity(4);
        handlers.extend(wire_slot(&shared, SlotId::A, &audio_a));
        handlers.extend(wire_slot(&shared, SlotId::B, &audio_b));

        info!("Player bound to {} and {}", selector_a, selector_b);

        Ok(WebPlayer {
            shared,
            elements: [audio_a, audio_b],
            _handlers: handlers,
        })
    }

    /// Queue every file in a `FileList`, in list order
    ///
    /// Returns how many tracks were queued.
    #[wasm_bindgen(js_name = handleFiles)]
    pub fn handle_files(&self, files: &FileList) -> usize {
        let picked: Vec<(String, File)> = (0..files.length())
            .filter_map(|index| files.get(index))
            .map(|file| (file.name(), file))
            .collect();

        let mut queued = 0;
        run(&self.shared, |manager| {
            queued = manager.enqueue_all(picked).len();
        });
        queued
    }

    /// Register the callback that receives every player event
    #[wasm_bindgen(js_name = onEvent)]
    pub fn on_event(&self, callback: Function) {
        match self.shared.try_borrow_mut() {
            Ok(mut inner) => inner.listener = Some(callback),
            Err(_) => warn!("Player is busy; listener not registered"),
        }
    }

    /// Snapshot of the now-playing display
    #[wasm_bindgen(js_name = nowPlaying)]
    pub fn now_playing(&self) -> JsValue {
        let Ok(inner) = self.shared.try_borrow() else {
            return JsValue::NULL;
        };
        let display = inner.manager.now_playing();
        let view = NowPlayingView {
            track_id: display.track_id(),
            tags: display.tags().cloned(),
            artwork_url: display.artwork().map(|lease| lease.url().to_string()),
        };
        serde_wasm_bindgen::to_value(&view).unwrap_or(JsValue::NULL)
    }

    /// Number of tracks waiting for a slot
    #[wasm_bindgen(js_name = queueLength)]
    pub fn queue_length(&self) -> usize {
        self.shared
            .try_borrow()
            .map(|inner| inner.manager.queue_len())
            .unwrap_or(0)
    }

    /// `"a"` or `"b"`
    #[wasm_bindgen(js_name = activeSlot)]
    pub fn active_slot(&self) -> String {
        self.shared
            .try_borrow()
            .map(|inner| inner.manager.active_slot().to_string().to_lowercase())
            .unwrap_or_default()
    }

    /// Change the crossfade window and curve
    #[wasm_bindgen(js_name = setCrossfade)]
    pub fn set_crossfade(&self, window_ms: u32, curve: &str) -> Result<(), JsValue> {
        let curve: FadeCurve = curve.parse().map_err(|e: String| JsValue::from_str(&e))?;
        let settings = CrossfadeSettings { window_ms, curve };

        let mut outcome = Ok(());
        run(&self.shared, |manager| {
            outcome = manager.set_crossfade_settings(settings);
        });
        outcome.map_err(to_js)
    }

    /// Pause both elements and release every object URL
    pub fn shutdown(&self) {
        run(&self.shared, |manager| manager.shutdown());
    }
}

impl Drop for WebPlayer {
    fn drop(&mut self) {
        for element in &self.elements {
            element.set_ontimeupdate(None);
            element.set_onended(None);
        }
        self.shutdown();
    }
}
