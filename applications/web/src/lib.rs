//! Duet Player - Browser Host
//!
//! WASM bindings that drive two `<audio>` elements with `duet-playback`.
//!
//! The page owns the markup; this crate only finds the two elements, turns
//! picked files into object URLs, reads their tags with lofty and forwards
//! every [`PlayerEvent`](duet_playback::PlayerEvent) to a JavaScript callback.
//!
//! # Example
//!
//! ```javascript
//! import init, { WebPlayer } from './duet_web.js';
//!
//! await init();
//! const player = new WebPlayer('#audio-a', '#audio-b', { crossfade: { window_ms: 30000 } });
//!
//! player.onEvent((event) => {
//!   if (event.type === 'now_playing_changed') {
//!     document.querySelector('#title').textContent = event.tags.title ?? '';
//!   }
//!   if (event.type === 'artwork_shown') {
//!     document.querySelector('#cover').src = event.url;
//!   }
//! });
//!
//! document.querySelector('#files').addEventListener('change', (e) => {
//!   player.handleFiles(e.target.files);
//! });
//! ```

mod console;
mod dom;
mod player;
mod tags;

pub use player::WebPlayer;
