//! Every source and artwork URL is released exactly once

mod common;

use common::{files, harness, tags_with_cover};
use duet_playback::{SlotId, TimeUpdate};
use std::collections::HashSet;

fn assert_released_once(acquired: &[String], released: &[String]) {
    let unique: HashSet<&String> = released.iter().collect();
    assert_eq!(unique.len(), released.len(), "double release: {released:?}");

    let acquired: HashSet<&String> = acquired.iter().collect();
    assert_eq!(acquired, unique);
}

#[test]
fn test_sources_released_as_tracks_finish() {
    let (mut manager, ledger) = harness();
    manager.enqueue_all(files(&["1.mp3", "2.mp3", "3.mp3", "4.mp3"]));
    assert_eq!(ledger.borrow().outstanding_sources(), 2);

    manager.on_ended(SlotId::A);
    assert_eq!(ledger.borrow().outstanding_sources(), 2);
    assert_eq!(ledger.borrow().sources_released.len(), 1);

    manager.on_ended(SlotId::B);
    manager.on_ended(SlotId::A);
    manager.on_ended(SlotId::B);

    let ledger = ledger.borrow();
    assert_eq!(ledger.outstanding_sources(), 0);
    assert_released_once(&ledger.sources_acquired, &ledger.sources_released);
}

#[test]
fn test_shutdown_releases_everything_once() {
    let (mut manager, ledger) = harness();
    let ids = manager.enqueue_all(files(&["1.mp3", "2.mp3", "3.mp3"]));
    manager.on_metadata_resolved(ids[0], Ok(tags_with_cover("One")));
    manager.on_time_update(SlotId::A, TimeUpdate::new(190.0, 200.0));

    manager.shutdown();
    manager.shutdown();

    assert!(manager.media(SlotId::A).paused);
    assert!(manager.media(SlotId::B).paused);
    assert_eq!(manager.media(SlotId::A).source, None);

    let snapshot = ledger.borrow();
    assert_eq!(snapshot.outstanding_sources(), 0);
    assert_eq!(snapshot.outstanding_art(), 0);
    assert_released_once(&snapshot.sources_acquired, &snapshot.sources_released);
    assert_released_once(&snapshot.art_acquired, &snapshot.art_released);
}

#[test]
fn test_drop_releases_outstanding_resources() {
    let (mut manager, ledger) = harness();
    let id = manager.enqueue("1.mp3", "1.mp3".to_string());
    manager.on_metadata_resolved(id, Ok(tags_with_cover("One")));
    assert_eq!(ledger.borrow().outstanding_sources(), 1);

    drop(manager);

    assert_eq!(ledger.borrow().outstanding_sources(), 0);
    assert_eq!(ledger.borrow().outstanding_art(), 0);
}

#[test]
fn test_expired_artwork_not_released_again_at_shutdown() {
    let (mut manager, ledger) = harness();
    let id = manager.enqueue("1.mp3", "1.mp3".to_string());
    manager.on_metadata_resolved(id, Ok(tags_with_cover("One")));
    let lease = manager.now_playing().artwork().unwrap().id();

    manager.expire_artwork(lease);
    manager.shutdown();

    assert_eq!(ledger.borrow().art_released.len(), 1);
}

#[test]
fn test_inputs_after_shutdown_acquire_nothing() {
    let (mut manager, ledger) = harness();
    manager.enqueue_all(files(&["1.mp3", "2.mp3", "3.mp3"]));
    manager.shutdown();
    let acquired = ledger.borrow().sources_acquired.len();

    manager.on_ended(SlotId::A);
    manager.on_time_update(SlotId::A, TimeUpdate::new(199.0, 200.0));
    manager.enqueue("4.mp3", "4.mp3".to_string());

    assert_eq!(ledger.borrow().sources_acquired.len(), acquired);
    assert_eq!(ledger.borrow().outstanding_sources(), 0);
}
