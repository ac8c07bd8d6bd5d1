//! Pending track queue
//!
//! Strict FIFO: insertion order is playback order. Entries leave only from
//! the front, and only to fill an empty slot.
//!
//! ```text
//! Slot A (active):   Track 1
//! Slot B (inactive): Track 2
//! ─────────────────────────────
//! Queue:
//!   - Track 3   <- next dequeue
//!   - Track 4
//! ```

use crate::metadata::MetadataTask;
use crate::types::{Track, TrackId};
use std::collections::VecDeque;

/// A track waiting for a slot, with its in-flight metadata task
#[derive(Debug, Clone)]
pub struct QueuedTrack<F> {
    pub track: Track<F>,
    pub metadata: MetadataTask,
}

impl<F> QueuedTrack<F> {
    pub fn new(track: Track<F>) -> Self {
        let metadata = MetadataTask::pending(track.id());
        Self { track, metadata }
    }
}

/// FIFO of tracks awaiting a free slot
#[derive(Debug, Clone)]
pub struct TrackQueue<F> {
    pending: VecDeque<QueuedTrack<F>>,

    /// Entries ever appended
    enqueued_total: u64,

    /// Entries ever removed from the front
    dequeued_total: u64,
}

impl<F> TrackQueue<F> {
    /// Create new empty queue
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            enqueued_total: 0,
            dequeued_total: 0,
        }
    }

    /// Append an entry to the back
    pub fn enqueue(&mut self, entry: QueuedTrack<F>) {
        self.pending.push_back(entry);
        self.enqueued_total += 1;
    }

    /// Remove and return the oldest entry
    pub fn dequeue_front(&mut self) -> Option<QueuedTrack<F>> {
        let entry = self.pending.pop_front()?;
        self.dequeued_total += 1;
        Some(entry)
    }

    /// Metadata task of a queued track, if it is still queued
    pub fn task_mut(&mut self, track_id: TrackId) -> Option<&mut MetadataTask> {
        self.pending
            .iter_mut()
            .find(|entry| entry.track.id() == track_id)
            .map(|entry| &mut entry.metadata)
    }

    /// Queued tracks in playback order
    pub fn iter(&self) -> impl Iterator<Item = &Track<F>> {
        self.pending.iter().map(|entry| &entry.track)
    }

    /// Number of pending tracks
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn enqueued_total(&self) -> u64 {
        self.enqueued_total
    }

    pub fn dequeued_total(&self) -> u64 {
        self.dequeued_total
    }
}

impl<F> Default for TrackQueue<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64) -> QueuedTrack<()> {
        QueuedTrack::new(Track::new(TrackId::new(id), format!("Track {id}"), ()))
    }

    #[test]
    fn dequeues_in_insertion_order() {
        let mut queue = TrackQueue::new();
        queue.enqueue(entry(1));
        queue.enqueue(entry(2));
        queue.enqueue(entry(3));

        let order: Vec<u64> = std::iter::from_fn(|| queue.dequeue_front())
            .map(|e| e.track.id().get())
            .collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn empty_dequeue_returns_none_and_keeps_counters() {
        let mut queue: TrackQueue<()> = TrackQueue::new();
        assert!(queue.dequeue_front().is_none());
        assert_eq!(queue.enqueued_total(), 0);
        assert_eq!(queue.dequeued_total(), 0);
    }

    #[test]
    fn length_matches_counters() {
        let mut queue = TrackQueue::new();
        for id in 0..5 {
            queue.enqueue(entry(id));
        }
        queue.dequeue_front();
        queue.dequeue_front();

        assert_eq!(queue.len(), 3);
        assert_eq!(
            queue.len() as u64,
            queue.enqueued_total() - queue.dequeued_total()
        );
    }

    #[test]
    fn task_lookup_by_track_id() {
        let mut queue = TrackQueue::new();
        queue.enqueue(entry(7));
        queue.enqueue(entry(8));

        let task = queue.task_mut(TrackId::new(8)).unwrap();
        assert_eq!(task.track_id(), TrackId::new(8));
        assert!(queue.task_mut(TrackId::new(9)).is_none());
    }

    #[test]
    fn new_entries_start_pending() {
        let queued = entry(4);
        assert!(queued.metadata.is_pending());
        assert_eq!(queued.metadata.track_id(), queued.track.id());
    }
}
