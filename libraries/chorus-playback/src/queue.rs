//! Ordered, interruptible track queue
//!
//! This module provides:
//! - Cursor-based navigation (next/prev) with optional wrap-around
//! - Committing and non-committing (`try_`) navigation variants
//! - Out-of-band interruptions that mask navigation until consumed
//! - Resume-after-exhaustion when tracks are added to a drained queue
//! - Index-stable mutation (jump, remove, shuffle) around the cursor

use chorus_core::Track;
use rand::seq::SliceRandom;

/// Ordered track queue with a cursor and a single interruption slot.
///
/// The cursor (`current`) points at the track the queue is on, or is
/// `None` when nothing has been handed out yet or the queue ran dry.
/// A separate `last_used` marker remembers the last index that was
/// actually played, so that adding tracks to a drained queue resumes
/// right after where playback stopped instead of starting over.
#[derive(Debug, Default)]
pub struct TrackQueue {
    /// Queued tracks in user-visible order
    tracks: Vec<Track>,

    /// Index of the track the queue is currently on, if any
    current: Option<usize>,

    /// Last index handed out by a successful `get_next`/`get_prev`
    last_used: Option<usize>,

    /// Out-of-band track; masks navigation until the next `get_next`
    interrupting: Option<Track>,

    /// When set, `get_next` past the last track wraps to the front
    looped: bool,

    /// Resume slot kept in step by jump and shuffle
    before_interruption: Option<usize>,
}

impl TrackQueue {
    /// Create an empty, non-looping queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one track to the end of the queue.
    pub fn add(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Append several tracks, preserving their order.
    pub fn add_many(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.tracks.extend(tracks);
    }

    /// Stage an out-of-band track.
    ///
    /// The interruption is returned by [`get_current`](Self::get_current)
    /// in place of the cursor track, and while it is staged the next
    /// committed navigation re-yields the cursor track instead of moving
    /// on, so the masked track is not skipped.
    pub fn add_interruption(&mut self, track: Track) {
        self.interrupting = Some(track);
    }

    /// The track the queue considers current: the staged interruption if
    /// one exists, otherwise the track under the cursor.
    pub fn get_current(&self) -> Option<Track> {
        if let Some(track) = &self.interrupting {
            return Some(track.clone());
        }
        self.current.map(|index| self.tracks[index].clone())
    }

    /// The staged interruption, if any.
    pub fn interrupting(&self) -> Option<&Track> {
        self.interrupting.as_ref()
    }

    /// Position of the cursor, ignoring any staged interruption.
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Whether navigation past the last track wraps to the front.
    pub fn is_looped(&self) -> bool {
        self.looped
    }

    /// Flip wrap-around navigation and return the new setting.
    pub fn toggle_loop(&mut self) -> bool {
        self.looped = !self.looped;
        self.looped
    }

    /// Number of queued tracks; the interruption slot does not count.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether no tracks are queued.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Advance the cursor and return the new current track.
    ///
    /// The cursor is committed even when the queue runs dry (it becomes
    /// `None`), and any staged interruption is consumed. On success the
    /// `last_used` marker follows the cursor.
    pub fn get_next(&mut self) -> Option<Track> {
        let candidate = self.next_candidate();

        self.interrupting = None;
        self.current = candidate;

        let index = candidate?;
        self.last_used = Some(index);
        Some(self.tracks[index].clone())
    }

    /// Step the cursor back and return the new current track.
    ///
    /// Same commit semantics as [`get_next`](Self::get_next), but there
    /// is no resume-after-exhaustion: with no cursor there is no
    /// previous track.
    pub fn get_prev(&mut self) -> Option<Track> {
        let candidate = self.prev_candidate();

        self.interrupting = None;
        self.current = candidate;

        let index = candidate?;
        self.last_used = Some(index);
        Some(self.tracks[index].clone())
    }

    /// Advance only if a next track exists.
    ///
    /// Unlike [`get_next`](Self::get_next), a dry queue leaves the
    /// cursor and the interruption slot untouched.
    pub fn try_get_next(&mut self) -> Option<Track> {
        if self.next_candidate().is_some() {
            return self.get_next();
        }
        None
    }

    /// Step back only if a previous track exists.
    pub fn try_get_prev(&mut self) -> Option<Track> {
        if self.prev_candidate().is_some() {
            return self.get_prev();
        }
        None
    }

    /// Move the cursor to `index` and return the track there.
    ///
    /// Negative indices count from the end. Out-of-range indices (either
    /// direction) return `None` without touching any state. A successful
    /// jump drops any staged interruption; the `last_used` marker is
    /// deliberately left alone.
    pub fn jump_to(&mut self, index: i64) -> Option<Track> {
        let len = self.tracks.len() as i64;
        let index = if index < 0 { index + len } else { index };

        if index < 0 || index >= len {
            return None;
        }

        let index = usize::try_from(index).ok()?;
        self.current = Some(index);
        self.before_interruption = Some(0);
        self.interrupting = None;

        Some(self.tracks[index].clone())
    }

    /// Remove the track at `index` and return it.
    ///
    /// Removing at or before the cursor slides the cursor one slot left
    /// so it keeps pointing at the same track; removing the track under
    /// the cursor at index 0 clears the cursor.
    pub fn remove_at(&mut self, index: usize) -> Option<Track> {
        if index >= self.tracks.len() {
            return None;
        }

        let removed = self.tracks.remove(index);

        if let Some(current) = self.current {
            if index <= current {
                self.current = current.checked_sub(1);
            }
        }

        Some(removed)
    }

    /// Shuffle the queue in place.
    ///
    /// When the cursor sits past the front, the current track is pinned
    /// to index 0 and the rest is shuffled behind it, so the playing
    /// track is not disturbed. With the cursor at the front or unset the
    /// whole queue is shuffled.
    pub fn shuffle(&mut self) {
        let mut rng = rand::thread_rng();

        match self.current {
            Some(current) if current > 0 => {
                let pinned = self.tracks.remove(current);
                self.tracks.shuffle(&mut rng);
                self.tracks.insert(0, pinned);
                self.current = Some(0);

                if self.before_interruption.is_some() {
                    self.before_interruption = Some(0);
                }
            }
            _ => self.tracks.shuffle(&mut rng),
        }
    }

    /// A window of the queue: up to `limit` tracks starting at `offset`.
    ///
    /// Out-of-range windows are clipped rather than rejected.
    pub fn get_many(&self, limit: usize, offset: usize) -> Vec<Track> {
        let start = offset.min(self.tracks.len());
        let end = offset.saturating_add(limit).min(self.tracks.len());
        self.tracks[start..end].to_vec()
    }

    /// Drop every track and marker. The loop setting survives.
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.current = None;
        self.last_used = None;
        self.interrupting = None;
        self.before_interruption = None;
    }

    /// Where `get_next` would land, without committing anything.
    fn next_candidate(&self) -> Option<usize> {
        // A staged interruption holds the cursor in place so the masked
        // track is replayed once the interruption is consumed.
        if self.interrupting.is_some() && self.current.is_some() {
            return self.current;
        }

        if let Some(current) = self.current {
            let next = current + 1;

            if next >= self.tracks.len() && self.looped {
                return Some(0);
            }
            if next < self.tracks.len() {
                return Some(next);
            }
        }

        match self.last_used {
            None if !self.tracks.is_empty() => Some(0),
            None => None,
            Some(last) if last + 1 < self.tracks.len() => Some(last + 1),
            Some(_) => None,
        }
    }

    /// Where `get_prev` would land, without committing anything.
    fn prev_candidate(&self) -> Option<usize> {
        if self.interrupting.is_some() && self.current.is_some() {
            return self.current;
        }

        let current = self.current?;
        if current == 0 {
            if self.looped && !self.tracks.is_empty() {
                return Some(self.tracks.len() - 1);
            }
            return None;
        }
        Some(current - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn track(id: &str) -> Track {
        Track::cached(
            id,
            format!("Track {id}"),
            format!("https://example.com/{id}"),
            Duration::from_secs(180),
            format!("{id}.opus"),
        )
    }

    fn filled(n: usize) -> TrackQueue {
        let mut queue = TrackQueue::new();
        queue.add_many((0..n).map(|i| track(&i.to_string())));
        queue
    }

    #[test]
    fn empty_queue_yields_nothing() {
        let mut queue = TrackQueue::new();

        assert!(queue.get_next().is_none());
        assert!(queue.get_prev().is_none());
        assert!(queue.get_current().is_none());
        assert!(queue.try_get_next().is_none());
        assert_eq!(queue.len(), 0);
        assert!(queue.is_empty());
    }

    #[test]
    fn sequential_consumption() {
        let mut queue = filled(3);

        assert_eq!(queue.get_next().map(|t| t.id), Some("0".to_string()));
        assert_eq!(queue.get_next().map(|t| t.id), Some("1".to_string()));
        assert_eq!(queue.get_next().map(|t| t.id), Some("2".to_string()));
        assert!(queue.get_next().is_none());

        // The dry advance committed the cursor away.
        assert!(queue.get_current().is_none());
    }

    #[test]
    fn try_next_peeks_before_committing() {
        let mut queue = filled(2);
        queue.get_next();
        queue.get_next();

        // At the end: try variant fails without losing the cursor.
        assert!(queue.try_get_next().is_none());
        assert_eq!(queue.get_current().map(|t| t.id), Some("1".to_string()));
        assert_eq!(queue.current_index(), Some(1));
    }

    #[test]
    fn looped_queue_wraps_both_ways() {
        let mut queue = filled(3);
        assert!(queue.toggle_loop());

        queue.get_next(); // 0
        assert_eq!(queue.get_prev().map(|t| t.id), Some("2".to_string()));
        assert_eq!(queue.get_next().map(|t| t.id), Some("0".to_string()));

        queue.jump_to(2);
        assert_eq!(queue.get_next().map(|t| t.id), Some("0".to_string()));
    }

    #[test]
    fn prev_at_front_without_loop_fails() {
        let mut queue = filled(3);
        queue.get_next();

        assert!(queue.try_get_prev().is_none());
        assert_eq!(queue.current_index(), Some(0));

        // The committing variant clears the cursor instead.
        assert!(queue.get_prev().is_none());
        assert!(queue.get_current().is_none());
    }

    #[test]
    fn prev_has_no_resume_marker_fallback() {
        let mut queue = filled(3);
        queue.get_next();
        queue.get_next();
        assert!(queue.get_prev().is_some()); // back to 0
        assert!(queue.get_prev().is_none()); // cursor cleared

        // last_used is 0, but prev never resumes from it.
        assert!(queue.get_prev().is_none());
    }

    #[test]
    fn drained_queue_resumes_after_new_tracks() {
        let mut queue = filled(2);
        queue.get_next();
        queue.get_next();
        assert!(queue.get_next().is_none());

        queue.add(track("2"));

        // Resumes after the last played index, not from the front.
        assert_eq!(queue.get_next().map(|t| t.id), Some("2".to_string()));
    }

    #[test]
    fn interruption_masks_current_and_navigation() {
        let mut queue = filled(3);
        queue.get_next();
        queue.get_next(); // cursor on 1

        queue.add_interruption(track("int"));

        assert_eq!(queue.get_current().map(|t| t.id), Some("int".to_string()));
        assert!(queue.interrupting().is_some());

        // Consuming the interruption re-yields the masked track.
        assert_eq!(queue.get_next().map(|t| t.id), Some("1".to_string()));
        assert!(queue.interrupting().is_none());

        // Navigation is back to normal afterwards.
        assert_eq!(queue.get_next().map(|t| t.id), Some("2".to_string()));
    }

    #[test]
    fn interruption_masks_prev_too() {
        let mut queue = filled(3);
        queue.jump_to(2);
        queue.add_interruption(track("int"));

        assert_eq!(queue.get_prev().map(|t| t.id), Some("2".to_string()));
        assert!(queue.interrupting().is_none());
    }

    #[test]
    fn interruption_without_cursor_is_dropped_on_advance() {
        let mut queue = filled(2);
        queue.add_interruption(track("int"));

        // No cursor to hold, so the advance follows normal rules and the
        // interruption slot is cleared along the way.
        assert_eq!(queue.get_next().map(|t| t.id), Some("0".to_string()));
        assert!(queue.interrupting().is_none());
    }

    #[test]
    fn jump_to_accepts_negative_indices() {
        let mut queue = filled(5);

        assert_eq!(queue.jump_to(-1).map(|t| t.id), Some("4".to_string()));
        assert_eq!(queue.current_index(), Some(4));

        assert_eq!(queue.jump_to(2).map(|t| t.id), Some("2".to_string()));
        assert_eq!(queue.current_index(), Some(2));
    }

    #[test]
    fn jump_to_out_of_range_leaves_state_alone() {
        let mut queue = filled(3);
        queue.get_next();

        assert!(queue.jump_to(3).is_none());
        assert!(queue.jump_to(-4).is_none());
        assert_eq!(queue.current_index(), Some(0));
    }

    #[test]
    fn jump_to_drops_interruption_but_not_resume_marker() {
        let mut queue = filled(3);
        queue.get_next();
        queue.add_interruption(track("int"));

        assert!(queue.jump_to(2).is_some());
        assert!(queue.interrupting().is_none());

        // The jump left the resume marker at 0, so advancing past the
        // end falls back to the slot after the marker instead of drying.
        assert_eq!(queue.get_next().map(|t| t.id), Some("1".to_string()));
    }

    #[test]
    fn remove_before_cursor_slides_it_left() {
        let mut queue = filled(4);
        queue.jump_to(2);

        let removed = queue.remove_at(1);
        assert_eq!(removed.map(|t| t.id), Some("1".to_string()));

        // Cursor still points at the same track.
        assert_eq!(queue.current_index(), Some(1));
        assert_eq!(queue.get_current().map(|t| t.id), Some("2".to_string()));
    }

    #[test]
    fn remove_after_cursor_leaves_it_alone() {
        let mut queue = filled(4);
        queue.jump_to(1);

        queue.remove_at(3);
        assert_eq!(queue.current_index(), Some(1));
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn remove_current_at_front_clears_cursor() {
        let mut queue = filled(2);
        queue.get_next();

        let removed = queue.remove_at(0);
        assert_eq!(removed.map(|t| t.id), Some("0".to_string()));
        assert!(queue.current_index().is_none());

        // The resume marker still counts the removed slot, so the next
        // advance lands past the shortened queue and comes up empty.
        assert!(queue.get_next().is_none());
    }

    #[test]
    fn remove_current_at_front_resumes_past_removed_slot() {
        let mut queue = filled(3);
        queue.get_next();

        queue.remove_at(0);
        assert!(queue.current_index().is_none());

        // Same marker arithmetic with more tracks left: the advance
        // skips the track that slid into the removed slot.
        assert_eq!(queue.get_next().map(|t| t.id), Some("2".to_string()));
    }

    #[test]
    fn remove_out_of_range_returns_none() {
        let mut queue = filled(2);
        assert!(queue.remove_at(2).is_none());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn shuffle_pins_current_to_front() {
        let mut queue = filled(10);
        queue.jump_to(4);
        let playing = queue.get_current().map(|t| t.uuid);

        queue.shuffle();

        assert_eq!(queue.current_index(), Some(0));
        assert_eq!(queue.get_current().map(|t| t.uuid), playing);
        assert_eq!(queue.len(), 10);
    }

    #[test]
    fn shuffle_without_cursor_keeps_every_track() {
        let mut queue = filled(8);
        let mut before: Vec<String> = queue.get_many(8, 0).into_iter().map(|t| t.id).collect();

        queue.shuffle();

        let mut after: Vec<String> = queue.get_many(8, 0).into_iter().map(|t| t.id).collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
        assert!(queue.current_index().is_none());
    }

    #[test]
    fn get_many_clips_out_of_range_windows() {
        let queue = filled(5);

        assert_eq!(queue.get_many(2, 0).len(), 2);
        assert_eq!(queue.get_many(10, 3).len(), 2);
        assert!(queue.get_many(5, 5).is_empty());
        assert!(queue.get_many(5, 100).is_empty());

        let window = queue.get_many(2, 2);
        assert_eq!(window[0].id, "2");
        assert_eq!(window[1].id, "3");
    }

    #[test]
    fn clear_preserves_loop_setting() {
        let mut queue = filled(3);
        queue.toggle_loop();
        queue.get_next();
        queue.add_interruption(track("int"));

        queue.clear();

        assert!(queue.is_empty());
        assert!(queue.get_current().is_none());
        assert!(queue.interrupting().is_none());
        assert!(queue.is_looped());

        // The resume marker is gone: new tracks start from the front.
        queue.add(track("fresh"));
        assert_eq!(queue.get_next().map(|t| t.id), Some("fresh".to_string()));
    }

    #[test]
    fn duplicate_source_tracks_are_distinct_entries() {
        let mut queue = TrackQueue::new();
        let a = track("same");
        let b = track("same");
        queue.add(a.clone());
        queue.add(b.clone());

        queue.get_next();
        assert_eq!(queue.get_current(), Some(a));
        queue.get_next();
        assert_eq!(queue.get_current(), Some(b));
    }
}
