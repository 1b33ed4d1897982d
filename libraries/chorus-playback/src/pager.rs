//! Queue window paging
//!
//! Listeners browse the queue one fixed-size page at a time. The pager
//! holds nothing but the first visible index and moves it in response
//! to navigation gestures; the queue itself is consulted separately for
//! the actual window of tracks.

use serde::{Deserialize, Serialize};

/// One page-navigation gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageGesture {
    /// One page towards the front
    Up,

    /// One page towards the end
    Down,

    /// First page
    Home,

    /// Last full page
    End,

    /// Page starting at the current track
    ToCurrent,
}

/// First-visible-index state for a paged queue view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueuePager {
    first: usize,
    page_len: usize,
}

impl QueuePager {
    /// Create a pager at the front with the given page size.
    pub fn new(page_len: usize) -> Self {
        Self { first: 0, page_len }
    }

    /// Index of the first visible track.
    pub fn offset(&self) -> usize {
        self.first
    }

    /// Number of tracks shown per page.
    pub fn page_len(&self) -> usize {
        self.page_len
    }

    /// Snap back to the front.
    pub fn reset(&mut self) {
        self.first = 0;
    }

    /// Apply one gesture against a queue of `queue_len` tracks.
    ///
    /// `Down` and `End` clip to the last full page so the view never
    /// starts past the tail. `ToCurrent` follows the cursor verbatim,
    /// falling back to the front when nothing is current.
    pub fn apply(&mut self, gesture: PageGesture, queue_len: usize, current_index: Option<usize>) {
        let last_page = queue_len.saturating_sub(self.page_len);
        self.first = match gesture {
            PageGesture::Up => self.first.saturating_sub(self.page_len),
            PageGesture::Down => (self.first + self.page_len).min(last_page),
            PageGesture::Home => 0,
            PageGesture::End => last_page,
            PageGesture::ToCurrent => current_index.unwrap_or(0),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_down_stops_at_the_last_full_page() {
        let mut pager = QueuePager::new(8);

        pager.apply(PageGesture::Down, 20, None);
        assert_eq!(pager.offset(), 8);

        pager.apply(PageGesture::Down, 20, None);
        assert_eq!(pager.offset(), 12); // clipped to 20 - 8

        pager.apply(PageGesture::Down, 20, None);
        assert_eq!(pager.offset(), 12);
    }

    #[test]
    fn paging_up_stops_at_the_front() {
        let mut pager = QueuePager::new(8);
        pager.apply(PageGesture::End, 20, None);

        pager.apply(PageGesture::Up, 20, None);
        assert_eq!(pager.offset(), 4);

        pager.apply(PageGesture::Up, 20, None);
        assert_eq!(pager.offset(), 0);
    }

    #[test]
    fn short_queues_never_page_past_zero() {
        let mut pager = QueuePager::new(8);

        pager.apply(PageGesture::Down, 5, None);
        assert_eq!(pager.offset(), 0);

        pager.apply(PageGesture::End, 5, None);
        assert_eq!(pager.offset(), 0);
    }

    #[test]
    fn home_and_end_jump_to_the_edges() {
        let mut pager = QueuePager::new(8);

        pager.apply(PageGesture::End, 30, None);
        assert_eq!(pager.offset(), 22);

        pager.apply(PageGesture::Home, 30, None);
        assert_eq!(pager.offset(), 0);
    }

    #[test]
    fn to_current_follows_the_cursor() {
        let mut pager = QueuePager::new(8);

        pager.apply(PageGesture::ToCurrent, 30, Some(17));
        assert_eq!(pager.offset(), 17);

        pager.apply(PageGesture::ToCurrent, 30, None);
        assert_eq!(pager.offset(), 0);
    }

    #[test]
    fn reset_snaps_to_the_front() {
        let mut pager = QueuePager::new(8);
        pager.apply(PageGesture::End, 40, None);

        pager.reset();
        assert_eq!(pager.offset(), 0);
    }
}
