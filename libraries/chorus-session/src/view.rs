//! Paged queue view
//!
//! One page of the queue as display-ready rows. A staged interruption
//! is prepended without a number; numbered rows carry their real queue
//! index so jump and remove commands can use them directly.

use std::time::Duration;

use serde::Serialize;

/// One row of the queue view.
#[derive(Debug, Clone, Serialize)]
pub struct QueueRow {
    /// Queue index of the track; `None` for the interruption row
    pub number: Option<usize>,

    /// Track title
    pub title: String,

    /// Whether this row is under the queue cursor
    pub is_current: bool,

    /// Whether this row is the staged interruption
    pub is_interrupting: bool,

    /// Whether the track is a live stream
    pub is_stream: bool,

    /// Whether the track's download has settled
    pub download_done: bool,

    /// Play progress, present only on the row actually playing
    pub played: Option<Duration>,

    /// Track length; zero for streams
    pub total: Duration,
}

/// One page of the queue.
#[derive(Debug, Clone, Serialize)]
pub struct QueueView {
    /// Rows of this page, interruption first when one is staged
    pub rows: Vec<QueueRow>,

    /// Index of the first numbered row
    pub offset: usize,

    /// Number of tracks in the whole queue
    pub queue_len: usize,

    /// Whether tracks exist past this page
    pub has_more: bool,
}
