//! Session-level types and reports
//!
//! Operations return plain report values; the chat layer turns them
//! into whatever messages it wants. Nothing here calls back.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use chorus_core::Track;
use chorus_playback::{PlaybackPosition, PlayerState};

/// Tunables for the session coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Budget for resolving one play request, inline downloads included
    pub resolve_timeout: Duration,

    /// Tracks per page when browsing the queue
    pub page_len: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            resolve_timeout: Duration::from_secs(10),
            page_len: 8,
        }
    }
}

/// What a play request did.
#[derive(Debug, Clone, Serialize)]
pub struct PlayReport {
    /// Tracks appended to the queue, in order
    pub added: Vec<Track>,

    /// Track that started playing, if the player was free to start one
    pub started: Option<Track>,
}

/// What removing a queue entry did.
#[derive(Debug, Clone, Serialize)]
pub struct RemoveReport {
    /// The removed track
    pub removed: Track,

    /// Whether the removed track was the one playing
    pub was_current: bool,

    /// Replacement track started after removing the current one
    pub started: Option<Track>,
}

/// Snapshot of the playing track.
#[derive(Debug, Clone, Serialize)]
pub struct NowPlaying {
    /// The track under playback
    pub track: Track,

    /// Progress through it
    pub position: PlaybackPosition,

    /// Playing or paused
    pub state: PlayerState,
}

/// Where playback went after a track ended.
#[derive(Debug, Clone, Serialize)]
pub enum TrackEndFlow {
    /// The next track started
    Started(Track),

    /// The queue is out of tracks; the session is idle now
    Idle,

    /// The event was stale: playback was already stopped or paused
    AlreadyStopped,
}
