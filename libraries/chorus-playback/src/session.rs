//! Voice session boundary
//!
//! The player is platform-agnostic: everything that actually touches a
//! voice connection lives behind [`AudioSession`]. An implementation
//! wraps one voice channel connection and is told what to play via a
//! [`SourceDescriptor`]; it reports track completion by sending a
//! [`PlaybackEvent`] on whatever channel its embedder wired up.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Filters applied when a source starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// Linear volume factor, 0.0 to 1.0
    pub volume: f64,

    /// Bass boost gain in dB; zero means flat
    pub bass_gain: i64,
}

/// What a session should play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    /// A cached artifact on disk, started `seek` into the track
    Local {
        /// Path of the cached file
        path: PathBuf,
        /// Offset to skip before the first frame
        seek: Duration,
    },

    /// A live stream; not seekable
    Remote {
        /// Stream URL
        url: String,
    },
}

/// Terminal event for a started source.
///
/// Sessions emit exactly one of these per successful [`AudioSession::start`],
/// once the source stops producing frames on its own. A source cut short
/// by [`AudioSession::stop`] emits nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// The source played to its natural end
    Finished,

    /// The session gave up on the source mid-way
    Failed {
        /// Backend error description
        message: String,
    },
}

/// One voice channel connection, as the player sees it.
///
/// Implementations are expected to be cheap to call: `stop`, `pause` and
/// `resume` flip backend state without blocking, and `elapsed_frames`
/// reads a counter. Only `start` does real work.
#[async_trait]
pub trait AudioSession: Send + Sync {
    /// Begin playing `source` with `filters` applied.
    async fn start(&self, source: &SourceDescriptor, filters: &FilterParams) -> Result<()>;

    /// Drop the current source, if any. Emits no completion event.
    fn stop(&self);

    /// Suspend frame production, keeping the position.
    fn pause(&self);

    /// Resume frame production after a pause.
    fn resume(&self);

    /// Frames played since the last `start`; zero when nothing started.
    fn elapsed_frames(&self) -> u64;
}
