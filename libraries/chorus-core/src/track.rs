/// Track domain type and download chunk handles
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

/// Where a track's audio comes from.
///
/// The two variants are mutually exclusive by construction: a track either
/// plays from a cached local artifact or streams straight from a remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TrackSource {
    /// Cached local artifact; `file_name` is relative to the cache directory.
    Cached { file_name: String },
    /// Live/ephemeral stream played directly from a remote URL.
    Stream { url: String },
}

/// Lifecycle of one download chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChunkState {
    /// The chunk worker has not finished yet.
    Pending,
    /// Every fetch in the chunk ran to the end.
    Complete,
    /// The chunk worker was aborted or gave up.
    Failed,
}

/// Completion handle for one download chunk.
///
/// Every track of a chunk carries a clone of the same handle, so readiness
/// is chunk-granular: awaiting any track of the chunk waits for the whole
/// chunk. Cheap to clone, any number of concurrent waiters.
#[derive(Debug, Clone)]
pub struct ChunkHandle {
    rx: watch::Receiver<ChunkState>,
}

/// The settling side of a [`ChunkHandle`], held by the chunk worker.
#[derive(Debug)]
pub struct ChunkCompleter {
    tx: watch::Sender<ChunkState>,
}

impl ChunkHandle {
    /// Create an unsettled handle together with its completer.
    pub fn pending() -> (ChunkCompleter, ChunkHandle) {
        let (tx, rx) = watch::channel(ChunkState::Pending);
        (ChunkCompleter { tx }, ChunkHandle { rx })
    }

    /// A handle that is already in the given terminal state.
    pub fn settled(state: ChunkState) -> ChunkHandle {
        let (_tx, rx) = watch::channel(state);
        ChunkHandle { rx }
    }

    /// Current state without waiting.
    pub fn state(&self) -> ChunkState {
        *self.rx.borrow()
    }

    /// Whether the chunk reached a terminal state.
    pub fn is_settled(&self) -> bool {
        self.state() != ChunkState::Pending
    }

    /// Wait until the chunk settles and return the terminal state.
    ///
    /// A completer dropped without settling (aborted worker) reads as
    /// [`ChunkState::Failed`].
    pub async fn wait(&self) -> ChunkState {
        let mut rx = self.rx.clone();
        let state = match rx.wait_for(|state| *state != ChunkState::Pending).await {
            Ok(state) => *state,
            Err(_) => ChunkState::Failed,
        };
        state
    }
}

impl ChunkCompleter {
    /// Mark the chunk complete. Consumes the completer; a chunk settles once.
    pub fn complete(self) {
        let _ = self.tx.send(ChunkState::Complete);
    }

    /// Mark the chunk failed.
    pub fn fail(self) {
        let _ = self.tx.send(ChunkState::Failed);
    }
}

/// Playback cue points, shared between every clone of a track.
#[derive(Debug, Default)]
struct CuePoints {
    /// Pending seek offset, consumed exactly once when playback starts.
    start_at: Duration,
    /// The offset playback actually started from last time.
    resumed_from: Duration,
}

/// A queued playable item.
///
/// Identity is the per-enqueue `uuid`: adding the same source twice yields
/// two distinct queue entries. Clones are cheap and share the cue-point
/// cell, so a copy handed to the player and the copy kept in the queue
/// observe the same pending-seek state.
#[derive(Debug, Clone, Serialize)]
pub struct Track {
    /// Source-specific identifier (video id, catalog track id).
    pub id: String,
    /// Fresh v4 per enqueue; equality compares only this.
    pub uuid: Uuid,
    /// Display title.
    pub title: String,
    /// Original page URL, shown to users.
    pub link: String,
    /// Full length; zero for live streams.
    pub duration: Duration,
    /// Cached artifact or remote stream.
    pub source: TrackSource,
    /// Present while the track's download chunk may still be fetching.
    #[serde(skip)]
    pub download: Option<ChunkHandle>,
    #[serde(skip)]
    cue: Arc<Mutex<CuePoints>>,
}

impl Track {
    /// A track backed by a cached (or caching) local artifact.
    pub fn cached(
        id: impl Into<String>,
        title: impl Into<String>,
        link: impl Into<String>,
        duration: Duration,
        file_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            uuid: Uuid::new_v4(),
            title: title.into(),
            link: link.into(),
            duration,
            source: TrackSource::Cached {
                file_name: file_name.into(),
            },
            download: None,
            cue: Arc::default(),
        }
    }

    /// A live stream played directly from `stream_url`; duration is zero.
    pub fn stream(
        id: impl Into<String>,
        title: impl Into<String>,
        link: impl Into<String>,
        stream_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            uuid: Uuid::new_v4(),
            title: title.into(),
            link: link.into(),
            duration: Duration::ZERO,
            source: TrackSource::Stream {
                url: stream_url.into(),
            },
            download: None,
            cue: Arc::default(),
        }
    }

    /// Attach the download chunk handle this track belongs to.
    #[must_use]
    pub fn with_download(mut self, handle: ChunkHandle) -> Self {
        self.download = Some(handle);
        self
    }

    /// Whether this track is a live stream.
    pub fn is_live(&self) -> bool {
        matches!(self.source, TrackSource::Stream { .. })
    }

    /// Pending seek offset for the next start of this track.
    pub fn start_time(&self) -> Duration {
        self.cue().start_at
    }

    /// Set the seek offset the next start of this track begins from.
    pub fn set_start_time(&self, offset: Duration) {
        self.cue().start_at = offset;
    }

    /// Consume the pending seek offset.
    ///
    /// Moves `start_time` into the resume point and zeroes it, so a second
    /// start of the same track begins from the top. Returns the offset the
    /// session should seek to.
    pub fn begin_playback(&self) -> Duration {
        let mut cue = self.cue();
        let seek = cue.start_at;
        cue.resumed_from = seek;
        cue.start_at = Duration::ZERO;
        seek
    }

    /// The offset playback actually started from last time.
    pub fn resume_point(&self) -> Duration {
        self.cue().resumed_from
    }

    /// Whether the download chunk (if any) reached a terminal state.
    pub fn download_settled(&self) -> bool {
        self.download.as_ref().map_or(true, ChunkHandle::is_settled)
    }

    /// Whether the track can start playing right now.
    ///
    /// Live streams always can; cached tracks can once their artifact exists
    /// or no download is pending for them.
    pub fn is_playable(&self, cache_dir: &Path) -> bool {
        match &self.source {
            TrackSource::Stream { .. } => true,
            TrackSource::Cached { file_name } => {
                cache_dir.join(file_name).exists() || self.download.is_none()
            }
        }
    }

    fn cue(&self) -> MutexGuard<'_, CuePoints> {
        self.cue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.uuid == other.uuid
    }
}

impl Eq for Track {}
