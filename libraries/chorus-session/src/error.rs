//! Error types for session coordination
//!
//! Listener-facing variants keep the exact wording the chat layer
//! relays; wrapped variants carry lower-layer failures through as-is.

use thiserror::Error;

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Skipping forward found nothing to play
    #[error("Can't play next music: end of queue")]
    EndOfQueue,

    /// Stepping back found nothing to play
    ///
    /// The wording matches the forward case; listeners see the same
    /// "end of queue" phrase for both directions.
    #[error("Can't play prev music: end of queue")]
    StartOfQueue,

    /// A queue index pointed outside the queue
    #[error("Invalid index value")]
    InvalidIndex,

    /// An interruption was requested while playback is paused
    #[error("Music shouldn't be paused!")]
    PausedInterruption,

    /// Nothing is loaded, so there is nothing to report or control
    #[error("Bot doesn't play anything!")]
    NothingPlaying,

    /// Pause requested while already paused
    #[error("Music is already paused!")]
    AlreadyPaused,

    /// Resume requested while already playing
    #[error("Music is already playing!")]
    AlreadyPlaying,

    /// Resolving a source took longer than the configured budget
    #[error("Music search timed out")]
    ResolveTimeout,

    /// Player failure
    #[error(transparent)]
    Playback(#[from] chorus_playback::PlaybackError),

    /// Resolution or download failure
    #[error(transparent)]
    Fetch(#[from] chorus_fetch::FetchError),

    /// Settings failure
    #[error(transparent)]
    Core(#[from] chorus_core::CoreError),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
