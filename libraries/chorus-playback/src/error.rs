//! Error types for queue and player operations

use thiserror::Error;

use crate::types::PlayerState;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// A transition was attempted from the wrong player state
    #[error("Invalid player state: expected {expected}, was {actual}")]
    InvalidState {
        /// State the operation requires
        expected: &'static str,
        /// State the player was actually in
        actual: PlayerState,
    },

    /// The track's download settled as failed; nothing playable exists
    #[error("Track is not available: {title}")]
    TrackUnavailable {
        /// Title of the unplayable track
        title: String,
    },

    /// The voice session refused to start or control a source
    #[error("Audio session error: {0}")]
    Session(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
