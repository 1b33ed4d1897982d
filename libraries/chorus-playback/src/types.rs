//! Core types for queue and player state

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Length of one audio frame as counted by the voice session.
///
/// Elapsed position is reconstructed from the session's frame counter,
/// so every played frame contributes exactly this much time.
pub const FRAME_DURATION: Duration = Duration::from_millis(20);

/// Minimum gap between stopping the voice session and starting it again.
///
/// Starting a new source immediately after a stop produces audible
/// glitches on some voice backends, so restarts are delayed until the
/// cooldown has passed.
pub const RESTART_COOLDOWN: Duration = Duration::from_millis(250);

/// Player state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    /// No source loaded
    Stopped,

    /// Currently playing
    Playing,

    /// Suspended mid-track, position retained
    Paused,
}

impl fmt::Display for PlayerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => write!(f, "stopped"),
            Self::Playing => write!(f, "playing"),
            Self::Paused => write!(f, "paused"),
        }
    }
}

/// Progress of the track currently loaded in the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackPosition {
    /// Time played so far, truncated to whole seconds
    pub played: Duration,

    /// Total track duration; zero for live streams
    pub total: Duration,
}
