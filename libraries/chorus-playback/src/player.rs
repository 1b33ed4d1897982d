//! Player state machine
//!
//! Wraps one [`AudioSession`] in a three-state machine (stopped,
//! playing, paused) and owns the rules around starting a track:
//! - A busy player ignores start requests instead of cutting playback
//! - Restarts wait out a short cooldown after the previous stop
//! - A track whose download has not settled is awaited, not skipped
//! - Filters and the cache location come from live settings

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info};

use chorus_core::{ChunkState, SettingsStore, Track, TrackSource};

use crate::error::{PlaybackError, Result};
use crate::session::{AudioSession, FilterParams, SourceDescriptor};
use crate::types::{PlaybackPosition, PlayerState, FRAME_DURATION, RESTART_COOLDOWN};

/// Tri-state voice player.
///
/// The player never picks tracks itself; the coordinating service hands
/// it one track at a time and consults the queue for everything else.
pub struct Player {
    /// Voice backend this player drives
    session: Arc<dyn AudioSession>,

    /// Live settings used for filters and the cache directory
    settings: Arc<SettingsStore>,

    /// Current state of the machine
    state: PlayerState,

    /// When the session was last stopped; gates the restart cooldown
    stopped_at: Option<Instant>,
}

impl Player {
    /// Create a stopped player on top of `session`.
    pub fn new(session: Arc<dyn AudioSession>, settings: Arc<SettingsStore>) -> Self {
        Self {
            session,
            settings,
            state: PlayerState::Stopped,
            stopped_at: None,
        }
    }

    /// Current state of the machine.
    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Whether a source is loaded, playing or paused.
    pub fn is_active(&self) -> bool {
        self.state != PlayerState::Stopped
    }

    /// Whether the player is producing frames right now.
    pub fn is_playing(&self) -> bool {
        self.state == PlayerState::Playing
    }

    /// Whether the player is suspended mid-track.
    pub fn is_paused(&self) -> bool {
        self.state == PlayerState::Paused
    }

    /// Start `track` if the player is idle.
    ///
    /// Returns `Ok(false)` without touching anything when a source is
    /// already loaded; interrupting playback is the caller's decision,
    /// made by stopping first. Waits for the track's download to settle
    /// and for the restart cooldown before starting the session.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::TrackUnavailable`] when the download settled as
    /// failed, or the session's own error when it refuses the source.
    pub async fn try_play(&mut self, track: &Track) -> Result<bool> {
        if self.is_active() {
            debug!(state = %self.state, title = %track.title, "player busy, start ignored");
            return Ok(false);
        }

        self.wait_restart_cooldown().await;

        if let Some(handle) = &track.download {
            if handle.wait().await == ChunkState::Failed {
                return Err(PlaybackError::TrackUnavailable {
                    title: track.title.clone(),
                });
            }
        }

        let settings = self.settings.snapshot().await;
        let seek = track.begin_playback();
        let source = match &track.source {
            TrackSource::Stream { url } => SourceDescriptor::Remote { url: url.clone() },
            TrackSource::Cached { file_name } => SourceDescriptor::Local {
                path: settings.cached_music_dir.join(file_name),
                seek,
            },
        };
        let filters = FilterParams {
            volume: settings.volume_factor(),
            bass_gain: settings.bass_gain,
        };

        self.session.start(&source, &filters).await?;
        self.state = PlayerState::Playing;
        info!(title = %track.title, seek_secs = seek.as_secs(), "playback started");
        Ok(true)
    }

    /// Drop the current source and arm the restart cooldown.
    ///
    /// Safe to call in any state; a stopped player just refreshes the
    /// cooldown.
    pub fn stop(&mut self) {
        self.state = PlayerState::Stopped;
        self.session.stop();
        self.stopped_at = Some(Instant::now());
        debug!("playback stopped");
    }

    /// Suspend playback, keeping the position.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::InvalidState`] unless the player is playing.
    pub fn pause(&mut self) -> Result<()> {
        if self.state != PlayerState::Playing {
            return Err(PlaybackError::InvalidState {
                expected: "playing",
                actual: self.state,
            });
        }
        self.state = PlayerState::Paused;
        self.session.pause();
        debug!("playback paused");
        Ok(())
    }

    /// Continue after a pause.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::InvalidState`] unless the player is paused.
    pub fn resume(&mut self) -> Result<()> {
        if self.state != PlayerState::Paused {
            return Err(PlaybackError::InvalidState {
                expected: "paused",
                actual: self.state,
            });
        }
        self.state = PlayerState::Playing;
        self.session.resume();
        debug!("playback resumed");
        Ok(())
    }

    /// Progress of `track`, reconstructed from the session frame counter
    /// plus the offset the track was resumed from. Truncated to whole
    /// seconds, matching what listeners are shown.
    pub fn position(&self, track: &Track) -> PlaybackPosition {
        let elapsed = self.session.elapsed_frames() as f64 * FRAME_DURATION.as_secs_f64()
            + track.resume_point().as_secs_f64();
        PlaybackPosition {
            played: Duration::from_secs(elapsed as u64),
            total: track.duration,
        }
    }

    async fn wait_restart_cooldown(&mut self) {
        if let Some(stopped_at) = self.stopped_at.take() {
            let ready_at = stopped_at + RESTART_COOLDOWN;
            if ready_at > Instant::now() {
                debug!("waiting out restart cooldown");
                tokio::time::sleep_until(ready_at).await;
            }
        }
    }
}
