//! Session coordinator
//!
//! One [`MusicService`] per voice connection. It owns the queue, the
//! player and the pager outright; every mutation funnels through its
//! `&mut self` operations, so there is no queue state to share or lock.
//! Track completion arrives as a [`PlaybackEvent`] that the embedder
//! feeds into [`on_track_ended`](MusicService::on_track_ended).

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use chorus_core::{Settings, SettingsStore, Track};
use chorus_fetch::Downloader;
use chorus_playback::{
    AudioSession, PageGesture, PlaybackEvent, Player, PlayerState, QueuePager, TrackQueue,
    RESTART_COOLDOWN,
};

use crate::error::{Result, SessionError};
use crate::types::{NowPlaying, PlayReport, RemoveReport, SessionConfig, TrackEndFlow};
use crate::view::{QueueRow, QueueView};

/// Coordinator for one voice-channel music session.
pub struct MusicService {
    queue: TrackQueue,
    player: Player,
    pager: QueuePager,
    downloader: Arc<Downloader>,
    settings: Arc<SettingsStore>,
    config: SessionConfig,
}

impl MusicService {
    /// Service over one voice session and one download pipeline.
    pub fn new(
        session: Arc<dyn AudioSession>,
        downloader: Arc<Downloader>,
        settings: Arc<SettingsStore>,
        config: SessionConfig,
    ) -> Self {
        Self {
            player: Player::new(session, Arc::clone(&settings)),
            queue: TrackQueue::new(),
            pager: QueuePager::new(config.page_len),
            downloader,
            settings,
            config,
        }
    }

    /// Read-only view of the queue.
    pub fn queue(&self) -> &TrackQueue {
        &self.queue
    }

    /// Current player state.
    pub fn state(&self) -> PlayerState {
        self.player.state()
    }

    /// Resolve `source`, enqueue everything it yields and start playback
    /// if the player is free.
    ///
    /// The leading tracks are downloaded before this returns so playback
    /// can begin at once. `start_at` seeks the first new track's opening
    /// play. A paused player is left paused: the queue still advances
    /// onto the first new track, but nothing starts.
    pub async fn play(&mut self, source: &str, start_at: Option<Duration>) -> Result<PlayReport> {
        let tracks = self.resolve(source, start_at, true, false).await?;
        info!(count = tracks.len(), "tracks added to the queue");
        self.queue.add_many(tracks.iter().cloned());

        let mut started = None;
        if !self.player.is_playing() {
            if let Some(next) = self.queue.get_next() {
                if self.player.try_play(&next).await? {
                    started = Some(next);
                }
            }
        }

        Ok(PlayReport {
            added: tracks,
            started,
        })
    }

    /// Resolve `source` and enqueue it without touching playback.
    pub async fn add_to_playlist(
        &mut self,
        source: &str,
        start_at: Option<Duration>,
    ) -> Result<PlayReport> {
        let tracks = self.resolve(source, start_at, false, false).await?;
        self.queue.add_many(tracks.iter().cloned());
        info!(count = tracks.len(), "tracks appended without starting playback");
        Ok(PlayReport {
            added: tracks,
            started: None,
        })
    }

    /// Cut in with one track, shelving whatever is playing.
    ///
    /// The displaced track keeps its position: when the interruption
    /// ends, it resumes from where it was cut. Refused while paused,
    /// since cutting in would silently discard the pause.
    pub async fn interject(&mut self, source: &str, start_at: Option<Duration>) -> Result<Track> {
        if self.player.is_paused() {
            return Err(SessionError::PausedInterruption);
        }

        let tracks = self.resolve(source, start_at, false, true).await?;
        let track = tracks
            .into_iter()
            .next()
            .ok_or(chorus_fetch::FetchError::CantDownload)?;

        if self.player.is_playing() {
            if let Some(current) = self.queue.get_current() {
                let position = self.player.position(&current);
                current.set_start_time(position.played);
                debug!(
                    title = %current.title,
                    at_secs = position.played.as_secs(),
                    "current track displaced"
                );
            }
            self.player.stop();
        }

        self.queue.add_interruption(track.clone());
        self.player.try_play(&track).await?;
        info!(title = %track.title, "interruption started");
        Ok(track)
    }

    /// Skip to the next track.
    ///
    /// # Errors
    ///
    /// [`SessionError::EndOfQueue`] when there is nothing ahead; the
    /// current track keeps playing in that case.
    pub async fn next(&mut self) -> Result<Track> {
        let track = self.queue.try_get_next().ok_or(SessionError::EndOfQueue)?;
        self.player.stop();
        self.player.try_play(&track).await?;
        Ok(track)
    }

    /// Step back to the previous track.
    pub async fn prev(&mut self) -> Result<Track> {
        let track = self.queue.try_get_prev().ok_or(SessionError::StartOfQueue)?;
        self.player.stop();
        self.player.try_play(&track).await?;
        Ok(track)
    }

    /// Jump to a queue index and play it. Negative indices count from
    /// the end.
    pub async fn jump_to(&mut self, index: i64) -> Result<Track> {
        let track = self.queue.jump_to(index).ok_or(SessionError::InvalidIndex)?;
        self.player.stop();
        self.player.try_play(&track).await?;
        Ok(track)
    }

    /// Remove the track at `index`.
    ///
    /// Removing the playing track stops it and advances to whatever the
    /// queue yields next; `started` is `None` when that leaves the
    /// session idle.
    pub async fn remove(&mut self, index: i64) -> Result<RemoveReport> {
        let index = usize::try_from(index).map_err(|_| SessionError::InvalidIndex)?;
        let current = self.queue.get_current();
        let removed = self.queue.remove_at(index).ok_or(SessionError::InvalidIndex)?;
        let was_current = current.is_some_and(|c| c == removed);

        let mut started = None;
        if was_current {
            self.player.stop();
            if let Some(next) = self.queue.get_next() {
                self.player.try_play(&next).await?;
                started = Some(next);
            } else {
                info!("removed the playing track, nothing left to play");
            }
        }

        Ok(RemoveReport {
            removed,
            was_current,
            started,
        })
    }

    /// Shuffle the queue, keeping the playing track where it is.
    pub fn shuffle(&mut self) {
        self.queue.shuffle();
        debug!("queue shuffled");
    }

    /// Flip the queue's wrap-around setting and return the new value.
    pub fn toggle_loop(&mut self) -> bool {
        let looped = self.queue.toggle_loop();
        info!(looped, "loop setting changed");
        looped
    }

    /// Suspend playback.
    pub fn pause(&mut self) -> Result<()> {
        match self.player.state() {
            PlayerState::Paused => Err(SessionError::AlreadyPaused),
            PlayerState::Stopped => Err(SessionError::NothingPlaying),
            PlayerState::Playing => {
                self.player.pause()?;
                Ok(())
            }
        }
    }

    /// Continue a paused session.
    pub fn resume(&mut self) -> Result<()> {
        match self.player.state() {
            PlayerState::Playing => Err(SessionError::AlreadyPlaying),
            PlayerState::Stopped => Err(SessionError::NothingPlaying),
            PlayerState::Paused => {
                self.player.resume()?;
                Ok(())
            }
        }
    }

    /// The playing track and its progress.
    pub fn now_playing(&self) -> Result<NowPlaying> {
        if !self.player.is_active() {
            return Err(SessionError::NothingPlaying);
        }
        let track = self.queue.get_current().ok_or(SessionError::NothingPlaying)?;
        Ok(NowPlaying {
            position: self.player.position(&track),
            state: self.player.state(),
            track,
        })
    }

    /// One page of the queue, after a paging gesture. `None` starts a
    /// fresh browse from the top.
    ///
    /// A staged interruption is prepended un-numbered. The page is read
    /// one row past its length so `has_more` reflects the tail without
    /// another query.
    pub fn queue_view(&mut self, gesture: Option<PageGesture>) -> QueueView {
        match gesture {
            Some(gesture) => {
                self.pager
                    .apply(gesture, self.queue.len(), self.queue.current_index());
            }
            None => self.pager.reset(),
        }

        let offset = self.pager.offset();
        let limit = self.pager.page_len();
        let window = self.queue.get_many(limit + 1, offset);
        let has_more = window.len() > limit;

        let mut rows = Vec::with_capacity(limit + 1);
        if let Some(interrupting) = self.queue.interrupting() {
            rows.push(self.row(interrupting, None));
        }
        for (i, track) in window.iter().take(limit).enumerate() {
            rows.push(self.row(track, Some(offset + i)));
        }

        QueueView {
            rows,
            offset,
            queue_len: self.queue.len(),
            has_more,
        }
    }

    /// Change bass and volume settings, restarting the playing track so
    /// they take effect. The new settings are persisted either way.
    pub async fn set_music_parameters(
        &mut self,
        bass_gain: Option<i64>,
        volume_percent: Option<u64>,
    ) -> Result<Settings> {
        let settings = self
            .settings
            .update(|settings| {
                if let Some(bass) = bass_gain {
                    settings.bass_gain = bass;
                }
                if let Some(volume) = volume_percent {
                    settings.volume_percent = volume;
                }
            })
            .await;

        if self.player.is_playing() {
            if let Some(current) = self.queue.get_current() {
                let position = self.player.position(&current);
                current.set_start_time(position.played + RESTART_COOLDOWN);
                self.player.stop();
                self.player.try_play(&current).await?;
                debug!(title = %current.title, "playback restarted with new parameters");
            }
        }

        self.settings.persist().await?;
        Ok(settings)
    }

    /// Continue the session after a track ends on its own.
    ///
    /// A failed track is treated like a finished one: the session moves
    /// on instead of stalling. Events that arrive after a manual stop
    /// or pause are stale and ignored.
    pub async fn on_track_ended(&mut self, event: PlaybackEvent) -> Result<TrackEndFlow> {
        if let PlaybackEvent::Failed { message } = &event {
            warn!(message = %message, "track ended with an error, continuing");
        }

        if !self.player.is_playing() {
            debug!("stale completion event ignored");
            return Ok(TrackEndFlow::AlreadyStopped);
        }

        self.player.stop();
        if let Some(next) = self.queue.get_next() {
            self.player.try_play(&next).await?;
            Ok(TrackEndFlow::Started(next))
        } else {
            info!("queue exhausted, going idle");
            Ok(TrackEndFlow::Idle)
        }
    }

    /// Stop playback, drop the queue and abort pending downloads.
    /// The loop setting and stored settings survive.
    pub fn stop(&mut self) {
        self.player.stop();
        self.queue.clear();
        self.pager.reset();
        self.downloader.cancel_pending();
        info!("session stopped and cleared");
    }

    fn row(&self, track: &Track, number: Option<usize>) -> QueueRow {
        let playing_here =
            self.player.is_active() && self.queue.get_current().as_ref() == Some(track);
        QueueRow {
            number,
            title: track.title.clone(),
            is_current: number.is_some() && number == self.queue.current_index(),
            is_interrupting: number.is_none(),
            is_stream: track.is_live(),
            download_done: track.download_settled(),
            played: playing_here.then(|| self.player.position(track).played),
            total: track.duration,
        }
    }

    async fn resolve(
        &self,
        source: &str,
        start_at: Option<Duration>,
        force_load_first: bool,
        only_one: bool,
    ) -> Result<Vec<Track>> {
        let download = self
            .downloader
            .download_tracks(source, force_load_first, only_one);
        let tracks = match tokio::time::timeout(self.config.resolve_timeout, download).await {
            Ok(tracks) => tracks?,
            Err(_) => {
                warn!(source = %source, "source resolution timed out");
                return Err(SessionError::ResolveTimeout);
            }
        };

        if let (Some(offset), Some(first)) = (start_at, tracks.first()) {
            first.set_start_time(offset);
        }
        Ok(tracks)
    }
}
