//! Download pipeline
//!
//! Turns one request string into queueable tracks:
//! 1. Route to a resolver family by host.
//! 2. Cap multi-track sources at the playlist limit.
//! 3. Fetch the leading tracks inline when playback is waiting on them.
//! 4. Fan the rest out across a bounded set of chunk workers, every
//!    track in a chunk sharing that worker's completion handle.
//!
//! Live media and already-cached artifacts skip fetching entirely.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use chorus_core::{ChunkCompleter, ChunkHandle, Track};

use crate::cache::TrackCache;
use crate::error::{FetchError, Result};
use crate::fetcher::HttpFetcher;
use crate::resolver::{CatalogResolver, MediaResolver, NameLookup};
use crate::router::{SourceKind, SourceRouter};
use crate::types::{ResolvedMedia, ResolvedTrack};

/// Tunables for the download pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Upper bound on concurrent chunk workers
    pub worker_count: usize,

    /// Most tracks taken from one multi-track source
    pub playlist_limit: usize,

    /// Leading tracks fetched before a forced request returns
    pub inline_prefetch: usize,

    /// Pause between download retry attempts
    pub retry_backoff: Duration,

    /// Retries allowed per artifact before giving up
    pub max_retries: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            worker_count: 8,
            playlist_limit: 50,
            inline_prefetch: 2,
            retry_backoff: Duration::from_secs(5),
            max_retries: 3,
        }
    }
}

/// One artifact to produce: where from and what to call it.
#[derive(Debug, Clone)]
struct FetchJob {
    url: String,
    file_name: String,
    title: String,
}

/// A spawned chunk worker and the means to stop it.
struct ChunkTask {
    handle: JoinHandle<()>,
    abort_tx: oneshot::Sender<()>,
}

/// Resolve-and-download orchestrator behind every play request.
pub struct Downloader {
    router: SourceRouter,
    media: Arc<dyn MediaResolver>,
    catalog: Arc<dyn CatalogResolver>,
    lookup: Arc<dyn NameLookup>,
    cache: Arc<TrackCache>,
    fetcher: Arc<HttpFetcher>,
    config: DownloadConfig,

    /// Live chunk workers; pruned on the next fan-out
    tasks: StdMutex<Vec<ChunkTask>>,
}

impl Downloader {
    /// Pipeline over the given resolvers and cache.
    ///
    /// # Errors
    ///
    /// HTTP client construction failures from `reqwest`.
    pub fn new(
        media: Arc<dyn MediaResolver>,
        catalog: Arc<dyn CatalogResolver>,
        lookup: Arc<dyn NameLookup>,
        cache: Arc<TrackCache>,
        config: DownloadConfig,
    ) -> Result<Self> {
        let fetcher = Arc::new(HttpFetcher::new(config.retry_backoff, config.max_retries)?);
        Ok(Self {
            router: SourceRouter::default(),
            media,
            catalog,
            lookup,
            cache,
            fetcher,
            config,
            tasks: StdMutex::new(Vec::new()),
        })
    }

    /// Replace the default host routing tables.
    #[must_use]
    pub fn with_router(mut self, router: SourceRouter) -> Self {
        self.router = router;
        self
    }

    /// Resolve `source` and produce tracks ready for the queue.
    ///
    /// With `force_load_first`, tracks that land in the leading prefetch
    /// positions are fully downloaded before this returns, so playback
    /// can start without waiting. Everything else downloads in the
    /// background; such tracks carry a [`ChunkHandle`] that settles when
    /// their chunk finishes. `only_one` keeps only the best match of a
    /// multi-track source.
    ///
    /// # Errors
    ///
    /// [`FetchError::CantDownload`] when the source yields no tracks;
    /// resolver errors and inline download failures as they occurred.
    pub async fn download_tracks(
        &self,
        source: &str,
        force_load_first: bool,
        only_one: bool,
    ) -> Result<Vec<Track>> {
        self.cache.ensure_dir().await?;

        let resolved = self.resolve(source, only_one).await?;
        if resolved.is_empty() {
            return Err(FetchError::CantDownload);
        }

        let take = if only_one {
            1
        } else {
            self.config.playlist_limit
        };

        let mut tracks: Vec<Track> = Vec::with_capacity(take.min(resolved.len()));
        let mut jobs: Vec<(usize, FetchJob)> = Vec::new();

        for (index, item) in resolved.into_iter().take(take).enumerate() {
            let ResolvedTrack {
                id,
                title,
                link,
                duration,
                media,
            } = item;
            match media {
                ResolvedMedia::Live { url } => {
                    tracks.push(Track::stream(id, title, link, url));
                }
                ResolvedMedia::Fetch { url, file_ext } => {
                    let file_name = format!("{id}.{file_ext}");
                    let track = Track::cached(id, title.clone(), link, duration, file_name.clone());
                    if !self.cache.contains(&file_name) {
                        jobs.push((
                            index,
                            FetchJob {
                                url,
                                file_name,
                                title,
                            },
                        ));
                    }
                    tracks.push(track);
                }
            }
        }

        let (inline, deferred): (Vec<_>, Vec<_>) = if force_load_first {
            jobs.into_iter()
                .partition(|(index, _)| *index < self.config.inline_prefetch)
        } else {
            (Vec::new(), jobs)
        };

        for (_, job) in &inline {
            if let Err(error) = run_job(&self.fetcher, &self.cache, job).await {
                warn!(title = %job.title, error = %error, "inline download failed");
                return Err(error);
            }
        }

        if !deferred.is_empty() {
            self.fan_out(&mut tracks, deferred);
        }

        debug!(count = tracks.len(), "tracks ready for the queue");
        Ok(tracks)
    }

    /// Abort every pending chunk worker.
    ///
    /// Workers stop at their next track boundary (or are torn down
    /// outright); waiters on their handles see the chunks as failed.
    pub fn cancel_pending(&self) {
        let drained: Vec<ChunkTask> = {
            let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            tasks.drain(..).collect()
        };
        let count = drained.len();
        for task in drained {
            let _ = task.abort_tx.send(());
            task.handle.abort();
        }
        if count > 0 {
            info!(count, "pending downloads cancelled");
        }
    }

    async fn resolve(&self, source: &str, only_one: bool) -> Result<Vec<ResolvedTrack>> {
        match self.router.classify(source) {
            SourceKind::Media => self.media.resolve(source).await,
            SourceKind::Catalog => self.catalog.resolve(source).await,
            SourceKind::Lookup => {
                let mut names = self.lookup.track_names(source).await?;
                // Truncating before re-resolution saves the discarded
                // searches, not just the downloads.
                if only_one {
                    names.truncate(1);
                }

                let mut found = Vec::with_capacity(names.len());
                for name in names {
                    match self.media.resolve(&name).await {
                        Ok(mut matches) if !matches.is_empty() => found.push(matches.remove(0)),
                        Ok(_) => warn!(name = %name, "no media match for looked-up name"),
                        Err(error) => {
                            warn!(name = %name, error = %error, "re-resolving looked-up name failed");
                        }
                    }
                }
                Ok(found)
            }
        }
    }

    /// Split `deferred` into chunks and spawn one worker per chunk.
    fn fan_out(&self, tracks: &mut [Track], deferred: Vec<(usize, FetchJob)>) {
        let size = chunk_size(deferred.len(), self.config.worker_count);

        let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
        tasks.retain(|task| !task.handle.is_finished());

        for chunk in deferred.chunks(size) {
            let (completer, chunk_handle) = ChunkHandle::pending();
            for (index, _) in chunk {
                tracks[*index].download = Some(chunk_handle.clone());
            }

            let jobs: Vec<FetchJob> = chunk.iter().map(|(_, job)| job.clone()).collect();
            let fetcher = Arc::clone(&self.fetcher);
            let cache = Arc::clone(&self.cache);
            let (abort_tx, abort_rx) = oneshot::channel();
            let handle = tokio::spawn(run_chunk(fetcher, cache, jobs, completer, abort_rx));
            tasks.push(ChunkTask { handle, abort_tx });
        }
    }
}

/// Jobs per chunk so the chunk count never exceeds the worker bound.
fn chunk_size(jobs: usize, workers: usize) -> usize {
    jobs / workers.max(1) + 1
}

/// Produce one artifact, downloading only if the cache lacks it.
async fn run_job(fetcher: &HttpFetcher, cache: &TrackCache, job: &FetchJob) -> Result<()> {
    let _guard = cache.lock_artifact(&job.file_name).await;
    if cache.contains(&job.file_name) {
        debug!(file = %job.file_name, "artifact already cached");
        return Ok(());
    }
    fetcher.fetch(&job.url, &cache.path_for(&job.file_name)).await
}

/// Work through one chunk of jobs, then settle the shared handle.
async fn run_chunk(
    fetcher: Arc<HttpFetcher>,
    cache: Arc<TrackCache>,
    jobs: Vec<FetchJob>,
    completer: ChunkCompleter,
    mut abort_rx: oneshot::Receiver<()>,
) {
    let mut failures = 0usize;
    for job in &jobs {
        tokio::select! {
            _ = &mut abort_rx => {
                // Dropping the completer settles waiters as failed.
                debug!("download chunk aborted");
                return;
            }
            result = run_job(&fetcher, &cache, job) => {
                if let Err(error) = result {
                    warn!(title = %job.title, error = %error, "track download failed");
                    failures += 1;
                }
            }
        }
    }

    if failures == 0 {
        completer.complete();
    } else {
        completer.fail();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunking_never_exceeds_the_worker_bound() {
        for jobs in 1usize..=200 {
            let size = chunk_size(jobs, 8);
            let chunks = jobs.div_ceil(size);
            assert!(chunks <= 8, "{jobs} jobs split into {chunks} chunks");
        }
    }

    #[test]
    fn chunking_tolerates_a_zero_worker_bound() {
        assert_eq!(chunk_size(10, 0), 11);
    }
}
