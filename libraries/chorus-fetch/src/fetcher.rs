//! HTTP artifact fetcher
//!
//! Streams one remote file to disk. Downloads go to a `.part` side file
//! and take the final name only on success, so a present artifact is
//! always complete. An existing partial is resumed with a Range request;
//! a refused resume (416) throws the partial away once and starts over.
//! Everything else is retried on a fixed backoff until the bounded
//! budget runs out.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{header, StatusCode};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::{FetchError, Result};

/// How long to wait for a connection before giving the attempt up.
///
/// There is no total request timeout on purpose: artifacts stream for
/// as long as they stream. A dead connection surfaces as a stream
/// error and goes through the retry loop.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Streaming downloader with resume and bounded retry.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    retry_backoff: Duration,
    max_retries: usize,
}

impl HttpFetcher {
    /// Fetcher with a client tuned for artifact streaming.
    ///
    /// # Errors
    ///
    /// Client construction failures from `reqwest`.
    pub fn new(retry_backoff: Duration, max_retries: usize) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("Chorus/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, retry_backoff, max_retries))
    }

    /// Fetcher reusing a preconfigured client.
    pub fn with_client(client: reqwest::Client, retry_backoff: Duration, max_retries: usize) -> Self {
        Self {
            client,
            retry_backoff,
            max_retries,
        }
    }

    /// Download `url` into `dest`, resuming and retrying as needed.
    ///
    /// # Errors
    ///
    /// [`FetchError::RetriesExhausted`] once a failure has been retried
    /// `max_retries` times; IO errors from the final rename directly.
    pub async fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        let part = part_path(dest);
        let mut attempts = 0usize;
        let mut cleaned_stale = false;

        loop {
            match self.fetch_once(url, &part).await {
                Ok(()) => {
                    fs::rename(&part, dest).await?;
                    debug!(dest = %dest.display(), "artifact finished");
                    return Ok(());
                }
                Err(FetchError::StaleRange) if !cleaned_stale => {
                    // One free pass: drop the partial and restart now.
                    cleaned_stale = true;
                    debug!(part = %part.display(), "resume refused, discarding partial");
                    let _ = fs::remove_file(&part).await;
                }
                Err(error) => {
                    attempts += 1;
                    if attempts > self.max_retries {
                        return Err(FetchError::RetriesExhausted {
                            attempts,
                            last: error.to_string(),
                        });
                    }
                    warn!(url = %url, attempt = attempts, error = %error, "download failed, retrying");
                    tokio::time::sleep(self.retry_backoff).await;
                }
            }
        }
    }

    async fn fetch_once(&self, url: &str, part: &Path) -> Result<()> {
        let resume_from = match fs::metadata(part).await {
            Ok(meta) => meta.len(),
            Err(_) => 0,
        };

        let mut request = self.client.get(url);
        if resume_from > 0 {
            request = request.header(header::RANGE, format!("bytes={resume_from}-"));
        }

        let response = request.send().await?;
        if response.status() == StatusCode::RANGE_NOT_SATISFIABLE {
            return Err(FetchError::StaleRange);
        }
        let response = response.error_for_status()?;

        // A 200 to a ranged request means the server restarted the file.
        let append = resume_from > 0 && response.status() == StatusCode::PARTIAL_CONTENT;
        let mut file = if append {
            OpenOptions::new().append(true).open(part).await?
        } else {
            fs::File::create(part).await?
        };

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            file.write_all(&chunk?).await?;
        }
        file.flush().await?;
        Ok(())
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}
