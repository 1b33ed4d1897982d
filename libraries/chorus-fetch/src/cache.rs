//! Cached artifact store
//!
//! Downloads land in one flat directory, named `<id>.<ext>`. A file that
//! exists is complete: in-flight downloads write to a `.part` side file
//! and only take the final name on success. Per-artifact async locks
//! keep two workers from producing the same file twice.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::Result;

/// Flat on-disk store of finished audio artifacts.
#[derive(Debug)]
pub struct TrackCache {
    /// Directory all artifacts live in
    dir: PathBuf,

    /// One async lock per artifact name
    locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TrackCache {
    /// Cache rooted at `dir`. The directory is created lazily by
    /// [`ensure_dir`](Self::ensure_dir).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: StdMutex::new(HashMap::new()),
        }
    }

    /// Create the cache directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Directory the cache writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path an artifact has (or would have).
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Whether a finished artifact exists.
    pub fn contains(&self, file_name: &str) -> bool {
        self.path_for(file_name).exists()
    }

    /// Take the artifact's lock, creating it on first use.
    ///
    /// Holders are expected to re-check [`contains`](Self::contains)
    /// after acquiring: the previous holder may have finished the same
    /// download.
    pub async fn lock_artifact(&self, file_name: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self
                .locks
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(
                locks
                    .entry(file_name.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    #[tokio::test]
    async fn contains_reflects_the_filesystem() {
        let dir = TempDir::new().unwrap();
        let cache = TrackCache::new(dir.path());

        assert!(!cache.contains("abc.opus"));
        tokio::fs::write(cache.path_for("abc.opus"), b"audio")
            .await
            .unwrap();
        assert!(cache.contains("abc.opus"));
    }

    #[tokio::test]
    async fn ensure_dir_creates_nested_paths() {
        let dir = TempDir::new().unwrap();
        let cache = TrackCache::new(dir.path().join("a").join("b"));

        cache.ensure_dir().await.unwrap();
        assert!(cache.dir().is_dir());
    }

    #[tokio::test]
    async fn artifact_locks_serialize_holders() {
        let dir = TempDir::new().unwrap();
        let cache = Arc::new(TrackCache::new(dir.path()));
        let running = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let cache = Arc::clone(&cache);
            let running = Arc::clone(&running);
            handles.push(tokio::spawn(async move {
                let _guard = cache.lock_artifact("same.opus").await;
                let inside = running.fetch_add(1, Ordering::SeqCst);
                assert_eq!(inside, 0, "another holder was inside the lock");
                tokio::task::yield_now().await;
                running.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn different_artifacts_do_not_share_locks() {
        let dir = TempDir::new().unwrap();
        let cache = TrackCache::new(dir.path());

        let _a = cache.lock_artifact("a.opus").await;
        // Must not deadlock.
        let _b = cache.lock_artifact("b.opus").await;
    }
}
