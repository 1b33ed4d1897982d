/// Persisted player settings and the store that owns them
use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::{CoreError, Result};

fn default_bass_gain() -> i64 {
    0
}

fn default_volume_percent() -> u64 {
    50
}

fn default_cached_music_dir() -> PathBuf {
    PathBuf::from("cached_music")
}

/// User-tunable player settings, persisted as TOML.
///
/// Unknown fields in the file are tolerated; missing fields take defaults,
/// so a hand-edited or older file still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Bass boost gain passed to the audio session's filter chain.
    #[serde(default = "default_bass_gain")]
    pub bass_gain: i64,

    /// Playback volume in percent (100 = unity gain).
    #[serde(default = "default_volume_percent")]
    pub volume_percent: u64,

    /// Directory downloaded audio artifacts are cached in.
    #[serde(default = "default_cached_music_dir")]
    pub cached_music_dir: PathBuf,

    /// Opaque API credentials for embedder-supplied source resolvers.
    #[serde(default)]
    pub tokens: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bass_gain: default_bass_gain(),
            volume_percent: default_volume_percent(),
            cached_music_dir: default_cached_music_dir(),
            tokens: HashMap::new(),
        }
    }
}

impl Settings {
    /// Volume as the 0.0-1.0 factor audio sessions expect.
    pub fn volume_factor(&self) -> f64 {
        self.volume_percent as f64 / 100.0
    }
}

/// Single owner of the settings record and its persistence.
///
/// Engines hold an `Arc<SettingsStore>` injected at construction and read
/// snapshots; only the session coordinator calls [`SettingsStore::persist`].
#[derive(Debug)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    inner: RwLock<Settings>,
}

impl SettingsStore {
    /// Load settings from `path`. A missing file yields defaults; a present
    /// but malformed file is an error.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let settings = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => toml::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "settings file missing, using defaults");
                Settings::default()
            }
            Err(e) => return Err(CoreError::Io(e)),
        };

        Ok(Self {
            path: Some(path),
            inner: RwLock::new(settings),
        })
    }

    /// A store with no backing file; [`SettingsStore::persist`] is a no-op.
    pub fn in_memory(settings: Settings) -> Self {
        Self {
            path: None,
            inner: RwLock::new(settings),
        }
    }

    /// Current settings by value.
    pub async fn snapshot(&self) -> Settings {
        self.inner.read().await.clone()
    }

    /// Mutate the settings under the write lock and return the result.
    pub async fn update<F>(&self, apply: F) -> Settings
    where
        F: FnOnce(&mut Settings),
    {
        let mut guard = self.inner.write().await;
        apply(&mut guard);
        guard.clone()
    }

    /// Write the current settings back to disk.
    pub async fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let snapshot = self.inner.read().await.clone();
        let raw = toml::to_string_pretty(&snapshot)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(path, raw).await?;
        info!(path = %path.display(), "settings persisted");

        Ok(())
    }
}
