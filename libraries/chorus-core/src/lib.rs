//! Chorus Core
//!
//! Shared domain types for the Chorus voice-channel music player core.
//!
//! This crate holds everything more than one Chorus crate needs to agree on:
//!
//! - **`Track`**: a queued playable item with uuid identity, an immutable
//!   media source (cached file or live stream) and shared-mutable cue points.
//! - **`ChunkHandle`**: the clonable completion handle a download chunk
//!   publishes and every track of that chunk carries.
//! - **`Settings` / `SettingsStore`**: the persisted player settings record
//!   and its single-owner store.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use chorus_core::Track;
//!
//! let track = Track::cached(
//!     "dQw4w9WgXcQ",
//!     "Never Gonna Give You Up",
//!     "https://youtu.be/dQw4w9WgXcQ",
//!     Duration::from_secs(212),
//!     "dQw4w9WgXcQ.opus",
//! );
//!
//! assert!(!track.is_live());
//! assert_eq!(track.start_time(), Duration::ZERO);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod settings;
pub mod track;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use settings::{Settings, SettingsStore};
pub use track::{ChunkCompleter, ChunkHandle, ChunkState, Track, TrackSource};
