//! Chorus - Queue and Playback Management
//!
//! Voice-channel playback management for Chorus.
//!
//! This crate provides:
//! - Ordered track queue with cursor navigation and wrap-around loop
//! - Out-of-band interruptions that mask, not displace, the queue
//! - Committing and peeking navigation variants
//! - Resume-after-exhaustion when a drained queue grows again
//! - A tri-state player (stopped/playing/paused) with restart cooldown
//! - Paged queue browsing
//!
//! # Architecture
//!
//! `chorus-playback` is completely backend-agnostic:
//! - No dependency on any voice or chat framework
//! - No dependency on the track resolvers or the download pipeline
//! - No network access of its own
//!
//! The actual voice connection is provided via the [`AudioSession`]
//! trait; implementations live with the embedding application. Track
//! completion flows back through whatever event channel the embedder
//! gives its session, keeping the queue single-owner.
//!
//! # Example: Queue Navigation
//!
//! ```rust
//! use chorus_playback::TrackQueue;
//! use chorus_core::Track;
//! use std::time::Duration;
//!
//! let mut queue = TrackQueue::new();
//! queue.add(Track::cached(
//!     "dQw4w9WgXcQ",
//!     "Never Gonna Give You Up",
//!     "https://youtu.be/dQw4w9WgXcQ",
//!     Duration::from_secs(212),
//!     "dQw4w9WgXcQ.opus",
//! ));
//!
//! let first = queue.get_next().unwrap();
//! assert_eq!(first.title, "Never Gonna Give You Up");
//!
//! // Peeking past the end leaves the cursor on the last track.
//! assert!(queue.try_get_next().is_none());
//! assert_eq!(queue.get_current(), Some(first));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod pager;
pub mod player;
pub mod queue;
pub mod session;
pub mod types;

pub use error::{PlaybackError, Result};
pub use pager::{PageGesture, QueuePager};
pub use player::Player;
pub use queue::TrackQueue;
pub use session::{AudioSession, FilterParams, PlaybackEvent, SourceDescriptor};
pub use types::{PlaybackPosition, PlayerState, FRAME_DURATION, RESTART_COOLDOWN};
