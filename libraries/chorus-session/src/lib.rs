//! Chorus - Session Coordination
//!
//! Ties the queue, the player and the download pipeline together into
//! one [`MusicService`] per voice connection:
//! - Play, enqueue and interject flows with their listener-facing errors
//! - Queue navigation (next, prev, jump, remove, shuffle, loop)
//! - Paged queue views and now-playing reports
//! - Parameter changes that restart playback in place
//! - Track-end continuation driven by playback events
//!
//! The service is single-owner by design: embedders wrap it in whatever
//! task or actor model their frontend uses and feed playback events in.

#![forbid(unsafe_code)]

pub mod error;
pub mod service;
pub mod types;
pub mod view;

pub use error::{Result, SessionError};
pub use service::MusicService;
pub use types::{NowPlaying, PlayReport, RemoveReport, SessionConfig, TrackEndFlow};
pub use view::{QueueRow, QueueView};
