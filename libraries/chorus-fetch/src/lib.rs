//! Chorus - Track Resolution and Downloading
//!
//! Resolves play-request strings into tracks and produces their audio
//! artifacts on disk.
//!
//! This crate provides:
//! - Host-based routing of requests to resolver families
//! - Resolver traits for media, catalog and name-lookup services
//! - A flat artifact cache with per-artifact locks
//! - A streaming HTTP fetcher with resume and bounded retry
//! - A partially speculative pipeline: leading tracks inline, the rest
//!   fanned out over a bounded set of chunk workers
//!
//! # Architecture
//!
//! `chorus-fetch` knows nothing about any concrete music service. The
//! embedding application implements [`MediaResolver`], [`CatalogResolver`]
//! and [`NameLookup`] for the services it talks to; the [`Downloader`]
//! only sequences them. Tracks leave the pipeline as `chorus-core`
//! [`Track`](chorus_core::Track) values, background downloads attached
//! as shared completion handles.

#![forbid(unsafe_code)]

pub mod cache;
pub mod downloader;
pub mod error;
pub mod fetcher;
pub mod resolver;
pub mod router;
pub mod types;

pub use cache::TrackCache;
pub use downloader::{DownloadConfig, Downloader};
pub use error::{FetchError, Result};
pub use fetcher::HttpFetcher;
pub use resolver::{CatalogResolver, MediaResolver, NameLookup};
pub use router::{SourceKind, SourceRouter};
pub use types::{ResolvedMedia, ResolvedTrack};
