//! Error types for resolution and downloading

use thiserror::Error;

/// Fetch errors
///
/// The two listener-facing variants keep their fixed wording; everything
/// built on top surfaces them verbatim.
#[derive(Debug, Error)]
pub enum FetchError {
    /// A source yielded no playable tracks at all
    #[error("Can't download music by this source")]
    CantDownload,

    /// A metadata lookup failed before any audio was resolved
    #[error("Can't load track info by this source")]
    CantLoadTrackInfo,

    /// The partial artifact on disk no longer matches the remote file
    ///
    /// Raised mid-download when a resume request is refused; the
    /// retry loop removes the partial and starts over.
    #[error("Stale partial artifact on disk")]
    StaleRange,

    /// The bounded retry budget ran out
    #[error("Download failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// How many attempts were made
        attempts: usize,
        /// Description of the last failure
        last: String,
    },

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fetch operations
pub type Result<T> = std::result::Result<T, FetchError>;
