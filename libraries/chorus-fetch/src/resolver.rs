//! Resolver traits
//!
//! Concrete integrations (scrapers, API clients) live with the embedding
//! application; the pipeline only knows these three shapes. They line up
//! with [`SourceKind`](crate::router::SourceKind): media for direct links
//! and search, catalog for services that resolve to playable tracks,
//! lookup for services that only reveal track names.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::ResolvedTrack;

/// Resolves direct links and free-text queries into playable tracks.
///
/// A link to a playlist yields every entry; a search query yields the
/// best matches, best first. An empty vector means the source exists
/// but has nothing playable.
#[async_trait]
pub trait MediaResolver: Send + Sync {
    /// Resolve `query` (URL or search text) into tracks.
    async fn resolve(&self, query: &str) -> Result<Vec<ResolvedTrack>>;
}

/// Resolves catalog-service URLs straight into playable tracks.
#[async_trait]
pub trait CatalogResolver: Send + Sync {
    /// Resolve a catalog page into tracks.
    async fn resolve(&self, url: &str) -> Result<Vec<ResolvedTrack>>;
}

/// Extracts track names from services that expose nothing playable.
///
/// Each name is re-resolved through the [`MediaResolver`] as a search
/// query, taking the best match.
#[async_trait]
pub trait NameLookup: Send + Sync {
    /// List the track names behind `url`, in playlist order.
    async fn track_names(&self, url: &str) -> Result<Vec<String>>;
}
