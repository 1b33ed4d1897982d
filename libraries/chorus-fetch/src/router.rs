//! Source classification
//!
//! Every play request starts as one opaque string. The router decides,
//! purely from the host, which resolver family handles it. Anything
//! that is not a recognised catalog or lookup URL falls through to the
//! media resolver, which also treats non-URLs as free-text search.

use url::Url;

/// Resolver family a request string belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// Direct media link or free-text search
    Media,

    /// Catalog page that resolves straight to playable tracks
    Catalog,

    /// Page that only yields track names, re-resolved through media search
    Lookup,
}

/// Host-based request classifier.
#[derive(Debug, Clone)]
pub struct SourceRouter {
    /// Host fragments routed to the catalog resolver
    catalog_hosts: Vec<String>,

    /// Exact hosts routed to the name-lookup resolver
    lookup_hosts: Vec<String>,
}

impl Default for SourceRouter {
    fn default() -> Self {
        Self {
            catalog_hosts: vec!["music.yandex".to_string()],
            lookup_hosts: vec!["open.spotify.com".to_string()],
        }
    }
}

impl SourceRouter {
    /// Router with custom host tables.
    pub fn new(catalog_hosts: Vec<String>, lookup_hosts: Vec<String>) -> Self {
        Self {
            catalog_hosts,
            lookup_hosts,
        }
    }

    /// Classify one request string.
    ///
    /// Catalog hosts match as fragments (any subdomain or TLD variant),
    /// lookup hosts match exactly. Unparseable input is a search query,
    /// which belongs to the media resolver.
    pub fn classify(&self, source: &str) -> SourceKind {
        let Ok(url) = Url::parse(source) else {
            return SourceKind::Media;
        };
        let Some(host) = url.host_str() else {
            return SourceKind::Media;
        };

        if self.catalog_hosts.iter().any(|h| host.contains(h.as_str())) {
            return SourceKind::Catalog;
        }
        if self.lookup_hosts.iter().any(|h| host == h.as_str()) {
            return SourceKind::Lookup;
        }
        SourceKind::Media
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_hosts_match_any_region() {
        let router = SourceRouter::default();
        assert_eq!(
            router.classify("https://music.yandex.ru/album/123"),
            SourceKind::Catalog
        );
        assert_eq!(
            router.classify("https://music.yandex.com/track/9"),
            SourceKind::Catalog
        );
    }

    #[test]
    fn lookup_hosts_match_exactly() {
        let router = SourceRouter::default();
        assert_eq!(
            router.classify("https://open.spotify.com/playlist/abc"),
            SourceKind::Lookup
        );
        // A lookalike subdomain is not a lookup source.
        assert_eq!(
            router.classify("https://open.spotify.com.evil.example/x"),
            SourceKind::Media
        );
    }

    #[test]
    fn everything_else_is_media() {
        let router = SourceRouter::default();
        assert_eq!(
            router.classify("https://youtu.be/dQw4w9WgXcQ"),
            SourceKind::Media
        );
        assert_eq!(
            router.classify("https://soundcloud.com/artist/track"),
            SourceKind::Media
        );
    }

    #[test]
    fn free_text_is_media_search() {
        let router = SourceRouter::default();
        assert_eq!(
            router.classify("never gonna give you up"),
            SourceKind::Media
        );
        assert_eq!(router.classify(""), SourceKind::Media);
    }

    #[test]
    fn custom_tables_replace_the_defaults() {
        let router = SourceRouter::new(
            vec!["records.example".to_string()],
            vec!["names.example".to_string()],
        );
        assert_eq!(
            router.classify("https://records.example/a"),
            SourceKind::Catalog
        );
        assert_eq!(
            router.classify("https://names.example/p"),
            SourceKind::Lookup
        );
        assert_eq!(
            router.classify("https://music.yandex.ru/album/1"),
            SourceKind::Media
        );
    }
}
