//! Resolver output types

use std::time::Duration;

/// How a resolved track's audio is obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedMedia {
    /// A finite file to download into the cache
    Fetch {
        /// Direct audio URL
        url: String,
        /// Extension for the cached artifact, without the dot
        file_ext: String,
    },

    /// A live broadcast streamed straight to the player
    Live {
        /// Stream URL
        url: String,
    },
}

/// One track as a resolver describes it, before it enters the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrack {
    /// Source-scoped identifier; also names the cached artifact
    pub id: String,

    /// Human-readable title
    pub title: String,

    /// Page the track came from, for display
    pub link: String,

    /// Track length; meaningless for live media
    pub duration: Duration,

    /// Where the audio itself comes from
    pub media: ResolvedMedia,
}

impl ResolvedTrack {
    /// File name the cached artifact would have, or `None` for live media.
    pub fn file_name(&self) -> Option<String> {
        match &self.media {
            ResolvedMedia::Fetch { file_ext, .. } => Some(format!("{}.{}", self.id, file_ext)),
            ResolvedMedia::Live { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_follows_id_and_extension() {
        let track = ResolvedTrack {
            id: "dQw4w9WgXcQ".to_string(),
            title: "Test".to_string(),
            link: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            duration: Duration::from_secs(212),
            media: ResolvedMedia::Fetch {
                url: "https://cdn.example/audio".to_string(),
                file_ext: "opus".to_string(),
            },
        };
        assert_eq!(track.file_name(), Some("dQw4w9WgXcQ.opus".to_string()));
    }

    #[test]
    fn live_media_has_no_file_name() {
        let track = ResolvedTrack {
            id: "radio".to_string(),
            title: "Radio".to_string(),
            link: "https://r.example".to_string(),
            duration: Duration::ZERO,
            media: ResolvedMedia::Live {
                url: "https://r.example/ice".to_string(),
            },
        };
        assert_eq!(track.file_name(), None);
    }
}
