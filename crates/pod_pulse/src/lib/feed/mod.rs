//! # Feed Resolution
//!
//! Maps a podcast name or raw feed URL to a canonical feed URL, and reads a
//! feed to produce the single latest episode record. Only the newest entry is
//! ever considered; there is no backlog processing.

use std::future::Future;

pub mod rss;

/// One feed entry, freshly constructed on every fetch.
///
/// `identifier` must be stable across polls for the same logical episode;
/// everything else is informational.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub identifier: String,
    pub title: String,
    pub audio_url: String,
    pub published: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Unknown podcast '{name}'. Use a direct RSS URL or one of: {available}")]
    UnknownPodcast { name: String, available: String },
    #[error("Failed to fetch feed: {0}")]
    Http(String),
    #[error("Failed to parse feed: {0}")]
    Parse(String),
    #[error("No entries found in feed: {0}")]
    NoEntries(String),
    #[error("Latest episode has no downloadable audio enclosure")]
    NoAudioEnclosure,
}

/// Known podcasts by lowercased display name. Immutable; anything not listed
/// here must be given as a direct feed URL.
pub const CATALOG: &[(&str, &str)] = &[
    ("lage der nation", "https://feeds.lagedernation.org/feeds/ldn-mp3.xml"),
    ("was jetzt", "https://feeds.simplecast.com/Xtqjn37O"),
];

/// Resolves a catalog name (case-insensitive) or passes an absolute
/// http/https URL through unchanged.
pub fn resolve_feed_url(podcast: &str) -> Result<String, FeedError> {
    let key = podcast.trim().to_lowercase();
    if let Some((_, url)) = CATALOG.iter().find(|(name, _)| *name == key) {
        return Ok((*url).to_string());
    }
    if looks_like_url(podcast) {
        return Ok(podcast.to_string());
    }
    Err(FeedError::UnknownPodcast {
        name: podcast.to_string(),
        available: CATALOG
            .iter()
            .map(|(name, _)| *name)
            .collect::<Vec<_>>()
            .join(", "),
    })
}

fn looks_like_url(value: &str) -> bool {
    reqwest::Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}

pub trait FeedSource {
    fn resolve(&self, podcast: &str) -> Result<String, FeedError>;

    fn fetch_latest(
        &self,
        feed_url: &str,
    ) -> impl Future<Output = Result<Episode, FeedError>> + Send;
}
