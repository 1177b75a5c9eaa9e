use std::ops::Deref;
use std::time::Duration;

use feed_rs::model::Entry;

use crate::feed::{resolve_feed_url, Episode, FeedError, FeedSource};

pub struct RssFeedSource(pub reqwest::Client);

impl Default for RssFeedSource {
    fn default() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();
        Self(client)
    }
}

impl Deref for RssFeedSource {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FeedSource for RssFeedSource {
    fn resolve(&self, podcast: &str) -> Result<String, FeedError> {
        resolve_feed_url(podcast)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_latest(&self, feed_url: &str) -> Result<Episode, FeedError> {
        let body = self
            .get(feed_url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(|e| FeedError::Http(e.without_url().to_string()))?
            .bytes()
            .await
            .map_err(|e| FeedError::Http(e.without_url().to_string()))?;

        parse_latest_episode(feed_url, &body)
    }
}

/// Picks the newest entry (index 0 in feed order) and normalizes it into an
/// [`Episode`].
fn parse_latest_episode(feed_url: &str, body: &[u8]) -> Result<Episode, FeedError> {
    let feed = feed_rs::parser::parse(body).map_err(|e| FeedError::Parse(e.to_string()))?;

    let entry = feed
        .entries
        .into_iter()
        .next()
        .ok_or_else(|| FeedError::NoEntries(feed_url.to_string()))?;

    let audio_url = extract_audio_url(&entry).ok_or(FeedError::NoAudioEnclosure)?;

    let identifier = if entry.id.is_empty() {
        entry
            .links
            .first()
            .map(|link| link.href.clone())
            .unwrap_or_else(|| audio_url.clone())
    } else {
        entry.id.clone()
    };

    Ok(Episode {
        identifier,
        title: entry
            .title
            .map(|title| title.content)
            .unwrap_or_else(|| "latest_episode".to_string()),
        audio_url,
        published: entry.published.map(|date| date.to_rfc3339()),
    })
}

/// An audio link is an enclosure whose media type starts with `audio`.
/// RSS enclosures surface as media content instead of links, so fall back to
/// the first media object carrying a URL.
fn extract_audio_url(entry: &Entry) -> Option<String> {
    entry
        .links
        .iter()
        .find(|link| {
            link.rel.as_deref() == Some("enclosure")
                && link
                    .media_type
                    .as_deref()
                    .is_some_and(|media_type| media_type.starts_with("audio"))
        })
        .map(|link| link.href.clone())
        .or_else(|| {
            entry
                .media
                .first()
                .and_then(|media| media.content.first())
                .and_then(|content| content.url.as_ref())
                .map(|url| url.to_string())
        })
}
