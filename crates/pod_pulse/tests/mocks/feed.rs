use pod_pulse::feed::{Episode, FeedError, FeedSource};

#[derive(Clone)]
pub struct MockFeedSource {
    pub feed_url: String,
    pub episode: Episode,
    pub fail_with: Option<String>,
}

impl MockFeedSource {
    pub fn new(episode: Episode) -> Self {
        Self {
            feed_url: "https://feed.example.com".to_string(),
            episode,
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new(Episode {
                identifier: String::new(),
                title: String::new(),
                audio_url: String::new(),
                published: None,
            })
        }
    }
}

impl FeedSource for MockFeedSource {
    fn resolve(&self, _podcast: &str) -> Result<String, FeedError> {
        Ok(self.feed_url.clone())
    }

    async fn fetch_latest(&self, _feed_url: &str) -> Result<Episode, FeedError> {
        if let Some(ref msg) = self.fail_with {
            return Err(FeedError::Parse(msg.clone()));
        }
        Ok(self.episode.clone())
    }
}
