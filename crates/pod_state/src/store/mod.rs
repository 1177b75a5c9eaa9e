use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

pub mod json;

/// Durable server state, one document per watched configuration.
///
/// `episodes` maps a feed URL to the identifier of the last episode that was
/// processed to completion. `telegram_update_offset` is the smallest Telegram
/// update id that has not been acknowledged yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServerState {
    pub episodes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram_update_offset: Option<i64>,
}

impl ServerState {
    /// Rebuilds state from a parsed JSON document.
    ///
    /// A document without an `episodes` key is treated as the legacy flat
    /// `{feed_url: episode_id}` layout and migrated in memory. Entries with
    /// unexpected types are dropped rather than rejected.
    pub fn from_document(doc: Value) -> Self {
        let Value::Object(map) = doc else {
            return Self::default();
        };

        let telegram_update_offset = map.get("telegram_update_offset").and_then(Value::as_i64);

        let episodes = match map.get("episodes") {
            Some(Value::Object(episodes)) => episodes
                .iter()
                .filter_map(|(feed_url, id)| id.as_str().map(|id| (feed_url.clone(), id.to_string())))
                .collect(),
            Some(_) => BTreeMap::new(),
            // legacy flat layout
            None => map
                .iter()
                .filter(|(key, _)| *key != "telegram_update_offset")
                .filter_map(|(feed_url, id)| id.as_str().map(|id| (feed_url.clone(), id.to_string())))
                .collect(),
        };

        Self {
            episodes,
            telegram_update_offset,
        }
    }

    /// Whether `episode_id` is recorded as the last processed episode for
    /// `feed_url`. Absence of the feed means "not processed".
    pub fn has_processed(&self, feed_url: &str, episode_id: &str) -> bool {
        self.episodes
            .get(feed_url)
            .is_some_and(|last| last == episode_id)
    }

    /// Records `episode_id` as processed for `feed_url`. The caller is
    /// responsible for persisting the updated state.
    pub fn mark_processed(&mut self, feed_url: impl Into<String>, episode_id: impl Into<String>) {
        self.episodes.insert(feed_url.into(), episode_id.into());
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to write state file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub trait StateStore {
    /// Reads the current state. Missing or malformed documents yield an
    /// empty default state so that a corrupt file never takes the server
    /// down.
    fn load(&self) -> ServerState;

    fn save(&self, state: &ServerState) -> Result<(), StateError>;
}

impl<T: StateStore> StateStore for &T {
    fn load(&self) -> ServerState {
        (**self).load()
    }

    fn save(&self, state: &ServerState) -> Result<(), StateError> {
        (**self).save(state)
    }
}
