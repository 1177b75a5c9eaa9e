//! # Telegram Channel
//!
//! Outbound notifications and inbound command polling over the Telegram bot
//! API. Delivery retries transient transport failures with a bounded linear
//! backoff; explicit API rejections surface immediately.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;

pub mod client;
pub mod transport;

pub use client::TelegramApi;
pub use transport::{HttpTransport, TelegramTransport};

#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("Telegram request failed: {0}")]
    Network(String),
    #[error("Malformed Telegram response: {0}")]
    MalformedResponse(String),
    #[error("Telegram {method} failed: {description}")]
    Rejected { method: String, description: String },
    #[error("Cannot send an empty message")]
    EmptyMessage,
}

impl TelegramError {
    /// Transient failures are worth retrying; rejections and caller errors
    /// are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            TelegramError::Network(_) | TelegramError::MalformedResponse(_)
        )
    }
}

/// Identity of the bot behind the configured token, from `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotProfile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
}

impl BotProfile {
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .or(self.first_name.as_deref())
            .unwrap_or("unknown bot")
    }
}

/// Outcome of one `getUpdates` poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandPoll {
    /// At least one run command was seen in this batch.
    pub triggered: bool,
    /// Smallest update id not yet acknowledged, unchanged when the batch was
    /// unusable.
    pub next_offset: Option<i64>,
}

pub trait Notifier {
    /// Lightweight identity check against the channel. Never retried; a
    /// failure here is a configuration error.
    fn validate(&self) -> impl Future<Output = Result<BotProfile, TelegramError>> + Send;

    fn send_text(&self, text: &str) -> impl Future<Output = Result<(), TelegramError>> + Send;

    /// Sends `text` in order, split into channel-sized chunks.
    fn post_long_text(&self, text: &str)
        -> impl Future<Output = Result<(), TelegramError>> + Send;
}

pub trait CommandPoller {
    /// Literal token that triggers an on-demand pipeline run.
    const RUN_COMMAND: &'static str = "/go";

    /// Pulls pending updates since `offset`, blocking up to `timeout`.
    ///
    /// Every update id seen advances the returned offset, relevant or not,
    /// so irrelevant updates are never re-delivered.
    fn poll_commands(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> impl Future<Output = Result<CommandPoll, TelegramError>> + Send;
}
