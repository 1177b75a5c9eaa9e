use std::time::Duration;

use serde_json::Value;

use crate::telegram::{
    transport::HttpTransport, BotProfile, CommandPoll, CommandPoller, Notifier, TelegramError,
    TelegramTransport,
};

#[derive(Debug, Clone)]
pub struct TelegramApi<T: TelegramTransport> {
    transport: T,
    chat_id: String,
    retry_cooldown: Duration,
}

impl TelegramApi<HttpTransport> {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self::with_transport(HttpTransport::new(bot_token), chat_id)
    }
}

impl<T: TelegramTransport> TelegramApi<T> {
    /// Total delivery attempts per message, including the first one.
    const MAX_SEND_ATTEMPTS: u32 = 3;
    /// Upper bound for a single message payload, safely below Telegram's
    /// 4096-character limit.
    const MAX_MESSAGE_LEN: usize = 3900;

    const CALL_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn with_transport(transport: T, chat_id: impl Into<String>) -> Self {
        Self {
            transport,
            chat_id: chat_id.into().trim().to_string(),
            retry_cooldown: Duration::from_secs(2),
        }
    }

    pub fn with_retry_cooldown(mut self, cooldown: Duration) -> Self {
        self.retry_cooldown = cooldown;
        self
    }
}

impl<T: TelegramTransport + Send + Sync> Notifier for TelegramApi<T> {
    async fn validate(&self) -> Result<BotProfile, TelegramError> {
        let result = self
            .transport
            .call("getMe", &serde_json::json!({}), Self::CALL_TIMEOUT)
            .await?;
        serde_json::from_value(result).map_err(|e| TelegramError::MalformedResponse(e.to_string()))
    }

    async fn send_text(&self, text: &str) -> Result<(), TelegramError> {
        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "disable_web_page_preview": true,
        });

        let mut attempt = 1;
        loop {
            match self
                .transport
                .call("sendMessage", &payload, Self::CALL_TIMEOUT)
                .await
            {
                Ok(_) => return Ok(()),
                Err(e) if e.is_transient() && attempt < Self::MAX_SEND_ATTEMPTS => {
                    tracing::warn!(error = %e, attempt, "Transient Telegram failure, retrying");
                    tokio::time::sleep(self.retry_cooldown * attempt).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(error = %e, attempt, "Failed to send Telegram message");
                    return Err(e);
                }
            }
        }
    }

    async fn post_long_text(&self, text: &str) -> Result<(), TelegramError> {
        for chunk in chunk_text(text, Self::MAX_MESSAGE_LEN)? {
            self.send_text(&chunk).await?;
        }
        Ok(())
    }
}

impl<T: TelegramTransport + Send + Sync> CommandPoller for TelegramApi<T> {
    #[tracing::instrument(skip(self))]
    async fn poll_commands(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<CommandPoll, TelegramError> {
        let mut payload = serde_json::json!({
            "timeout": timeout.as_secs(),
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            payload["offset"] = offset.into();
        }

        // The API may block for the full poll timeout before answering.
        let result = self
            .transport
            .call("getUpdates", &payload, timeout + Duration::from_secs(10))
            .await?;

        let Some(updates) = result.as_array() else {
            return Ok(CommandPoll {
                triggered: false,
                next_offset: offset,
            });
        };

        let mut triggered = false;
        let mut next_offset = offset;

        for update in updates {
            let Some(update_id) = update.get("update_id").and_then(Value::as_i64) else {
                continue;
            };
            // Acknowledge every update seen, relevant or not.
            next_offset = Some(update_id + 1);

            let Some(message) = update.get("message") else {
                continue;
            };
            let chat_id = message
                .pointer("/chat/id")
                .and_then(Value::as_i64)
                .map(|id| id.to_string())
                .unwrap_or_default();
            if chat_id != self.chat_id {
                continue;
            }

            let text = message.get("text").and_then(Value::as_str).unwrap_or("");
            if text.trim().to_lowercase().starts_with(Self::RUN_COMMAND) {
                triggered = true;
            }
        }

        Ok(CommandPoll {
            triggered,
            next_offset,
        })
    }
}

/// Splits `text` into chunks of at most `max_len` bytes, preferring to break
/// at a blank line and falling back to a hard cut.
fn chunk_text(text: &str, max_len: usize) -> Result<Vec<String>, TelegramError> {
    let content = text.trim();
    if content.is_empty() {
        return Err(TelegramError::EmptyMessage);
    }

    let mut chunks = Vec::new();
    let mut remaining = content;
    while remaining.len() > max_len {
        let mut window = max_len;
        while !remaining.is_char_boundary(window) {
            window -= 1;
        }
        let split_at = match remaining[..window].rfind("\n\n") {
            Some(at) if at > 0 => at,
            _ => window,
        };

        let chunk = remaining[..split_at].trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }
        remaining = remaining[split_at..].trim_start();
    }
    if !remaining.is_empty() {
        chunks.push(remaining.to_string());
    }

    Ok(chunks)
}
