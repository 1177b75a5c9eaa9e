use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;

use crate::telegram::TelegramError;

/// One JSON call against the bot API.
///
/// Network-level failures and unreadable bodies map to transient error
/// variants; an explicit `ok: false` envelope maps to a rejection. Error
/// text never contains the request URL, which embeds the bot token.
pub trait TelegramTransport {
    fn call(
        &self,
        method: &str,
        payload: &Value,
        timeout: Duration,
    ) -> impl Future<Output = Result<Value, TelegramError>> + Send;
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    result: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    bot_token: String,
}

impl HttpTransport {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "https://api.telegram.org".to_string(),
            bot_token: bot_token.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl TelegramTransport for HttpTransport {
    async fn call(
        &self,
        method: &str,
        payload: &Value,
        timeout: Duration,
    ) -> Result<Value, TelegramError> {
        let url = format!("{}/bot{}/{}", self.base_url, self.bot_token, method);

        let resp = self
            .client
            .post(url)
            .json(payload)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| TelegramError::Network(e.without_url().to_string()))?;

        let status = resp.status();
        let envelope: ApiEnvelope = match resp.json().await {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(TelegramError::Network(format!("HTTP {status}")));
            }
            Err(e) => {
                return Err(TelegramError::MalformedResponse(
                    e.without_url().to_string(),
                ));
            }
        };

        if !envelope.ok {
            return Err(TelegramError::Rejected {
                method: method.to_string(),
                description: envelope
                    .description
                    .unwrap_or_else(|| "Unknown Telegram API error".to_string()),
            });
        }

        Ok(envelope.result.unwrap_or(Value::Null))
    }
}
