use std::sync::{Arc, Mutex};

use pod_pulse::telegram::{BotProfile, Notifier, TelegramError};

#[derive(Clone)]
pub struct MockNotifier {
    pub sent: Arc<Mutex<Vec<String>>>,
    pub validations: Arc<Mutex<usize>>,
    pub fail_with: Option<String>,
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            validations: Arc::new(Mutex::new(0)),
            fail_with: None,
        }
    }
}

impl MockNotifier {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl Notifier for MockNotifier {
    async fn validate(&self) -> Result<BotProfile, TelegramError> {
        *self.validations.lock().unwrap() += 1;
        if let Some(ref msg) = self.fail_with {
            return Err(TelegramError::Rejected {
                method: "getMe".to_string(),
                description: msg.clone(),
            });
        }
        Ok(BotProfile {
            first_name: Some("Mock Bot".to_string()),
            username: Some("mock_bot".to_string()),
        })
    }

    async fn send_text(&self, text: &str) -> Result<(), TelegramError> {
        if let Some(ref msg) = self.fail_with {
            return Err(TelegramError::Network(msg.clone()));
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }

    async fn post_long_text(&self, text: &str) -> Result<(), TelegramError> {
        self.send_text(text).await
    }
}
