use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
    time::Duration,
};

use pod_pulse::telegram::{TelegramError, TelegramTransport};
use serde_json::Value;

/// Scripted transport: answers calls from a queue, then `Ok(null)`.
#[derive(Clone)]
pub struct MockTransport {
    pub calls: Arc<Mutex<Vec<(String, Value)>>>,
    responses: Arc<Mutex<VecDeque<Result<Value, TelegramError>>>>,
}

impl MockTransport {
    pub fn new(responses: Vec<Result<Value, TelegramError>>) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            responses: Arc::new(Mutex::new(responses.into_iter().collect())),
        }
    }

    pub fn always_ok() -> Self {
        Self::new(Vec::new())
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(method, _)| method == "sendMessage")
            .filter_map(|(_, payload)| {
                payload
                    .get("text")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .collect()
    }
}

impl TelegramTransport for MockTransport {
    async fn call(
        &self,
        method: &str,
        payload: &Value,
        _timeout: Duration,
    ) -> Result<Value, TelegramError> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), payload.clone()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}
