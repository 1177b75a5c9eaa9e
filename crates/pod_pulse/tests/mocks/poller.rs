use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use pod_pulse::telegram::{CommandPoll, CommandPoller, TelegramError};

#[derive(Clone)]
pub struct MockPoller {
    pub polls: Arc<Mutex<Vec<Option<i64>>>>,
    pub result: CommandPoll,
    pub fail_with: Option<String>,
}

impl MockPoller {
    pub fn quiet() -> Self {
        Self::returning(CommandPoll {
            triggered: false,
            next_offset: None,
        })
    }

    pub fn returning(result: CommandPoll) -> Self {
        Self {
            polls: Arc::new(Mutex::new(Vec::new())),
            result,
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::quiet()
        }
    }
}

impl CommandPoller for MockPoller {
    async fn poll_commands(
        &self,
        offset: Option<i64>,
        _timeout: Duration,
    ) -> Result<CommandPoll, TelegramError> {
        self.polls.lock().unwrap().push(offset);
        if let Some(ref msg) = self.fail_with {
            return Err(TelegramError::Network(msg.clone()));
        }
        Ok(self.result)
    }
}
