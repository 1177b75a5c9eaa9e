use std::sync::{Arc, Mutex};

use pod_state::{ServerState, StateError, StateStore};

#[derive(Clone)]
pub struct MemoryStateStore {
    pub state: Arc<Mutex<ServerState>>,
    pub saves: Arc<Mutex<Vec<ServerState>>>,
    pub fail_with: Option<String>,
}

impl Default for MemoryStateStore {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(ServerState::default())),
            saves: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }
}

impl MemoryStateStore {
    pub fn with_state(state: ServerState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            ..Default::default()
        }
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> ServerState {
        self.state.lock().unwrap().clone()
    }

    fn save(&self, state: &ServerState) -> Result<(), StateError> {
        if let Some(ref msg) = self.fail_with {
            return Err(StateError::Io(std::io::Error::other(msg.clone())));
        }
        *self.state.lock().unwrap() = state.clone();
        self.saves.lock().unwrap().push(state.clone());
        Ok(())
    }
}
