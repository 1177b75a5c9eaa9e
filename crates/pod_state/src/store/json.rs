use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::store::{ServerState, StateError, StateStore};

/// File-backed [`StateStore`] holding a single JSON document.
///
/// The file is re-read on every `load` so the document on disk stays the
/// single source of truth across loop iterations and process restarts.
#[derive(Debug, Clone)]
pub struct JsonStateStore {
    path: PathBuf,
}

impl JsonStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for JsonStateStore {
    fn load(&self) -> ServerState {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return ServerState::default();
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(doc) => ServerState::from_document(doc),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    path = %self.path.display(),
                    "Malformed state file, starting from empty state"
                );
                ServerState::default()
            }
        }
    }

    fn save(&self, state: &ServerState) -> Result<(), StateError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // BTreeMap keys serialize in sorted order, keeping diffs stable.
        let doc = serde_json::to_string_pretty(state)?;
        std::fs::write(&self.path, doc)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}
