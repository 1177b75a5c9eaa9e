use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use pod_pulse::audio::{AudioError, AudioFetcher};

#[derive(Clone)]
pub struct MockAudioFetcher {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl Default for MockAudioFetcher {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }
}

impl MockAudioFetcher {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl AudioFetcher for MockAudioFetcher {
    async fn download(&self, audio_url: &str, output_dir: &Path) -> Result<PathBuf, AudioError> {
        if let Some(ref msg) = self.fail_with {
            return Err(AudioError::Http(msg.clone()));
        }
        self.calls.lock().unwrap().push(audio_url.to_string());
        Ok(output_dir.join("latest_episode.mp3"))
    }
}
