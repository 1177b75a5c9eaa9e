use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use pod_pulse::{PipelineOutput, PipelineRunner};

#[derive(Clone)]
pub struct MockRunner {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl Default for MockRunner {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }
}

impl MockRunner {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl PipelineRunner for MockRunner {
    async fn run(&self, podcast: &str) -> anyhow::Result<PipelineOutput> {
        self.calls.lock().unwrap().push(podcast.to_string());
        if let Some(ref msg) = self.fail_with {
            anyhow::bail!("{}", msg);
        }
        Ok(PipelineOutput {
            audio_path: PathBuf::from("/tmp/mock/latest_episode.mp3"),
            summary_path: PathBuf::from("/tmp/mock/summary.md"),
        })
    }
}
