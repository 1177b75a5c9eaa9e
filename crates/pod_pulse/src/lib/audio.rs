//! Episode audio retrieval over HTTP.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use futures::StreamExt;
use regex::Regex;
use tokio::io::AsyncWriteExt;

const DEFAULT_BASENAME: &str = "latest_episode";

static AUDIO_EXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(mp3|m4a|aac|wav|ogg|flac)$").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("Failed to download audio: {0}")]
    Http(String),
    #[error("Audio host answered with status {0}")]
    Status(u16),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub trait AudioFetcher {
    fn download(
        &self,
        audio_url: &str,
        output_dir: &Path,
    ) -> impl Future<Output = Result<PathBuf, AudioError>> + Send;
}

/// Streams the enclosure into `<output_dir>/latest_episode.<ext>`.
#[derive(Debug, Clone)]
pub struct HttpAudioFetcher {
    client: reqwest::Client,
}

impl Default for HttpAudioFetcher {
    fn default() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl AudioFetcher for HttpAudioFetcher {
    #[tracing::instrument(skip(self))]
    async fn download(&self, audio_url: &str, output_dir: &Path) -> Result<PathBuf, AudioError> {
        tokio::fs::create_dir_all(output_dir).await?;
        let target = output_dir.join(format!("{DEFAULT_BASENAME}{}", guess_extension(audio_url)));

        let resp = self
            .client
            .get(audio_url)
            .send()
            .await
            .map_err(|e| AudioError::Http(e.without_url().to_string()))?;
        if !resp.status().is_success() {
            return Err(AudioError::Status(resp.status().as_u16()));
        }

        let mut file = tokio::fs::File::create(&target).await?;
        let mut stream = resp.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| AudioError::Http(e.without_url().to_string()))?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        tracing::info!(path = %target.display(), "Downloaded episode audio");
        Ok(target)
    }
}

fn guess_extension(audio_url: &str) -> String {
    let path = reqwest::Url::parse(audio_url)
        .map(|url| url.path().to_lowercase())
        .unwrap_or_default();

    AUDIO_EXT_RE
        .captures(&path)
        .map(|captures| format!(".{}", &captures[1]))
        .unwrap_or_else(|| ".audio".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_known_audio_extensions() {
        assert_eq!(guess_extension("https://cdn.example.com/ep1.mp3"), ".mp3");
        assert_eq!(
            guess_extension("https://cdn.example.com/show/ep1.M4A?token=x"),
            ".m4a"
        );
    }

    #[test]
    fn falls_back_to_generic_extension() {
        assert_eq!(guess_extension("https://cdn.example.com/stream"), ".audio");
        assert_eq!(guess_extension("not a url"), ".audio");
    }
}
