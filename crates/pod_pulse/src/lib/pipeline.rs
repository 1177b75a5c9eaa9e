use std::future::Future;
use std::path::PathBuf;

use anyhow::Context;

use crate::{
    audio::AudioFetcher,
    feed::FeedSource,
    telegram::Notifier,
    Summarizer, Transcriber,
};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub output_dir: PathBuf,
    pub transcription_model: String,
    pub llm_model: String,
    pub language: String,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub audio_path: PathBuf,
    pub summary_path: PathBuf,
}

/// One full resolve-download-transcribe-summarize-deliver run.
///
/// Not idempotent with respect to delivery: running it twice for the same
/// episode notifies the chat twice. Callers are responsible for deduplication
/// via the episode state store.
pub trait PipelineRunner {
    fn run(&self, podcast: &str) -> impl Future<Output = anyhow::Result<PipelineOutput>> + Send;
}

// The fixed pipeline over the concrete collaborators. Failures propagate from
// the first failing stage; retries belong to the individual collaborators.
#[derive(Debug)]
pub struct Pipeline<F, A, T, S, N>
where
    F: FeedSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    feed: F,
    audio: A,
    transcriber: T,
    summarizer: S,
    notifier: N,
    config: PipelineConfig,
}

impl<F, A, T, S, N> Pipeline<F, A, T, S, N>
where
    F: FeedSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    pub fn new(
        feed: F,
        audio: A,
        transcriber: T,
        summarizer: S,
        notifier: N,
        config: PipelineConfig,
    ) -> Self {
        Pipeline {
            feed,
            audio,
            transcriber,
            summarizer,
            notifier,
            config,
        }
    }
}

impl<F, A, T, S, N> PipelineRunner for Pipeline<F, A, T, S, N>
where
    F: FeedSource + Send + Sync + 'static,
    A: AudioFetcher + Send + Sync + 'static,
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    #[tracing::instrument(skip(self))]
    async fn run(&self, podcast: &str) -> anyhow::Result<PipelineOutput> {
        let feed_url = self.feed.resolve(podcast)?;
        let episode = self.feed.fetch_latest(&feed_url).await?;
        tracing::info!(title = %episode.title, "Processing episode");

        let audio_path = self
            .audio
            .download(&episode.audio_url, &self.config.output_dir)
            .await?;

        let transcript = self
            .transcriber
            .transcribe(
                &audio_path,
                &self.config.transcription_model,
                &self.config.language,
            )
            .await
            .map_err(|e| anyhow::anyhow!("Failed to transcribe audio: {e:?}"))?;

        let summary = self
            .summarizer
            .summarize(&transcript, &self.config.llm_model)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to summarize transcript: {e:?}"))?;

        let summary_path = self.config.output_dir.join("summary.md");
        tokio::fs::write(&summary_path, &summary)
            .await
            .context("Failed to write summary document")?;

        self.notifier
            .post_long_text(&format!("{}\n\n{}", episode.title, summary))
            .await
            .context("Failed to deliver summary")?;

        Ok(PipelineOutput {
            audio_path,
            summary_path,
        })
    }
}
