use std::time::Duration;

use anyhow::Context;
use pod_state::StateStore;
use tokio::time::Instant;

use crate::{
    feed::FeedSource,
    telegram::{CommandPoller, Notifier},
    PipelineRunner,
};

pub mod builder;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Catalog name or direct feed URL of the watched podcast.
    pub podcast: String,
    /// How often the feed is checked for a new episode.
    pub feed_interval: Duration,
    /// Sleep between loop iterations.
    pub poll_interval: Duration,
    /// Bounded wait passed to the command poll.
    pub poll_timeout: Duration,
    /// Pause after a failed iteration before the loop continues.
    pub error_cooldown: Duration,
    pub notify_startup: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            podcast: String::new(),
            feed_interval: Duration::from_secs(30 * 60),
            poll_interval: Duration::from_secs(5),
            poll_timeout: Duration::from_secs(5),
            error_cooldown: Duration::from_secs(30),
            notify_startup: true,
        }
    }
}

impl ServerConfig {
    fn validate(&self) -> anyhow::Result<()> {
        if self.feed_interval.is_zero() {
            anyhow::bail!("Feed-check interval must be greater than zero");
        }
        if self.poll_timeout.is_zero() {
            anyhow::bail!("Command-poll timeout must be greater than zero");
        }
        if self.poll_interval.is_zero() {
            anyhow::bail!("Command-poll interval must be greater than zero");
        }
        Ok(())
    }
}

/// The polling server: one task interleaving frequent command polls with the
/// much less frequent feed check.
///
/// Each iteration is isolated; a failing dependency degrades to "nothing
/// happened this cycle" instead of terminating the process. The feed-check
/// deadline is kept in memory only, so a restarted server checks the feed
/// right away.
#[derive(Debug)]
pub struct Server<F, R, P, N, S>
where
    F: FeedSource + Send + Sync + 'static,
    R: PipelineRunner + Send + Sync + 'static,
    P: CommandPoller + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    S: StateStore + Send + Sync + 'static,
{
    config: ServerConfig,
    feed: F,
    runner: R,
    poller: P,
    notifier: N,
    store: S,
    next_feed_check: Option<Instant>,
}

impl<F, R, P, N, S> Server<F, R, P, N, S>
where
    F: FeedSource + Send + Sync + 'static,
    R: PipelineRunner + Send + Sync + 'static,
    P: CommandPoller + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    S: StateStore + Send + Sync + 'static,
{
    /// Validates configuration and chat credentials, then optionally sends
    /// the one-time "ready" notice. Any failure here aborts startup.
    pub async fn startup(&self) -> anyhow::Result<()> {
        self.config.validate()?;

        let profile = self
            .notifier
            .validate()
            .await
            .context("Telegram credential validation failed")?;
        tracing::info!(
            bot = %profile.display_name(),
            podcast = %self.config.podcast,
            "Validated chat credentials"
        );

        if self.config.notify_startup {
            self.notifier
                .send_text(&self.ready_message())
                .await
                .context("Failed to send startup notification")?;
        }

        Ok(())
    }

    pub async fn run(mut self) -> anyhow::Result<()> {
        self.startup().await?;
        tracing::info!(
            interval = ?self.config.feed_interval,
            poll_interval = ?self.config.poll_interval,
            "Server started"
        );

        loop {
            if let Err(e) = self.tick().await {
                tracing::error!(error = ?e, "Server iteration failed");
                tokio::time::sleep(self.config.error_cooldown).await;
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    /// One loop iteration: poll commands, run the feed check when due,
    /// persist the command cursor.
    pub async fn tick(&mut self) -> anyhow::Result<()> {
        let offset = self.store.load().telegram_update_offset;

        let poll = self
            .poller
            .poll_commands(offset, self.config.poll_timeout)
            .await
            .context("Command poll failed")?;

        if poll.triggered {
            tracing::info!("Run command received, invoking pipeline");
            let output = self
                .runner
                .run(&self.config.podcast)
                .await
                .context("Command-triggered pipeline run failed")?;
            tracing::info!(
                audio = %output.audio_path.display(),
                summary = %output.summary_path.display(),
                "On-demand pipeline run finished"
            );
        }

        if self.feed_check_due() {
            let checked = self.check_feed_once().await;
            // Reschedule even when the check failed; a flaky feed host must
            // not turn the feed cadence into the poll cadence.
            self.next_feed_check = Some(Instant::now() + self.config.feed_interval);
            if checked? {
                tracing::info!("Pipeline completed for new episode");
            }
        }

        if let Some(next) = poll.next_offset {
            if Some(next) != offset {
                self.persist_offset(next)?;
            }
        }

        Ok(())
    }

    fn feed_check_due(&self) -> bool {
        self.next_feed_check
            .map_or(true, |deadline| Instant::now() >= deadline)
    }

    /// Fetches the newest episode and runs the pipeline unless the episode is
    /// already recorded as processed. The state file is only written after a
    /// successful run.
    async fn check_feed_once(&self) -> anyhow::Result<bool> {
        let feed_url = self.feed.resolve(&self.config.podcast)?;
        let latest = self.feed.fetch_latest(&feed_url).await?;

        if self.store.load().has_processed(&feed_url, &latest.identifier) {
            tracing::debug!(title = %latest.title, "No new episode yet");
            return Ok(false);
        }

        tracing::info!(title = %latest.title, "New episode detected");
        self.runner
            .run(&self.config.podcast)
            .await
            .context("Pipeline failed for new episode")?;

        let mut state = self.store.load();
        state.mark_processed(&feed_url, &latest.identifier);
        self.store
            .save(&state)
            .context("Failed to record processed episode")?;

        Ok(true)
    }

    /// Persists an advanced command cursor. The stored offset never
    /// regresses, even if a later poll reported a smaller batch.
    fn persist_offset(&self, next: i64) -> anyhow::Result<()> {
        let mut state = self.store.load();
        if state
            .telegram_update_offset
            .is_some_and(|current| next <= current)
        {
            return Ok(());
        }

        state.telegram_update_offset = Some(next);
        self.store
            .save(&state)
            .context("Failed to persist update cursor")?;
        Ok(())
    }

    fn ready_message(&self) -> String {
        format!(
            "pod-pulse is ready and setup.\nWatching podcast: {}\nPolling interval: {} minutes",
            self.config.podcast,
            self.config.feed_interval.as_secs() / 60
        )
    }
}
