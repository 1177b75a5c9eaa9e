use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use pod_state::JsonStateStore;

use pod_pulse::{
    audio::HttpAudioFetcher,
    feed::rss::RssFeedSource,
    openai::OpenAIClient,
    telegram::TelegramApi,
    tracing::init_tracing_subscriber,
    Pipeline, PipelineConfig, PipelineRunner, ServerBuilder, ServerConfig,
};

#[derive(Parser)]
#[command(name = "pod-pulse", about = "Podcast episode watcher and summarizer")]
struct Cli {
    /// Podcast name from the catalog or a direct RSS URL
    #[arg(long, env = "POD_PULSE_PODCAST")]
    podcast: String,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_key: String,

    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true)]
    bot_token: String,

    /// Telegram chat receiving summaries and run commands
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    chat_id: String,

    /// Directory for downloaded audio and summaries
    #[arg(long, default_value = "./output")]
    output_dir: PathBuf,

    /// Model used for audio transcription
    #[arg(long, default_value = "whisper-1")]
    transcription_model: String,

    /// Model used for chaptered summarization
    #[arg(long, default_value = "gpt-4o-mini")]
    llm_model: String,

    /// Spoken language of the episodes
    #[arg(long, default_value = "de")]
    language: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the pipeline once and exit
    Run,
    /// Start the polling server
    Serve {
        /// Feed-check interval in minutes
        #[arg(long, env = "POD_PULSE_INTERVAL_MINUTES", default_value = "30")]
        interval_minutes: u64,

        /// Sleep between command polls, in seconds
        #[arg(long, default_value = "5")]
        poll_interval_seconds: u64,

        /// Bounded wait of a single command poll, in seconds
        #[arg(long, default_value = "5")]
        poll_timeout_seconds: u64,

        /// Path of the state file tracking processed episodes
        #[arg(long, env = "POD_PULSE_STATE_FILE", default_value = ".pod_pulse_state.json")]
        state_file: PathBuf,

        /// Skip the startup notification message
        #[arg(long)]
        no_startup_notify: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let openai = OpenAIClient::new(&cli.openai_key);
    let telegram = TelegramApi::new(&cli.bot_token, &cli.chat_id);

    let pipeline = Pipeline::new(
        RssFeedSource::default(),
        HttpAudioFetcher::default(),
        openai.clone(),
        openai,
        telegram.clone(),
        PipelineConfig {
            output_dir: cli.output_dir,
            transcription_model: cli.transcription_model,
            llm_model: cli.llm_model,
            language: cli.language,
        },
    );

    match cli.command {
        Command::Run => {
            tracing::info!(podcast = %cli.podcast, "Running pipeline once...");
            let output = pipeline.run(&cli.podcast).await?;
            tracing::info!(
                audio = %output.audio_path.display(),
                summary = %output.summary_path.display(),
                "Pipeline finished"
            );
        }
        Command::Serve {
            interval_minutes,
            poll_interval_seconds,
            poll_timeout_seconds,
            state_file,
            no_startup_notify,
        } => {
            let config = ServerConfig {
                podcast: cli.podcast,
                feed_interval: Duration::from_secs(interval_minutes * 60),
                poll_interval: Duration::from_secs(poll_interval_seconds),
                poll_timeout: Duration::from_secs(poll_timeout_seconds),
                notify_startup: !no_startup_notify,
                ..Default::default()
            };

            let server = ServerBuilder::new(config)
                .feed_source(RssFeedSource::default())
                .runner(pipeline)
                .poller(telegram.clone())
                .notifier(telegram)
                .store(JsonStateStore::new(state_file))
                .build();

            tokio::select! {
                result = server.run() => result?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupt received, shutting down");
                }
            }
        }
    }

    Ok(())
}
