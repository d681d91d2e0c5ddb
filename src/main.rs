use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use callsense::provider::API_KEY_ENV;
use callsense::stages::DEFAULT_AGENT_LABEL;
use callsense::{
    execute_stage4, process_call, AssemblyAiClient, LexiconScorer, PipelineConfig, PollConfig,
    PreconditionConfig, ProviderConfig, TokioClock, TranscriptionOptions,
};

#[derive(Parser)]
#[command(name = "callsense")]
#[command(author, version, about = "Customer-service call transcription and agent sentiment analysis", long_about = None)]
struct Cli {
    /// Recorded call to process
    audio: PathBuf,

    /// Where to write the speaker-attributed transcript
    transcript: PathBuf,

    /// Where to write the agent sentiment analysis
    analysis: PathBuf,

    /// Speaker label of the service agent
    #[arg(long, default_value = DEFAULT_AGENT_LABEL)]
    agent_label: String,

    /// Language code requested from the provider
    #[arg(long, default_value = "pt")]
    language: String,

    /// Give up waiting for the transcription after this many seconds
    #[arg(long, default_value = "3600")]
    timeout_secs: u64,

    /// Seconds between status checks
    #[arg(long, default_value = "10")]
    interval_secs: u64,

    /// Seconds of silence appended to the recording before upload
    #[arg(long, default_value = "120")]
    silence_secs: u64,

    /// Consecutive transient network failures tolerated while polling
    #[arg(long, default_value = "3")]
    max_transient_errors: u32,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    if !cli.audio.is_file() {
        println!("Audio file not found: {}", cli.audio.display());
        return ExitCode::from(1);
    }

    println!("Starting processing...");

    // Processing failures are reported but still exit 0
    match run(&cli).await {
        Ok(()) => {
            println!("Processing complete. Transcript saved to: {}", cli.transcript.display());
            println!("Sentiment analysis saved to: {}", cli.analysis.display());
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            println!("Error during processing: {:#}", e);
        }
    }

    ExitCode::SUCCESS
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

async fn run(cli: &Cli) -> Result<()> {
    let mut provider_config = ProviderConfig::from_env();
    provider_config.language_code = cli.language.clone();
    info!("Using transcription endpoint {}", provider_config.base_url);
    if provider_config.uses_placeholder_key() {
        println!("Warning: no API key configured; set {}", API_KEY_ENV);
    }

    let config = PipelineConfig {
        precondition: PreconditionConfig {
            trailing_silence: Duration::from_secs(cli.silence_secs),
            ..Default::default()
        },
        poll: PollConfig {
            timeout: Duration::from_secs(cli.timeout_secs),
            interval: Duration::from_secs(cli.interval_secs),
            max_transient_errors: cli.max_transient_errors,
        },
        options: TranscriptionOptions::diarized(provider_config.language_code.clone()),
        agent_label: cli.agent_label.clone(),
    };

    let client =
        AssemblyAiClient::new(provider_config).context("Failed to build HTTP client")?;
    let clock = TokioClock::new();
    let scorer = LexiconScorer::new();

    let result = process_call(&client, &clock, &scorer, &cli.audio, &config)
        .await
        .with_context(|| format!("Failed to process {}", cli.audio.display()))?;

    execute_stage4(&result, &cli.transcript, &cli.analysis).context("Failed to write reports")?;

    info!("Job {} done", result.job_id);
    Ok(())
}
