//! nfl-notifier CLI entry point.
//!
//! One invocation performs one batch pass: fetch the ran.de schedule page,
//! extract the games and create one calendar event per game. With
//! `--dry-run` the extracted schedule is printed instead of published.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use nfl_notifier_core::{
    GoogleCalendarPublisher, NflNotifier, NotifierConfig, Result, RunSummary, TokenStore,
};

#[derive(Debug, Parser)]
#[command(name = "nfl-notifier", about = "Create calendar events for NFL broadcasts listed on ran.de")]
struct Cli {
    /// Path to the configuration file (default: ./config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the extracted schedule instead of creating events
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&cli, &config) {
        eprintln!("error: failed to open log file: {}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli, &config).await {
        Ok(summary) if summary.is_success() => ExitCode::SUCCESS,
        Ok(summary) => {
            eprintln!(
                "error: {} of {} events could not be created",
                summary.publish_failures, summary.games_found
            );
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<NotifierConfig> {
    match &cli.config {
        Some(path) => NotifierConfig::load_from(path),
        None => NotifierConfig::load(),
    }
}

/// Initialize the tracing subscriber.
///
/// Dry runs log to stderr; real runs append to the configured log file so
/// scheduled invocations leave a record.
fn init_tracing(cli: &Cli, config: &NotifierConfig) -> std::io::Result<()> {
    let filter = if cli.debug {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()))
    };

    if cli.dry_run {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    } else {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.logging_path())?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }

    Ok(())
}

async fn run(cli: &Cli, config: &NotifierConfig) -> Result<RunSummary> {
    let notifier = NflNotifier::new(config)?;

    if cli.dry_run {
        let schedule = notifier.fetch_schedule().await?;
        print_schedule(&schedule);
        return Ok(RunSummary {
            games_found: schedule.games.len(),
            ..Default::default()
        });
    }

    let token_store = TokenStore::new(config.google.token_file());
    let access_token = token_store
        .access_token(
            config.google.resolve_client_id()?,
            config.google.resolve_client_secret()?,
        )
        .await?;

    let publisher = GoogleCalendarPublisher::new(access_token, config.calendar_id.clone());
    notifier.run(&publisher).await
}

fn print_schedule(schedule: &nfl_notifier_core::BroadcastSchedule) {
    println!(
        "Saison {} / {} ({})",
        schedule.season.as_deref().unwrap_or("?"),
        schedule.gameday.as_deref().unwrap_or("?"),
        schedule.date.as_deref().unwrap_or("?")
    );
    for game in &schedule.games {
        println!(
            "  {}  {}  [{}] {}",
            game.kickoff, game.title, game.broadcaster, game.url
        );
    }
}
