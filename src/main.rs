//! Tabsling - right-click link and selection opener
//!
//! Main entry point for the Tabsling CLI: trace replay, URL lexing and
//! settings inspection.

mod cli;
mod pages;
mod replay;

use clap::Parser;
use tracing::{info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use tabsling_config::{
    ConfigLoader, FileSettingsStore, HostConfig, LoggingConfig, MemorySettingsStore,
    SettingsStore, SettingsValidator, UrlSensitivity, ValidationResult,
};

use cli::{Cli, Commands};

fn init_tracing(logging: &LoggingConfig, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level))
    };

    let file_layer = match &logging.directory {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("tabsling")
                .filename_suffix("log")
                .max_log_files(30)
                .build(log_dir)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Flushes pending lines on drop; lives for the whole process.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        // Console goes to stderr; stdout carries command output
        .with(
            fmt::layer()
                .with_target(true)
                .with_ansi(true)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(())
}

fn report_validation(result: &ValidationResult) {
    for warning in &result.warnings {
        warn!("{}: {}", warning.path, warning.message);
    }
    for error in &result.errors {
        warn!("Invalid setting {}: {}", error.path, error.message);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // An explicit path must exist; the default location may not.
    let config = match &cli.config {
        Some(path) => ConfigLoader::load(path)?,
        None => ConfigLoader::load_or_default(&ConfigLoader::default_path())?,
    };

    init_tracing(&config.logging, cli.verbose)?;

    let validation = SettingsValidator::validate_host(&config);
    report_validation(&validation);
    if !validation.is_valid() {
        return Err(format!(
            "Configuration has {} invalid setting(s)",
            validation.errors.len()
        )
        .into());
    }

    match cli.command {
        Commands::Replay { trace } => run_replay(&config, &trace).await,
        Commands::Lex { text, sensitivity } => {
            run_lex(&text, sensitivity);
            Ok(())
        }
        Commands::Settings => show_settings(&config).await,
    }
}

async fn run_replay(
    config: &HostConfig,
    path: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let trace = replay::Trace::load(path)?;
    let report = replay::run(config, trace).await?;

    for tab in &report.opened {
        println!("{}", tab.url);
    }

    let suppressed = report
        .dispositions
        .iter()
        .filter(|(_, d)| *d == tabsling_detector::EventDisposition::Suppress)
        .count();
    info!(
        "Replay finished: {} opened, {} failed, {} menus suppressed",
        report.opened.len(),
        report.failed,
        suppressed
    );
    Ok(())
}

fn run_lex(text: &str, sensitivity: UrlSensitivity) {
    let single = tabsling_lexer::is_candidate_url(text, sensitivity);
    println!("candidate: {}", single);
    for url in tabsling_lexer::extract_candidates(text, sensitivity) {
        println!("{}", url);
    }
}

async fn show_settings(config: &HostConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store: Box<dyn SettingsStore> = match &config.settings_path {
        Some(path) => Box::new(FileSettingsStore::new(path.clone())),
        None => Box::new(MemorySettingsStore::new()),
    };

    let settings = match store.get(&config.settings).await {
        Ok(settings) => settings,
        Err(e) => {
            warn!("Failed to read stored settings, showing defaults: {}", e);
            config.settings.clone()
        }
    };
    report_validation(&SettingsValidator::validate(&settings));

    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
