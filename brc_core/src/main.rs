/*============================================================
  Synavera Project: Brave Releases Checker
  Module: brc_core::main
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Entry point for the checker. Resolves the installed Brave
    Browser version, queries GitHub releases, compares versions
    and offers to download a newer asset.

  Security / Safety Notes:
    Operates within user privileges. Executes dpkg/rpm/wget
    commands and performs HTTPS GET requests only.

  Dependencies:
    clap for CLI parsing, chrono for session stamps, tokio for
    the runtime.

  Operational Scope:
    Invoked by operators or timers to check for new releases.

  Revision History:
    2026-10-17 COD  Authored checker runtime.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Result-first error handling with deterministic exits
    - Structured logging following Synavera cadence
    - Configurable execution via CLI and config file
============================================================*/

mod config;
mod distro;
mod download;
mod error;
mod github;
mod installed;
mod logger;
mod notifier;
mod package_info;
mod selector;
mod version;

use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{ArgAction, Parser};

use config::CheckerConfig;
use download::Downloader;
use error::{CheckerError, Result};
use github::ReleaseClient;
use installed::PackageFormat;
use logger::Logger;
use notifier::{notify, Outcome, TerminalPrompt};
use selector::{select, Arch, AssetSuffix, Channel, Criteria};

/// Command-line arguments for the checker.
#[derive(Debug, Parser)]
#[command(
    name = "brave-releases-checker",
    version,
    author = "Synavera Systems",
    about = "Check and download Brave Browser releases."
)]
struct Cli {
    /// Release channel to check.
    #[arg(long, value_enum)]
    channel: Option<Channel>,
    /// Asset file suffix to filter.
    #[arg(long, value_enum)]
    suffix: Option<AssetSuffix>,
    /// Architecture to filter.
    #[arg(long, value_enum)]
    arch: Option<Arch>,
    /// Page number of releases to fetch.
    #[arg(long, allow_negative_numbers = true)]
    page: Option<i64>,
    /// Override configuration file path.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Explicit log file path.
    #[arg(long, value_name = "PATH")]
    log: Option<PathBuf>,
    /// Enable verbose logging to stderr.
    #[arg(long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("[brave-releases-checker] Runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(run(Cli::parse()));
    // An interrupted prompt leaves a blocking stdin read behind.
    runtime.shutdown_background();

    match result {
        Ok(code) => code,
        Err(err) => {
            if err.is_skip() {
                println!("{err}.");
                println!("Skipping version check and download.");
            } else if !matches!(err, CheckerError::UserInterrupted) {
                eprintln!("[brave-releases-checker] {err}");
            }
            err.exit_code()
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let config = CheckerConfig::load_from_optional_path(cli.config.as_deref())?;

    let criteria = Criteria::new(
        cli.channel.unwrap_or(config.defaults.channel),
        cli.suffix.unwrap_or(config.defaults.suffix),
        cli.arch.unwrap_or(config.defaults.arch),
        cli.page.unwrap_or(config.defaults.page),
    )?;

    let logger = build_logger(&cli, &config)?;
    logger.info("INIT", "Brave Releases Checker starting.");
    match &config.source {
        Some(path) => logger.info("CONFIG", format!("Loaded {}", path.display())),
        None => logger.warn(
            "CONFIG",
            "The config file not found. Default settings will be used.",
        ),
    }

    let result = check(&config, &criteria, &logger).await;
    match &result {
        Ok(outcome) => logger.info("COMPLETE", format!("Run finished: {outcome:?}")),
        Err(err) if err.is_skip() => logger.warn("SKIP", err.to_string()),
        Err(err) => logger.error("ABORT", err.to_string()),
    }
    logger.finalize()?;

    result.map(|_| ExitCode::SUCCESS)
}

async fn check(config: &CheckerConfig, criteria: &Criteria, logger: &Logger) -> Result<Outcome> {
    let distribution = match &config.package.distribution {
        Some(forced) => forced.to_lowercase(),
        None => distro::detect(config.package.os_release.as_deref()),
    };
    logger.debug("DISTRO", format!("Host distribution id {distribution:?}"));
    let format = PackageFormat::from_distribution(&distribution)?;

    let installed = installed::resolve(
        format,
        &config.package.name,
        &config.package_path(),
        logger,
    )
    .await?;

    let client = ReleaseClient::new(&config.github)?;
    let releases = client.fetch(criteria.page).await?;
    logger.info(
        "RELEASES",
        format!("Fetched {} releases from page {}", releases.len(), criteria.page),
    );

    let assets = select(&releases, criteria);
    logger.debug(
        "ASSETS",
        serde_json::to_string(&assets).unwrap_or_else(|err| format!("<unserializable: {err}>")),
    );

    let downloader = Downloader::new(config.download.command.clone(), config.download_folder());
    notify(
        criteria,
        &installed.version,
        &assets,
        &config.github.download_base(),
        &downloader,
        &TerminalPrompt,
        logger,
    )
    .await
}

fn build_logger(cli: &Cli, config: &CheckerConfig) -> Result<Logger> {
    let path = match &cli.log {
        Some(path) => path.clone(),
        None if config.log.enabled => {
            let stamp = Utc::now().format("%Y-%m-%d_%H-%M-%S").to_string();
            config.log_dir().join(format!("check_{stamp}.log"))
        }
        None => return Ok(Logger::stderr_only(cli.verbose)),
    };
    Logger::new(path, cli.verbose)
}
