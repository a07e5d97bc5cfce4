/*============================================================
  Synavera Project: Brave Releases Checker
  Module: brc_core::notifier
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Report the comparison between installed and upstream
    versions, ask the operator whether to download and delegate
    the transfer on confirmation.

  Security / Safety Notes:
    Reads a single answer line from the controlling terminal;
    no input is interpreted beyond `y`.

  Dependencies:
    colored for terminal emphasis, tokio for the interruptible
    prompt.

  Operational Scope:
    Final stage of a check run.

  Revision History:
    2026-10-17 COD  Authored report and confirmation flow.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Interrupt or end-of-input during the prompt is a decline
    - Every branch ends with an explicit outcome
============================================================*/

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use colored::Colorize;

use crate::download::{download_url, Downloader};
use crate::error::{CheckerError, Result};
use crate::logger::Logger;
use crate::package_info::ReleaseAsset;
use crate::selector::Criteria;
use crate::version::{is_newer, pick_latest, Version};

const RULE_WIDTH: usize = 50;

/// Operator answer to the download prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Only `y` (any case) confirms.
    pub fn from_line(line: &str) -> Self {
        if line.trim().eq_ignore_ascii_case("y") {
            Answer::Yes
        } else {
            Answer::No
        }
    }
}

/// How a check run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NothingFound,
    UpToDate,
    Skipped,
    Downloaded(PathBuf),
}

/// Source of the operator's confirmation.
pub trait Prompt {
    /// Ask `question`; end-of-input or interrupt yields `UserInterrupted`.
    fn ask(&self, question: &str) -> impl std::future::Future<Output = Result<Answer>>;
}

/// Prompt reading from stdin, abandoned on Ctrl-C.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    async fn ask(&self, question: &str) -> Result<Answer> {
        print!("{question}");
        io::stdout().flush()?;

        let reader = tokio::task::spawn_blocking(|| read_answer(&mut io::stdin().lock()));
        tokio::select! {
            joined = reader => joined
                .map_err(|err| CheckerError::Runtime(format!("Prompt task failed: {err}")))?,
            Ok(()) = tokio::signal::ctrl_c() => Err(CheckerError::UserInterrupted),
        }
    }
}

/// Read one answer line; end-of-input counts as an interruption.
pub fn read_answer<R: BufRead>(reader: &mut R) -> Result<Answer> {
    let mut line = String::new();
    let read = reader.read_line(&mut line)?;
    if read == 0 {
        return Err(CheckerError::UserInterrupted);
    }
    Ok(Answer::from_line(&line))
}

/// Report banner with the active criteria.
pub fn render_header(criteria: &Criteria) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    out.push_str(&format!("{}\n", "Brave Releases Checker".bold()));
    out.push_str(&format!("{} {}\n", "Channel:".bold(), criteria.channel.label()));
    out.push_str(&format!("{} {}\n", "Architecture:".bold(), criteria.arch));
    out.push_str(&format!("{} {}\n", "File Suffix:".bold(), criteria.suffix));
    out.push_str(&format!("{} {}\n", "Checking Page:".bold(), criteria.page));
    out.push_str(&"-".repeat(RULE_WIDTH));
    out
}

/// Body shown when no asset matched the criteria.
pub fn render_not_found(criteria: &Criteria) -> String {
    format!(
        "{}\n\n{}\n",
        format!(
            "No {} {} files for {} were found on this page.",
            criteria.channel.label(),
            criteria.suffix,
            criteria.arch
        )
        .bold(),
        "=".repeat(RULE_WIDTH)
    )
}

/// Installed versus latest block.
pub fn render_comparison(installed: &Version, latest: &ReleaseAsset) -> String {
    format!(
        "{} v{}\n{} v{} ({})\n{}",
        "Installed Version:".bold(),
        installed,
        "Latest Version Available:".bold(),
        latest.version,
        latest.asset_name,
        "=".repeat(RULE_WIDTH)
    )
}

/// Report the result and run the optional download branch.
pub async fn notify<P: Prompt>(
    criteria: &Criteria,
    installed: &Version,
    assets: &[ReleaseAsset],
    download_base: &str,
    downloader: &Downloader,
    prompt: &P,
    logger: &Logger,
) -> Result<Outcome> {
    println!("{}", render_header(criteria));

    let Some(latest) = pick_latest(assets) else {
        println!("{}", render_not_found(criteria));
        logger.info(
            "RESULT",
            format!(
                "No {} {} assets for {} on page {}",
                criteria.channel, criteria.suffix, criteria.arch, criteria.page
            ),
        );
        return Ok(Outcome::NothingFound);
    };

    println!("{}", render_comparison(installed, latest));
    let latest_version = latest.parsed_version();

    if !is_newer(&latest_version, installed) {
        println!(
            "\n{} (v{} is the latest {} version)",
            "Your Brave Browser is up to date!".green(),
            installed,
            criteria.channel
        );
        println!("{}\n", "=".repeat(RULE_WIDTH));
        logger.info("RESULT", format!("Up to date at {installed}"));
        return Ok(Outcome::UpToDate);
    }

    println!(
        "\n{}",
        format!("A newer version is available: v{latest_version}")
            .green()
            .bold()
    );
    logger.info(
        "RESULT",
        format!("Update available: {installed} -> {latest_version}"),
    );

    let question = format!(
        "\nDo you want to download it? [{}/{}] ",
        "y".green().bold(),
        "N".bold()
    );
    let answer = match prompt.ask(&question).await {
        Ok(answer) => answer,
        Err(CheckerError::UserInterrupted) => {
            println!("\nDownload cancelled.");
            logger.warn("PROMPT", "Prompt interrupted; download cancelled");
            return Err(CheckerError::UserInterrupted);
        }
        Err(err) => return Err(err),
    };

    if answer == Answer::No {
        println!("\nDownload skipped.");
        println!("{}\n", "=".repeat(RULE_WIDTH));
        logger.info("DOWNLOAD", "Operator declined download");
        return Ok(Outcome::Skipped);
    }

    let url = download_url(download_base, latest);
    let destination = downloader.destination().to_path_buf();
    println!(
        "\n{} {} to {}",
        "Downloading:".bold(),
        latest.asset_name,
        destination.display()
    );
    logger.info("DOWNLOAD", format!("Fetching {url}"));
    downloader.fetch(&url).await?;

    let saved = destination.join(&latest.asset_name);
    println!(
        "\n{} File saved in: {}",
        "Download complete!".green().bold(),
        saved.display()
    );
    println!("{}\n", "=".repeat(RULE_WIDTH));
    logger.info("DOWNLOAD", format!("Saved {}", saved.display()));
    Ok(Outcome::Downloaded(saved))
}
