/*============================================================
  Synavera Project: Brave Releases Checker
  Module: brc_core::download
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Build release download URLs and hand the transfer to an
    external downloader (wget by default).

  Security / Safety Notes:
    Arguments are passed directly to the child process; no
    shell is involved, so asset names cannot inject commands.

  Dependencies:
    tokio::process for the child process, urlencoding for URL
    path segments.

  Operational Scope:
    Invoked only after the operator confirms a download.

  Revision History:
    2026-10-17 COD  Authored downloader delegation.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Fixed retry count delegated to the downloader
    - Child exit status checked and surfaced
============================================================*/

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;
use urlencoding::encode;

use crate::error::{CheckerError, Result};
use crate::installed::map_spawn_error;
use crate::package_info::ReleaseAsset;

/// Attempts the downloader makes before giving up.
pub const DOWNLOAD_RETRIES: u32 = 3;

/// Join the download base, release tag and asset file name.
pub fn download_url(base: &str, asset: &ReleaseAsset) -> String {
    format!(
        "{}{}/{}",
        base,
        encode(&asset.tag_name),
        encode(&asset.asset_name)
    )
}

/// External download invocation.
#[derive(Debug, Clone)]
pub struct Downloader {
    program: String,
    destination: PathBuf,
}

impl Downloader {
    pub fn new(program: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            destination: destination.into(),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Arguments handed to the downloader for `url`.
    pub fn arguments(&self, url: &str) -> Vec<String> {
        vec![
            "-c".to_string(),
            "-q".to_string(),
            format!("--tries={DOWNLOAD_RETRIES}"),
            "--progress=bar:force:noscroll".to_string(),
            "--show-progress".to_string(),
            format!("--directory-prefix={}", self.destination.display()),
            url.to_string(),
        ]
    }

    /// Run the downloader with inherited stdio and wait for it.
    ///
    /// Earlier releases of the checker ignored the downloader's exit status
    /// and always reported completion; a non-zero status is now an error.
    pub async fn fetch(&self, url: &str) -> Result<()> {
        let status = Command::new(&self.program)
            .args(self.arguments(url))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|err| map_spawn_error(err, &self.program))?;

        if !status.success() {
            return Err(CheckerError::CommandFailure {
                command: format!("{} {url}", self.program),
                status: status.code().unwrap_or(-1),
                stderr: "download did not complete".to_string(),
            });
        }
        Ok(())
    }
}
