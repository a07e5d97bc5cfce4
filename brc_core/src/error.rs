/*============================================================
  Synavera Project: Brave Releases Checker
  Module: brc_core::error
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Centralise checker error types to provide consistent
    diagnostics and exit semantics.

  Security / Safety Notes:
    Error contexts never carry the GitHub token; only package
    names, commands, paths and HTTP status details are exposed.

  Dependencies:
    thiserror for ergonomic error definitions.

  Operational Scope:
    Used across modules to propagate failures and consolidate
    exit codes for the binary entry point.

  Revision History:
    2026-10-17 COD  Established checker error taxonomy.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit error taxonomy with actionable context
    - No silent failure paths
    - Stable exit codes for operational tooling
============================================================*/

use std::io;
use std::process::ExitCode;

use thiserror::Error;

/// Result alias for checker operations.
pub type Result<T> = std::result::Result<T, CheckerError>;

/// Enumerates high-level error domains surfaced by the checker.
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("No installed version of {package} found in {location}")]
    NotInstalled { package: String, location: String },
    #[error("Required command `{command}` not found in PATH")]
    ToolMissing { command: String },
    #[error("Command `{command}` failed with status {status}: {stderr}")]
    CommandFailure {
        command: String,
        status: i32,
        stderr: String,
    },
    #[error("Unsupported distribution: {0:?}. Cannot determine installed version")]
    UnsupportedDistribution(String),
    #[error(
        "Error downloading releases: {status}, Message: {}",
        .message.as_deref().unwrap_or("None")
    )]
    Api {
        status: u16,
        message: Option<String>,
    },
    #[error("Network: {0}")]
    Network(String),
    #[error("Parse: {0}")]
    Parse(String),
    #[error("Configuration: {0}")]
    Config(String),
    #[error("Serialization: {0}")]
    Serialization(String),
    #[error("Filesystem: {0}")]
    Filesystem(String),
    #[error("Runtime: {0}")]
    Runtime(String),
    #[error("Download cancelled")]
    UserInterrupted,
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl CheckerError {
    /// Map error category to the process exit code.
    ///
    /// An unsupported distribution only skips the check, so it keeps the
    /// success code; every other failure terminates the run with 1.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CheckerError::UnsupportedDistribution(_) => ExitCode::SUCCESS,
            _ => ExitCode::FAILURE,
        }
    }

    /// Whether the failure is a skip notice rather than a fault.
    pub fn is_skip(&self) -> bool {
        matches!(self, CheckerError::UnsupportedDistribution(_))
    }
}
