/*============================================================
  Synavera Project: Brave Releases Checker
  Module: brc_core::logger
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1
  ------------------------------------------------------------
  Purpose:
    Provide structured, append-only logging for checker runs.

  Security / Safety Notes:
    Callers never pass the GitHub token; messages carry package
    names, versions, URLs and paths only.

  Dependencies:
    std::fs::File, std::sync::Mutex, chrono for timestamps,
    sha2 for session integrity hashing.

  Operational Scope:
    Used by runtime components to emit RFC-3339 UTC stamped
    entries and seal the session log with a digest.

  Revision History:
    2026-10-17 COD  Carried logging module into the checker.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Append-only logging with UTC timestamps
    - Deterministic formatting for auditability
    - Graceful error propagation on I/O failures
============================================================*/

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use sha2::{Digest, Sha256};

use crate::error::{CheckerError, Result};

/// Structured log level for checker events.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// Session log file and the path it was opened from.
struct Sink {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl Sink {
    fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|err| {
                CheckerError::Filesystem(format!(
                    "Failed to create log directory {}: {err}",
                    parent.display()
                ))
            })?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|err| {
                CheckerError::Filesystem(format!(
                    "Failed to open log file {}: {err}",
                    path.display()
                ))
            })?;
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Append one line; failures are reported on stderr and otherwise dropped.
    fn append(&self, line: &str) {
        let Ok(mut writer) = self.writer.lock() else {
            return;
        };
        if writeln!(writer, "{line}").and_then(|()| writer.flush()).is_err() {
            eprintln!(
                "{}",
                format_entry(
                    LogLevel::Error,
                    "LOGGER",
                    &format!("Failed to write to {}", self.path.display())
                )
            );
        }
    }
}

/// Run logger: WARN and ERROR always reach stderr, INFO and DEBUG only when
/// verbose. Every entry also lands in the session log when one is open.
pub struct Logger {
    sink: Option<Sink>,
    verbose: bool,
}

impl Logger {
    /// Logger appending to the session log at `path`.
    pub fn new(path: PathBuf, verbose: bool) -> Result<Self> {
        Ok(Self {
            sink: Some(Sink::open(path)?),
            verbose,
        })
    }

    /// Logger with no file sink.
    pub fn stderr_only(verbose: bool) -> Self {
        Self {
            sink: None,
            verbose,
        }
    }

    fn echoes(&self, level: LogLevel) -> bool {
        self.verbose || matches!(level, LogLevel::Warn | LogLevel::Error)
    }

    /// Emit a log entry with the given level, code, and message.
    pub fn log<S: AsRef<str>>(&self, level: LogLevel, code: &str, message: S) {
        let entry = format_entry(level, code, message.as_ref());
        if self.echoes(level) {
            eprintln!("{entry}");
        }
        if let Some(sink) = &self.sink {
            sink.append(&entry);
        }
    }

    pub fn info<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Info, code, message);
    }

    pub fn warn<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Warn, code, message);
    }

    pub fn error<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Error, code, message);
    }

    pub fn debug<S: AsRef<str>>(&self, code: &str, message: S) {
        self.log(LogLevel::Debug, code, message);
    }

    /// Session log path, if one is open.
    pub fn path(&self) -> Option<&Path> {
        self.sink.as_ref().map(|sink| sink.path.as_path())
    }

    /// Seal the session log with a `<log>.hash` file in `sha256sum` format.
    pub fn finalize(&self) -> Result<()> {
        let Some(path) = self.path() else {
            return Ok(());
        };
        let data = std::fs::read(path).map_err(|err| {
            CheckerError::Filesystem(format!(
                "Failed to read log for hashing {}: {err}",
                path.display()
            ))
        })?;
        let line = format!(
            "{:x}  {}\n",
            Sha256::digest(&data),
            path.file_name().unwrap_or_default().to_string_lossy()
        );
        let hash_path = hash_path_for(path);
        std::fs::write(&hash_path, line).map_err(|err| {
            CheckerError::Filesystem(format!(
                "Failed to write hash file {}: {err}",
                hash_path.display()
            ))
        })
    }
}

fn format_entry(level: LogLevel, code: &str, message: &str) -> String {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    format!("{timestamp} [{}] [{code}] {message}", level.as_str())
}

fn hash_path_for(path: &Path) -> PathBuf {
    let mut hash_os = path.as_os_str().to_os_string();
    hash_os.push(".hash");
    PathBuf::from(hash_os)
}
