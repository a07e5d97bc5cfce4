/*============================================================
  Synavera Project: Brave Releases Checker
  Module: brc_core::config
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Load operator configuration from TOML, layering file values
    over built-in defaults.

  Security / Safety Notes:
    The GitHub token is read from operator-owned files only and
    is excluded from Debug output.

  Dependencies:
    serde + toml for decoding, dirs for per-user locations.

  Operational Scope:
    Constructed once at start and passed by reference to every
    component that needs settings.

  Revision History:
    2026-10-17 COD  Authored layered configuration loader.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit search order with documented fallbacks
    - Immutable configuration after load
============================================================*/

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CheckerError, Result};
use crate::selector::{Arch, AssetSuffix, Channel};

const APP_DIR: &str = "brave-releases-checker";
const CONFIG_FILE: &str = "config.toml";
const SYSTEM_CONFIG: &str = "/etc/brave-releases-checker/config.toml";

/// Root configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    pub package: PackageConfig,
    pub github: GithubConfig,
    pub defaults: DefaultsConfig,
    pub download: DownloadConfig,
    pub log: LogConfig,
    /// File the values were read from; `None` when defaults are in use.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Where and how to look for the installed package.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Directory scanned on index-file hosts.
    pub path: PathBuf,
    /// Package name, also used as the index-file prefix.
    pub name: String,
    /// Forces a distribution id instead of reading os-release.
    pub distribution: Option<String>,
    /// Alternate os-release file.
    pub os_release: Option<PathBuf>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("/var/log/packages/"),
            name: "brave-browser".to_string(),
            distribution: None,
            os_release: None,
        }
    }
}

/// Releases API settings.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub token: String,
    pub api_base: String,
    pub repo: String,
    pub download_base: Option<String>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base: "https://api.github.com".to_string(),
            repo: "brave/brave-browser".to_string(),
            download_base: None,
        }
    }
}

impl fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubConfig")
            .field("token", &if self.token.is_empty() { "" } else { "<redacted>" })
            .field("api_base", &self.api_base)
            .field("repo", &self.repo)
            .field("download_base", &self.download_base)
            .finish()
    }
}

impl GithubConfig {
    /// Base URL that release tags and asset names are appended to.
    pub fn download_base(&self) -> String {
        let base = self
            .download_base
            .clone()
            .unwrap_or_else(|| format!("https://github.com/{}/releases/download/", self.repo));
        if base.ends_with('/') {
            base
        } else {
            format!("{base}/")
        }
    }
}

/// Defaults for the CLI selection flags.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub channel: Channel,
    pub suffix: AssetSuffix,
    pub arch: Arch,
    pub page: i64,
    pub download_path: Option<PathBuf>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            channel: Channel::Stable,
            suffix: AssetSuffix::Deb,
            arch: Arch::Amd64,
            page: 1,
            download_path: None,
        }
    }
}

/// External downloader settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    pub command: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            command: "wget".to_string(),
        }
    }
}

/// Session log settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub enabled: bool,
    pub dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
        }
    }
}

impl CheckerConfig {
    /// Load configuration from an explicit path or the standard search order.
    ///
    /// An explicit path must exist. Without one, the first existing file of
    /// [`candidate_paths`] is used, falling back to defaults.
    pub fn load_from_optional_path(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            if !path.is_file() {
                return Err(CheckerError::Config(format!(
                    "Config file {} does not exist",
                    path.display()
                )));
            }
            return Self::load_from_path(path);
        }

        match candidate_paths().into_iter().find(|candidate| candidate.is_file()) {
            Some(found) => Self::load_from_path(&found),
            None => Ok(Self::default()),
        }
    }

    /// Parse a specific TOML file.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| {
            CheckerError::Config(format!("Failed to read config {}: {err}", path.display()))
        })?;
        let mut config: CheckerConfig = toml::from_str(&raw).map_err(|err| {
            CheckerError::Config(format!("Failed to parse config {}: {err}", path.display()))
        })?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Destination directory for downloaded assets.
    pub fn download_folder(&self) -> PathBuf {
        match &self.defaults.download_path {
            Some(path) => expand_home(path),
            None => home_dir().join("Downloads"),
        }
    }

    /// Directory receiving session logs.
    pub fn log_dir(&self) -> PathBuf {
        match &self.log.dir {
            Some(dir) => expand_home(dir),
            None => dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
                .join("logs"),
        }
    }

    /// Directory scanned for index-file package entries.
    pub fn package_path(&self) -> PathBuf {
        expand_home(&self.package.path)
    }
}

/// Config locations in search order: system-wide, then per-user.
pub fn candidate_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(APP_DIR).join(CONFIG_FILE));
    }
    paths
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home_dir().join(rest),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = CheckerConfig::default();
        assert_eq!(config.package.path, PathBuf::from("/var/log/packages/"));
        assert_eq!(config.package.name, "brave-browser");
        assert_eq!(config.github.token, "");
        assert_eq!(config.defaults.channel, Channel::Stable);
        assert_eq!(config.defaults.suffix, AssetSuffix::Deb);
        assert_eq!(config.defaults.arch, Arch::Amd64);
        assert_eq!(config.defaults.page, 1);
        assert_eq!(config.download.command, "wget");
        assert!(config.source.is_none());
        assert_eq!(
            config.github.download_base(),
            "https://github.com/brave/brave-browser/releases/download/"
        );
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config(
            r#"
            [package]
            path = "/srv/packages"
            name = "brave-browser-beta"
            distribution = "debian"

            [github]
            token = "token xyz"
            download_base = "https://mirror.example/download"

            [defaults]
            channel = "beta"
            suffix = ".rpm"
            arch = "arm64"
            page = 2
            download_path = "/tmp/brave"
            "#,
        );

        let config = CheckerConfig::load_from_optional_path(Some(file.path())).expect("config");
        assert_eq!(config.source.as_deref(), Some(file.path()));
        assert_eq!(config.package_path(), PathBuf::from("/srv/packages"));
        assert_eq!(config.package.name, "brave-browser-beta");
        assert_eq!(config.package.distribution.as_deref(), Some("debian"));
        assert_eq!(config.github.token, "token xyz");
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert_eq!(config.github.download_base(), "https://mirror.example/download/");
        assert_eq!(config.defaults.channel, Channel::Beta);
        assert_eq!(config.defaults.suffix, AssetSuffix::Rpm);
        assert_eq!(config.defaults.arch, Arch::Arm64);
        assert_eq!(config.defaults.page, 2);
        assert_eq!(config.download_folder(), PathBuf::from("/tmp/brave"));
    }

    #[test]
    fn missing_explicit_path_is_a_config_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.toml");
        let err = CheckerConfig::load_from_optional_path(Some(&missing)).expect_err("missing");
        assert!(matches!(err, CheckerError::Config(_)));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let file = write_config("[defaults]\nsuffix = \".exe\"\n");
        let err = CheckerConfig::load_from_path(file.path()).expect_err("bad suffix");
        assert!(matches!(err, CheckerError::Config(_)));
    }

    #[test]
    fn token_is_redacted_in_debug_output() {
        let github = GithubConfig {
            token: "token secret".into(),
            ..GithubConfig::default()
        };
        let rendered = format!("{github:?}");
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn tilde_paths_expand_to_home() {
        let expanded = expand_home(Path::new("~/Downloads"));
        assert!(expanded.ends_with("Downloads"));
        assert!(!expanded.starts_with("~"));
    }
}
