/*============================================================
  Synavera Project: Brave Releases Checker
  Module: brc_core::distro
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Detect the host distribution identifier from os-release.

  Security / Safety Notes:
    Reads world-readable system metadata only.

  Dependencies:
    None beyond std.

  Operational Scope:
    Feeds the packaging-format lookup in `installed`.

  Revision History:
    2026-10-17 COD  Added os-release detection.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Unknown hosts yield an empty id, never a panic
============================================================*/

use std::fs;
use std::path::{Path, PathBuf};

const OS_RELEASE_PATHS: [&str; 2] = ["/etc/os-release", "/usr/lib/os-release"];

/// Detect the lower-cased distribution id.
///
/// `override_path` replaces the standard os-release locations. Returns an
/// empty string when no file or no `ID=` entry is found.
pub fn detect(override_path: Option<&Path>) -> String {
    let candidates: Vec<PathBuf> = match override_path {
        Some(path) => vec![path.to_path_buf()],
        None => OS_RELEASE_PATHS.iter().map(PathBuf::from).collect(),
    };

    candidates
        .iter()
        .find_map(|path| fs::read_to_string(path).ok())
        .and_then(|contents| parse_os_release_id(&contents))
        .unwrap_or_default()
}

/// Extract the `ID` value from os-release contents.
pub fn parse_os_release_id(contents: &str) -> Option<String> {
    contents.lines().find_map(|line| {
        let (key, value) = line.trim().split_once('=')?;
        if key.trim() != "ID" {
            return None;
        }
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        Some(value.to_lowercase())
    })
}
