/*============================================================
  Synavera Project: Brave Releases Checker
  Module: brc_core::selector
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Describe the operator's release criteria and filter raw
    GitHub releases down to matching downloadable assets.

  Security / Safety Notes:
    Pure computation over already-fetched data.

  Dependencies:
    clap for value enums, serde for config decoding.

  Operational Scope:
    Sits between the release fetcher and version comparison.

  Revision History:
    2026-10-17 COD  Authored channel/suffix/arch asset filter.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Input order preserved, no deduplication
    - Case-insensitive channel classification
============================================================*/

use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::{CheckerError, Result};
use crate::github::RawRelease;
use crate::package_info::ReleaseAsset;

/// Release track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    #[default]
    Stable,
    Beta,
    Nightly,
}

impl Channel {
    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Stable => "stable",
            Channel::Beta => "beta",
            Channel::Nightly => "nightly",
        }
    }

    /// Capitalised label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            Channel::Stable => "Stable",
            Channel::Beta => "Beta",
            Channel::Nightly => "Nightly",
        }
    }

    /// Apply the channel inclusion rule to a lower-cased asset name.
    fn admits(self, lowered: &str) -> bool {
        match self {
            Channel::Stable => !lowered.contains("nightly") && !lowered.contains("beta"),
            Channel::Beta => lowered.contains("beta"),
            Channel::Nightly => lowered.contains("nightly"),
        }
    }
}

/// Asset file suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
pub enum AssetSuffix {
    #[default]
    #[value(name = ".deb")]
    #[serde(rename = ".deb")]
    Deb,
    #[value(name = ".rpm")]
    #[serde(rename = ".rpm")]
    Rpm,
    #[value(name = ".tar.gz")]
    #[serde(rename = ".tar.gz")]
    TarGz,
    #[value(name = ".apk")]
    #[serde(rename = ".apk")]
    Apk,
    #[value(name = ".zip")]
    #[serde(rename = ".zip")]
    Zip,
    #[value(name = ".dmg")]
    #[serde(rename = ".dmg")]
    Dmg,
    #[value(name = ".pkg")]
    #[serde(rename = ".pkg")]
    Pkg,
}

impl AssetSuffix {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetSuffix::Deb => ".deb",
            AssetSuffix::Rpm => ".rpm",
            AssetSuffix::TarGz => ".tar.gz",
            AssetSuffix::Apk => ".apk",
            AssetSuffix::Zip => ".zip",
            AssetSuffix::Dmg => ".dmg",
            AssetSuffix::Pkg => ".pkg",
        }
    }
}

/// Target architecture substring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    #[default]
    Amd64,
    Arm64,
    Universal,
}

impl Arch {
    pub fn as_str(self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
            Arch::Universal => "universal",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AssetSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable selection criteria supplied once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criteria {
    pub channel: Channel,
    pub suffix: AssetSuffix,
    pub arch: Arch,
    pub page: u32,
}

impl Criteria {
    /// Build criteria, rejecting non-positive page numbers.
    pub fn new(channel: Channel, suffix: AssetSuffix, arch: Arch, page: i64) -> Result<Self> {
        if page < 1 {
            return Err(CheckerError::Config(
                "Page number must be a positive integer.".into(),
            ));
        }
        let page = u32::try_from(page)
            .map_err(|_| CheckerError::Config(format!("Page number {page} is out of range.")))?;
        Ok(Self {
            channel,
            suffix,
            arch,
            page,
        })
    }
}

/// Filter fetched releases into candidate assets.
///
/// Results follow release order, then asset order within each release.
pub fn select(releases: &[RawRelease], criteria: &Criteria) -> Vec<ReleaseAsset> {
    let suffix = criteria.suffix.as_str();
    let arch = criteria.arch.as_str();
    let mut assets = Vec::new();

    for release in releases {
        let version = strip_tag_prefix(&release.tag_name);
        for asset in &release.assets {
            let name = asset.name.as_str();
            if !name.ends_with(suffix) || !name.contains(arch) {
                continue;
            }
            if criteria.channel.admits(&name.to_lowercase()) {
                assets.push(ReleaseAsset {
                    version: version.to_string(),
                    asset_name: name.to_string(),
                    tag_name: release.tag_name.clone(),
                });
            }
        }
    }

    assets
}

/// Strip leading `v` characters from a release tag.
pub fn strip_tag_prefix(tag: &str) -> &str {
    tag.trim_start_matches('v')
}
