/*============================================================
  Synavera Project: Brave Releases Checker
  Module: brc_core::package_info
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Shared structures describing the installed package and the
    release assets that qualify as update candidates.

  Security / Safety Notes:
    Pure data container; no I/O performed in this module.

  Dependencies:
    serde for debug-level serialization in logs.

  Operational Scope:
    Used across query modules, selection and reporting to pass
    version strings and asset identities.

  Revision History:
    2026-10-17 COD  Introduced InstalledPackageInfo and ReleaseAsset.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Clear data contracts between modules
    - Immutable values for the lifetime of one run
============================================================*/

use serde::Serialize;

use crate::version::Version;

/// Package detected on the host together with its parsed version.
#[derive(Debug, Clone)]
pub struct InstalledPackageInfo {
    pub name: String,
    pub version: Version,
}

impl InstalledPackageInfo {
    pub fn new(name: impl Into<String>, version: &str) -> Self {
        Self {
            name: name.into(),
            version: Version::parse(version),
        }
    }
}

/// Release asset matching the requested channel, suffix and architecture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseAsset {
    /// Tag with any leading `v` removed.
    pub version: String,
    pub asset_name: String,
    pub tag_name: String,
}

impl ReleaseAsset {
    pub fn parsed_version(&self) -> Version {
        Version::parse(&self.version)
    }
}
