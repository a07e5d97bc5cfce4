/*============================================================
  Synavera Project: Brave Releases Checker
  Module: brc_core::version
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Parse dotted and suffixed version strings into a totally
    ordered form, pick the newest release candidate and decide
    whether it supersedes the installed build.

  Security / Safety Notes:
    Pure computation; no I/O performed in this module.

  Dependencies:
    None beyond std.

  Operational Scope:
    Consumed by the orchestrator after asset selection and by
    installed-version resolution.

  Revision History:
    2026-10-17 COD  Replaced vercmp delegation with native ordering.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Total ordering with no failure path during parsing
    - Deterministic tie-breaking on input order
============================================================*/

use std::cmp::Ordering;
use std::fmt;

use crate::package_info::ReleaseAsset;

/// Single component of a parsed version.
///
/// Alphanumeric components sort below numeric ones so that `1.0.rc`
/// precedes `1.0.0`. A suffix that extends a release is still longer than
/// it, so `1.61.0-beta` sorts above `1.61.0`.
///
/// Numeric runs keep their digits with leading zeros stripped, so values
/// wider than any machine integer still order by magnitude.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Component {
    Text(String),
    Numeric(Digits),
}

/// Unbounded non-negative integer ordered by length, then lexically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digits(String);

impl Digits {
    fn new(run: &str) -> Self {
        let trimmed = run.trim_start_matches('0');
        Digits(if trimmed.is_empty() { "0" } else { trimmed }.to_string())
    }
}

impl PartialOrd for Digits {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Digits {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

/// Ordered version parsed from strings such as `1.60.118`.
///
/// Missing trailing components are absent rather than zero, so a shorter
/// version sorts below any extension of it (`1.60` < `1.60.0`).
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    components: Vec<Component>,
}

impl Version {
    /// Parse a version string. Parsing never fails; unrecognised text
    /// becomes alphanumeric components.
    pub fn parse(input: &str) -> Self {
        let raw = input.trim().to_string();
        let mut components = Vec::new();
        for segment in raw.split(['.', '-', '_', '+']) {
            split_segment(segment, &mut components);
        }
        Self { raw, components }
    }
}

/// Split a segment at digit/letter boundaries (`0rc1` -> `0`, `rc`, `1`).
fn split_segment(segment: &str, out: &mut Vec<Component>) {
    let mut current = String::new();
    let mut numeric = false;
    for ch in segment.chars() {
        let is_digit = ch.is_ascii_digit();
        if !current.is_empty() && is_digit != numeric {
            out.push(make_component(&current, numeric));
            current.clear();
        }
        numeric = is_digit;
        current.push(ch);
    }
    if !current.is_empty() {
        out.push(make_component(&current, numeric));
    }
}

fn make_component(token: &str, numeric: bool) -> Component {
    if numeric {
        Component::Numeric(Digits::new(token))
    } else {
        Component::Text(token.to_ascii_lowercase())
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.components.cmp(&other.components)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Select the candidate with the greatest version.
///
/// Ties keep the earliest entry in input order. Returns `None` only for an
/// empty slice; callers report "nothing found" before reaching here.
pub fn pick_latest(assets: &[ReleaseAsset]) -> Option<&ReleaseAsset> {
    let mut best: Option<(&ReleaseAsset, Version)> = None;
    for asset in assets {
        let parsed = asset.parsed_version();
        let replace = match &best {
            Some((_, current)) => parsed > *current,
            None => true,
        };
        if replace {
            best = Some((asset, parsed));
        }
    }
    best.map(|(asset, _)| asset)
}

/// Strict greater-than between the latest release and the installed build.
pub fn is_newer(latest: &Version, installed: &Version) -> bool {
    latest > installed
}
