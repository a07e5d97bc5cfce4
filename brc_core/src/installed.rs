/*============================================================
  Synavera Project: Brave Releases Checker
  Module: brc_core::installed
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Determine the locally installed Brave Browser version from
    the host's package metadata: a Slackware-style package log
    directory, the dpkg database or the rpm database.

  Security / Safety Notes:
    Executes dpkg/rpm query commands with user privileges only;
    no privilege escalation is attempted.

  Dependencies:
    tokio::process for async command execution.

  Operational Scope:
    Supplies the installed version compared against upstream.

  Revision History:
    2026-10-17 COD  Adapted command layer to dpkg/rpm/index queries.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Deterministic command invocation with explicit checks
    - Fixed-position parsing isolated in small helpers
    - Reusable helpers for external command diagnostics
============================================================*/

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::process::{Output, Stdio};

use tokio::process::Command;

use crate::error::{CheckerError, Result};
use crate::logger::Logger;
use crate::package_info::InstalledPackageInfo;

const DPKG_VERSION_LABEL: &str = "Version:";
const RPM_VERSION_LABEL: &str = "Version     :";

/// Packaging format of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFormat {
    /// Directory of package entries named `name-version-arch-build`.
    IndexFile,
    /// dpkg status database.
    Debian,
    /// rpm database.
    Rpm,
}

impl PackageFormat {
    /// Map a distribution id to its packaging format.
    pub fn from_distribution(id: &str) -> Result<Self> {
        match id.to_lowercase().as_str() {
            "slackware" => Ok(PackageFormat::IndexFile),
            "ubuntu" | "debian" => Ok(PackageFormat::Debian),
            "fedora" | "centos" | "redhat" => Ok(PackageFormat::Rpm),
            other => Err(CheckerError::UnsupportedDistribution(other.to_string())),
        }
    }

    fn label(self) -> &'static str {
        match self {
            PackageFormat::IndexFile => "Slackware",
            PackageFormat::Debian => "Debian",
            PackageFormat::Rpm => "RPM",
        }
    }
}

impl fmt::Display for PackageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resolve the installed version for `package` using the given format.
pub async fn resolve(
    format: PackageFormat,
    package: &str,
    search_path: &Path,
    logger: &Logger,
) -> Result<InstalledPackageInfo> {
    let info = match format {
        PackageFormat::IndexFile => resolve_index_file(package, search_path)?,
        PackageFormat::Debian => resolve_dpkg(package).await?,
        PackageFormat::Rpm => resolve_rpm(package).await?,
    };
    logger.info(
        "INSTALLED",
        format!(
            "Installed Package ({format}): {} - Version: {}",
            info.name, info.version
        ),
    );
    Ok(info)
}

/// Scan `search_path` for an entry starting with `prefix`.
pub fn resolve_index_file(prefix: &str, search_path: &Path) -> Result<InstalledPackageInfo> {
    let not_installed = || CheckerError::NotInstalled {
        package: prefix.to_string(),
        location: search_path.display().to_string(),
    };

    let entries = match fs::read_dir(search_path) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Err(not_installed()),
        Err(err) => {
            return Err(CheckerError::Filesystem(format!(
                "Failed to read package directory {}: {err}",
                search_path.display()
            )))
        }
    };

    let mut matches: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with(prefix))
        .collect();
    matches.sort();

    let file_name = matches.into_iter().next().ok_or_else(not_installed)?;
    let version = index_file_version(&file_name).ok_or_else(|| {
        CheckerError::Parse(format!(
            "Package entry `{file_name}` has no third `-` delimited field"
        ))
    })?;
    Ok(InstalledPackageInfo::new(file_name.clone(), version))
}

/// Third `-` delimited field of a package entry name.
///
/// Assumes `name-name-version-arch-build`; names with a different number of
/// dashes in the package part yield the wrong field.
pub fn index_file_version(file_name: &str) -> Option<&str> {
    file_name.split('-').nth(2)
}

async fn resolve_dpkg(package: &str) -> Result<InstalledPackageInfo> {
    let output = run_query("dpkg", &["-s", package]).await?;
    interpret_dpkg(&output, package)
}

async fn resolve_rpm(package: &str) -> Result<InstalledPackageInfo> {
    let output = run_query("rpm", &["-qi", package]).await?;
    interpret_rpm(&output, package)
}

/// Classify a finished `dpkg -s` query. Any non-zero exit means absent.
pub fn interpret_dpkg(output: &Output, package: &str) -> Result<InstalledPackageInfo> {
    if !output.status.success() {
        return Err(CheckerError::NotInstalled {
            package: package.to_string(),
            location: "the dpkg database".to_string(),
        });
    }
    let stdout = decode_stdout(output, "dpkg -s")?;
    let version = labelled_version(&stdout, DPKG_VERSION_LABEL).ok_or_else(|| {
        CheckerError::Parse(format!("dpkg -s {package} reported no Version field"))
    })?;
    Ok(InstalledPackageInfo::new(package, &version))
}

/// Classify a finished `rpm -qi` query. Only rpm's own "not installed"
/// message means absent; other failures keep their status and stderr.
pub fn interpret_rpm(output: &Output, package: &str) -> Result<InstalledPackageInfo> {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if rpm_reports_not_installed(&stderr, package) {
            return Err(CheckerError::NotInstalled {
                package: package.to_string(),
                location: "the rpm database".to_string(),
            });
        }
        return Err(CheckerError::CommandFailure {
            command: format!("rpm -qi {package}"),
            status: output.status.code().unwrap_or(-1),
            stderr,
        });
    }
    let stdout = decode_stdout(output, "rpm -qi")?;
    let version = labelled_version(&stdout, RPM_VERSION_LABEL).ok_or_else(|| {
        CheckerError::Parse(format!("rpm -qi {package} reported no Version field"))
    })?;
    Ok(InstalledPackageInfo::new(package, &version))
}

/// Value after the last `:` of the first line starting with `label`.
pub fn labelled_version(output: &str, label: &str) -> Option<String> {
    output
        .lines()
        .find(|line| line.starts_with(label))
        .and_then(|line| line.rsplit(':').next())
        .map(|value| value.trim().to_string())
}

/// Whether rpm's error stream says the package is absent.
pub fn rpm_reports_not_installed(stderr: &str, package: &str) -> bool {
    stderr.contains(&format!("package {package} is not installed"))
}

async fn run_query(program: &str, args: &[&str]) -> Result<Output> {
    Command::new(program)
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|err| map_spawn_error(err, program))
}

fn decode_stdout(output: &Output, command: &str) -> Result<String> {
    String::from_utf8(output.stdout.clone()).map_err(|err| {
        CheckerError::Serialization(format!("{command} emitted invalid UTF-8: {err}"))
    })
}

/// Classify a spawn failure; a missing executable becomes `ToolMissing`.
pub fn map_spawn_error(err: io::Error, command: &str) -> CheckerError {
    if err.kind() == io::ErrorKind::NotFound {
        CheckerError::ToolMissing {
            command: command.into(),
        }
    } else {
        CheckerError::Runtime(format!("Failed to spawn {command}: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DPKG_STATUS: &str = "Package: brave-browser\n\
Status: install ok installed\n\
Priority: optional\n\
Architecture: amd64\n\
Version: 1.60.118\n\
Depends: ca-certificates\n";

    const RPM_INFO: &str = "Name        : brave-browser\n\
Version     : 1.60.118\n\
Release     : 1\n\
Architecture: x86_64\n";

    #[test]
    fn distribution_lookup_covers_known_hosts() {
        assert_eq!(
            PackageFormat::from_distribution("slackware").expect("slackware"),
            PackageFormat::IndexFile
        );
        for id in ["ubuntu", "debian", "Debian"] {
            assert_eq!(
                PackageFormat::from_distribution(id).expect("debian-like"),
                PackageFormat::Debian
            );
        }
        for id in ["fedora", "centos", "redhat"] {
            assert_eq!(
                PackageFormat::from_distribution(id).expect("rpm-like"),
                PackageFormat::Rpm
            );
        }
    }

    #[test]
    fn unknown_distribution_is_unsupported() {
        let err = PackageFormat::from_distribution("arch").expect_err("arch is unmapped");
        assert!(matches!(err, CheckerError::UnsupportedDistribution(ref id) if id == "arch"));
        assert!(matches!(
            PackageFormat::from_distribution(""),
            Err(CheckerError::UnsupportedDistribution(_))
        ));
    }

    #[test]
    fn index_file_version_takes_third_field() {
        assert_eq!(
            index_file_version("brave-browser-1.60.118-x86_64-1_SBo"),
            Some("1.60.118")
        );
    }

    #[test]
    fn index_file_version_misreads_non_conforming_names() {
        assert_eq!(
            index_file_version("brave-browser-build-1.60.118-x86_64.pkg"),
            Some("build")
        );
        assert_eq!(index_file_version("brave-browser"), None);
    }

    #[test]
    fn resolve_index_file_picks_first_sorted_match() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("brave-browser-1.60.118-x86_64-1_SBo"), "").expect("write");
        fs::write(dir.path().join("brave-browser-1.61.50-x86_64-1_SBo"), "").expect("write");
        fs::write(dir.path().join("aaa-1.0-x86_64-1"), "").expect("write");

        let info = resolve_index_file("brave-browser", dir.path()).expect("installed");
        assert_eq!(info.name, "brave-browser-1.60.118-x86_64-1_SBo");
        assert_eq!(info.version.to_string(), "1.60.118");
    }

    #[test]
    fn resolve_index_file_without_match_is_not_installed() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("firefox-120.0-x86_64-1"), "").expect("write");
        let err = resolve_index_file("brave-browser", dir.path()).expect_err("absent");
        assert!(matches!(err, CheckerError::NotInstalled { .. }));

        let missing = dir.path().join("nope");
        let err = resolve_index_file("brave-browser", &missing).expect_err("no dir");
        assert!(matches!(err, CheckerError::NotInstalled { .. }));
    }

    #[test]
    fn resolve_index_file_short_name_is_parse_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("brave-browser"), "").expect("write");
        let err = resolve_index_file("brave-browser", dir.path()).expect_err("short name");
        assert!(matches!(err, CheckerError::Parse(_)));
    }

    #[test]
    fn dpkg_version_line_is_parsed() {
        assert_eq!(
            labelled_version(DPKG_STATUS, DPKG_VERSION_LABEL).as_deref(),
            Some("1.60.118")
        );
        assert_eq!(
            labelled_version("Version: 1:1.60.118\n", DPKG_VERSION_LABEL).as_deref(),
            Some("1.60.118")
        );
        assert_eq!(labelled_version("Package: x\n", DPKG_VERSION_LABEL), None);
    }

    #[test]
    fn rpm_version_line_needs_fixed_width_label() {
        assert_eq!(
            labelled_version(RPM_INFO, RPM_VERSION_LABEL).as_deref(),
            Some("1.60.118")
        );
        assert_eq!(labelled_version("Version: 1.60.118\n", RPM_VERSION_LABEL), None);
    }

    #[test]
    fn rpm_not_installed_detection() {
        assert!(rpm_reports_not_installed(
            "package brave-browser is not installed",
            "brave-browser"
        ));
        assert!(!rpm_reports_not_installed(
            "error: rpmdb open failed",
            "brave-browser"
        ));
    }

    fn finished(code: i32, stdout: &str, stderr: &str) -> Output {
        use std::os::unix::process::ExitStatusExt;
        Output {
            status: std::process::ExitStatus::from_raw(code << 8),
            stdout: stdout.as_bytes().to_vec(),
            stderr: stderr.as_bytes().to_vec(),
        }
    }

    #[test]
    fn dpkg_failure_means_not_installed() {
        let output = finished(1, "", "dpkg-query: package 'brave-browser' is not installed");
        let err = interpret_dpkg(&output, "brave-browser").expect_err("absent");
        assert!(matches!(
            err,
            CheckerError::NotInstalled { ref location, .. } if location == "the dpkg database"
        ));
    }

    #[test]
    fn dpkg_success_yields_version() {
        let info = interpret_dpkg(&finished(0, DPKG_STATUS, ""), "brave-browser").expect("installed");
        assert_eq!(info.name, "brave-browser");
        assert_eq!(info.version.to_string(), "1.60.118");
    }

    #[test]
    fn rpm_not_installed_message_means_absent() {
        let output = finished(1, "", "package brave-browser is not installed\n");
        let err = interpret_rpm(&output, "brave-browser").expect_err("absent");
        assert!(matches!(
            err,
            CheckerError::NotInstalled { ref location, .. } if location == "the rpm database"
        ));
    }

    #[test]
    fn other_rpm_failure_is_command_failure() {
        let output = finished(1, "", "error: rpmdb open failed\n");
        let err = interpret_rpm(&output, "brave-browser").expect_err("rpmdb broken");
        assert!(matches!(
            err,
            CheckerError::CommandFailure { status: 1, ref stderr, .. }
                if stderr == "error: rpmdb open failed"
        ));
    }

    #[test]
    fn successful_query_without_version_is_parse_error() {
        let dpkg = interpret_dpkg(&finished(0, "Package: brave-browser\n", ""), "brave-browser");
        assert!(matches!(dpkg, Err(CheckerError::Parse(_))));
        let rpm = interpret_rpm(&finished(0, "Name        : brave-browser\n", ""), "brave-browser");
        assert!(matches!(rpm, Err(CheckerError::Parse(_))));
        let info = interpret_rpm(&finished(0, RPM_INFO, ""), "brave-browser").expect("installed");
        assert_eq!(info.version.to_string(), "1.60.118");
    }

    #[test]
    fn missing_executable_maps_to_tool_missing() {
        let err = map_spawn_error(io::Error::from(io::ErrorKind::NotFound), "dpkg");
        assert!(matches!(err, CheckerError::ToolMissing { ref command } if command == "dpkg"));
        let err = map_spawn_error(io::Error::from(io::ErrorKind::PermissionDenied), "rpm");
        assert!(matches!(err, CheckerError::Runtime(_)));
    }

    #[tokio::test]
    async fn absent_query_tool_is_reported() {
        let err = run_query("brc-definitely-not-a-command", &["-s", "x"])
            .await
            .expect_err("no such binary");
        assert!(matches!(err, CheckerError::ToolMissing { .. }));
    }
}
