//! Version comparison and version-lock semantics.
//!
//! Pure functions only — no I/O.

use semver::Version;
use serde::Serialize;
use serde_json::Value;
use webapps_common::VersionLock;

/// Answer to "is the installed version good enough for `target`?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    /// Installation in progress; no version to compare yet.
    Installing,
    /// Installed version satisfies the target.
    Current,
    /// Installed version is older than the target.
    Outdated,
    /// Installed version satisfies the target but a minor/major lock is set,
    /// so it must not be reported as satisfied.
    Locked,
}

impl VersionStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VersionStatus::Installing => "installing",
            VersionStatus::Current => "current",
            VersionStatus::Outdated => "outdated",
            VersionStatus::Locked => "locked",
        }
    }
}

/// Combine the facts gathered by the facade into a status.
#[must_use]
pub fn version_status(installing: bool, satisfied: bool, lock: VersionLock) -> VersionStatus {
    if installing {
        VersionStatus::Installing
    } else if !satisfied {
        VersionStatus::Outdated
    } else if lock.is_restrictive() {
        VersionStatus::Locked
    } else {
        VersionStatus::Current
    }
}

/// Parse `6`, `6.1`, `v6.1.2` and full semver strings.
#[must_use]
pub fn parse_lenient(version: &str) -> Option<Version> {
    let version = version.trim().trim_start_matches('v');
    if let Ok(parsed) = Version::parse(version) {
        return Some(parsed);
    }
    let (core, pre) = match version.split_once('-') {
        Some((core, pre)) => (core, Some(pre)),
        None => (version, None),
    };
    let mut parts: Vec<&str> = core.split('.').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }
    while parts.len() < 3 {
        parts.push("0");
    }
    let mut padded = parts.join(".");
    if let Some(pre) = pre {
        padded.push('-');
        padded.push_str(pre);
    }
    Version::parse(&padded).ok()
}

/// Whether `installed` is at least `target`.
///
/// Falls back to string equality when either side is not a version number.
#[must_use]
pub fn satisfies(installed: &str, target: &str) -> bool {
    match (parse_lenient(installed), parse_lenient(target)) {
        (Some(installed), Some(target)) => installed >= target,
        _ => installed == target,
    }
}

/// Interpret a raw option value as a version lock.
///
/// Accepts `"major"`, `"minor"`, `"none"`, `false` and `null`.
///
/// # Errors
///
/// Returns a description of the accepted domain for anything else.
pub fn lock_from_value(value: &Value) -> Result<VersionLock, String> {
    const DOMAIN: &str = "expected one of major, minor, none or false";
    match value {
        Value::Null | Value::Bool(false) => Ok(VersionLock::None),
        Value::String(s) => s.parse().map_err(|_| format!("`{s}': {DOMAIN}")),
        other => Err(format!("`{other}': {DOMAIN}")),
    }
}
