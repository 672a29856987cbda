use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Version recorded while an installation is still running.
///
/// Installers write this into the metadata record before any files land and
/// replace it with the detected version once the install completes.
pub const INSTALLING_VERSION: &str = "installing";

/// Error returned when a string does not name a known variant.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {kind} `{value}' (expected one of: {expected})")]
pub struct ParseError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Restricts which updates an application may receive automatically.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VersionLock {
    /// Any newer release may be applied.
    #[default]
    None,
    /// Stay on the current minor branch.
    Minor,
    /// Stay on the current major branch.
    Major,
}

impl VersionLock {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VersionLock::None => "none",
            VersionLock::Minor => "minor",
            VersionLock::Major => "major",
        }
    }

    /// Whether a lock of this kind holds back reporting an application as
    /// up to date.
    #[must_use]
    pub fn is_restrictive(self) -> bool {
        matches!(self, VersionLock::Minor | VersionLock::Major)
    }
}

impl fmt::Display for VersionLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionLock {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(VersionLock::None),
            "minor" => Ok(VersionLock::Minor),
            "major" => Ok(VersionLock::Major),
            _ => Err(ParseError {
                kind: "version lock",
                value: s.to_string(),
                expected: "major, minor, none",
            }),
        }
    }
}

/// How much of an application an uninstall removes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UninstallScope {
    /// Files, database and metadata.
    #[default]
    All,
    /// Application files only; the database is left in place.
    Files,
    /// Database only; files are left in place.
    Database,
}

impl UninstallScope {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            UninstallScope::All => "all",
            UninstallScope::Files => "files",
            UninstallScope::Database => "db",
        }
    }
}

impl fmt::Display for UninstallScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UninstallScope {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(UninstallScope::All),
            "files" => Ok(UninstallScope::Files),
            "db" | "database" => Ok(UninstallScope::Database),
            _ => Err(ParseError {
                kind: "uninstall scope",
                value: s.to_string(),
                expected: "all, files, db",
            }),
        }
    }
}

/// Strict-Transport-Security policy requested when binding a certificate.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HstsMode {
    /// Serve HTTPS without an HSTS header.
    #[default]
    Off,
    /// Send HSTS for the bound hostname.
    On,
    /// Send HSTS with `includeSubDomains; preload`.
    Preload,
}

impl HstsMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HstsMode::Off => "off",
            HstsMode::On => "on",
            HstsMode::Preload => "preload",
        }
    }
}

impl fmt::Display for HstsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
