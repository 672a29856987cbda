//! Application identity and host/path location parsing.
//!
//! Pure functions only — no I/O.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::app_type::AppType;

/// RFC 1123 hostname, labels of at most 63 characters.
pub static HOSTNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern — cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"(?i)^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?(\.[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?)*$")
        .expect("valid regex")
});

/// Who and where an application is: fixed once the facade is constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppIdentity {
    pub hostname: String,
    /// URI path below the hostname, no trailing slash; empty at the root.
    pub path: String,
    pub app_type: AppType,
    /// Filesystem directory holding the application.
    pub root: PathBuf,
}

impl AppIdentity {
    /// `hostname/path`, or just the hostname when there is no path.
    #[must_use]
    pub fn location(&self) -> String {
        join_location(&self.hostname, &self.path)
    }
}

/// Split a combined `host/path` string.
///
/// Everything before the first `/` is the hostname; trailing slashes are
/// stripped from the path.
#[must_use]
pub fn split_location(value: &str) -> (String, String) {
    let (host, path) = value.split_once('/').unwrap_or((value, ""));
    (host.to_string(), path.trim_end_matches('/').to_string())
}

/// Inverse of [`split_location`].
#[must_use]
pub fn join_location(hostname: &str, path: &str) -> String {
    format!("{hostname}/{path}").trim_end_matches('/').to_string()
}

/// A hostname without a dot is a global subdomain of the account domain.
#[must_use]
pub fn is_bare_hostname(hostname: &str) -> bool {
    !hostname.contains('.')
}

/// Append the account domain to a bare hostname; qualified names pass through.
#[must_use]
pub fn qualify_hostname(hostname: &str, domain: &str) -> String {
    if is_bare_hostname(hostname) && !domain.is_empty() {
        format!("{hostname}.{domain}")
    } else {
        hostname.to_string()
    }
}

/// Split a hostname into `(subdomain, domain)`, treating the last two labels
/// as the registered domain.
#[must_use]
pub fn split_host(hostname: &str) -> (String, String) {
    let labels: Vec<&str> = hostname.split('.').collect();
    if labels.len() <= 2 {
        return (String::new(), hostname.to_string());
    }
    let cut = labels.len() - 2;
    (labels[..cut].join("."), labels[cut..].join("."))
}

#[must_use]
pub fn is_valid_hostname(hostname: &str) -> bool {
    hostname.len() <= 253 && HOSTNAME_RE.is_match(hostname)
}
