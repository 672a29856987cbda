//! Domain types and validators for panel configuration.
//!
//! Pure functions only — no I/O, no filesystem access.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use webapps_common::{HstsMode, VersionLock};

use crate::domain::app_type::{GENERIC_TYPE, UNKNOWN_TYPE};
use crate::domain::error::ConfigError;

// ── Hook names ───────────────────────────────────────────────────────────────

/// Hooks understood in the `web.hooks` section.
pub const WEB_HOOKS: &[&str] = &["protocol_allow", "protocol_deny"];

/// Hooks understood in the `certificates.hooks` section.
pub const CERTIFICATE_HOOKS: &[&str] = &[
    "acme_supported",
    "cert_exists",
    "contains",
    "is_acme_issuer",
    "append",
    "bind",
    "unbind",
];

/// Hooks understood per application type. A type implements a capability
/// exactly when the matching hook is configured.
pub const TYPE_HOOKS: &[&str] = &[
    "install",
    "uninstall",
    "update",
    "version",
    "versions",
    "valid",
    "admin_user",
    "change_password",
    "fortify",
    "unfortify",
    "reconfigure",
    "get_reconfigurable",
];

static TYPE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern — cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z][a-z0-9_-]*$").expect("valid regex")
});

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.webapps/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Directory holding one metadata record per application root.
    /// Defaults to `~/.webapps/meta` when unset.
    pub metadata_dir: Option<PathBuf>,
    pub account: AccountConfig,
    pub web: WebConfig,
    pub certificates: CertificateConfig,
    /// Hooks for the generic web application (fortification).
    pub generic: TypeConfig,
    /// Application types keyed by name.
    pub types: BTreeMap<String, TypeConfig>,
    /// Upper bound for any single hook command.
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
}

/// The account the panel acts for.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AccountConfig {
    /// Caller identity; falls back to `$USER` when unset.
    pub username: Option<String>,
    /// Primary domain, appended to bare hostnames.
    pub domain: String,
    /// HSTS policy requested when binding certificates.
    pub hsts: HstsMode,
    /// Public IP address the account's sites should resolve to.
    pub public_ip: Option<String>,
    /// Nameservers a hosted domain is expected to delegate to.
    pub nameservers: Vec<String>,
}

/// Web server layout and hooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    /// Hostname → document root.
    pub domains: BTreeMap<String, PathBuf>,
    /// Directory of per-subdomain symlinks (`<root>/<sub>/html`).
    pub subdomain_root: PathBuf,
    /// Document root of the primary domain.
    pub main_docroot: PathBuf,
    pub hooks: BTreeMap<String, Vec<String>>,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            domains: BTreeMap::new(),
            subdomain_root: PathBuf::from("/var/subdomain"),
            main_docroot: PathBuf::from("/var/www/html"),
            hooks: BTreeMap::new(),
        }
    }
}

/// Certificate authority and binding hooks.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CertificateConfig {
    pub hooks: BTreeMap<String, Vec<String>>,
}

/// One application type.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TypeConfig {
    /// Capability hooks; see [`TYPE_HOOKS`].
    pub hooks: BTreeMap<String, Vec<String>>,
    /// Fortification modes beyond the defaults.
    pub fortification_modes: Vec<String>,
    /// Full reconfigurable set; the generic set when unset.
    pub reconfigurables: Option<Vec<String>>,
    pub default_version_lock: VersionLock,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            metadata_dir: None,
            account: AccountConfig::default(),
            web: WebConfig::default(),
            certificates: CertificateConfig::default(),
            generic: TypeConfig::default(),
            types: BTreeMap::new(),
            command_timeout_secs: default_command_timeout(),
        }
    }
}

fn default_command_timeout() -> u64 {
    120
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configured application type name.
///
/// # Errors
///
/// Returns an error if the name is malformed or reserved.
pub fn validate_type_name(name: &str) -> Result<()> {
    if name == GENERIC_TYPE || name == UNKNOWN_TYPE {
        return Err(ConfigError::ReservedTypeName(name.to_string()).into());
    }
    if !TYPE_NAME_RE.is_match(name) {
        return Err(ConfigError::InvalidTypeName(name.to_string()).into());
    }
    Ok(())
}

fn validate_hooks(
    owner: &str,
    hooks: &BTreeMap<String, Vec<String>>,
    allowed: &[&str],
) -> Result<()> {
    for (hook, argv) in hooks {
        if !allowed.contains(&hook.as_str()) {
            return Err(ConfigError::InvalidValue {
                key: format!("{owner}.hooks"),
                value: hook.clone(),
                valid: allowed.join(", "),
            }
            .into());
        }
        if argv.first().is_none_or(|program| program.trim().is_empty()) {
            return Err(ConfigError::EmptyHook {
                owner: owner.to_string(),
                hook: hook.clone(),
            }
            .into());
        }
    }
    Ok(())
}

/// Validates a loaded configuration as a whole.
///
/// # Errors
///
/// Returns the first violation found.
pub fn validate_config(config: &PanelConfig) -> Result<()> {
    validate_hooks("web", &config.web.hooks, WEB_HOOKS)?;
    validate_hooks("certificates", &config.certificates.hooks, CERTIFICATE_HOOKS)?;
    validate_hooks(GENERIC_TYPE, &config.generic.hooks, &["fortify", "unfortify"])?;
    for (name, ty) in &config.types {
        validate_type_name(name)?;
        validate_hooks(name, &ty.hooks, TYPE_HOOKS)?;
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
