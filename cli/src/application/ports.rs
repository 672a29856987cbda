//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and `webapps_common` — never
//! from `crate::infra`, `crate::commands`, or `crate::output`.
//!
//! Every port is synchronous: each call is a request/response against an
//! external collaborator. Timeouts and retries belong to the implementation.

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use webapps_common::{AppMeta, HstsMode, Options, UninstallScope, VersionLock};

use crate::domain::app_type::{AppType, Capability, CapabilitySet};
use crate::domain::config::PanelConfig;
use crate::domain::error::CapabilityError;
use crate::domain::location::AppIdentity;
use crate::domain::options::GENERIC_RECONFIGURABLES;
use crate::domain::version;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Kind of filesystem entry behind a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    Symlink,
    Other,
}

/// Result of a `stat` through the filesystem port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    /// Owning user name; `None` when the uid has no passwd entry.
    pub owner: Option<String>,
    pub kind: FileKind,
    /// Resolved target when the path is a symlink.
    pub referent: Option<PathBuf>,
}

/// Per-application override declaring which type to impersonate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Application type to dispatch as.
    #[serde(default)]
    pub base: Option<String>,
    /// Free-form description shown in listings.
    #[serde(default)]
    pub description: Option<String>,
}

// ── Metadata Port ─────────────────────────────────────────────────────────────

/// Persistence of metadata records keyed by application root.
pub trait MetaStore {
    /// Load the record for `root`, returning `None` if none was stored.
    fn load(&self, root: &Path) -> Result<Option<AppMeta>>;
    /// Persist the record for `root`.
    fn save(&self, root: &Path, meta: &AppMeta) -> Result<()>;
    /// Delete the record for `root`; absent records are not an error.
    fn remove(&self, root: &Path) -> Result<()>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// Ownership inspection and mutation on the hosting filesystem.
pub trait Filesystem {
    /// Stat `path` without following a final symlink. `None` if missing.
    fn stat(&self, path: &Path) -> Result<Option<FileStat>>;
    /// Recursively hand every file under `root` owned by `old` to `new`.
    fn takeover_user(&self, old: &str, new: &str, root: &Path) -> Result<()>;
    /// Change the owner of the symlink itself, not its target.
    fn chown_symlink(&self, path: &Path, user: &str) -> Result<()>;
}

// ── Web Server Port ───────────────────────────────────────────────────────────

/// Hostname/path resolution and per-host protocol settings.
pub trait WebServer {
    /// Derive `(hostname, path)` from a document root; `None` when the path
    /// is only reachable through a symlink.
    fn extract_components(&self, docroot: &Path) -> Option<(String, String)>;
    /// Resolve `hostname/path` to a document root. Results may be cached;
    /// fails when the target no longer exists.
    fn normalize_path(&self, hostname: &str, path: &str) -> Result<PathBuf>;
    /// Qualify a bare hostname with the account domain.
    fn normalize_hostname(&self, hostname: &str) -> String;
    /// Whether `hostname` is served from the subdomain root.
    fn is_subdomain(&self, hostname: &str) -> bool;
    /// Directory holding `<subdomain>/html` symlinks.
    fn subdomain_root(&self) -> PathBuf;
    /// Drop every cached path resolution.
    fn purge_path_cache(&self);
    /// Permit a protocol (e.g. `http10`) for `hostname`.
    fn allow_protocol(&self, hostname: &str, protocol: &str) -> Result<()>;
    /// Forbid a protocol for `hostname`.
    fn disallow_protocol(&self, hostname: &str, protocol: &str) -> Result<()>;
}

// ── Certificate Port ──────────────────────────────────────────────────────────

/// Certificate issuance and hostname binding.
pub trait CertificateService {
    /// Whether the account may request certificates from the ACME issuer.
    fn acme_supported(&self) -> Result<bool>;
    /// Whether any certificate is installed for the account.
    fn certificate_exists(&self) -> Result<bool>;
    /// Whether the installed certificate covers `hostname`.
    fn contains_hostname(&self, hostname: &str) -> Result<bool>;
    /// Whether the installed certificate was issued by the ACME issuer.
    fn issued_by_acme(&self) -> Result<bool>;
    /// Request (or reissue) a certificate adding `hostnames`.
    fn append_hostnames(&self, hostnames: &[String]) -> Result<()>;
    /// Serve `hostname` over HTTPS with the given HSTS policy.
    fn bind(&self, hostname: &str, mode: HstsMode) -> Result<()>;
    /// Stop serving `hostname` over HTTPS.
    fn unbind(&self, hostname: &str) -> Result<()>;
}

// ── DNS Port ──────────────────────────────────────────────────────────────────

/// Lookups used only to explain certificate issuance failures.
pub trait DnsDiagnostics {
    fn public_ip(&self) -> Option<String>;
    fn resolve(&self, hostname: &str) -> Option<IpAddr>;
    /// Nameservers the domain should delegate to.
    fn hosting_nameservers(&self, domain: &str) -> Vec<String>;
    /// Nameservers the domain actually delegates to.
    fn authoritative_nameservers(&self, hostname: &str) -> Vec<String>;
}

// ── Version Control Port ──────────────────────────────────────────────────────

/// Git tracking of an application root.
pub trait VersionControl {
    fn is_valid(&self, root: &Path) -> bool;
    fn create_repository(&self, root: &Path) -> Result<()>;
    fn snapshot(&self, root: &Path, message: &str) -> Result<()>;
    fn remove(&self, root: &Path) -> Result<()>;
}

// ── Session Port ──────────────────────────────────────────────────────────────

/// Identity of the caller the panel acts for.
pub trait SessionContext {
    fn username(&self) -> String;
    /// Primary account domain.
    fn domain(&self) -> String;
    fn hsts_preference(&self) -> HstsMode;
}

// ── Manifest Port ─────────────────────────────────────────────────────────────

/// Reads the optional per-application manifest.
pub trait ManifestSource {
    fn load(&self, root: &Path) -> Result<Option<Manifest>>;
}

// ── Application Type Port ─────────────────────────────────────────────────────

/// Build the error a default capability method returns.
fn unsupported<T>(name: &str, capability: Capability) -> Result<T> {
    Err(CapabilityError::Unsupported {
        app_type: name.to_string(),
        capability: capability.as_str(),
    }
    .into())
}

/// Type-specific behaviour of one application family.
///
/// A type implements a capability only if it lists it in
/// [`capabilities`](Self::capabilities); the default bodies reject the call.
/// Callers gate every call behind the capability resolver.
pub trait AppTypeHandler {
    /// Type name, e.g. `wordpress`.
    fn name(&self) -> &str;
    /// Capabilities this type implements itself.
    fn capabilities(&self) -> CapabilitySet;
    /// An abstract type is a dispatch anchor only: it never reports
    /// type-specific capabilities as supported.
    fn is_abstract(&self) -> bool {
        false
    }
    fn default_version_lock(&self) -> VersionLock {
        VersionLock::None
    }
    /// Full reconfigurable set of the type.
    fn reconfigurables(&self) -> Vec<String> {
        GENERIC_RECONFIGURABLES.iter().map(|s| (*s).to_string()).collect()
    }
    /// Fortification modes beyond the defaults.
    fn fortification_modes(&self, _app: &AppIdentity) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
    /// Whether `installed` satisfies `target`.
    fn is_current(&self, installed: &str, target: &str) -> bool {
        version::satisfies(installed, target)
    }

    fn install(&self, _app: &AppIdentity, _options: &Options) -> Result<()> {
        unsupported(self.name(), Capability::Install)
    }
    fn uninstall(&self, _app: &AppIdentity, _scope: UninstallScope) -> Result<()> {
        unsupported(self.name(), Capability::Uninstall)
    }
    fn update(&self, _app: &AppIdentity, _version: Option<&str>) -> Result<()> {
        unsupported(self.name(), Capability::Update)
    }
    fn version(&self, _app: &AppIdentity) -> Result<Option<String>> {
        unsupported(self.name(), Capability::Version)
    }
    fn versions(&self) -> Result<Vec<String>> {
        unsupported(self.name(), Capability::Versions)
    }
    fn valid(&self, _app: &AppIdentity) -> Result<bool> {
        unsupported(self.name(), Capability::Detect)
    }
    fn admin_user(&self, _app: &AppIdentity) -> Result<String> {
        unsupported(self.name(), Capability::AdminUser)
    }
    fn change_password(&self, _app: &AppIdentity, _password: &str) -> Result<()> {
        unsupported(self.name(), Capability::ChangePassword)
    }
    fn fortify(&self, _app: &AppIdentity, _mode: &str) -> Result<()> {
        unsupported(self.name(), Capability::Fortify)
    }
    fn unfortify(&self, _app: &AppIdentity) -> Result<()> {
        unsupported(self.name(), Capability::Fortify)
    }
    fn reconfigure(&self, _app: &AppIdentity, _property: &str, _value: &Value) -> Result<()> {
        unsupported(self.name(), Capability::Reconfigure)
    }
    /// Current value of a type-declared property, if the type tracks it.
    fn get_reconfigurable(&self, _app: &AppIdentity, _property: &str) -> Result<Option<Value>> {
        Ok(None)
    }
}

impl std::fmt::Debug for dyn AppTypeHandler + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppTypeHandler")
            .field("name", &self.name())
            .field("type", &AppType::from_name(Some(self.name())))
            .finish()
    }
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
pub trait CommandRunner {
    /// Run a program and capture its output using the default timeout.
    fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    fn run_with_timeout(&self, program: &str, args: &[&str], timeout: Duration) -> Result<Output>;
    /// Run a program with stdin fed from `input`, using the default timeout.
    fn run_with_stdin(&self, program: &str, args: &[&str], input: &[u8]) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading and saving the panel configuration.
pub trait ConfigStore {
    fn load(&self) -> Result<PanelConfig>;
    fn save(&self, config: &PanelConfig) -> Result<()>;
    fn path(&self) -> Result<PathBuf>;
}
