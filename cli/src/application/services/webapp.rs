//! Application facade: one hosted web application and its verbs.
//!
//! Imports only from `crate::domain` and `crate::application`.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use webapps_common::{MetaPatch, Options, UninstallScope, VersionLock, INSTALLING_VERSION};

use crate::application::host::HostServices;
use crate::application::meta::MetaHandle;
use crate::application::ports::{AppTypeHandler, Manifest};
use crate::application::services::reconfigure::{self, ReconfigureOutcome};
use crate::domain::app_type::{AppType, Capability};
use crate::domain::error::{CapabilityError, ReconfigureError, WebAppError};
use crate::domain::fortify::DEFAULT_FORTIFICATION;
use crate::domain::location::{AppIdentity, qualify_hostname};
use crate::domain::options::{UNINSTALL_OPTION, truthy};
use crate::domain::version::{self, VersionStatus};

/// A hosted web application bound to its document root.
///
/// Identity (hostname, path, effective type) is resolved once in [`open`]
/// and kept in step with the metadata record.
///
/// [`open`]: WebApp::open
pub struct WebApp<'h> {
    host: &'h HostServices,
    docroot: PathBuf,
    identity: AppIdentity,
    /// Type recorded in metadata, before any manifest override.
    detected: AppType,
    meta: MetaHandle,
    manifest: Option<Manifest>,
    reconfigurables: OnceCell<Vec<String>>,
}

/// Serializable view of an application, as listed by `show`.
#[derive(Debug, Clone, Serialize)]
pub struct AppSummary {
    pub docroot: PathBuf,
    pub hostname: String,
    pub path: String,
    /// Detected type (`unknown` when undetermined).
    #[serde(rename = "type")]
    pub app_type: String,
    /// Type governing dispatch.
    pub module: String,
    pub version: Option<String>,
    pub failed: bool,
    pub options: Options,
    pub reconfigurables: Vec<String>,
}

/// Where metadata for `docroot` lives: the symlink target when `docroot` is
/// a symlink, otherwise `docroot` itself.
fn meta_path_for(host: &HostServices, docroot: &Path) -> Result<PathBuf> {
    let stat = host
        .fs
        .stat(docroot)
        .with_context(|| format!("inspecting {}", docroot.display()))?;
    Ok(stat
        .and_then(|s| s.referent)
        .unwrap_or_else(|| docroot.to_path_buf()))
}

impl<'h> WebApp<'h> {
    /// Resolve the application served from `docroot`.
    ///
    /// # Errors
    ///
    /// Returns [`WebAppError::UnresolvableHost`] when neither the web server
    /// nor the metadata record can name a hostname for `docroot`, or any
    /// error from the metadata store.
    pub fn open(host: &'h HostServices, docroot: &Path) -> Result<Self> {
        let meta_path = meta_path_for(host, docroot)?;
        let meta = host.meta.open(&meta_path)?;

        let (hostname, path) = if let Some(components) = host.web.extract_components(docroot) {
            components
        } else {
            // symlinked docroot: trust the location recorded earlier
            let hostname = meta.hostname();
            if hostname.is_empty() {
                return Err(WebAppError::UnresolvableHost {
                    docroot: docroot.display().to_string(),
                }
                .into());
            }
            (hostname, meta.path())
        };
        if meta.hostname().is_empty() || meta.path() != path {
            debug!(%hostname, %path, root = %meta_path.display(), "metadata location out of sync");
            meta.replace(MetaPatch::location(hostname, path));
            host.meta.sync(&meta)?;
        }

        if meta.option("user").is_none() {
            let owner = host
                .fs
                .stat(docroot)
                .ok()
                .flatten()
                .and_then(|s| s.owner)
                .unwrap_or_else(|| host.session.username());
            meta.set_option("user", Value::String(owner));
            host.meta.sync(&meta)?;
        }

        let manifest = host
            .manifests
            .load(docroot)
            .with_context(|| format!("reading manifest in {}", docroot.display()))?;

        let detected = AppType::from_name(meta.app_type().as_deref());
        let mut effective = match &detected {
            AppType::Known(name) if !host.types.is_registered(name) => {
                debug!(app_type = %name, "recorded app type is not registered");
                AppType::Unknown
            }
            other => other.clone(),
        };
        if let Some(base) = manifest.as_ref().and_then(|m| m.base.as_deref()) {
            if host.types.is_registered(base) {
                effective = AppType::from_name(Some(base));
            } else {
                warn!(base, "unknown app type in manifest");
                host.reporter
                    .warn(&format!("Unknown app type `{base}', ignoring manifest override"));
            }
        }

        let identity = AppIdentity {
            hostname: meta.hostname(),
            path: meta.path(),
            app_type: effective,
            root: docroot.to_path_buf(),
        };

        Ok(Self {
            host,
            docroot: docroot.to_path_buf(),
            identity,
            detected,
            meta,
            manifest,
            reconfigurables: OnceCell::new(),
        })
    }

    // ── Identity ──────────────────────────────────────────────────────────────

    #[must_use]
    pub fn identity(&self) -> &AppIdentity {
        &self.identity
    }

    #[must_use]
    pub fn hostname(&self) -> &str {
        &self.identity.hostname
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.identity.path
    }

    /// The type governing dispatch.
    #[must_use]
    pub fn app_type(&self) -> &AppType {
        &self.identity.app_type
    }

    /// Name of the detected type, `unknown` when undetermined.
    #[must_use]
    pub fn handler_name(&self) -> &str {
        self.detected.handler_name()
    }

    /// Name of the dispatch type, `webapp` when undetermined.
    #[must_use]
    pub fn module_name(&self) -> &str {
        self.identity.app_type.module_name()
    }

    /// Whether the application is a concrete type worth listing.
    #[must_use]
    pub fn display(&self) -> bool {
        !self.detected.is_unknown()
    }

    #[must_use]
    pub fn document_root(&self) -> &Path {
        &self.docroot
    }

    #[must_use]
    pub fn app_root(&self) -> &Path {
        &self.identity.root
    }

    /// Path the metadata record is keyed by.
    ///
    /// # Errors
    ///
    /// Returns an error if the document root cannot be inspected.
    pub fn document_meta_path(&self) -> Result<PathBuf> {
        meta_path_for(self.host, &self.docroot)
    }

    #[must_use]
    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    #[must_use]
    pub fn has_manifest(&self) -> bool {
        self.manifest.is_some()
    }

    pub(crate) fn host(&self) -> &'h HostServices {
        self.host
    }

    pub(crate) fn meta(&self) -> &MetaHandle {
        &self.meta
    }

    /// Handler governing this application, generic when undetermined.
    pub(crate) fn handler(&self) -> &'h dyn AppTypeHandler {
        self.host.types.handler(&self.identity.app_type)
    }

    fn handler_for(&self, capability: Capability) -> Option<&'h dyn AppTypeHandler> {
        self.host.types.resolve(&self.identity.app_type, capability)
    }

    /// Report an unsupported verb; always `false`.
    fn unsupported(&self, capability: Capability) -> bool {
        let message = CapabilityError::Unsupported {
            app_type: self.module_name().to_string(),
            capability: capability.as_str(),
        }
        .to_string();
        warn!(location = %self.identity.location(), %capability, "capability not supported");
        self.host.reporter.warn(&message);
        false
    }

    /// Bring identity back in line with the metadata record after a
    /// reconfiguration moved the application.
    fn sync_identity(&mut self) {
        self.identity.hostname = self.meta.hostname();
        self.identity.path = self.meta.path();
    }

    // ── Lifecycle verbs ───────────────────────────────────────────────────────

    /// Install the application with the stored options.
    ///
    /// # Errors
    ///
    /// Returns the type's install failure; the metadata is marked failed.
    pub fn install(&self) -> Result<bool> {
        let Some(handler) = self.handler_for(Capability::Install) else {
            return Ok(self.unsupported(Capability::Install));
        };
        // a previous uninstall at this root may have left stale resolutions
        self.host.web.purge_path_cache();
        self.meta
            .replace(MetaPatch::version(Some(INSTALLING_VERSION.to_string())));
        self.host.meta.sync(&self.meta)?;

        info!(location = %self.identity.location(), app_type = handler.name(), "installing");
        if let Err(err) = handler.install(&self.identity, &self.meta.options()) {
            self.meta.replace(MetaPatch {
                version: Some(None),
                failed: Some(true),
                ..MetaPatch::default()
            });
            self.host.meta.sync(&self.meta)?;
            return Err(err.context(format!(
                "installing {} on {}",
                handler.name(),
                self.identity.location()
            )));
        }

        self.meta.replace(MetaPatch {
            app_type: Some(Some(handler.name().to_string())),
            version: Some(None),
            failed: Some(false),
            ..MetaPatch::default()
        });
        self.host.meta.sync(&self.meta)?;
        self.version(true)?;
        Ok(true)
    }

    /// Remove the application. The scope comes from the `uninstall` option.
    ///
    /// # Errors
    ///
    /// Returns the type's uninstall failure.
    pub fn uninstall(&self) -> Result<bool> {
        self.host.web.purge_path_cache();
        if self.identity.app_type.is_unknown() {
            self.host
                .reporter
                .warn("No application type detected, nothing to uninstall");
            return Ok(false);
        }
        let Some(handler) = self.handler_for(Capability::Uninstall) else {
            return Ok(self.unsupported(Capability::Uninstall));
        };
        let scope = self.uninstall_scope();
        info!(location = %self.identity.location(), %scope, "uninstalling");
        handler
            .uninstall(&self.identity, scope)
            .with_context(|| format!("uninstalling {}", self.identity.location()))?;

        if scope == UninstallScope::All {
            self.meta.replace(MetaPatch {
                app_type: Some(None),
                version: Some(None),
                failed: Some(false),
                ..MetaPatch::default()
            });
            self.host.meta.sync(&self.meta)?;
        }
        Ok(true)
    }

    fn uninstall_scope(&self) -> UninstallScope {
        match self.meta.option(UNINSTALL_OPTION) {
            None | Some(Value::Null) => UninstallScope::All,
            Some(Value::String(raw)) => raw.parse().unwrap_or_else(|_| {
                warn!(scope = %raw, "unknown uninstall scope, removing everything");
                UninstallScope::All
            }),
            Some(other) => {
                warn!(scope = %other, "unknown uninstall scope, removing everything");
                UninstallScope::All
            }
        }
    }

    /// Update to `version`, or to the newest version the type offers.
    ///
    /// With git tracking enabled a snapshot is taken first.
    ///
    /// # Errors
    ///
    /// Returns the type's update failure; the metadata is marked failed.
    pub fn update(&self, version: Option<&str>) -> Result<bool> {
        let Some(handler) = self.handler_for(Capability::Update) else {
            return Ok(self.unsupported(Capability::Update));
        };
        let current = self.version(true)?;
        if self.has_git() {
            let message = format!(
                "Pre-update snapshot ({})",
                current.as_deref().unwrap_or("unknown version")
            );
            self.host
                .vcs
                .snapshot(&self.identity.root, &message)
                .context("taking pre-update snapshot")?;
        }

        info!(
            location = %self.identity.location(),
            from = current.as_deref().unwrap_or("?"),
            to = version.unwrap_or("latest"),
            "updating"
        );
        if let Err(err) = handler.update(&self.identity, version) {
            self.meta.replace(MetaPatch::failed(true));
            self.host.meta.sync(&self.meta)?;
            return Err(err.context(format!("updating {}", self.identity.location())));
        }
        self.meta.replace(MetaPatch::failed(false));
        self.version(true)?;
        self.host.meta.sync(&self.meta)?;
        Ok(true)
    }

    /// Installed version. Cached in metadata unless `force` is set.
    ///
    /// # Errors
    ///
    /// Returns the type's detection failure or a metadata store failure.
    pub fn version(&self, force: bool) -> Result<Option<String>> {
        let Some(handler) = self.handler_for(Capability::Version) else {
            return Ok(None);
        };
        if force || self.meta.version().is_none() {
            let detected = handler
                .version(&self.identity)
                .with_context(|| format!("detecting version of {}", self.identity.location()))?;
            self.meta.replace(MetaPatch::version(detected));
            self.host.meta.sync(&self.meta)?;
        }
        Ok(self.meta.version())
    }

    /// Versions the type can install; empty when unsupported.
    ///
    /// # Errors
    ///
    /// Returns the type's lookup failure.
    pub fn versions(&self) -> Result<Vec<String>> {
        match self.handler_for(Capability::Versions) {
            Some(handler) => handler.versions(),
            None => Ok(Vec::new()),
        }
    }

    #[must_use]
    pub fn is_installing(&self) -> bool {
        self.meta.is_installing()
    }

    /// Compare the installed version against `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the installed version cannot be detected.
    pub fn version_status(&self, target: &str) -> Result<VersionStatus> {
        if self.is_installing() {
            return Ok(VersionStatus::Installing);
        }
        let handler = self.handler();
        let satisfied = self
            .version(false)?
            .is_some_and(|installed| handler.is_current(&installed, target));
        Ok(version::version_status(false, satisfied, self.version_lock()))
    }

    /// # Errors
    ///
    /// Returns an error if the installed version cannot be detected.
    pub fn needs_update(&self, target: &str) -> Result<bool> {
        Ok(self.version_status(target)? != VersionStatus::Current)
    }

    /// Stored lock, or the type default when none was set.
    #[must_use]
    pub fn version_lock(&self) -> VersionLock {
        match self.meta.option("verlock") {
            Some(value) => version::lock_from_value(&value).unwrap_or_else(|reason| {
                warn!(%reason, "ignoring stored version lock");
                VersionLock::None
            }),
            None => self.handler().default_version_lock(),
        }
    }

    /// Whether the type recognises the files at the application root.
    ///
    /// # Errors
    ///
    /// Returns the type's detection failure.
    pub fn detect(&self) -> Result<bool> {
        match self.handler_for(Capability::Detect) {
            Some(handler) => handler.valid(&self.identity),
            None => Ok(false),
        }
    }

    /// A concrete type governs the application and detects it as installed.
    ///
    /// # Errors
    ///
    /// Returns the type's detection failure.
    pub fn application_present(&self) -> Result<bool> {
        if self.identity.app_type.is_unknown() {
            return Ok(false);
        }
        self.detect()
    }

    /// Re-resolve identity and metadata from the metadata root, dropping
    /// every cached value.
    ///
    /// # Errors
    ///
    /// Returns any error [`open`](Self::open) would.
    pub fn reload(&mut self) -> Result<()> {
        let meta_path = self.document_meta_path()?;
        self.host.meta.reload(&meta_path)?;
        *self = Self::open(self.host, &meta_path)?;
        Ok(())
    }

    // ── Fortification ─────────────────────────────────────────────────────────

    /// Apply a fortification mode, `max` when none is given.
    ///
    /// # Errors
    ///
    /// Returns the handler's failure.
    pub fn fortify(&self, mode: Option<&str>) -> Result<bool> {
        let mode = mode.unwrap_or(DEFAULT_FORTIFICATION);
        let Some(handler) = self.handler_for(Capability::Fortify) else {
            return Ok(self.unsupported(Capability::Fortify));
        };
        debug!(location = %self.identity.location(), mode, handler = handler.name(), "fortifying");
        handler
            .fortify(&self.identity, mode)
            .with_context(|| format!("fortifying {} ({mode})", self.identity.location()))?;
        Ok(true)
    }

    /// # Errors
    ///
    /// Returns the handler's failure.
    pub fn release_fortify(&self) -> Result<bool> {
        let Some(handler) = self.handler_for(Capability::Fortify) else {
            return Ok(self.unsupported(Capability::Fortify));
        };
        handler
            .unfortify(&self.identity)
            .with_context(|| format!("releasing fortification on {}", self.identity.location()))?;
        Ok(true)
    }

    /// Modes the type declares. The generic application without a manifest
    /// declares none.
    ///
    /// # Errors
    ///
    /// Returns the type's lookup failure.
    pub fn fortification_modes(&self) -> Result<Vec<String>> {
        if self.identity.app_type.is_unknown() && self.manifest.is_none() {
            return Ok(Vec::new());
        }
        self.handler().fortification_modes(&self.identity)
    }

    /// # Errors
    ///
    /// Returns the type's lookup failure.
    pub fn has_fortification_mode(&self, mode: &str) -> Result<bool> {
        Ok(self.fortification_modes()?.iter().any(|m| m == mode))
    }

    /// # Errors
    ///
    /// Returns the type's lookup failure.
    pub fn has_fortification(&self) -> Result<bool> {
        Ok(!self.fortification_modes()?.is_empty())
    }

    // ── Reconfiguration ───────────────────────────────────────────────────────

    /// Properties this application accepts. Computed on first use.
    pub fn reconfigurables(&self) -> &[String] {
        self.reconfigurables
            .get_or_init(|| self.handler().reconfigurables())
    }

    #[must_use]
    pub fn has_reconfigurable(&self, property: &str) -> bool {
        self.reconfigurables().iter().any(|p| p == property)
    }

    /// Current value of a reconfigurable; `None` when not declared.
    ///
    /// # Errors
    ///
    /// Returns an error if the value has to be read from a collaborator
    /// that fails.
    pub fn reconfigurable_value(&self, property: &str) -> Result<Option<Value>> {
        if !self.has_reconfigurable(property) {
            return Ok(None);
        }
        reconfigure::property(property).current_value(self).map(Some)
    }

    /// Run one reconfiguration batch, in order.
    ///
    /// # Errors
    ///
    /// See [`ReconfigureError`]; nothing stays applied on error.
    pub fn reconfigure<I>(&mut self, batch: I) -> Result<ReconfigureOutcome, ReconfigureError>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let outcome = reconfigure::run(self, batch.into_iter().collect());
        self.sync_identity();
        outcome
    }

    /// Apply the first recognised property in `params` on its own.
    ///
    /// # Errors
    ///
    /// Returns [`WebAppError::UnknownSettings`] when nothing is recognised,
    /// otherwise the reconfiguration error.
    pub fn handle<I>(&mut self, params: I) -> Result<ReconfigureOutcome>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let Some(first) = params
            .into_iter()
            .find(|(name, _)| self.has_reconfigurable(name))
        else {
            return Err(WebAppError::UnknownSettings.into());
        };
        Ok(self.reconfigure([first])?)
    }

    // ── Options & metadata ────────────────────────────────────────────────────

    #[must_use]
    pub fn options(&self) -> Options {
        self.meta.options()
    }

    /// Option at a dotted key, or `default`.
    #[must_use]
    pub fn option(&self, key: &str, default: Value) -> Value {
        self.meta.option(key).unwrap_or(default)
    }

    /// Trusted option write; transient keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns a metadata store failure.
    pub fn set_option(&self, key: &str, value: Value) -> Result<()> {
        self.meta.set_option(key, value);
        self.host.meta.sync(&self.meta)
    }

    /// # Errors
    ///
    /// Returns a metadata store failure.
    pub fn set_options<I>(&self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.meta.set_options(fields.into_iter().collect());
        self.host.meta.sync(&self.meta)
    }

    /// Trusted replacement of top-level metadata fields.
    ///
    /// # Errors
    ///
    /// Returns a metadata store failure.
    pub fn initialize_meta(&self, patch: MetaPatch) -> Result<()> {
        self.meta.replace(patch);
        self.host.meta.sync(&self.meta)
    }

    /// # Errors
    ///
    /// Returns a metadata store failure.
    pub fn clear_failed(&self) -> Result<()> {
        self.initialize_meta(MetaPatch::failed(false))
    }

    /// Whether the last update failed.
    #[must_use]
    pub fn failed(&self) -> bool {
        self.meta.failed()
    }

    #[must_use]
    pub fn affixed(&self) -> bool {
        self.meta.option("affixed").is_some_and(|v| truthy(&v))
    }

    /// # Errors
    ///
    /// Returns the reconfiguration error.
    pub fn set_affixed(&mut self, affixed: bool) -> Result<(), ReconfigureError> {
        self.reconfigure([("affixed".to_string(), Value::Bool(affixed))])
            .map(|_| ())
    }

    // ── Accounts & certificates ───────────────────────────────────────────────

    /// Administrative login, the session user when the type has none.
    ///
    /// # Errors
    ///
    /// Returns the type's lookup failure.
    pub fn admin_user(&self) -> Result<String> {
        match self.handler_for(Capability::AdminUser) {
            Some(handler) => handler.admin_user(&self.identity),
            None => Ok(self.host.session.username()),
        }
    }

    /// # Errors
    ///
    /// Returns the type's failure.
    pub fn change_password(&self, password: &str) -> Result<bool> {
        let Some(handler) = self.handler_for(Capability::ChangePassword) else {
            let message = WebAppError::PasswordChangeUnsupported(self.module_name().to_string());
            self.host.reporter.warn(&message.to_string());
            return Ok(false);
        };
        handler
            .change_password(&self.identity, password)
            .with_context(|| format!("changing password on {}", self.identity.location()))?;
        Ok(true)
    }

    /// Hostname qualified with the account domain when bare.
    #[must_use]
    pub fn qualified_hostname(&self) -> String {
        qualify_hostname(&self.identity.hostname, &self.host.session.domain())
    }

    /// Whether the installed certificate covers this hostname.
    ///
    /// # Errors
    ///
    /// Returns the certificate service failure.
    pub fn ssl_present(&self) -> Result<bool> {
        self.host.certs.contains_hostname(&self.qualified_hostname())
    }

    #[must_use]
    pub fn has_git(&self) -> bool {
        self.host.vcs.is_valid(&self.identity.root)
    }

    /// Snapshot of identity, version and settings.
    ///
    /// # Errors
    ///
    /// Returns the type's version detection failure.
    pub fn summary(&self) -> Result<AppSummary> {
        Ok(AppSummary {
            docroot: self.docroot.clone(),
            hostname: self.identity.hostname.clone(),
            path: self.identity.path.clone(),
            app_type: self.handler_name().to_string(),
            module: self.module_name().to_string(),
            version: self.version(false)?,
            failed: self.failed(),
            options: self.options(),
            reconfigurables: self.reconfigurables().to_vec(),
        })
    }
}

impl std::fmt::Debug for WebApp<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebApp")
            .field("docroot", &self.docroot)
            .field("identity", &self.identity)
            .field("detected", &self.detected)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Display for WebApp<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.handler_name())
    }
}
