//! Shared in-memory collaborators for unit tests.
//!
//! Every fake is a cheap clone around shared state, so a test keeps one
//! copy for assertions while [`World::host`] boxes another into the
//! [`HostServices`] under test. Side effects are appended to a common
//! journal to make ordering observable across collaborators.

#![allow(dead_code, clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Result, bail};
use serde_json::Value;
use webapps_cli::application::{
    AppTypeHandler, CapabilityResolver, CertificateService, DnsDiagnostics, FileKind, FileStat,
    Filesystem, HostServices, Manifest, ManifestSource, MetaManager, MetaStore, ProgressReporter,
    SessionContext, VersionControl, WebServer,
};
use webapps_cli::domain::location::{AppIdentity, qualify_hostname};
use webapps_cli::domain::options::GENERIC_RECONFIGURABLES;
use webapps_cli::domain::{Capability, CapabilitySet, GENERIC_TYPE};
use webapps_common::{AppMeta, HstsMode, Options, UninstallScope};

pub const DOCROOT: &str = "/var/www/html/blog";
pub const HOSTNAME: &str = "example.com";
pub const APP_PATH: &str = "blog";
pub const OWNER: &str = "webuser";
pub const ACCOUNT_DOMAIN: &str = "example.com";

// ── Journal ───────────────────────────────────────────────────────────────────

/// Ordered record of side effects across every fake.
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.borrow_mut().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.borrow().clone()
    }

    /// Index of the first entry starting with `prefix`.
    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.0.borrow().iter().position(|e| e.starts_with(prefix))
    }

    pub fn contains(&self, prefix: &str) -> bool {
        self.position(prefix).is_some()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

// ── Metadata store ────────────────────────────────────────────────────────────

#[derive(Default)]
struct StoreState {
    records: RefCell<HashMap<PathBuf, AppMeta>>,
    fail_save: Cell<bool>,
    saves: Cell<usize>,
}

#[derive(Clone, Default)]
pub struct MemoryMetaStore {
    state: Rc<StoreState>,
    journal: Journal,
}

impl MemoryMetaStore {
    pub fn insert(&self, root: &str, meta: AppMeta) {
        self.state.records.borrow_mut().insert(PathBuf::from(root), meta);
    }

    pub fn get(&self, root: &str) -> Option<AppMeta> {
        self.state.records.borrow().get(Path::new(root)).cloned()
    }

    pub fn fail_saves(&self, fail: bool) {
        self.state.fail_save.set(fail);
    }

    pub fn saves(&self) -> usize {
        self.state.saves.get()
    }
}

impl MetaStore for MemoryMetaStore {
    fn load(&self, root: &Path) -> Result<Option<AppMeta>> {
        Ok(self.state.records.borrow().get(root).cloned())
    }

    fn save(&self, root: &Path, meta: &AppMeta) -> Result<()> {
        if self.state.fail_save.get() {
            bail!("metadata store is read-only");
        }
        self.state.saves.set(self.state.saves.get() + 1);
        self.state
            .records
            .borrow_mut()
            .insert(root.to_path_buf(), meta.clone());
        self.journal.push(format!("store.save {}", root.display()));
        Ok(())
    }

    fn remove(&self, root: &Path) -> Result<()> {
        self.state.records.borrow_mut().remove(root);
        Ok(())
    }
}

// ── Filesystem ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct FsState {
    owners: RefCell<HashMap<PathBuf, String>>,
    symlinks: RefCell<HashMap<PathBuf, PathBuf>>,
    fail_takeover: Cell<bool>,
}

#[derive(Clone, Default)]
pub struct FakeFs {
    state: Rc<FsState>,
    journal: Journal,
}

impl FakeFs {
    pub fn add_dir(&self, path: &str, owner: &str) {
        self.state
            .owners
            .borrow_mut()
            .insert(PathBuf::from(path), owner.to_string());
    }

    pub fn add_symlink(&self, path: &str, target: &str, owner: &str) {
        self.state
            .symlinks
            .borrow_mut()
            .insert(PathBuf::from(path), PathBuf::from(target));
        self.add_dir(path, owner);
    }

    pub fn owner(&self, path: &str) -> Option<String> {
        self.state.owners.borrow().get(Path::new(path)).cloned()
    }

    pub fn fail_takeover(&self, fail: bool) {
        self.state.fail_takeover.set(fail);
    }
}

impl Filesystem for FakeFs {
    fn stat(&self, path: &Path) -> Result<Option<FileStat>> {
        let owner = self.state.owners.borrow().get(path).cloned();
        if let Some(target) = self.state.symlinks.borrow().get(path) {
            return Ok(Some(FileStat {
                owner,
                kind: FileKind::Symlink,
                referent: Some(target.clone()),
            }));
        }
        Ok(owner.map(|owner| FileStat {
            owner: Some(owner),
            kind: FileKind::Directory,
            referent: None,
        }))
    }

    fn takeover_user(&self, old: &str, new: &str, root: &Path) -> Result<()> {
        self.journal
            .push(format!("fs.takeover {old} {new} {}", root.display()));
        if self.state.fail_takeover.get() {
            bail!("chown: operation not permitted");
        }
        // a symlinked root is followed, like the host adapter does
        let target = self
            .state
            .symlinks
            .borrow()
            .get(root)
            .cloned()
            .unwrap_or_else(|| root.to_path_buf());
        for (path, owner) in self.state.owners.borrow_mut().iter_mut() {
            if path.starts_with(&target) && owner == old {
                *owner = new.to_string();
            }
        }
        Ok(())
    }

    fn chown_symlink(&self, path: &Path, user: &str) -> Result<()> {
        self.journal
            .push(format!("fs.chown_symlink {} {user}", path.display()));
        self.state
            .owners
            .borrow_mut()
            .insert(path.to_path_buf(), user.to_string());
        Ok(())
    }
}

// ── Web server ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct WebState {
    components: RefCell<HashMap<PathBuf, (String, String)>>,
    subdomains: RefCell<BTreeSet<String>>,
    protocols: RefCell<BTreeSet<(String, String)>>,
    fail_protocol: Cell<bool>,
    purges: Cell<usize>,
}

#[derive(Clone, Default)]
pub struct FakeWeb {
    state: Rc<WebState>,
    journal: Journal,
}

impl FakeWeb {
    pub fn map(&self, docroot: &str, hostname: &str, path: &str) {
        self.state.components.borrow_mut().insert(
            PathBuf::from(docroot),
            (hostname.to_string(), path.to_string()),
        );
    }

    pub fn unmap(&self, docroot: &str) {
        self.state.components.borrow_mut().remove(Path::new(docroot));
    }

    pub fn add_subdomain(&self, hostname: &str) {
        self.state.subdomains.borrow_mut().insert(hostname.to_string());
    }

    pub fn protocol_allowed(&self, hostname: &str, protocol: &str) -> bool {
        self.state
            .protocols
            .borrow()
            .contains(&(hostname.to_string(), protocol.to_string()))
    }

    pub fn fail_protocol(&self, fail: bool) {
        self.state.fail_protocol.set(fail);
    }

    pub fn purges(&self) -> usize {
        self.state.purges.get()
    }
}

impl WebServer for FakeWeb {
    fn extract_components(&self, docroot: &Path) -> Option<(String, String)> {
        self.state.components.borrow().get(docroot).cloned()
    }

    fn normalize_path(&self, hostname: &str, path: &str) -> Result<PathBuf> {
        let found = self
            .state
            .components
            .borrow()
            .iter()
            .find(|(_, (h, p))| h == hostname && p == path)
            .map(|(docroot, _)| docroot.clone());
        match found {
            Some(docroot) => Ok(docroot),
            None => bail!("{hostname}/{path} is not served"),
        }
    }

    fn normalize_hostname(&self, hostname: &str) -> String {
        qualify_hostname(hostname, ACCOUNT_DOMAIN)
    }

    fn is_subdomain(&self, hostname: &str) -> bool {
        self.state.subdomains.borrow().contains(hostname)
    }

    fn subdomain_root(&self) -> PathBuf {
        PathBuf::from("/var/www/subdomains")
    }

    fn purge_path_cache(&self) {
        self.state.purges.set(self.state.purges.get() + 1);
        self.journal.push("web.purge");
    }

    fn allow_protocol(&self, hostname: &str, protocol: &str) -> Result<()> {
        self.journal.push(format!("web.allow {protocol} {hostname}"));
        if self.state.fail_protocol.get() {
            bail!("web server refused configuration change");
        }
        self.state
            .protocols
            .borrow_mut()
            .insert((hostname.to_string(), protocol.to_string()));
        Ok(())
    }

    fn disallow_protocol(&self, hostname: &str, protocol: &str) -> Result<()> {
        self.journal.push(format!("web.disallow {protocol} {hostname}"));
        if self.state.fail_protocol.get() {
            bail!("web server refused configuration change");
        }
        self.state
            .protocols
            .borrow_mut()
            .remove(&(hostname.to_string(), protocol.to_string()));
        Ok(())
    }
}

// ── Certificates ──────────────────────────────────────────────────────────────

struct CertState {
    acme: Cell<bool>,
    exists: Cell<bool>,
    issued_by_acme: Cell<bool>,
    fail_append: Cell<bool>,
    hostnames: RefCell<BTreeSet<String>>,
    bound: RefCell<BTreeMap<String, HstsMode>>,
}

impl Default for CertState {
    fn default() -> Self {
        Self {
            acme: Cell::new(true),
            exists: Cell::new(false),
            issued_by_acme: Cell::new(true),
            fail_append: Cell::new(false),
            hostnames: RefCell::new(BTreeSet::new()),
            bound: RefCell::new(BTreeMap::new()),
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeCerts {
    state: Rc<CertState>,
    journal: Journal,
}

impl FakeCerts {
    pub fn set_acme(&self, supported: bool) {
        self.state.acme.set(supported);
    }

    /// Install a certificate from a third-party issuer.
    pub fn install_foreign(&self, hostnames: &[&str]) {
        self.state.exists.set(true);
        self.state.issued_by_acme.set(false);
        let mut names = self.state.hostnames.borrow_mut();
        names.extend(hostnames.iter().map(|h| (*h).to_string()));
    }

    pub fn fail_append(&self, fail: bool) {
        self.state.fail_append.set(fail);
    }

    pub fn covers(&self, hostname: &str) -> bool {
        self.state.hostnames.borrow().contains(hostname)
    }

    pub fn bound(&self, hostname: &str) -> Option<HstsMode> {
        self.state.bound.borrow().get(hostname).copied()
    }
}

impl CertificateService for FakeCerts {
    fn acme_supported(&self) -> Result<bool> {
        Ok(self.state.acme.get())
    }

    fn certificate_exists(&self) -> Result<bool> {
        Ok(self.state.exists.get())
    }

    fn contains_hostname(&self, hostname: &str) -> Result<bool> {
        Ok(self.covers(hostname))
    }

    fn issued_by_acme(&self) -> Result<bool> {
        Ok(self.state.issued_by_acme.get())
    }

    fn append_hostnames(&self, hostnames: &[String]) -> Result<()> {
        self.journal
            .push(format!("certs.append {}", hostnames.join(",")));
        if self.state.fail_append.get() {
            bail!("acme challenge failed");
        }
        self.state.exists.set(true);
        self.state.issued_by_acme.set(true);
        self.state
            .hostnames
            .borrow_mut()
            .extend(hostnames.iter().cloned());
        Ok(())
    }

    fn bind(&self, hostname: &str, mode: HstsMode) -> Result<()> {
        self.journal.push(format!("certs.bind {hostname} {mode}"));
        self.state
            .bound
            .borrow_mut()
            .insert(hostname.to_string(), mode);
        Ok(())
    }

    fn unbind(&self, hostname: &str) -> Result<()> {
        self.journal.push(format!("certs.unbind {hostname}"));
        if self.state.bound.borrow_mut().remove(hostname).is_none() {
            bail!("{hostname} is not bound");
        }
        Ok(())
    }
}

// ── DNS ───────────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct FakeDns;

impl DnsDiagnostics for FakeDns {
    fn public_ip(&self) -> Option<String> {
        Some("203.0.113.10".to_string())
    }

    fn resolve(&self, _hostname: &str) -> Option<IpAddr> {
        Some(IpAddr::V4(Ipv4Addr::new(198, 51, 100, 7)))
    }

    fn hosting_nameservers(&self, _domain: &str) -> Vec<String> {
        vec!["ns1.hosting.test".to_string(), "ns2.hosting.test".to_string()]
    }

    fn authoritative_nameservers(&self, _hostname: &str) -> Vec<String> {
        vec!["ns1.registrar.test".to_string()]
    }
}

// ── Version control ───────────────────────────────────────────────────────────

#[derive(Default)]
struct VcsState {
    repos: RefCell<BTreeSet<PathBuf>>,
    fail_snapshot: Cell<bool>,
}

#[derive(Clone, Default)]
pub struct FakeVcs {
    state: Rc<VcsState>,
    journal: Journal,
}

impl FakeVcs {
    pub fn add_repo(&self, root: &str) {
        self.state.repos.borrow_mut().insert(PathBuf::from(root));
    }

    pub fn has_repo(&self, root: &str) -> bool {
        self.state.repos.borrow().contains(Path::new(root))
    }

    pub fn fail_snapshot(&self, fail: bool) {
        self.state.fail_snapshot.set(fail);
    }
}

impl VersionControl for FakeVcs {
    fn is_valid(&self, root: &Path) -> bool {
        self.state.repos.borrow().contains(root)
    }

    fn create_repository(&self, root: &Path) -> Result<()> {
        self.journal.push(format!("vcs.init {}", root.display()));
        self.state.repos.borrow_mut().insert(root.to_path_buf());
        Ok(())
    }

    fn snapshot(&self, root: &Path, message: &str) -> Result<()> {
        self.journal
            .push(format!("vcs.snapshot {} {message}", root.display()));
        if self.state.fail_snapshot.get() {
            bail!("nothing to commit");
        }
        Ok(())
    }

    fn remove(&self, root: &Path) -> Result<()> {
        self.journal.push(format!("vcs.remove {}", root.display()));
        self.state.repos.borrow_mut().remove(root);
        Ok(())
    }
}

// ── Session & manifests ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct FakeSession {
    pub username: String,
    pub domain: String,
    pub hsts: HstsMode,
}

impl Default for FakeSession {
    fn default() -> Self {
        Self {
            username: OWNER.to_string(),
            domain: ACCOUNT_DOMAIN.to_string(),
            hsts: HstsMode::On,
        }
    }
}

impl SessionContext for FakeSession {
    fn username(&self) -> String {
        self.username.clone()
    }

    fn domain(&self) -> String {
        self.domain.clone()
    }

    fn hsts_preference(&self) -> HstsMode {
        self.hsts
    }
}

#[derive(Clone, Default)]
pub struct FakeManifests(Rc<RefCell<HashMap<PathBuf, Manifest>>>);

impl FakeManifests {
    pub fn set_base(&self, root: &str, base: &str) {
        self.0.borrow_mut().insert(
            PathBuf::from(root),
            Manifest {
                base: Some(base.to_string()),
                description: None,
            },
        );
    }
}

impl ManifestSource for FakeManifests {
    fn load(&self, root: &Path) -> Result<Option<Manifest>> {
        Ok(self.0.borrow().get(root).cloned())
    }
}

// ── Reporter ──────────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingReporter {
    warnings: Rc<RefCell<Vec<String>>>,
    steps: Rc<RefCell<Vec<String>>>,
}

impl RecordingReporter {
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.steps.borrow_mut().push(message.to_string());
    }

    fn success(&self, message: &str) {
        self.steps.borrow_mut().push(message.to_string());
    }

    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}

// ── Application types ─────────────────────────────────────────────────────────

struct TypeState {
    name: String,
    caps: CapabilitySet,
    is_abstract: bool,
    extra_reconfigurables: Vec<String>,
    modes: Vec<String>,
    version: RefCell<Option<String>>,
    fail_install: Cell<bool>,
    installed: Cell<bool>,
    reconfigured: RefCell<BTreeMap<String, Value>>,
    calls: RefCell<Vec<String>>,
}

/// Configurable [`AppTypeHandler`] recording every verb it receives.
#[derive(Clone)]
pub struct FakeType {
    state: Rc<TypeState>,
}

impl FakeType {
    pub fn new(name: &str, caps: &[Capability]) -> Self {
        Self {
            state: Rc::new(TypeState {
                name: name.to_string(),
                caps: caps.iter().copied().collect(),
                is_abstract: false,
                extra_reconfigurables: Vec::new(),
                modes: Vec::new(),
                version: RefCell::new(None),
                fail_install: Cell::new(false),
                installed: Cell::new(false),
                reconfigured: RefCell::new(BTreeMap::new()),
                calls: RefCell::new(Vec::new()),
            }),
        }
    }

    /// The generic web application: abstract, serving the shared verbs.
    pub fn generic() -> Self {
        Self::generic_with(&[Capability::Fortify, Capability::Reconfigure])
    }

    /// A generic web application serving only `caps`.
    pub fn generic_with(caps: &[Capability]) -> Self {
        let mut fake = Self::new(GENERIC_TYPE, caps);
        if let Some(state) = Rc::get_mut(&mut fake.state) {
            state.is_abstract = true;
        }
        fake
    }

    /// A concrete type supporting every capability.
    pub fn full(name: &str) -> Self {
        Self::new(name, &Capability::ALL)
    }

    pub fn with_reconfigurables(mut self, extra: &[&str]) -> Self {
        if let Some(state) = Rc::get_mut(&mut self.state) {
            state.extra_reconfigurables = extra.iter().map(|s| (*s).to_string()).collect();
        }
        self
    }

    pub fn with_modes(mut self, modes: &[&str]) -> Self {
        if let Some(state) = Rc::get_mut(&mut self.state) {
            state.modes = modes.iter().map(|s| (*s).to_string()).collect();
        }
        self
    }

    pub fn with_version(self, version: &str) -> Self {
        *self.state.version.borrow_mut() = Some(version.to_string());
        self
    }

    pub fn fail_install(&self, fail: bool) {
        self.state.fail_install.set(fail);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.calls.borrow().clone()
    }

    pub fn reconfigured(&self, property: &str) -> Option<Value> {
        self.state.reconfigured.borrow().get(property).cloned()
    }

    fn record(&self, call: impl Into<String>) {
        self.state.calls.borrow_mut().push(call.into());
    }
}

impl AppTypeHandler for FakeType {
    fn name(&self) -> &str {
        &self.state.name
    }

    fn capabilities(&self) -> CapabilitySet {
        self.state.caps.clone()
    }

    fn is_abstract(&self) -> bool {
        self.state.is_abstract
    }

    fn reconfigurables(&self) -> Vec<String> {
        GENERIC_RECONFIGURABLES
            .iter()
            .map(|s| (*s).to_string())
            .chain(self.state.extra_reconfigurables.iter().cloned())
            .collect()
    }

    fn fortification_modes(&self, _app: &AppIdentity) -> Result<Vec<String>> {
        Ok(self.state.modes.clone())
    }

    fn install(&self, app: &AppIdentity, _options: &Options) -> Result<()> {
        self.record(format!("install {}", app.location()));
        if self.state.fail_install.get() {
            bail!("database creation failed");
        }
        self.state.installed.set(true);
        Ok(())
    }

    fn uninstall(&self, app: &AppIdentity, scope: UninstallScope) -> Result<()> {
        self.record(format!("uninstall {} {scope}", app.location()));
        self.state.installed.set(false);
        Ok(())
    }

    fn update(&self, app: &AppIdentity, version: Option<&str>) -> Result<()> {
        self.record(format!("update {} {}", app.location(), version.unwrap_or("latest")));
        if let Some(version) = version {
            *self.state.version.borrow_mut() = Some(version.to_string());
        }
        Ok(())
    }

    fn version(&self, _app: &AppIdentity) -> Result<Option<String>> {
        Ok(self.state.version.borrow().clone())
    }

    fn versions(&self) -> Result<Vec<String>> {
        Ok(vec!["6.3.0".to_string(), "6.4.1".to_string()])
    }

    fn valid(&self, _app: &AppIdentity) -> Result<bool> {
        Ok(self.state.installed.get() || self.state.version.borrow().is_some())
    }

    fn admin_user(&self, _app: &AppIdentity) -> Result<String> {
        Ok("admin".to_string())
    }

    fn change_password(&self, app: &AppIdentity, _password: &str) -> Result<()> {
        self.record(format!("change_password {}", app.location()));
        Ok(())
    }

    fn fortify(&self, app: &AppIdentity, mode: &str) -> Result<()> {
        self.record(format!("fortify {} {mode}", app.location()));
        Ok(())
    }

    fn unfortify(&self, app: &AppIdentity) -> Result<()> {
        self.record(format!("unfortify {}", app.location()));
        Ok(())
    }

    fn reconfigure(&self, _app: &AppIdentity, property: &str, value: &Value) -> Result<()> {
        self.record(format!("reconfigure {property}"));
        self.state
            .reconfigured
            .borrow_mut()
            .insert(property.to_string(), value.clone());
        Ok(())
    }

    fn get_reconfigurable(&self, _app: &AppIdentity, property: &str) -> Result<Option<Value>> {
        Ok(self.state.reconfigured.borrow().get(property).cloned())
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

/// A hosting account with one document root, `/var/www/html/blog`, served
/// as `example.com/blog` and owned by `webuser`.
pub struct World {
    pub journal: Journal,
    pub store: MemoryMetaStore,
    pub fs: FakeFs,
    pub web: FakeWeb,
    pub certs: FakeCerts,
    pub vcs: FakeVcs,
    pub session: FakeSession,
    pub manifests: FakeManifests,
    pub reporter: RecordingReporter,
    pub generic: FakeType,
    types: Vec<FakeType>,
}

impl World {
    pub fn new() -> Self {
        let journal = Journal::default();
        let world = Self {
            store: MemoryMetaStore {
                journal: journal.clone(),
                ..MemoryMetaStore::default()
            },
            fs: FakeFs {
                journal: journal.clone(),
                ..FakeFs::default()
            },
            web: FakeWeb {
                journal: journal.clone(),
                ..FakeWeb::default()
            },
            certs: FakeCerts {
                journal: journal.clone(),
                ..FakeCerts::default()
            },
            vcs: FakeVcs {
                journal: journal.clone(),
                ..FakeVcs::default()
            },
            journal,
            session: FakeSession::default(),
            manifests: FakeManifests::default(),
            reporter: RecordingReporter::default(),
            generic: FakeType::generic(),
            types: Vec::new(),
        };
        world.fs.add_dir(DOCROOT, OWNER);
        world.web.map(DOCROOT, HOSTNAME, APP_PATH);
        world
    }

    /// Register an application type.
    pub fn with_type(mut self, fake: FakeType) -> Self {
        self.types.push(fake);
        self
    }

    /// Record `app_type` as detected for the document root.
    pub fn with_detected(self, app_type: &str) -> Self {
        self.store.insert(
            DOCROOT,
            AppMeta {
                hostname: HOSTNAME.to_string(),
                path: APP_PATH.to_string(),
                app_type: Some(app_type.to_string()),
                ..AppMeta::default()
            },
        );
        self
    }

    pub fn host(&self) -> HostServices {
        self.host_with_certs(Box::new(self.certs.clone()))
    }

    /// Like [`host`](Self::host) with a different certificate service.
    pub fn host_with_certs(&self, certs: Box<dyn CertificateService>) -> HostServices {
        let mut types = CapabilityResolver::new(Box::new(self.generic.clone()));
        for fake in &self.types {
            types.register(Box::new(fake.clone()));
        }
        HostServices {
            meta: MetaManager::new(Box::new(self.store.clone())),
            types,
            fs: Box::new(self.fs.clone()),
            web: Box::new(self.web.clone()),
            certs,
            dns: Box::new(FakeDns),
            vcs: Box::new(self.vcs.clone()),
            session: Box::new(self.session.clone()),
            manifests: Box::new(self.manifests.clone()),
            reporter: Box::new(self.reporter.clone()),
        }
    }

    /// Stored options of the document root.
    pub fn stored_options(&self) -> Options {
        self.store
            .get(DOCROOT)
            .map(|meta| meta.options)
            .unwrap_or_default()
    }
}

pub fn docroot() -> &'static Path {
    Path::new(DOCROOT)
}
