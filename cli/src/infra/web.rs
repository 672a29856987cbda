//! Web server view built from the `web` config section.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::application::ports::WebServer;
use crate::domain::config::WebConfig;
use crate::domain::location::{is_bare_hostname, qualify_hostname};
use crate::infra::hooks::Hooks;

/// Resolves hostnames against configured document roots, caching results.
pub struct ConfiguredWebServer {
    config: WebConfig,
    domain: String,
    hooks: Hooks,
    cache: RefCell<HashMap<(String, String), PathBuf>>,
}

impl ConfiguredWebServer {
    #[must_use]
    pub fn new(config: WebConfig, domain: String, hooks: Hooks) -> Self {
        Self {
            config,
            domain,
            hooks,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Every known `(hostname, document root)` pair.
    fn docroots(&self) -> Vec<(String, PathBuf)> {
        let mut roots: Vec<(String, PathBuf)> = self
            .config
            .domains
            .iter()
            .map(|(host, root)| (host.clone(), root.clone()))
            .collect();
        if !self.domain.is_empty() && !self.config.domains.contains_key(&self.domain) {
            roots.push((self.domain.clone(), self.config.main_docroot.clone()));
        }
        roots
    }

    fn hostname_root(&self, hostname: &str) -> Option<PathBuf> {
        if let Some(root) = self.config.domains.get(hostname) {
            return Some(root.clone());
        }
        if hostname == self.domain {
            return Some(self.config.main_docroot.clone());
        }
        if self.is_subdomain(hostname) {
            return Some(self.config.subdomain_root.join(hostname).join("html"));
        }
        None
    }

    /// Number of cached resolutions.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.borrow().len()
    }
}

impl WebServer for ConfiguredWebServer {
    fn extract_components(&self, docroot: &Path) -> Option<(String, String)> {
        if docroot
            .symlink_metadata()
            .is_ok_and(|m| m.file_type().is_symlink())
        {
            return None;
        }
        self.docroots()
            .into_iter()
            .filter_map(|(host, root)| {
                let rest = docroot.strip_prefix(&root).ok()?;
                Some((root.components().count(), host, rest.to_string_lossy().into_owned()))
            })
            .max_by_key(|(depth, _, _)| *depth)
            .map(|(_, host, path)| (host, path.trim_matches('/').to_string()))
    }

    fn normalize_path(&self, hostname: &str, path: &str) -> Result<PathBuf> {
        let key = (hostname.to_string(), path.to_string());
        if let Some(hit) = self.cache.borrow().get(&key) {
            return Ok(hit.clone());
        }
        let Some(root) = self.hostname_root(hostname) else {
            bail!("unknown hostname `{hostname}'");
        };
        let resolved = if path.is_empty() { root } else { root.join(path) };
        if !resolved.exists() {
            bail!("document root {} for {hostname}/{path} does not exist", resolved.display());
        }
        self.cache.borrow_mut().insert(key, resolved.clone());
        Ok(resolved)
    }

    fn normalize_hostname(&self, hostname: &str) -> String {
        qualify_hostname(hostname, &self.domain)
    }

    fn is_subdomain(&self, hostname: &str) -> bool {
        is_bare_hostname(hostname) || self.config.subdomain_root.join(hostname).is_dir()
    }

    fn subdomain_root(&self) -> PathBuf {
        self.config.subdomain_root.clone()
    }

    fn purge_path_cache(&self) {
        let purged = self.cache.borrow_mut().drain().count();
        tracing::debug!(purged, "purged path cache");
    }

    fn allow_protocol(&self, hostname: &str, protocol: &str) -> Result<()> {
        self.toggle_protocol("protocol_allow", hostname, protocol)
    }

    fn disallow_protocol(&self, hostname: &str, protocol: &str) -> Result<()> {
        self.toggle_protocol("protocol_deny", hostname, protocol)
    }
}

impl ConfiguredWebServer {
    fn toggle_protocol(&self, hook: &str, hostname: &str, protocol: &str) -> Result<()> {
        if !self.hooks.has(hook) {
            tracing::debug!(hook, hostname, protocol, "no protocol hook configured");
            return Ok(());
        }
        self.hooks
            .run(hook, &[("hostname", hostname), ("protocol", protocol)])
            .map(|_| ())
    }
}
