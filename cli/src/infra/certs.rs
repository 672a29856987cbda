//! Certificate service driven by the `certificates` hooks.
//!
//! Query hooks answer through their exit status; a missing query hook
//! answers `false`. Action hooks must be configured.

use anyhow::Result;
use webapps_common::HstsMode;

use crate::application::ports::CertificateService;
use crate::infra::hooks::Hooks;

pub struct HookCertificateService {
    hooks: Hooks,
}

impl HookCertificateService {
    #[must_use]
    pub fn new(hooks: Hooks) -> Self {
        Self { hooks }
    }

    fn query(&self, hook: &str, vars: &[(&str, &str)]) -> Result<bool> {
        if !self.hooks.has(hook) {
            return Ok(false);
        }
        self.hooks.test(hook, vars)
    }
}

impl CertificateService for HookCertificateService {
    fn acme_supported(&self) -> Result<bool> {
        self.query("acme_supported", &[])
    }

    fn certificate_exists(&self) -> Result<bool> {
        self.query("cert_exists", &[])
    }

    fn contains_hostname(&self, hostname: &str) -> Result<bool> {
        self.query("contains", &[("hostname", hostname)])
    }

    fn issued_by_acme(&self) -> Result<bool> {
        self.query("is_acme_issuer", &[])
    }

    fn append_hostnames(&self, hostnames: &[String]) -> Result<()> {
        let joined = hostnames.join(",");
        self.hooks
            .run("append", &[("hostnames", joined.as_str())])
            .map(|_| ())
    }

    fn bind(&self, hostname: &str, mode: HstsMode) -> Result<()> {
        self.hooks
            .run("bind", &[("hostname", hostname), ("hsts", mode.as_str())])
            .map(|_| ())
    }

    fn unbind(&self, hostname: &str) -> Result<()> {
        self.hooks.run("unbind", &[("hostname", hostname)]).map(|_| ())
    }
}
