//! `ssl`: serve the application over HTTPS.

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

use super::{Reconfigurator, validate_bool};
use crate::application::services::webapp::WebApp;
use crate::domain::error::{CertificateError, ReconfigureError};
use crate::domain::location::{is_bare_hostname, split_host};
use crate::domain::options::truthy;

/// Knowledge base article on DNS setup, cited in issuance failures.
const DNS_KB: &str = "https://kb.apiscp.com/dns/dns-work";

pub(super) struct Ssl;

impl Ssl {
    /// Hostname to certify; bare hostnames live under the account domain.
    fn certificate_hostname(app: &WebApp<'_>) -> String {
        let hostname = app.hostname();
        if !is_bare_hostname(hostname) {
            return hostname.to_string();
        }
        let qualified = app.host().web.normalize_hostname(hostname);
        let suffix = qualified
            .strip_prefix(hostname)
            .map_or(qualified.as_str(), |rest| rest.trim_start_matches('.'));
        let message = format!(
            "Configuring SSL on global subdomains not fully supported - appending `{suffix}' to subdomain"
        );
        warn!(%hostname, %qualified, "bare hostname qualified for SSL");
        app.host().reporter.warn(&message);
        qualified
    }

    fn issuance_failure(app: &WebApp<'_>, hostname: &str) -> CertificateError {
        let dns = &app.host().dns;
        let (_, domain) = split_host(hostname);
        CertificateError::IssuanceFailed {
            hostname: hostname.to_string(),
            ip_expected: dns.public_ip().unwrap_or_default(),
            ip_actual: dns.resolve(hostname).map(|ip| ip.to_string()).unwrap_or_default(),
            ns_expected: dns.hosting_nameservers(&domain).join(", "),
            ns_actual: dns.authoritative_nameservers(hostname).join(", "),
            kb: DNS_KB.to_string(),
        }
    }

    fn enable(app: &WebApp<'_>, hostname: &str) -> Result<()> {
        let host = app.host();
        let certs = &host.certs;
        if !certs.acme_supported()? && !certs.certificate_exists()? {
            return Err(CertificateError::NotEnabled.into());
        }
        if !certs.contains_hostname(hostname)? {
            if certs.certificate_exists()? && !certs.issued_by_acme()? {
                return Err(CertificateError::NonAuthoritative {
                    hostname: hostname.to_string(),
                }
                .into());
            }
            if let Err(err) = certs.append_hostnames(&[hostname.to_string()]) {
                warn!(%hostname, error = %format!("{err:#}"), "certificate request failed");
                return Err(Self::issuance_failure(app, hostname).into());
            }
        }
        certs
            .bind(hostname, host.session.hsts_preference())
            .with_context(|| format!("binding certificate to {hostname}"))
    }
}

impl Reconfigurator for Ssl {
    fn name(&self) -> &str {
        "ssl"
    }

    fn validate(&self, _app: &WebApp<'_>, value: Value) -> Result<Value, ReconfigureError> {
        validate_bool(self.name(), &value)
    }

    fn current_value(&self, app: &WebApp<'_>) -> Result<Value> {
        Ok(Value::Bool(truthy(&app.option(self.name(), Value::Bool(false)))))
    }

    fn apply(&self, app: &WebApp<'_>, value: &Value) -> Result<()> {
        let hostname = Self::certificate_hostname(app);
        if truthy(value) {
            return Self::enable(app, &hostname);
        }
        // removal is best-effort
        if let Err(err) = app.host().certs.unbind(&hostname) {
            debug!(%hostname, error = %format!("{err:#}"), "ignoring failure to remove SSL binding");
        }
        Ok(())
    }
}
