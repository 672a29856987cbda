//! `migrate`: move the application to another `hostname/path`.
//!
//! Never persisted as an option. When SSL is on, the new hostname must be
//! added to the certificate before the location changes.

use anyhow::Result;
use serde_json::Value;
use tracing::{info, warn};
use webapps_common::MetaPatch;

use super::Reconfigurator;
use crate::application::services::webapp::WebApp;
use crate::domain::error::{CertificateError, ReconfigureError};
use crate::domain::location::{is_valid_hostname, join_location, split_location};
use crate::domain::options::truthy;

pub(super) struct Migrate;

impl Migrate {
    fn relocate(app: &WebApp<'_>, hostname: &str, path: &str) {
        app.meta().replace(MetaPatch::location(hostname, path));
        app.host().web.purge_path_cache();
    }
}

impl Reconfigurator for Migrate {
    fn name(&self) -> &str {
        "migrate"
    }

    fn validate(&self, _app: &WebApp<'_>, value: Value) -> Result<Value, ReconfigureError> {
        let Value::String(raw) = &value else {
            return Err(ReconfigureError::invalid(
                self.name(),
                format!("expected hostname/path, got {value}"),
            ));
        };
        let (hostname, path) = split_location(raw.trim());
        if !is_valid_hostname(&hostname) {
            return Err(ReconfigureError::invalid(
                self.name(),
                format!("`{hostname}' is not a valid hostname"),
            ));
        }
        Ok(Value::String(join_location(&hostname, &path)))
    }

    /// Location in the metadata record, which a migration updates directly.
    fn current_value(&self, app: &WebApp<'_>) -> Result<Value> {
        let meta = app.meta();
        Ok(Value::String(join_location(&meta.hostname(), &meta.path())))
    }

    fn apply(&self, app: &WebApp<'_>, value: &Value) -> Result<()> {
        let (hostname, path) = split_location(value.as_str().unwrap_or_default());
        let meta = app.meta();
        if meta.hostname() == hostname && meta.path() == path {
            return Ok(());
        }
        if truthy(&app.option("ssl", Value::Null)) {
            let qualified = app.host().web.normalize_hostname(&hostname);
            if let Err(err) = app.host().certs.append_hostnames(&[qualified.clone()]) {
                warn!(hostname = %qualified, error = %format!("{err:#}"), "certificate issuance failed");
                return Err(CertificateError::MigrationIssuance { hostname: qualified }.into());
            }
        }
        info!(
            from = %join_location(&meta.hostname(), &meta.path()),
            to = %join_location(&hostname, &path),
            "migrating"
        );
        Self::relocate(app, &hostname, &path);
        Ok(())
    }

    /// Restore the previous location without touching certificates.
    fn rollback(&self, app: &WebApp<'_>, previous: &Value) -> Result<()> {
        let (hostname, path) = split_location(previous.as_str().unwrap_or_default());
        if !hostname.is_empty() {
            Self::relocate(app, &hostname, &path);
        }
        Ok(())
    }
}
