//! `http10`: allow or refuse HTTP/1.0 requests for the hostname.

use anyhow::{Context, Result};
use serde_json::Value;

use super::{Reconfigurator, validate_bool};
use crate::application::services::webapp::WebApp;
use crate::domain::error::ReconfigureError;
use crate::domain::options::truthy;

const PROTOCOL: &str = "http10";

pub(super) struct Http10;

impl Reconfigurator for Http10 {
    fn name(&self) -> &str {
        "http10"
    }

    fn validate(&self, _app: &WebApp<'_>, value: Value) -> Result<Value, ReconfigureError> {
        validate_bool(self.name(), &value)
    }

    fn current_value(&self, app: &WebApp<'_>) -> Result<Value> {
        Ok(Value::Bool(truthy(&app.option(self.name(), Value::Bool(false)))))
    }

    fn apply(&self, app: &WebApp<'_>, value: &Value) -> Result<()> {
        let web = &app.host().web;
        let hostname = app.hostname();
        if truthy(value) {
            web.allow_protocol(hostname, PROTOCOL)
        } else {
            web.disallow_protocol(hostname, PROTOCOL)
        }
        .with_context(|| format!("toggling HTTP/1.0 on {hostname}"))
    }
}
