//! `autoupdate`: opt in to unattended updates. Enabled unless turned off.

use anyhow::Result;
use serde_json::Value;

use super::{Reconfigurator, validate_bool};
use crate::application::services::webapp::WebApp;
use crate::domain::error::ReconfigureError;

pub(super) struct Autoupdate;

impl Reconfigurator for Autoupdate {
    fn name(&self) -> &str {
        "autoupdate"
    }

    fn validate(&self, _app: &WebApp<'_>, value: Value) -> Result<Value, ReconfigureError> {
        validate_bool(self.name(), &value)
    }

    fn current_value(&self, app: &WebApp<'_>) -> Result<Value> {
        match app.option(self.name(), Value::Null) {
            Value::Null => Ok(Value::Bool(true)),
            value => Ok(value),
        }
    }

    fn apply(&self, _app: &WebApp<'_>, _value: &Value) -> Result<()> {
        Ok(())
    }
}
