//! `verlock`: hold updates within the installed minor or major release.

use anyhow::Result;
use serde_json::Value;

use super::Reconfigurator;
use crate::application::services::webapp::WebApp;
use crate::domain::error::ReconfigureError;
use crate::domain::version::lock_from_value;

pub(super) struct Verlock;

impl Reconfigurator for Verlock {
    fn name(&self) -> &str {
        "verlock"
    }

    /// `null` clears the lock back to the type default; `false` and `"none"`
    /// store an explicit none.
    fn validate(&self, _app: &WebApp<'_>, value: Value) -> Result<Value, ReconfigureError> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        let lock = lock_from_value(&value)
            .map_err(|reason| ReconfigureError::invalid(self.name(), reason))?;
        Ok(Value::String(lock.as_str().to_string()))
    }

    fn current_value(&self, app: &WebApp<'_>) -> Result<Value> {
        Ok(Value::String(app.version_lock().as_str().to_string()))
    }

    fn apply(&self, _app: &WebApp<'_>, _value: &Value) -> Result<()> {
        Ok(())
    }
}
