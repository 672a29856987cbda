//! `fortify`: switch the hardening mode once the batch has committed.

use anyhow::{Result, bail};
use serde_json::Value;

use super::{DeferredAction, Reconfigurator};
use crate::application::services::webapp::WebApp;
use crate::domain::error::ReconfigureError;
use crate::domain::fortify::validate_mode;

pub(super) struct Fortify;

impl Reconfigurator for Fortify {
    fn name(&self) -> &str {
        "fortify"
    }

    fn validate(&self, app: &WebApp<'_>, value: Value) -> Result<Value, ReconfigureError> {
        let Value::String(mode) = &value else {
            return Err(ReconfigureError::invalid(
                self.name(),
                format!("expected a mode name, got {value}"),
            ));
        };
        let declared = app
            .fortification_modes()
            .map_err(|err| ReconfigureError::invalid(self.name(), format!("{err:#}")))?;
        validate_mode(mode, &declared)?;
        Ok(value)
    }

    fn apply(&self, _app: &WebApp<'_>, _value: &Value) -> Result<()> {
        Ok(())
    }

    fn deferred(&self, _app: &WebApp<'_>, value: &Value) -> Option<DeferredAction> {
        Some(DeferredAction {
            property: self.name().to_string(),
            value: value.clone(),
        })
    }

    fn run_deferred(&self, app: &WebApp<'_>, action: &DeferredAction) -> Result<()> {
        let mode = action.value.as_str();
        if !app.fortify(mode)? {
            bail!("fortification is not available for {}", app.module_name());
        }
        Ok(())
    }

    fn rollback(&self, _app: &WebApp<'_>, _previous: &Value) -> Result<()> {
        Ok(())
    }
}
