//! Properties an application type declares beyond the built-in set.

use anyhow::{Result, bail};
use serde_json::Value;

use super::Reconfigurator;
use crate::application::services::webapp::WebApp;
use crate::domain::app_type::Capability;
use crate::domain::error::ReconfigureError;

pub(super) struct TypeDeclared {
    name: String,
}

impl TypeDeclared {
    pub(super) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Reconfigurator for TypeDeclared {
    fn name(&self) -> &str {
        &self.name
    }

    /// The type owns the domain of its own properties.
    fn validate(&self, _app: &WebApp<'_>, value: Value) -> Result<Value, ReconfigureError> {
        Ok(value)
    }

    fn current_value(&self, app: &WebApp<'_>) -> Result<Value> {
        if let Some(value) = app.handler().get_reconfigurable(app.identity(), &self.name)? {
            return Ok(value);
        }
        Ok(app.option(&self.name, Value::Null))
    }

    fn apply(&self, app: &WebApp<'_>, value: &Value) -> Result<()> {
        let Some(handler) = app.host().types.resolve(app.app_type(), Capability::Reconfigure) else {
            bail!("{} cannot reconfigure {}", app.module_name(), self.name);
        };
        handler.reconfigure(app.identity(), &self.name, value)
    }
}
