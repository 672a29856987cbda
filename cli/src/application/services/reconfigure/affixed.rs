//! `affixed`: pin the application in listings. Stored only.

use anyhow::Result;
use serde_json::Value;

use super::{Reconfigurator, validate_bool};
use crate::application::services::webapp::WebApp;
use crate::domain::error::ReconfigureError;

pub(super) struct Affixed;

impl Reconfigurator for Affixed {
    fn name(&self) -> &str {
        "affixed"
    }

    fn validate(&self, _app: &WebApp<'_>, value: Value) -> Result<Value, ReconfigureError> {
        validate_bool(self.name(), &value)
    }

    fn current_value(&self, app: &WebApp<'_>) -> Result<Value> {
        Ok(Value::Bool(app.affixed()))
    }

    fn apply(&self, _app: &WebApp<'_>, _value: &Value) -> Result<()> {
        Ok(())
    }
}
