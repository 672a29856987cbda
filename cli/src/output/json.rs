//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed object on
//! stdout; failures use the error object from [`format_error`].

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Value, json};

use crate::application::services::{AppSummary, ReconfigureOutcome};
use crate::domain::config::PanelConfig;
use crate::domain::version::VersionStatus;

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

fn print<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("JSON serialization failed")?
    );
    Ok(())
}

/// Renders command results as JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_app(&self, app: &AppSummary) -> Result<()> {
        print(app)
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_value(&self, property: &str, value: Option<&Value>) -> Result<()> {
        print(&json!({
            "property": property,
            "reconfigurable": value.is_some(),
            "value": value,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_outcome(&self, outcome: &ReconfigureOutcome) -> Result<()> {
        print(outcome)
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version_status(
        &self,
        installed: Option<&str>,
        target: &str,
        status: VersionStatus,
    ) -> Result<()> {
        print(&json!({
            "installed": installed,
            "target": target,
            "status": status,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_detect(&self, app_type: &str, present: bool) -> Result<()> {
        print(&json!({ "type": app_type, "present": present }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_verb(&self, verb: &str, location: &str, done: bool) -> Result<()> {
        print(&json!({ "verb": verb, "location": location, "done": done }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &PanelConfig, path: &Path) -> Result<()> {
        print(&json!({ "path": path, "config": config }))
    }
}
