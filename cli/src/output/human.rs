//! Human-readable terminal renderer.

use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize as _;
use serde_json::Value;

use crate::application::services::{AppSummary, ReconfigureOutcome};
use crate::domain::config::PanelConfig;
use crate::domain::location::join_location;
use crate::domain::version::VersionStatus;
use crate::infra::config::CONFIG_ENV;
use crate::output::OutputContext;

/// Renders command results as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render identity, version and settings of one application.
    pub fn render_app(&self, app: &AppSummary) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.header(&join_location(&app.hostname, &app.path));
        println!();
        self.ctx.kv("Root:    ", &app.docroot.display().to_string());
        let app_type = if app.app_type == app.module {
            app.app_type.clone()
        } else {
            format!("{} (as {})", app.app_type, app.module)
        };
        self.ctx.kv("Type:    ", &app_type);
        self.ctx
            .kv("Version: ", app.version.as_deref().unwrap_or("-"));
        if app.failed {
            self.ctx.warn("Last update failed");
        }

        println!();
        println!("  {}", "Settings:".style(self.ctx.styles.bold));
        for property in &app.reconfigurables {
            let value = app
                .options
                .get(property)
                .map_or_else(|| "-".to_string(), display_value);
            println!("    {property:<12} {value}");
        }
        let extra: Vec<_> = app
            .options
            .iter()
            .filter(|(k, _)| !app.reconfigurables.contains(*k))
            .collect();
        for (key, value) in extra {
            println!(
                "    {}",
                format!("{key:<12} {}", display_value(value)).style(self.ctx.styles.dim)
            );
        }
        println!();
    }

    /// Render the current value of one setting.
    pub fn render_value(&self, property: &str, value: Option<&Value>) {
        match value {
            Some(value) => println!("{}", display_value(value)),
            None => self
                .ctx
                .warn(&format!("`{property}' is not a setting of this application")),
        }
    }

    /// Render a committed reconfiguration batch.
    pub fn render_outcome(&self, outcome: &ReconfigureOutcome) {
        for property in &outcome.applied {
            self.ctx.success(&format!("Set {property}"));
        }
        for failure in &outcome.post_commit {
            self.ctx
                .warn(&format!("{}: {}", failure.property, failure.message));
        }
    }

    pub fn render_version_status(&self, installed: Option<&str>, target: &str, status: VersionStatus) {
        let installed = installed.unwrap_or("unknown");
        match status {
            VersionStatus::Current => self
                .ctx
                .success(&format!("{installed} satisfies {target}")),
            VersionStatus::Outdated => self
                .ctx
                .warn(&format!("{installed} is older than {target}")),
            VersionStatus::Locked => self
                .ctx
                .info(&format!("{installed} satisfies {target} but a version lock is set")),
            VersionStatus::Installing => self.ctx.info("Installation in progress"),
        }
    }

    pub fn render_detect(&self, app_type: &str, present: bool) {
        if present {
            self.ctx.success(&format!("{app_type} detected"));
        } else {
            self.ctx.warn(&format!("{app_type} not detected"));
        }
    }

    pub fn render_verb(&self, verb: &str, location: &str, done: bool) {
        if done {
            self.ctx.success(&format!("{verb} {location}"));
        }
    }

    /// Render the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized.
    pub fn render_config(&self, config: &PanelConfig, path: &Path) -> Result<()> {
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        for line in serde_yaml::to_string(config)?.lines() {
            println!("  {line}");
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in [CONFIG_ENV, "WEBAPPS_LOG", "NO_COLOR"] {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
        Ok(())
    }
}

/// Strings print bare, everything else as compact JSON.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
