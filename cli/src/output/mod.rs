//! Output formatting module

pub mod human;
pub mod json;
pub mod progress;
pub mod reporter;
pub mod styles;

use std::path::Path;

use anyhow::Result;
use console::Term;
use owo_colors::OwoColorize as _;
use serde_json::Value;
pub use styles::Styles;

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use reporter::TerminalReporter;

use crate::application::services::{AppSummary, ReconfigureOutcome};
use crate::domain::config::PanelConfig;
use crate::domain::version::VersionStatus;

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Check if progress indicators should be shown.
    #[must_use]
    pub fn show_progress(&self) -> bool {
        self.is_tty && !self.quiet
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Renders command results in the active output mode.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_app(&self, app: &AppSummary) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_app(app);
                Ok(())
            }
            Renderer::Json(r) => r.render_app(app),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_value(&self, property: &str, value: Option<&Value>) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_value(property, value);
                Ok(())
            }
            Renderer::Json(r) => r.render_value(property, value),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_outcome(&self, outcome: &ReconfigureOutcome) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_outcome(outcome);
                Ok(())
            }
            Renderer::Json(r) => r.render_outcome(outcome),
        }
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
        match self {
            Renderer::Human(r) => {
                r.render_version_status(installed, target, status);
                Ok(())
            }
            Renderer::Json(r) => r.render_version_status(installed, target, status),
        }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_detect(&self, app_type: &str, present: bool) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_detect(app_type, present);
                Ok(())
            }
            Renderer::Json(r) => r.render_detect(app_type, present),
        }
    }

    /// Report the result of a lifecycle verb.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_verb(&self, verb: &str, location: &str, done: bool) -> Result<()> {
        match self {
            Renderer::Human(r) => {
                r.render_verb(verb, location, done);
                Ok(())
            }
            Renderer::Json(r) => r.render_verb(verb, location, done),
        }
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn render_config(&self, config: &PanelConfig, path: &Path) -> Result<()> {
        match self {
            Renderer::Human(r) => r.render_config(config, path),
            Renderer::Json(r) => r.render_config(config, path),
        }
    }
}
