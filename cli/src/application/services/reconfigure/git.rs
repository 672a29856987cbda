//! `git`: track the application root in a git repository.
//!
//! Disabling removes the repository immediately. Enabling is deferred so the
//! first snapshot captures the state after the rest of the batch applied.

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::debug;

use super::{DeferredAction, Reconfigurator, validate_bool};
use crate::application::services::webapp::WebApp;
use crate::domain::error::ReconfigureError;
use crate::domain::options::truthy;

const INITIAL_SNAPSHOT: &str = "Initial install";

pub(super) struct Git;

impl Git {
    fn disable(app: &WebApp<'_>) -> Result<()> {
        let vcs = &app.host().vcs;
        if !vcs.is_valid(app.app_root()) {
            return Ok(());
        }
        vcs.remove(app.app_root())
            .with_context(|| format!("removing git repository in {}", app.app_root().display()))
    }

    fn enable(app: &WebApp<'_>, message: &str) -> Result<()> {
        let vcs = &app.host().vcs;
        let root = app.app_root();
        if !vcs.is_valid(root) {
            vcs.create_repository(root)
                .with_context(|| format!("creating git repository in {}", root.display()))?;
        }
        vcs.snapshot(root, message)
            .with_context(|| format!("snapshotting {}", root.display()))
    }
}

impl Reconfigurator for Git {
    fn name(&self) -> &str {
        "git"
    }

    fn validate(&self, _app: &WebApp<'_>, value: Value) -> Result<Value, ReconfigureError> {
        validate_bool(self.name(), &value)
    }

    fn current_value(&self, app: &WebApp<'_>) -> Result<Value> {
        Ok(Value::Bool(app.has_git()))
    }

    fn apply(&self, app: &WebApp<'_>, value: &Value) -> Result<()> {
        if truthy(value) {
            return Ok(());
        }
        Self::disable(app)
    }

    /// Nothing to do when the root is already tracked.
    fn deferred(&self, app: &WebApp<'_>, value: &Value) -> Option<DeferredAction> {
        (truthy(value) && !app.has_git()).then(|| DeferredAction {
            property: self.name().to_string(),
            value: value.clone(),
        })
    }

    fn run_deferred(&self, app: &WebApp<'_>, _action: &DeferredAction) -> Result<()> {
        Self::enable(app, INITIAL_SNAPSHOT)
    }

    /// Enabling is undone by disabling; a removed repository is recreated
    /// (its history is gone).
    fn rollback(&self, app: &WebApp<'_>, previous: &Value) -> Result<()> {
        if truthy(previous) {
            if app.has_git() {
                return Ok(());
            }
            debug!(root = %app.app_root().display(), "recreating removed git repository");
            return Self::enable(app, INITIAL_SNAPSHOT);
        }
        Self::disable(app)
    }
}
