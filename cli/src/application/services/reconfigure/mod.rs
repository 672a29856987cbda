//! Reconfigurable properties and the batch orchestrator that applies them.
//!
//! Each property validates its input, applies an immediate side effect, may
//! queue a deferred action to run once the whole batch has committed, and
//! knows how to undo its apply on a best-effort basis.

mod affixed;
mod autoupdate;
mod fortify;
mod git;
mod http10;
mod migrate;
mod orchestrator;
mod ssl;
mod type_declared;
mod user;
mod verlock;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::application::services::webapp::WebApp;
use crate::domain::error::ReconfigureError;

pub use orchestrator::run;

/// A side effect postponed until the batch has committed.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredAction {
    /// Property that queued the action.
    pub property: String,
    /// Normalized value the property was set to.
    pub value: Value,
}

/// A deferred action that failed after commit.
#[derive(Debug, Clone, Serialize)]
pub struct PostCommitFailure {
    pub property: String,
    pub message: String,
}

/// Result of a committed batch.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconfigureOutcome {
    /// Properties applied, in batch order.
    pub applied: Vec<String>,
    /// Deferred actions that ran successfully.
    pub deferred: Vec<String>,
    /// Deferred actions that failed; committed state was kept.
    pub post_commit: Vec<PostCommitFailure>,
}

impl ReconfigureOutcome {
    /// No deferred action failed.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.post_commit.is_empty()
    }
}

/// One reconfigurable property bound to the facade it is called with.
pub trait Reconfigurator {
    fn name(&self) -> &str;

    /// Check and normalize `value`. Must not touch any collaborator beyond
    /// reads.
    ///
    /// # Errors
    ///
    /// Returns [`ReconfigureError::Invalid`] when `value` is outside the
    /// property's domain.
    fn validate(&self, app: &WebApp<'_>, value: Value) -> Result<Value, ReconfigureError>;

    /// Value currently in effect.
    ///
    /// # Errors
    ///
    /// Returns an error when the value comes from a collaborator that fails.
    fn current_value(&self, app: &WebApp<'_>) -> Result<Value> {
        Ok(app.option(self.name(), Value::Null))
    }

    /// Perform the immediate side effect. Must succeed without effect when
    /// `value` is already in effect.
    ///
    /// # Errors
    ///
    /// Returns the collaborator failure.
    fn apply(&self, app: &WebApp<'_>, value: &Value) -> Result<()>;

    /// Action to run once every property in the batch has applied.
    fn deferred(&self, _app: &WebApp<'_>, _value: &Value) -> Option<DeferredAction> {
        None
    }

    /// # Errors
    ///
    /// Returns the collaborator failure; reported, never unwound.
    fn run_deferred(&self, _app: &WebApp<'_>, _action: &DeferredAction) -> Result<()> {
        Ok(())
    }

    /// Best-effort inverse of [`apply`](Self::apply), given the value in
    /// effect before it ran. The external system may already be in either
    /// state.
    ///
    /// # Errors
    ///
    /// Returns the collaborator failure; logged by the orchestrator.
    fn rollback(&self, app: &WebApp<'_>, previous: &Value) -> Result<()> {
        self.apply(app, previous)
    }
}

/// Reconfigurator for `name`. Names without a built-in implementation are
/// type-declared properties handled by the application type itself.
#[must_use]
pub fn property(name: &str) -> Box<dyn Reconfigurator> {
    match name {
        "affixed" => Box::new(affixed::Affixed),
        "autoupdate" => Box::new(autoupdate::Autoupdate),
        "fortify" => Box::new(fortify::Fortify),
        "git" => Box::new(git::Git),
        "http10" => Box::new(http10::Http10),
        "migrate" => Box::new(migrate::Migrate),
        "ssl" => Box::new(ssl::Ssl),
        "user" => Box::new(user::User),
        "verlock" => Box::new(verlock::Verlock),
        other => Box::new(type_declared::TypeDeclared::new(other)),
    }
}

/// Shared boolean validation for toggle properties.
pub(crate) fn validate_bool(property: &str, value: &Value) -> Result<Value, ReconfigureError> {
    crate::domain::options::coerce_bool(value)
        .map(Value::Bool)
        .ok_or_else(|| ReconfigureError::invalid(property, format!("expected a boolean, got {value}")))
}
