//! Batch reconfiguration: validate everything, apply in order, roll back on
//! failure, then run deferred actions.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::{DeferredAction, PostCommitFailure, ReconfigureOutcome, Reconfigurator, property};
use crate::application::services::webapp::WebApp;
use crate::domain::error::ReconfigureError;

struct Planned {
    property: Box<dyn Reconfigurator>,
    value: Value,
}

struct Applied<'p> {
    property: &'p dyn Reconfigurator,
    previous: Value,
}

/// Run one reconfiguration batch against `app`.
///
/// Validation of every property precedes any apply. An apply failure rolls
/// back the properties applied before it, in reverse order, and is reported
/// against the failing property. Deferred actions run only once every apply
/// has succeeded and the options have been saved; their failures are
/// returned in [`ReconfigureOutcome::post_commit`].
///
/// # Errors
///
/// Returns [`ReconfigureError`] when the batch did not commit.
pub fn run(
    app: &WebApp<'_>,
    batch: Vec<(String, Value)>,
) -> Result<ReconfigureOutcome, ReconfigureError> {
    let plan = validate_all(app, batch)?;

    let mut applied: Vec<Applied<'_>> = Vec::with_capacity(plan.len());
    for step in &plan {
        let name = step.property.name();
        let previous = match step.property.current_value(app) {
            Ok(value) => value,
            Err(err) => {
                rollback(app, &applied);
                return Err(ReconfigureError::Apply {
                    property: name.to_string(),
                    reason: format!("{err:#}"),
                });
            }
        };
        debug!(property = name, value = %step.value, %previous, "applying");
        if let Err(err) = step.property.apply(app, &step.value) {
            warn!(property = name, error = %format!("{err:#}"), "apply failed, rolling back batch");
            rollback(app, &applied);
            return Err(ReconfigureError::Apply {
                property: name.to_string(),
                reason: format!("{err:#}"),
            });
        }
        applied.push(Applied {
            property: step.property.as_ref(),
            previous,
        });
    }

    let fields: BTreeMap<String, Value> = plan
        .iter()
        .map(|step| (step.property.name().to_string(), step.value.clone()))
        .collect();
    let options_before = app.options();
    if let Err(err) = app.set_options(fields) {
        app.meta().restore_options(options_before);
        rollback(app, &applied);
        return Err(ReconfigureError::Commit {
            reason: format!("{err:#}"),
        });
    }

    let mut outcome = ReconfigureOutcome {
        applied: plan.iter().map(|s| s.property.name().to_string()).collect(),
        ..ReconfigureOutcome::default()
    };

    let queue: Vec<(&dyn Reconfigurator, DeferredAction)> = plan
        .iter()
        .filter_map(|step| {
            step.property
                .deferred(app, &step.value)
                .map(|action| (step.property.as_ref(), action))
        })
        .collect();
    for (prop, action) in queue {
        match prop.run_deferred(app, &action) {
            Ok(()) => outcome.deferred.push(action.property),
            Err(err) => {
                warn!(property = %action.property, error = %format!("{err:#}"), "deferred action failed");
                outcome.post_commit.push(PostCommitFailure {
                    property: action.property,
                    message: format!("{err:#}"),
                });
            }
        }
    }

    let released = app.host().meta.release_unused();
    info!(
        location = %app.identity().location(),
        applied = outcome.applied.len(),
        deferred = outcome.deferred.len(),
        released,
        "reconfiguration committed"
    );
    Ok(outcome)
}

fn validate_all(
    app: &WebApp<'_>,
    batch: Vec<(String, Value)>,
) -> Result<Vec<Planned>, ReconfigureError> {
    batch
        .into_iter()
        .map(|(name, raw)| {
            if !app.has_reconfigurable(&name) {
                return Err(ReconfigureError::UnknownProperty {
                    app_type: app.module_name().to_string(),
                    valid: app.reconfigurables().join(", "),
                    property: name,
                });
            }
            let property = property(&name);
            let value = property.validate(app, raw)?;
            Ok(Planned { property, value })
        })
        .collect()
}

fn rollback(app: &WebApp<'_>, applied: &[Applied<'_>]) {
    for step in applied.iter().rev() {
        let name = step.property.name();
        debug!(property = name, previous = %step.previous, "rolling back");
        if let Err(err) = step.property.rollback(app, &step.previous) {
            warn!(property = name, error = %format!("{err:#}"), "rollback failed");
        }
    }
}
