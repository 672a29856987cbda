//! `webapps set <docroot> key=value...` — one reconfiguration batch.

use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Args;
use serde_json::Value;

use crate::app::AppContext;
use crate::application::services::WebApp;
use crate::commands::{Target, exit_code};

#[derive(Args)]
pub struct SetArgs {
    #[command(flatten)]
    pub target: Target,
    /// Settings to apply in order, as `key=value`. Values are read as JSON
    /// when they parse, otherwise as strings.
    #[arg(required = true, value_name = "KEY=VALUE")]
    pub assignments: Vec<String>,
}

/// Split `key=value` and parse the value.
///
/// # Errors
///
/// Returns an error when there is no `=` or the key is empty.
pub fn parse_assignment(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("expected KEY=VALUE, got `{raw}'");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("empty setting name in `{raw}'");
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Run the set command.
///
/// Exits non-zero when a deferred action failed after the settings were
/// saved; the saved settings are kept.
///
/// # Errors
///
/// Returns the reconfiguration error; nothing is applied in that case.
pub fn run(app: &AppContext, args: &SetArgs) -> Result<ExitCode> {
    let batch = args
        .assignments
        .iter()
        .map(|raw| parse_assignment(raw))
        .collect::<Result<Vec<_>>>()?;

    let host = app.host()?;
    let mut webapp = WebApp::open(&host, &args.target.docroot)?;
    let outcome = webapp.reconfigure(batch)?;
    app.renderer().render_outcome(&outcome)?;
    Ok(exit_code(outcome.is_clean()))
}
