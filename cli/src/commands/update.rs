//! `webapps update <docroot> [--version V]`

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::WebApp;
use crate::commands::{Target, exit_code};
use crate::output::progress;

#[derive(Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub target: Target,
    /// Version to update to; the newest available when omitted
    #[arg(long = "version", value_name = "VERSION")]
    pub target_version: Option<String>,
}

/// Run the update command.
///
/// # Errors
///
/// Returns the update failure; the application is marked failed.
pub fn run(app: &AppContext, args: &UpdateArgs) -> Result<ExitCode> {
    let host = app.host()?;
    let webapp = WebApp::open(&host, &args.target.docroot)?;
    let location = webapp.identity().location();
    let target = args.target_version.as_deref();

    let done = progress::with_spinner(
        app.show_progress(),
        &format!("Updating {location}..."),
        &format!("Updated {location}"),
        || webapp.update(target),
    )?;
    if !app.show_progress() {
        app.renderer().render_verb("Updated", &location, done)?;
    }
    Ok(exit_code(done))
}
