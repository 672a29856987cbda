//! `webapps show <docroot>` — identity, version and settings.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::WebApp;
use crate::commands::Target;

/// Run the show command.
///
/// # Errors
///
/// Returns an error if the application cannot be resolved.
pub fn run(app: &AppContext, target: &Target) -> Result<ExitCode> {
    let host = app.host()?;
    let webapp = WebApp::open(&host, &target.docroot)?;
    app.renderer().render_app(&webapp.summary()?)?;
    Ok(ExitCode::SUCCESS)
}
