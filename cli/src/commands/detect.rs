//! `webapps detect <docroot>` — does the governing type recognise the files?

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::WebApp;
use crate::commands::{Target, exit_code};

/// Run the detect command.
///
/// # Errors
///
/// Returns the type's detection failure.
pub fn run(app: &AppContext, target: &Target) -> Result<ExitCode> {
    let host = app.host()?;
    let webapp = WebApp::open(&host, &target.docroot)?;
    let present = webapp.application_present()?;
    app.renderer().render_detect(webapp.module_name(), present)?;
    Ok(exit_code(present))
}
