//! `webapps version-status <docroot> <version>`

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::WebApp;
use crate::commands::{Target, exit_code};
use crate::domain::version::VersionStatus;

#[derive(Args)]
pub struct VersionStatusArgs {
    #[command(flatten)]
    pub target: Target,
    /// Version to compare against
    #[arg(value_name = "VERSION")]
    pub target_version: String,
}

/// Run the version-status command. Exits zero only when the installed
/// version is current.
///
/// # Errors
///
/// Returns an error if the installed version cannot be detected.
pub fn run(app: &AppContext, args: &VersionStatusArgs) -> Result<ExitCode> {
    let host = app.host()?;
    let webapp = WebApp::open(&host, &args.target.docroot)?;
    let status = webapp.version_status(&args.target_version)?;
    let installed = webapp.version(false)?;
    app.renderer()
        .render_version_status(installed.as_deref(), &args.target_version, status)?;
    Ok(exit_code(status == VersionStatus::Current))
}
