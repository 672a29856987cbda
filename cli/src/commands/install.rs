//! `webapps install <docroot> [--type NAME]`

use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Args;
use webapps_common::MetaPatch;

use crate::app::AppContext;
use crate::application::services::WebApp;
use crate::commands::{Target, exit_code};
use crate::output::progress;

#[derive(Args)]
pub struct InstallArgs {
    #[command(flatten)]
    pub target: Target,
    /// Application type to install; the recorded type when omitted
    #[arg(long = "type", value_name = "NAME")]
    pub app_type: Option<String>,
}

/// Run the install command.
///
/// # Errors
///
/// Returns an error if the type is unknown or the install fails.
pub fn run(app: &AppContext, args: &InstallArgs) -> Result<ExitCode> {
    let host = app.host()?;
    let mut webapp = WebApp::open(&host, &args.target.docroot)?;

    if let Some(name) = &args.app_type {
        if !host.types.is_registered(name) {
            let known: Vec<&str> = host.types.known_types().collect();
            bail!("Unknown app type `{name}'\n\nKnown types: {}", known.join(", "));
        }
        webapp.initialize_meta(MetaPatch {
            app_type: Some(Some(name.clone())),
            ..MetaPatch::default()
        })?;
        webapp.reload()?;
    }

    let location = webapp.identity().location();
    let done = progress::with_spinner(
        app.show_progress(),
        &format!("Installing {} on {location}...", webapp.module_name()),
        &format!("Installed {location}"),
        || webapp.install(),
    )?;
    if !app.show_progress() {
        app.renderer().render_verb("Installed", &location, done)?;
    }
    Ok(exit_code(done))
}
