//! `webapps uninstall <docroot> [--yes]`

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::WebApp;
use crate::commands::{Target, exit_code};

#[derive(Args)]
pub struct UninstallArgs {
    #[command(flatten)]
    pub target: Target,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Run the uninstall command.
///
/// # Errors
///
/// Returns an error if the prompt or the uninstall fails.
pub fn run(app: &AppContext, args: &UninstallArgs) -> Result<ExitCode> {
    let host = app.host()?;
    let webapp = WebApp::open(&host, &args.target.docroot)?;
    let location = webapp.identity().location();

    if !args.yes {
        if !app.is_json() && !app.output.quiet {
            println!();
            println!("This will remove {} from {location}.", webapp.handler_name());
            println!();
        }
        if !app.confirm("Continue?", false)? {
            app.output.info("Cancelled.");
            return Ok(ExitCode::FAILURE);
        }
    }

    let done = webapp.uninstall()?;
    app.renderer().render_verb("Uninstalled", &location, done)?;
    Ok(exit_code(done))
}
