//! `webapps fortify <docroot> [MODE] [--release]`

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::WebApp;
use crate::commands::{Target, exit_code};

#[derive(Args)]
pub struct FortifyArgs {
    #[command(flatten)]
    pub target: Target,
    /// Fortification mode (default: max)
    #[arg(conflicts_with = "release")]
    pub mode: Option<String>,
    /// Release fortification instead of applying it
    #[arg(long)]
    pub release: bool,
}

/// Run the fortify command.
///
/// # Errors
///
/// Returns the handler failure.
pub fn run(app: &AppContext, args: &FortifyArgs) -> Result<ExitCode> {
    let host = app.host()?;
    let webapp = WebApp::open(&host, &args.target.docroot)?;
    let location = webapp.identity().location();

    let (verb, done) = if args.release {
        ("Released fortification on", webapp.release_fortify()?)
    } else {
        ("Fortified", webapp.fortify(args.mode.as_deref())?)
    };
    app.renderer().render_verb(verb, &location, done)?;
    Ok(exit_code(done))
}
