//! `webapps get <docroot> <property>` — current value of one setting.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::WebApp;
use crate::commands::{Target, exit_code};

#[derive(Args)]
pub struct GetArgs {
    #[command(flatten)]
    pub target: Target,
    /// Setting name, e.g. `ssl` or `verlock`
    pub property: String,
}

/// Run the get command. Exits non-zero when the property is not a setting
/// of the application.
///
/// # Errors
///
/// Returns an error if the application cannot be resolved or the value
/// cannot be read.
pub fn run(app: &AppContext, args: &GetArgs) -> Result<ExitCode> {
    let host = app.host()?;
    let webapp = WebApp::open(&host, &args.target.docroot)?;
    let value = webapp.reconfigurable_value(&args.property)?;
    app.renderer().render_value(&args.property, value.as_ref())?;
    Ok(exit_code(value.is_some()))
}
