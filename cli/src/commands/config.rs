//! `webapps config` — inspect or scaffold the configuration file.

use std::process::ExitCode;

use anyhow::{Result, bail};
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::domain::config::PanelConfig;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write a default configuration file
    Init {
        /// Primary domain of the account
        #[arg(long)]
        domain: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or written.
pub fn run(app: &AppContext, cmd: &ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => {
            let config = app.config_store.load()?;
            let path = app.config_store.path()?;
            app.renderer().render_config(&config, &path)?;
        }
        ConfigCommand::Path => println!("{}", app.config_store.path()?.display()),
        ConfigCommand::Init { domain, force } => {
            let path = app.config_store.path()?;
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            let mut config = PanelConfig::default();
            if let Some(domain) = domain {
                config.account.domain.clone_from(domain);
            }
            app.config_store.save(&config)?;
            app.output.success(&format!("Wrote {}", path.display()));
        }
    }
    Ok(ExitCode::SUCCESS)
}
