//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;

/// Manage the lifecycle and settings of hosted web applications
#[derive(Parser)]
#[command(
    name = "webapps",
    version,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show identity, version and settings
    Show(commands::Target),

    /// Print the current value of a setting
    Get(commands::get::GetArgs),

    /// Change settings as one batch
    Set(commands::set::SetArgs),

    /// Install the application
    Install(commands::install::InstallArgs),

    /// Remove the application
    Uninstall(commands::uninstall::UninstallArgs),

    /// Update the application
    Update(commands::update::UpdateArgs),

    /// Apply or release a fortification mode
    Fortify(commands::fortify::FortifyArgs),

    /// Compare the installed version against a version
    VersionStatus(commands::version_status::VersionStatusArgs),

    /// Check whether the application type recognises the files
    Detect(commands::Target),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

impl Cli {
    /// Whether JSON output was requested.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.json
    }

    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub fn run(self) -> Result<ExitCode> {
        let Cli {
            no_color,
            quiet,
            json,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
        });
        match command {
            Command::Show(target) => commands::show::run(&app, &target),
            Command::Get(args) => commands::get::run(&app, &args),
            Command::Set(args) => commands::set::run(&app, &args),
            Command::Install(args) => commands::install::run(&app, &args),
            Command::Uninstall(args) => commands::uninstall::run(&app, &args),
            Command::Update(args) => commands::update::run(&app, &args),
            Command::Fortify(args) => commands::fortify::run(&app, &args),
            Command::VersionStatus(args) => commands::version_status::run(&app, &args),
            Command::Detect(target) => commands::detect::run(&app, &target),
            Command::Config(cmd) => commands::config::run(&app, &cmd),
        }
    }
}
