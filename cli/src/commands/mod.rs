//! Command implementations

pub mod config;
pub mod detect;
pub mod fortify;
pub mod get;
pub mod install;
pub mod set;
pub mod show;
pub mod uninstall;
pub mod update;
pub mod version_status;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;

/// The application a command acts on.
#[derive(Args, Debug, Clone)]
pub struct Target {
    /// Document root of the application
    pub docroot: PathBuf,
}

/// Map a verb's "was it carried out" answer to the process exit code.
#[must_use]
pub fn exit_code(done: bool) -> ExitCode {
    if done {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
