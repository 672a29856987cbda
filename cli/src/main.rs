//! webapps - lifecycle and settings of hosted web applications

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use webapps_cli::cli::Cli;
use webapps_cli::domain::{CertificateError, ConfigError, ReconfigureError, WebAppError};
use webapps_cli::output::json::format_error;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "WEBAPPS_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Stable error code for the JSON error object.
fn error_code(err: &anyhow::Error) -> &'static str {
    if err.downcast_ref::<ReconfigureError>().is_some() {
        "reconfigure"
    } else if err.downcast_ref::<CertificateError>().is_some() {
        "certificate"
    } else if err.downcast_ref::<WebAppError>().is_some() {
        "webapp"
    } else if err.downcast_ref::<ConfigError>().is_some() {
        "config"
    } else {
        "error"
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    let json = cli.is_json();
    match cli.run() {
        Ok(code) => code,
        Err(e) => {
            if json {
                match format_error(&format!("{e:#}"), error_code(&e)) {
                    Ok(obj) => println!("{obj}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
