//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Application services emit progress events through the port without
//! depending on any presentation type. The reporter owns a copy of the
//! stylesheet so it can live inside `HostServices` for the whole command.

use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, Styles};

/// Terminal progress reporter.
///
/// - `step()` prints `"  → {message}"`
/// - `success()` prints `"  ✓ {message}"`
/// - `warn()` prints `"  ⚠ {message}"` to stderr
///
/// `step` and `success` are suppressed when quiet; warnings never are.
pub struct TerminalReporter {
    styles: Styles,
    quiet: bool,
}

impl TerminalReporter {
    /// Create a reporter matching the given output context.
    ///
    /// `machine` output (JSON) keeps stdout clean: only warnings are shown,
    /// on stderr.
    #[must_use]
    pub fn new(ctx: &OutputContext, machine: bool) -> Self {
        Self {
            styles: ctx.styles.clone(),
            quiet: ctx.quiet || machine,
        }
    }
}

impl ProgressReporter for TerminalReporter {
    fn step(&self, message: &str) {
        if !self.quiet {
            println!("  {} {message}", "→".style(self.styles.step));
        }
    }

    fn success(&self, message: &str) {
        if !self.quiet {
            println!("  {} {message}", "✓".style(self.styles.success));
        }
    }

    fn warn(&self, message: &str) {
        eprintln!("  {} {message}", "⚠".style(self.styles.warning));
    }
}
