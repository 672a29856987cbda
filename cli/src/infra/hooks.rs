//! Configured hook commands.
//!
//! A hook is an argv template from the config file. `{name}` placeholders are
//! substituted per argument, so values never pass through a shell.

use std::collections::BTreeMap;
use std::process::Output;
use std::rc::Rc;

use anyhow::{Context, Result, bail};

use crate::application::ports::CommandRunner;

/// Substitute `{key}` placeholders in one argument.
#[must_use]
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

/// The hooks configured for one owner (`web`, `certificates`, a type).
pub struct Hooks {
    owner: String,
    table: BTreeMap<String, Vec<String>>,
    runner: Rc<dyn CommandRunner>,
}

impl Hooks {
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        table: BTreeMap<String, Vec<String>>,
        runner: Rc<dyn CommandRunner>,
    ) -> Self {
        Self {
            owner: owner.into(),
            table,
            runner,
        }
    }

    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    fn argv(&self, name: &str, vars: &[(&str, &str)]) -> Result<(String, Vec<String>)> {
        let Some((program, args)) = self.table.get(name).and_then(|argv| argv.split_first()) else {
            bail!("no `{name}' hook configured for {}", self.owner);
        };
        Ok((
            render(program, vars),
            args.iter().map(|a| render(a, vars)).collect(),
        ))
    }

    fn exec(&self, name: &str, vars: &[(&str, &str)], input: Option<&[u8]>) -> Result<Output> {
        let (program, args) = self.argv(name, vars)?;
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        tracing::debug!(owner = %self.owner, hook = name, %program, "running hook");
        match input {
            Some(input) => self.runner.run_with_stdin(&program, &args, input),
            None => self.runner.run(&program, &args),
        }
        .with_context(|| format!("{} hook `{name}'", self.owner))
    }

    /// Run a hook that must succeed; returns its trimmed stdout.
    ///
    /// # Errors
    ///
    /// Returns an error when the hook is missing, cannot run, or exits
    /// non-zero (with its stderr).
    pub fn run(&self, name: &str, vars: &[(&str, &str)]) -> Result<String> {
        Self::checked(name, &self.owner, self.exec(name, vars, None)?)
    }

    /// Like [`run`](Self::run) with `input` on stdin.
    ///
    /// # Errors
    ///
    /// See [`run`](Self::run).
    pub fn run_with_input(&self, name: &str, vars: &[(&str, &str)], input: &[u8]) -> Result<String> {
        Self::checked(name, &self.owner, self.exec(name, vars, Some(input))?)
    }

    /// Run a predicate hook: exit 0 is `true`, any other exit is `false`.
    ///
    /// # Errors
    ///
    /// Returns an error when the hook is missing or cannot run.
    pub fn test(&self, name: &str, vars: &[(&str, &str)]) -> Result<bool> {
        Ok(self.exec(name, vars, None)?.status.success())
    }

    fn checked(name: &str, owner: &str, output: Output) -> Result<String> {
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{owner} hook `{name}' failed ({}): {}",
                output.status,
                stderr.trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
