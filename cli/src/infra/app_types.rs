//! Application types defined in the config file.
//!
//! A type implements exactly the capabilities whose hooks are configured.
//! Hooks receive `{hostname}`, `{path}`, `{root}`, `{location}` and `{type}`
//! plus per-verb placeholders.

use std::rc::Rc;

use anyhow::{Context, Result};
use serde_json::Value;
use webapps_common::{Options, UninstallScope, VersionLock};

use crate::application::ports::{AppTypeHandler, CommandRunner};
use crate::domain::app_type::{Capability, CapabilitySet, GENERIC_TYPE};
use crate::domain::config::TypeConfig;
use crate::domain::location::AppIdentity;
use crate::domain::options::GENERIC_RECONFIGURABLES;
use crate::infra::hooks::Hooks;

/// Every hook listed must be configured for the capability to be offered.
const CAPABILITY_HOOKS: &[(&[&str], Capability)] = &[
    (&["install"], Capability::Install),
    (&["uninstall"], Capability::Uninstall),
    (&["update"], Capability::Update),
    (&["version"], Capability::Version),
    (&["versions"], Capability::Versions),
    (&["valid"], Capability::Detect),
    (&["admin_user"], Capability::AdminUser),
    (&["change_password"], Capability::ChangePassword),
    (&["fortify", "unfortify"], Capability::Fortify),
    (&["reconfigure"], Capability::Reconfigure),
];

/// An application type backed by hook commands.
pub struct ScriptedAppType {
    name: String,
    config: TypeConfig,
    hooks: Hooks,
    is_abstract: bool,
}

impl ScriptedAppType {
    #[must_use]
    pub fn new(name: &str, config: TypeConfig, runner: Rc<dyn CommandRunner>) -> Self {
        let hooks = Hooks::new(name, config.hooks.clone(), runner);
        Self {
            name: name.to_string(),
            config,
            hooks,
            is_abstract: false,
        }
    }

    /// The generic web application: serves shared capabilities only.
    #[must_use]
    pub fn generic(config: TypeConfig, runner: Rc<dyn CommandRunner>) -> Self {
        Self {
            is_abstract: true,
            ..Self::new(GENERIC_TYPE, config, runner)
        }
    }

    fn vars(&self, app: &AppIdentity) -> [(&'static str, String); 5] {
        [
            ("hostname", app.hostname.clone()),
            ("path", app.path.clone()),
            ("root", app.root.display().to_string()),
            ("location", app.location()),
            ("type", self.name.clone()),
        ]
    }

    fn run(&self, hook: &str, app: &AppIdentity, extra: &[(&str, &str)]) -> Result<String> {
        let base = self.vars(app);
        let vars: Vec<(&str, &str)> = base
            .iter()
            .map(|(k, v)| (*k, v.as_str()))
            .chain(extra.iter().copied())
            .collect();
        self.hooks.run(hook, &vars)
    }
}

impl AppTypeHandler for ScriptedAppType {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> CapabilitySet {
        CAPABILITY_HOOKS
            .iter()
            .filter(|(hooks, _)| hooks.iter().all(|hook| self.hooks.has(hook)))
            .map(|(_, cap)| *cap)
            .collect()
    }

    fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    fn default_version_lock(&self) -> VersionLock {
        self.config.default_version_lock
    }

    fn reconfigurables(&self) -> Vec<String> {
        self.config.reconfigurables.clone().unwrap_or_else(|| {
            GENERIC_RECONFIGURABLES
                .iter()
                .map(|s| (*s).to_string())
                .collect()
        })
    }

    fn fortification_modes(&self, _app: &AppIdentity) -> Result<Vec<String>> {
        Ok(self.config.fortification_modes.clone())
    }

    fn install(&self, app: &AppIdentity, options: &Options) -> Result<()> {
        let input = serde_json::to_vec(options).context("serializing install options")?;
        let base = self.vars(app);
        let vars: Vec<(&str, &str)> = base.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.hooks.run_with_input("install", &vars, &input).map(|_| ())
    }

    fn uninstall(&self, app: &AppIdentity, scope: UninstallScope) -> Result<()> {
        self.run("uninstall", app, &[("scope", scope.as_str())])
            .map(|_| ())
    }

    fn update(&self, app: &AppIdentity, version: Option<&str>) -> Result<()> {
        self.run("update", app, &[("version", version.unwrap_or(""))])
            .map(|_| ())
    }

    fn version(&self, app: &AppIdentity) -> Result<Option<String>> {
        let out = self.run("version", app, &[])?;
        Ok((!out.is_empty()).then_some(out))
    }

    fn versions(&self) -> Result<Vec<String>> {
        let out = self.hooks.run("versions", &[("type", self.name.as_str())])?;
        Ok(out
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }

    fn valid(&self, app: &AppIdentity) -> Result<bool> {
        let base = self.vars(app);
        let vars: Vec<(&str, &str)> = base.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.hooks.test("valid", &vars)
    }

    fn admin_user(&self, app: &AppIdentity) -> Result<String> {
        self.run("admin_user", app, &[])
    }

    fn change_password(&self, app: &AppIdentity, password: &str) -> Result<()> {
        let base = self.vars(app);
        let vars: Vec<(&str, &str)> = base.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.hooks
            .run_with_input("change_password", &vars, password.as_bytes())
            .map(|_| ())
    }

    fn fortify(&self, app: &AppIdentity, mode: &str) -> Result<()> {
        self.run("fortify", app, &[("mode", mode)]).map(|_| ())
    }

    fn unfortify(&self, app: &AppIdentity) -> Result<()> {
        self.run("unfortify", app, &[]).map(|_| ())
    }

    fn reconfigure(&self, app: &AppIdentity, property: &str, value: &Value) -> Result<()> {
        let value = match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        self.run(
            "reconfigure",
            app,
            &[("property", property), ("value", value.as_str())],
        )
        .map(|_| ())
    }

    fn get_reconfigurable(&self, app: &AppIdentity, property: &str) -> Result<Option<Value>> {
        if !self.hooks.has("get_reconfigurable") {
            return Ok(None);
        }
        let out = self.run("get_reconfigurable", app, &[("property", property)])?;
        if out.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            serde_json::from_str(&out).unwrap_or(Value::String(out)),
        ))
    }
}
