//! `user`: hand the application's files to another system user.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde_json::Value;
use tracing::info;

use super::Reconfigurator;
use crate::application::ports::FileKind;
use crate::application::services::webapp::WebApp;
use crate::domain::error::ReconfigureError;

static USERNAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern — cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[a-z_][a-z0-9_.-]{0,31}$").expect("valid regex")
});

pub(super) struct User;

impl User {
    /// Owner of the application root, the session user when unresolvable.
    fn resolved_owner(app: &WebApp<'_>) -> String {
        app.host()
            .fs
            .stat(app.app_root())
            .ok()
            .flatten()
            .and_then(|stat| stat.owner)
            .unwrap_or_else(|| app.host().session.username())
    }
}

impl Reconfigurator for User {
    fn name(&self) -> &str {
        "user"
    }

    fn validate(&self, _app: &WebApp<'_>, value: Value) -> Result<Value, ReconfigureError> {
        match &value {
            Value::String(user) if USERNAME_RE.is_match(user) => Ok(value),
            other => Err(ReconfigureError::invalid(
                self.name(),
                format!("{other} is not a valid user name"),
            )),
        }
    }

    fn current_value(&self, app: &WebApp<'_>) -> Result<Value> {
        Ok(Value::String(Self::resolved_owner(app)))
    }

    fn apply(&self, app: &WebApp<'_>, value: &Value) -> Result<()> {
        let Some(new_owner) = value.as_str() else {
            return Ok(());
        };
        let old_owner = Self::resolved_owner(app);
        if old_owner == new_owner {
            return Ok(());
        }

        let host = app.host();
        let root = app.app_root();
        info!(root = %root.display(), from = %old_owner, to = new_owner, "changing owner");
        host.fs
            .takeover_user(&old_owner, new_owner, root)
            .with_context(|| format!("handing {} to {new_owner}", root.display()))?;

        if host.fs.stat(root)?.is_some_and(|stat| stat.kind == FileKind::Symlink) {
            host.fs.chown_symlink(root, new_owner)?;
        }
        if app.path().is_empty() && host.web.is_subdomain(app.hostname()) {
            // symlink-following checks require the link owner to match
            let link = host.web.subdomain_root().join(app.hostname()).join("html");
            host.fs
                .chown_symlink(&link, new_owner)
                .with_context(|| format!("changing owner of {}", link.display()))?;
        }
        Ok(())
    }
}
