//! Persisted metadata for one hosted application.
//!
//! A record is keyed by application root in the metadata store. Top-level
//! fields are written through [`MetaPatch`] (trusted replacement); the
//! user-facing settings live in [`Options`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::INSTALLING_VERSION;

/// User-facing configurable settings of an application.
///
/// Keys are reconfigurable property names (`user`, `ssl`, `autoupdate`,
/// `verlock`, `affixed`, ...). A `null` written through [`Options::merge`]
/// removes the key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options(BTreeMap<String, Value>);

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a dotted path (`"notify.email"`) through nested objects.
    #[must_use]
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut cur = self.0.get(first)?;
        for part in parts {
            cur = cur.as_object()?.get(part)?;
        }
        Some(cur)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Merge `fields` into the options; `null` values delete their key.
    pub fn merge(&mut self, fields: BTreeMap<String, Value>) {
        for (key, value) in fields {
            if value.is_null() {
                self.0.remove(&key);
            } else {
                self.0.insert(key, value);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.0.clone()
    }
}

impl FromIterator<(String, Value)> for Options {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Metadata record for one application root.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppMeta {
    /// Hostname the application is served from.
    #[serde(default)]
    pub hostname: String,
    /// URI path below the hostname, without leading or trailing slash.
    #[serde(default)]
    pub path: String,
    /// Detected application type, e.g. `"wordpress"`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub app_type: Option<String>,
    /// Last detected version, or [`INSTALLING_VERSION`] mid-install.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Set when the last update attempt failed.
    #[serde(default)]
    pub failed: bool,
    #[serde(default)]
    pub options: Options,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AppMeta {
    /// Apply a trusted replacement of top-level fields.
    pub fn replace(&mut self, patch: MetaPatch) {
        if let Some(hostname) = patch.hostname {
            self.hostname = hostname;
        }
        if let Some(path) = patch.path {
            self.path = path;
        }
        if let Some(app_type) = patch.app_type {
            self.app_type = app_type;
        }
        if let Some(version) = patch.version {
            self.version = version;
        }
        if let Some(failed) = patch.failed {
            self.failed = failed;
        }
        self.updated_at = Some(Utc::now());
    }

    #[must_use]
    pub fn is_installing(&self) -> bool {
        self.version.as_deref() == Some(INSTALLING_VERSION)
    }
}

/// Partial update of the top-level fields of an [`AppMeta`].
///
/// `None` leaves a field untouched. The doubly-optional fields distinguish
/// "leave alone" from "clear".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetaPatch {
    pub hostname: Option<String>,
    pub path: Option<String>,
    pub app_type: Option<Option<String>>,
    pub version: Option<Option<String>>,
    pub failed: Option<bool>,
}

impl MetaPatch {
    #[must_use]
    pub fn location(hostname: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            hostname: Some(hostname.into()),
            path: Some(path.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn version(version: Option<String>) -> Self {
        Self {
            version: Some(version),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failed(failed: bool) -> Self {
        Self {
            failed: Some(failed),
            ..Self::default()
        }
    }
}
