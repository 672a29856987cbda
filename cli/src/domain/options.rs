//! Option schema shared by every application type.
//!
//! Declares the generic reconfigurable set, the keys that are never
//! persisted, and the value coercions properties rely on.

use std::collections::BTreeMap;

use serde_json::Value;

/// Reconfigurables every application supports through the generic type.
pub const GENERIC_RECONFIGURABLES: &[&str] = &[
    "affixed",
    "autoupdate",
    "fortify",
    "git",
    "http10",
    "migrate",
    "ssl",
    "user",
    "verlock",
];

/// Accepted by the setter but never written to persisted options.
pub const TRANSIENT_RECONFIGURABLES: &[&str] = &["migrate"];

/// Option key holding the uninstall scope.
pub const UNINSTALL_OPTION: &str = "uninstall";

#[must_use]
pub fn is_transient(key: &str) -> bool {
    TRANSIENT_RECONFIGURABLES.contains(&key)
}

/// Drop transient keys from a set of option writes.
#[must_use]
pub fn strip_transient(fields: BTreeMap<String, Value>) -> BTreeMap<String, Value> {
    fields.into_iter().filter(|(k, _)| !is_transient(k)).collect()
}

/// Coerce integers to booleans; leave booleans alone; reject the rest.
#[must_use]
pub fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        _ => None,
    }
}

/// Truthiness used when reading loosely-typed stored options.
#[must_use]
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
