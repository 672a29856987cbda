//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Reconfiguration errors ────────────────────────────────────────────────────

/// Errors raised while running a reconfiguration batch.
///
/// `Invalid` and `UnknownProperty` are raised before any side effect.
/// `Apply` names the property whose apply failed, never the ones rolled back
/// because of it.
#[derive(Debug, Error)]
pub enum ReconfigureError {
    #[error("Unknown setting `{property}' for {app_type}\n\nValid settings: {valid}")]
    UnknownProperty {
        property: String,
        app_type: String,
        valid: String,
    },

    #[error("Invalid value for {property}: {reason}")]
    Invalid { property: String, reason: String },

    #[error("Failed to apply {property}: {reason}")]
    Apply { property: String, reason: String },

    /// Every property applied but the options record could not be written;
    /// the batch was rolled back.
    #[error("Failed to save settings: {reason}")]
    Commit { reason: String },
}

impl ReconfigureError {
    /// Name of the property the error is attributed to; `None` for failures
    /// of the batch as a whole.
    #[must_use]
    pub fn property(&self) -> Option<&str> {
        match self {
            ReconfigureError::UnknownProperty { property, .. }
            | ReconfigureError::Invalid { property, .. }
            | ReconfigureError::Apply { property, .. } => Some(property),
            ReconfigureError::Commit { .. } => None,
        }
    }

    pub(crate) fn invalid(property: &str, reason: impl Into<String>) -> Self {
        ReconfigureError::Invalid {
            property: property.to_string(),
            reason: reason.into(),
        }
    }
}

// ── Capability errors ─────────────────────────────────────────────────────────

/// A verb was dispatched to a type that does not implement it.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("App type `{app_type}' does not support {capability}")]
    Unsupported {
        app_type: String,
        capability: &'static str,
    },
}

// ── Application errors ────────────────────────────────────────────────────────

/// Errors related to application identity and the facade surface.
#[derive(Debug, Error)]
pub enum WebAppError {
    #[error("Cannot determine hostname from filesystem path `{docroot}' - is this reachable by web?")]
    UnresolvableHost { docroot: String },

    #[error("Unknown settings")]
    UnknownSettings,

    #[error("App type `{0}' does not support password change")]
    PasswordChangeUnsupported(String),
}

// ── Certificate errors ────────────────────────────────────────────────────────

/// Failures while enabling SSL for an application hostname.
#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("SSL not enabled on account")]
    NotEnabled,

    #[error(
        "SSL certificate provided by CA other than the ACME issuer. Contact issuer to add hostname \
         `{hostname}' to certificate or disable SSL for this web app. New certificate must then be \
         installed to proceed."
    )]
    NonAuthoritative { hostname: String },

    #[error(
        "Failed to request SSL certificate for `{hostname}'. Internal subrequest failed. Possible causes: \n\
         (1) DNS invalid. Expected IP address `{ip_expected}' for {hostname}. Actual IP address `{ip_actual}'. \n\
         (2) Nameservers invalid. Expected nameserver settings `{ns_expected}'. Actual nameserver settings `{ns_actual}'. \n\
         (3) DNS propagation delays. If this domain was recently added, it may be a propagation delay that \
         can take up to 24 hours to resolve; see {kb} for additional details. \n\n\
         Try again later or disable SSL."
    )]
    IssuanceFailed {
        hostname: String,
        ip_expected: String,
        ip_actual: String,
        ns_expected: String,
        ns_actual: String,
        kb: String,
    },

    #[error("Failed SSL issuance for `{hostname}'")]
    MigrationIssuance { hostname: String },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid application type name `{0}': must match ^[a-z][a-z0-9_-]*$")]
    InvalidTypeName(String),

    #[error("Application type name `{0}' is reserved")]
    ReservedTypeName(String),

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },

    #[error("Hook `{hook}' for {owner} has an empty command")]
    EmptyHook { owner: String, hook: String },
}
