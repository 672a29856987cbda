//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod app_type;
pub mod config;
pub mod error;
pub mod fortify;
pub mod location;
pub mod options;
pub mod version;

pub use app_type::{AppType, Capability, CapabilitySet, GENERIC_TYPE, UNKNOWN_TYPE};
pub use config::{PanelConfig, TypeConfig, validate_config};
pub use error::{CapabilityError, CertificateError, ConfigError, ReconfigureError, WebAppError};
pub use location::{AppIdentity, join_location, split_location};
pub use version::VersionStatus;
