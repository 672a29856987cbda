//! Application layer — port trait definitions and use-case orchestration.
//!
//! This module depends only on `crate::domain` — never on `crate::infra`,
//! `crate::commands`, or `crate::output`.

pub mod host;
pub mod meta;
pub mod ports;
pub mod resolver;
pub mod services;

pub use host::HostServices;
pub use meta::{MetaHandle, MetaManager};
pub use ports::{
    AppTypeHandler, CertificateService, CommandRunner, ConfigStore, DnsDiagnostics, FileKind,
    FileStat, Filesystem, Manifest, ManifestSource, MetaStore, ProgressReporter, SessionContext,
    VersionControl, WebServer,
};
pub use resolver::CapabilityResolver;
