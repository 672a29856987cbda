//! Application type tagging and capability vocabulary.
//!
//! Pure types only — no I/O.

use std::collections::BTreeSet;
use std::fmt;

/// Type name used to dispatch behaviour shared by every application
/// (fortification, SSL, generic reconfigurables).
pub const GENERIC_TYPE: &str = "webapp";

/// Handler name reported for applications whose type is undetermined.
pub const UNKNOWN_TYPE: &str = "unknown";

/// The type governing verb dispatch for an application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AppType {
    /// A detected or declared application family, e.g. `wordpress`.
    Known(String),
    /// Nothing detected; dispatches to the generic web application.
    Unknown,
}

impl AppType {
    /// Build from an optional type name. Empty, `unknown` and `webapp` all
    /// collapse to [`AppType::Unknown`].
    #[must_use]
    pub fn from_name(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            None | Some("" | UNKNOWN_TYPE | GENERIC_TYPE) => AppType::Unknown,
            Some(name) => AppType::Known(name.to_ascii_lowercase()),
        }
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        matches!(self, AppType::Unknown)
    }

    /// Name of the handler, `unknown` when undetermined.
    #[must_use]
    pub fn handler_name(&self) -> &str {
        match self {
            AppType::Known(name) => name,
            AppType::Unknown => UNKNOWN_TYPE,
        }
    }

    /// Name used to address shared behaviour, `webapp` when undetermined.
    #[must_use]
    pub fn module_name(&self) -> &str {
        match self {
            AppType::Known(name) => name,
            AppType::Unknown => GENERIC_TYPE,
        }
    }
}

impl fmt::Display for AppType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.handler_name())
    }
}

/// A named operation an application type may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    Install,
    Uninstall,
    Update,
    Version,
    Versions,
    Detect,
    AdminUser,
    ChangePassword,
    Fortify,
    Reconfigure,
}

impl Capability {
    pub const ALL: [Capability; 10] = [
        Capability::Install,
        Capability::Uninstall,
        Capability::Update,
        Capability::Version,
        Capability::Versions,
        Capability::Detect,
        Capability::AdminUser,
        Capability::ChangePassword,
        Capability::Fortify,
        Capability::Reconfigure,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::Install => "install",
            Capability::Uninstall => "uninstall",
            Capability::Update => "update",
            Capability::Version => "get-version",
            Capability::Versions => "get-versions",
            Capability::Detect => "detect",
            Capability::AdminUser => "get-admin",
            Capability::ChangePassword => "change-password",
            Capability::Fortify => "fortify",
            Capability::Reconfigure => "reconfigure",
        }
    }

    /// Shared capabilities are served by the generic web application when
    /// the type is undetermined; the rest are type-specific.
    #[must_use]
    pub fn is_shared(self) -> bool {
        matches!(self, Capability::Fortify | Capability::Reconfigure)
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capabilities a type declares directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet(BTreeSet<Capability>);

impl CapabilitySet {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, capability: Capability) -> Self {
        self.0.insert(capability);
        self
    }

    #[must_use]
    pub fn contains(&self, capability: Capability) -> bool {
        self.0.contains(&capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Capability> for CapabilitySet {
    fn from_iter<T: IntoIterator<Item = Capability>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
