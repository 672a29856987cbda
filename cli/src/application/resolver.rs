//! Capability resolution over the registered application types.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::collections::BTreeMap;

use crate::application::ports::AppTypeHandler;
use crate::domain::app_type::{AppType, Capability};

/// Registry of application types plus the generic web application that
/// serves undetermined ones.
pub struct CapabilityResolver {
    types: BTreeMap<String, Box<dyn AppTypeHandler>>,
    generic: Box<dyn AppTypeHandler>,
}

impl CapabilityResolver {
    /// Create a resolver around the generic handler.
    #[must_use]
    pub fn new(generic: Box<dyn AppTypeHandler>) -> Self {
        Self {
            types: BTreeMap::new(),
            generic,
        }
    }

    /// Register a type under its own name. A later registration with the same
    /// name replaces the earlier one.
    pub fn register(&mut self, handler: Box<dyn AppTypeHandler>) {
        let name = handler.name().to_ascii_lowercase();
        if self.types.insert(name.clone(), handler).is_some() {
            tracing::debug!(app_type = %name, "replaced registered app type");
        }
    }

    #[must_use]
    pub fn with_type(mut self, handler: Box<dyn AppTypeHandler>) -> Self {
        self.register(handler);
        self
    }

    #[must_use]
    pub fn is_registered(&self, name: &str) -> bool {
        self.types.contains_key(&name.to_ascii_lowercase())
    }

    /// Names of every registered type, sorted.
    pub fn known_types(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    fn lookup(&self, app_type: &AppType) -> Option<&dyn AppTypeHandler> {
        match app_type {
            AppType::Known(name) => self.types.get(name).map(|h| &**h),
            AppType::Unknown => None,
        }
    }

    /// The handler governing `app_type`: the registered type, or the generic
    /// web application when undetermined or unregistered.
    #[must_use]
    pub fn handler(&self, app_type: &AppType) -> &dyn AppTypeHandler {
        self.lookup(app_type).unwrap_or(&*self.generic)
    }

    #[must_use]
    pub fn generic(&self) -> &dyn AppTypeHandler {
        &*self.generic
    }

    /// Whether `app_type` itself implements `capability`.
    ///
    /// True only when the type is determined, registered, not abstract, and
    /// declares the capability.
    #[must_use]
    pub fn supports(&self, app_type: &AppType, capability: Capability) -> bool {
        self.lookup(app_type)
            .is_some_and(|h| !h.is_abstract() && h.capabilities().contains(capability))
    }

    /// The handler that should serve `capability` for `app_type`, if any.
    ///
    /// Type-specific capabilities resolve only through [`supports`](Self::supports).
    /// Shared capabilities fall back to the generic web application when the
    /// type does not implement them.
    #[must_use]
    pub fn resolve(&self, app_type: &AppType, capability: Capability) -> Option<&dyn AppTypeHandler> {
        if self.supports(app_type, capability) {
            return self.lookup(app_type);
        }
        if capability.is_shared() && self.generic.capabilities().contains(capability) {
            return Some(&*self.generic);
        }
        None
    }
}

impl std::fmt::Debug for CapabilityResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityResolver")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .field("generic", &self.generic.name())
            .finish()
    }
}
