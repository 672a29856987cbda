//! The set of collaborators a facade works against.

use crate::application::meta::MetaManager;
use crate::application::ports::{
    CertificateService, DnsDiagnostics, Filesystem, ManifestSource, ProgressReporter,
    SessionContext, VersionControl, WebServer,
};
use crate::application::resolver::CapabilityResolver;

/// Everything the facade and the reconfigurators reach through ports.
///
/// Built once by the composition root (or by tests with fakes) and borrowed
/// by every facade for the duration of a request.
pub struct HostServices {
    pub meta: MetaManager,
    pub types: CapabilityResolver,
    pub fs: Box<dyn Filesystem>,
    pub web: Box<dyn WebServer>,
    pub certs: Box<dyn CertificateService>,
    pub dns: Box<dyn DnsDiagnostics>,
    pub vcs: Box<dyn VersionControl>,
    pub session: Box<dyn SessionContext>,
    pub manifests: Box<dyn ManifestSource>,
    pub reporter: Box<dyn ProgressReporter>,
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field("meta", &self.meta)
            .field("types", &self.types)
            .finish_non_exhaustive()
    }
}
