//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, the
//! metadata store, filesystem access, hook-driven web server, certificate and
//! application type adapters, git, and DNS lookups.
//!
//! Imports from `crate::domain` and `crate::application` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod app_types;
pub mod certs;
pub mod command_runner;
pub mod config;
pub mod dns;
pub mod fs;
pub mod git;
pub mod hooks;
pub mod manifest;
pub mod meta_store;
pub mod session;
pub mod web;

use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;

use crate::application::meta::MetaManager;
use crate::application::ports::{CommandRunner, ProgressReporter};
use crate::application::resolver::CapabilityResolver;
use crate::application::HostServices;
use crate::domain::config::PanelConfig;

/// Wire every production adapter from `config`.
///
/// # Errors
///
/// Returns an error if the metadata directory cannot be determined.
pub fn host_services(
    config: &PanelConfig,
    reporter: Box<dyn ProgressReporter>,
) -> Result<HostServices> {
    let runner: Rc<dyn CommandRunner> = Rc::new(command_runner::TokioCommandRunner::new(
        Duration::from_secs(config.command_timeout_secs),
    ));

    let store = match &config.metadata_dir {
        Some(dir) => meta_store::JsonMetaStore::with_dir(dir.clone()),
        None => meta_store::JsonMetaStore::new()?,
    };

    let mut types = CapabilityResolver::new(Box::new(app_types::ScriptedAppType::generic(
        config.generic.clone(),
        Rc::clone(&runner),
    )));
    for (name, type_config) in &config.types {
        types.register(Box::new(app_types::ScriptedAppType::new(
            name,
            type_config.clone(),
            Rc::clone(&runner),
        )));
    }

    let web_hooks = hooks::Hooks::new("web", config.web.hooks.clone(), Rc::clone(&runner));
    let cert_hooks = hooks::Hooks::new(
        "certificates",
        config.certificates.hooks.clone(),
        Rc::clone(&runner),
    );

    Ok(HostServices {
        meta: MetaManager::new(Box::new(store)),
        types,
        fs: Box::new(fs::HostFilesystem::new(Rc::clone(&runner))),
        web: Box::new(web::ConfiguredWebServer::new(
            config.web.clone(),
            config.account.domain.clone(),
            web_hooks,
        )),
        certs: Box::new(certs::HookCertificateService::new(cert_hooks)),
        dns: Box::new(dns::SystemDns::new(&config.account, Rc::clone(&runner))),
        vcs: Box::new(git::GitCli::new(runner)),
        session: Box::new(session::ConfigSession::new(&config.account)),
        manifests: Box::new(manifest::YamlManifestSource),
        reporter,
    })
}
