//! Per-application manifest files.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{Manifest, ManifestSource};

/// Manifest file name looked up in an application root.
pub const MANIFEST_FILE: &str = ".webapp.yml";

pub struct YamlManifestSource;

impl ManifestSource for YamlManifestSource {
    fn load(&self, root: &Path) -> Result<Option<Manifest>> {
        let path = root.join(MANIFEST_FILE);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        let manifest = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing manifest {}", path.display()))?;
        Ok(Some(manifest))
    }
}
