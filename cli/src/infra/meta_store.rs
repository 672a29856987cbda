//! Infrastructure implementation of the `MetaStore` port.
//!
//! One JSON file per application root, named by the SHA-256 of the root
//! path, written atomically (temp file + rename).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use webapps_common::AppMeta;

use crate::application::ports::MetaStore;
use crate::infra::config::YamlConfigStore;

/// Directory-backed metadata store.
pub struct JsonMetaStore {
    dir: PathBuf,
}

impl JsonMetaStore {
    /// Create a store using the default directory (`~/.webapps/meta`).
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        Ok(Self::with_dir(YamlConfigStore::default_metadata_dir()?))
    }

    /// Create a store rooted at an explicit directory.
    #[must_use]
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// File holding the record for `root`.
    #[must_use]
    pub fn record_path(&self, root: &Path) -> PathBuf {
        let digest = Sha256::digest(root.as_os_str().as_encoded_bytes());
        let name: String = digest.iter().map(|b| format!("{b:02x}")).collect();
        self.dir.join(format!("{name}.json"))
    }
}

impl MetaStore for JsonMetaStore {
    fn load(&self, root: &Path) -> Result<Option<AppMeta>> {
        let path = self.record_path(root);
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading metadata file {}", path.display()))?;
        let meta: AppMeta = serde_json::from_str(&content)
            .with_context(|| format!("parsing metadata file {}", path.display()))?;
        Ok(Some(meta))
    }

    fn save(&self, root: &Path, meta: &AppMeta) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating directory {}", self.dir.display()))?;
        let path = self.record_path(root);
        let content = serde_json::to_string_pretty(meta).context("serializing metadata")?;

        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)
            .with_context(|| format!("writing temp file {}", temp_path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("setting permissions on {}", temp_path.display()))?;
        }

        std::fs::rename(&temp_path, &path)
            .with_context(|| format!("finalizing metadata file {}", path.display()))?;
        tracing::debug!(root = %root.display(), file = %path.display(), "metadata saved");
        Ok(())
    }

    fn remove(&self, root: &Path) -> Result<()> {
        let path = self.record_path(root);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("removing metadata file {}", path.display()))?;
        }
        Ok(())
    }
}
