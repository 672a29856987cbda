//! Filesystem infrastructure — implements the `Filesystem` port.

use std::os::unix::fs::MetadataExt;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use nix::unistd::{Uid, User};

use crate::application::ports::{CommandRunner, FileKind, FileStat, Filesystem};

/// Host filesystem. Ownership changes go through `chown(1)` so the
/// recursive-from semantics match the system tool exactly.
pub struct HostFilesystem {
    runner: Rc<dyn CommandRunner>,
}

impl HostFilesystem {
    #[must_use]
    pub fn new(runner: Rc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn chown(&self, args: &[&str]) -> Result<()> {
        let output = self.runner.run("chown", args)?;
        if !output.status.success() {
            bail!(
                "chown {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

/// Account name for `uid` through the system user database (NSS).
fn user_name(uid: u32) -> Option<String> {
    match User::from_uid(Uid::from_raw(uid)) {
        Ok(user) => user.map(|u| u.name),
        Err(err) => {
            tracing::debug!(uid, error = %err, "user lookup failed");
            None
        }
    }
}

impl Filesystem for HostFilesystem {
    fn stat(&self, path: &Path) -> Result<Option<FileStat>> {
        let meta = match path.symlink_metadata() {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("stat {}", path.display())),
        };
        let file_type = meta.file_type();
        let kind = if file_type.is_symlink() {
            FileKind::Symlink
        } else if file_type.is_dir() {
            FileKind::Directory
        } else if file_type.is_file() {
            FileKind::File
        } else {
            FileKind::Other
        };
        let referent = if kind == FileKind::Symlink {
            path.canonicalize().ok()
        } else {
            None
        };
        Ok(Some(FileStat {
            owner: user_name(meta.uid()),
            kind,
            referent,
        }))
    }

    /// A symlinked root is resolved first: `chown -R` never descends
    /// through a link given on its command line.
    fn takeover_user(&self, old: &str, new: &str, root: &Path) -> Result<()> {
        let from = format!("--from={old}");
        let target = root
            .canonicalize()
            .with_context(|| format!("resolving {}", root.display()))?;
        let target = target.to_string_lossy();
        self.chown(&["-R", &from, new, &target])
    }

    fn chown_symlink(&self, path: &Path, user: &str) -> Result<()> {
        let path = path.to_string_lossy();
        self.chown(&["-h", user, &path])
    }
}
