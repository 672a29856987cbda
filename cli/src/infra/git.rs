//! Version control through the `git` binary.

use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result, bail};

use crate::application::ports::{CommandRunner, VersionControl};

const COMMITTER_NAME: &str = "user.name=webapps";
const COMMITTER_EMAIL: &str = "user.email=webapps@localhost";

pub struct GitCli {
    runner: Rc<dyn CommandRunner>,
}

impl GitCli {
    #[must_use]
    pub fn new(runner: Rc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn git(&self, root: &Path, args: &[&str]) -> Result<String> {
        let root_arg = root.to_string_lossy();
        let mut argv = vec![
            "-C",
            root_arg.as_ref(),
            "-c",
            COMMITTER_NAME,
            "-c",
            COMMITTER_EMAIL,
        ];
        argv.extend_from_slice(args);
        let output = self.runner.run("git", &argv)?;
        if !output.status.success() {
            bail!(
                "git {} failed in {}: {}",
                args.join(" "),
                root.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl VersionControl for GitCli {
    fn is_valid(&self, root: &Path) -> bool {
        root.join(".git").exists() && self.git(root, &["rev-parse", "--git-dir"]).is_ok()
    }

    fn create_repository(&self, root: &Path) -> Result<()> {
        self.git(root, &["init", "-q"]).map(|_| ())
    }

    fn snapshot(&self, root: &Path, message: &str) -> Result<()> {
        self.git(root, &["add", "-A"])?;
        self.git(root, &["commit", "-q", "--allow-empty", "-m", message])
            .map(|_| ())
    }

    fn remove(&self, root: &Path) -> Result<()> {
        let dir = root.join(".git");
        if !dir.exists() {
            return Ok(());
        }
        std::fs::remove_dir_all(&dir).with_context(|| format!("removing {}", dir.display()))
    }
}
