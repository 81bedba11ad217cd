use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::git::{GitCli, GitConfigTool, GlobalGitConfig};
use crate::settings::{self, Paths, Settings};
use crate::ssh::{KeyGenerator, SshConfig, SshKeygen};
use crate::storage::AccountStore;

/// Everything a command touches: file locations and the external tools.
pub struct Context {
    pub paths: Paths,
    pub settings: Settings,
    pub store: AccountStore,
    pub ssh: SshConfig,
    pub global_git: GlobalGitConfig,
    pub git: Box<dyn GitConfigTool>,
    pub keygen: Box<dyn KeyGenerator>,
}

impl Context {
    pub fn load() -> Result<Self> {
        let (paths, settings) = settings::load().context("Could not resolve config locations")?;
        Ok(Self::with_tools(
            paths.clone(),
            settings,
            Box::new(GitCli::new(paths.git_config)),
            Box::new(SshKeygen),
        ))
    }

    pub fn with_tools(
        paths: Paths,
        settings: Settings,
        git: Box<dyn GitConfigTool>,
        keygen: Box<dyn KeyGenerator>,
    ) -> Self {
        Self {
            store: AccountStore::new(paths.config_file.clone()),
            ssh: SshConfig::new(paths.ssh_dir.clone()),
            global_git: GlobalGitConfig::new(paths.git_config.clone()),
            paths,
            settings,
            git,
            keygen,
        }
    }

    /// Absolute, cleaned form of a user-supplied path, expanding `~/`.
    pub fn resolve_path(&self, path: &Path) -> Result<PathBuf> {
        let expanded = self.paths.expand(path);
        if expanded.is_absolute() {
            return Ok(settings::clean_path(&expanded));
        }
        let cwd = std::env::current_dir().context("Could not determine current directory")?;
        Ok(settings::clean_path(&cwd.join(expanded)))
    }
}
