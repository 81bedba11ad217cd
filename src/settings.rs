//! File locations and optional user settings.
//!
//! Everything hangs off the home directory (`KRAKN_HOME` overrides it):
//! `~/.krakncat/config.json`, `~/.krakncat/settings.toml`, `~/.ssh/config`,
//! `~/.gitconfig`. `settings.toml` may relocate the SSH directory and the
//! global git config.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

pub const HOME_ENV: &str = "KRAKN_HOME";

const APP_DIR: &str = ".krakncat";
const CONFIG_FILE: &str = "config.json";
const SETTINGS_FILE: &str = "settings.toml";

/// Optional overrides from settings.toml.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub ssh_dir: Option<PathBuf>,
    pub git_config: Option<PathBuf>,
    /// Provider preselected when adding accounts.
    pub default_provider: Option<String>,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

/// Resolved file locations for one invocation.
#[derive(Debug, Clone)]
pub struct Paths {
    pub home: PathBuf,
    pub config_file: PathBuf,
    pub ssh_dir: PathBuf,
    pub ssh_config: PathBuf,
    pub git_config: PathBuf,
}

impl Paths {
    /// Paths rooted at `home` with no settings applied.
    pub fn under(home: &Path) -> Self {
        let ssh_dir = home.join(".ssh");
        Self {
            home: home.to_path_buf(),
            config_file: home.join(APP_DIR).join(CONFIG_FILE),
            ssh_config: ssh_dir.join("config"),
            ssh_dir,
            git_config: home.join(".gitconfig"),
        }
    }

    pub fn with_settings(mut self, settings: &Settings) -> Self {
        if let Some(dir) = &settings.ssh_dir {
            self.ssh_dir = self.expand(dir);
            self.ssh_config = self.ssh_dir.join("config");
        }
        if let Some(file) = &settings.git_config {
            self.git_config = self.expand(file);
        }
        self
    }

    pub fn settings_file(&self) -> PathBuf {
        self.home.join(APP_DIR).join(SETTINGS_FILE)
    }

    /// Expand a leading `~/` against the home directory.
    pub fn expand(&self, path: &Path) -> PathBuf {
        match path.strip_prefix("~") {
            Ok(rest) => self.home.join(rest),
            Err(_) => path.to_path_buf(),
        }
    }
}

/// Drop `.` components and resolve `..` against the preceding component,
/// without touching the filesystem. `..` at the root stays at the root.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => cleaned.push(component),
            },
            other => cleaned.push(other),
        }
    }
    if cleaned.as_os_str().is_empty() {
        cleaned.push(Component::CurDir);
    }
    cleaned
}

pub fn home_dir() -> Result<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir().ok_or(Error::NoHomeDir)
}

/// Resolve paths for this user, applying settings.toml if present.
pub fn load() -> Result<(Paths, Settings)> {
    let base = Paths::under(&home_dir()?);
    let settings = Settings::load(&base.settings_file())?;
    let paths = base.with_settings(&settings);
    debug!(?paths, "resolved paths");
    Ok((paths, settings))
}
