use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::provider::{self, Provider};

pub const CONFIG_VERSION: u32 = 2;

/// Persisted root document. Stored as config.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigStore {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub current_account: String,
    #[serde(default)]
    pub migration_done: bool,
    #[serde(default)]
    pub config_version: u32,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self {
            accounts: Vec::new(),
            current_account: String::new(),
            migration_done: false,
            config_version: CONFIG_VERSION,
        }
    }
}

/// One configured identity on a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    pub email: String,
    /// Private key path. Empty until a key is generated or chosen.
    #[serde(default)]
    pub ssh_key: String,
    pub username: String,
    pub provider: Provider,
    #[serde(default)]
    pub is_default: bool,
}

impl Account {
    /// SSH host alias, e.g. `github.com-work`.
    pub fn ssh_host(&self) -> String {
        format!("{}-{}", self.provider.hostname, self.name)
    }

    pub fn ssh_clone_url(&self, repo: &str) -> String {
        format!("git@{}:{}", self.ssh_host(), repo)
    }

    /// The configured key, or the conventional location under `ssh_dir`.
    pub fn key_path(&self, ssh_dir: &Path) -> PathBuf {
        if self.ssh_key.is_empty() {
            default_key_path(ssh_dir, &self.provider, &self.name)
        } else {
            PathBuf::from(&self.ssh_key)
        }
    }
}

/// `<ssh_dir>/id_ed25519_<suffix>_<name>`
pub fn default_key_path(ssh_dir: &Path, provider: &Provider, name: &str) -> PathBuf {
    ssh_dir.join(format!("id_ed25519_{}_{}", provider.key_suffix, name))
}

// -- Legacy (pre-provider) format ---------------------------------------------

/// Store layout written before providers existed. Every account was GitHub.
#[derive(Debug, Default, Deserialize)]
pub struct LegacyConfig {
    #[serde(default)]
    pub accounts: Vec<LegacyAccount>,
    #[serde(default)]
    pub current_account: String,
    #[serde(default)]
    pub migration_done: bool,
}

#[derive(Debug, Deserialize)]
pub struct LegacyAccount {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub ssh_key: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub is_default: bool,
}

impl LegacyConfig {
    pub fn upgrade(self) -> ConfigStore {
        let github = provider::known::github();

        ConfigStore {
            accounts: self
                .accounts
                .into_iter()
                .map(|a| Account {
                    name: a.name,
                    email: a.email,
                    ssh_key: a.ssh_key,
                    username: a.username,
                    provider: github.clone(),
                    is_default: a.is_default,
                })
                .collect(),
            current_account: self.current_account,
            migration_done: self.migration_done,
            config_version: CONFIG_VERSION,
        }
    }
}
