use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};

use super::types::*;

/// Handle on the JSON account store.
pub struct AccountStore {
    path: PathBuf,
}

impl AccountStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the store. A missing file yields an empty store, a legacy file is
    /// upgraded in memory, and an unparseable file is backed up and replaced
    /// by an empty store.
    pub fn load(&self) -> Result<ConfigStore> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ConfigStore::default())
            }
            Err(e) => return Err(e.into()),
        };

        match Self::parse(&contents) {
            Ok(config) => Ok(config),
            Err(Error::Json(e)) => {
                warn!("Config file corrupted: {}", e);
                match self.backup() {
                    Ok(backup) => warn!("Corrupted config backed up to {:?}", backup),
                    Err(backup_err) => warn!("Failed to back up corrupted config: {}", backup_err),
                }
                Ok(ConfigStore::default())
            }
            Err(e) => Err(e),
        }
    }

    fn parse(contents: &str) -> Result<ConfigStore> {
        let value: serde_json::Value = serde_json::from_str(contents)?;
        let version = value
            .get("config_version")
            .and_then(|v| v.as_u64())
            .map(|v| u32::try_from(v).unwrap_or(u32::MAX))
            .unwrap_or(0);

        if version > CONFIG_VERSION {
            return Err(Error::VersionTooNew {
                found: version,
                supported: CONFIG_VERSION,
            });
        }
        if version < CONFIG_VERSION {
            debug!(version, "upgrading legacy config");
            let legacy: LegacyConfig = serde_json::from_value(value)?;
            return Ok(legacy.upgrade());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Write the whole store through a temp file and rename.
    pub fn save(&self, config: &ConfigStore) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let contents = serde_json::to_string_pretty(config)?;
        fs::write(&temp_path, contents)?;
        fs::rename(&temp_path, &self.path)?;

        debug!(path = %self.path.display(), accounts = config.accounts.len(), "saved config");
        Ok(())
    }

    fn backup(&self) -> Result<PathBuf> {
        let backup_path = self.path.with_extension(format!(
            "json.backup.{}",
            chrono::Local::now().format("%Y%m%d_%H%M%S")
        ));
        fs::copy(&self.path, &backup_path)?;
        Ok(backup_path)
    }
}
