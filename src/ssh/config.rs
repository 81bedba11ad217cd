use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::parse::{ssh_line, Line};
use crate::storage::Account;

use super::ensure_private_dir;

/// One `Host` block of an ssh_config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostBlock {
    pub patterns: Vec<String>,
    pub hostname: Option<String>,
    pub user: Option<String>,
    pub identity_file: Option<String>,
    pub port: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended,
    AlreadyPresent,
}

enum State {
    Outside,
    InHostBlock(HostBlock),
}

/// Parse `Host` blocks. Settings before the first `Host` and inside `Match`
/// blocks are ignored.
pub fn parse_host_blocks(text: &str) -> Vec<HostBlock> {
    let mut blocks = Vec::new();
    let mut state = State::Outside;

    for raw in text.lines() {
        let (key, value) = match ssh_line(raw) {
            Line::Entry { key, value } => (key, value),
            _ => continue,
        };

        let is_host = key.eq_ignore_ascii_case("Host");
        if is_host || key.eq_ignore_ascii_case("Match") {
            if let State::InHostBlock(block) = std::mem::replace(&mut state, State::Outside) {
                blocks.push(block);
            }
            if is_host {
                state = State::InHostBlock(HostBlock {
                    patterns: value.split_whitespace().map(str::to_string).collect(),
                    ..Default::default()
                });
            }
            continue;
        }

        if let State::InHostBlock(block) = &mut state {
            let slot = match key.to_ascii_lowercase().as_str() {
                "hostname" => &mut block.hostname,
                "user" => &mut block.user,
                "identityfile" => &mut block.identity_file,
                "port" => &mut block.port,
                _ => continue,
            };
            // First value wins, as in ssh itself.
            if slot.is_none() {
                *slot = Some(value.to_string());
            }
        }
    }

    if let State::InHostBlock(block) = state {
        blocks.push(block);
    }
    blocks
}

/// Render the host alias block for an account.
pub fn render_host_block(account: &Account, key_path: &Path) -> String {
    let provider = &account.provider;
    let mut block = format!(
        "Host {}\n  HostName {}\n  User {}\n  IdentityFile {}\n",
        account.ssh_host(),
        provider.hostname,
        provider.ssh_user,
        key_path.display()
    );
    if let Some(port) = provider.explicit_port() {
        block.push_str(&format!("  Port {}\n", port));
    }
    block
}

fn names_host(blocks: &[HostBlock], alias: &str) -> bool {
    blocks.iter().any(|b| b.patterns.iter().any(|p| p == alias))
}

/// The user's SSH client configuration (`<ssh_dir>/config`).
pub struct SshConfig {
    dir: PathBuf,
    path: PathBuf,
}

impl SshConfig {
    pub fn new(ssh_dir: PathBuf) -> Self {
        Self {
            path: ssh_dir.join("config"),
            dir: ssh_dir,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw file contents; a missing file is empty. Bytes are kept as-is so
    /// non-UTF-8 comments survive.
    fn read_raw(&self) -> Result<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parsed host blocks; a missing or unreadable file has none.
    pub fn host_blocks(&self) -> Vec<HostBlock> {
        self.read_raw()
            .map(|bytes| parse_host_blocks(&String::from_utf8_lossy(&bytes)))
            .unwrap_or_default()
    }

    pub fn has_host(&self, alias: &str) -> bool {
        names_host(&self.host_blocks(), alias)
    }

    /// Append the account's host alias block unless a `Host` line already
    /// names the alias.
    pub fn append_host_alias(&self, account: &Account) -> Result<AppendOutcome> {
        let alias = account.ssh_host();
        let existing = self.read_raw()?;
        if names_host(&parse_host_blocks(&String::from_utf8_lossy(&existing)), &alias) {
            debug!(%alias, "host alias already present");
            return Ok(AppendOutcome::AlreadyPresent);
        }

        ensure_private_dir(&self.dir)?;

        let mut snippet = String::new();
        if let Some(last) = existing.last() {
            if *last != b'\n' {
                snippet.push('\n');
            }
            snippet.push('\n');
        }
        snippet.push_str(&render_host_block(account, &account.key_path(&self.dir)));

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        file.write_all(snippet.as_bytes())?;

        info!(%alias, path = %self.path.display(), "appended host alias");
        Ok(AppendOutcome::Appended)
    }
}
