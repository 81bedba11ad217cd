pub mod known;

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use known::{defaults, lookup};

pub const CUSTOM: &str = "custom";
pub const DEFAULT_SSH_USER: &str = "git";
pub const DEFAULT_SSH_PORT: u16 = 22;

const STRIPPED_PREFIXES: &[&str] = &["git.", "code.", "source."];
const KEY_SUFFIX_MAX: usize = 8;

/// A git hosting service. Known providers and self-hosted ones share this shape;
/// the latter are marked by `name == "custom"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    pub display_name: String,
    pub hostname: String,
    #[serde(default = "default_ssh_user")]
    pub ssh_user: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_port: Option<u16>,
    pub web_url: String,
    pub key_suffix: String,
}

fn default_ssh_user() -> String {
    DEFAULT_SSH_USER.to_string()
}

impl Provider {
    /// Build a self-hosted provider. Empty optional fields fall back to
    /// the hostname, `git`, and `https://<hostname>`.
    pub fn custom(
        hostname: &str,
        display_name: Option<&str>,
        ssh_user: Option<&str>,
        ssh_port: Option<u16>,
        web_url: Option<&str>,
    ) -> Result<Self> {
        let hostname = hostname.trim();
        if !is_valid_hostname(hostname) {
            return Err(Error::InvalidHostname(hostname.to_string()));
        }

        fn non_empty(s: Option<&str>) -> Option<&str> {
            s.map(str::trim).filter(|s| !s.is_empty())
        }

        Ok(Self {
            name: CUSTOM.to_string(),
            display_name: non_empty(display_name).unwrap_or(hostname).to_string(),
            hostname: hostname.to_string(),
            ssh_user: non_empty(ssh_user).unwrap_or(DEFAULT_SSH_USER).to_string(),
            ssh_port: ssh_port.filter(|p| *p != DEFAULT_SSH_PORT),
            web_url: non_empty(web_url)
                .map(str::to_string)
                .unwrap_or_else(|| format!("https://{}", hostname)),
            key_suffix: derive_key_suffix(hostname),
        })
    }

    pub fn is_custom(&self) -> bool {
        self.name == CUSTOM
    }

    /// Port to emit in an SSH host block, `None` for the default port.
    pub fn explicit_port(&self) -> Option<u16> {
        self.ssh_port.filter(|p| *p != DEFAULT_SSH_PORT)
    }
}

/// Conservative hostname grammar: alphanumerics, dots and hyphens, starting
/// and ending with an alphanumeric.
pub fn is_valid_hostname(hostname: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9\-.]*[a-zA-Z0-9])?$").expect("static regex")
    });
    !hostname.is_empty() && re.is_match(hostname)
}

/// Short token used in generated key file names, e.g. `company` for
/// `git.company.com`.
pub fn derive_key_suffix(hostname: &str) -> String {
    let mut host = hostname;
    for prefix in STRIPPED_PREFIXES {
        host = host.strip_prefix(prefix).unwrap_or(host);
    }

    let label = match host.split_once('.') {
        Some((first, _)) => first,
        None => host,
    };
    label.chars().take(KEY_SUFFIX_MAX).collect()
}

/// Guess the provider behind an SSH host alias such as `github.com-work` or
/// `git.company.com-me`.
pub fn detect_from_host_alias(alias: &str) -> Option<Provider> {
    if alias.contains("github.com") {
        return lookup("github");
    }
    if alias.contains("gitlab.com") {
        return lookup("gitlab");
    }
    if alias.contains("gitea") {
        return lookup("gitea");
    }

    let (hostname, _) = split_host_alias(alias)?;
    Provider::custom(hostname, Some("Custom Git Host"), None, None, None).ok()
}

/// Split `<hostname>-<account>` at the last hyphen. The hostname part must
/// look like a DNS name (contain a dot) and the account part must be
/// non-empty and differ from the hostname.
pub fn split_host_alias(alias: &str) -> Option<(&str, &str)> {
    let (hostname, account) = alias.rsplit_once('-')?;
    if account.is_empty() || account == hostname || !hostname.contains('.') {
        return None;
    }
    is_valid_hostname(hostname).then_some((hostname, account))
}
