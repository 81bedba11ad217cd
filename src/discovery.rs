//! First-run discovery of identities already configured on this machine.

use tracing::debug;

use crate::git::{GitConfigTool, Scope};
use crate::provider::{self, Provider};
use crate::ssh::SshConfig;

pub const GLOBAL_SOURCE: &str = "Global Git Config";

/// An identity found in existing configuration, offered for import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredAccount {
    /// Display name (git `user.name`).
    pub name: String,
    pub email: String,
    pub username: String,
    pub source: String,
    pub suggested: bool,
    /// Account part of an SSH host alias (`work` in `github.com-work`).
    pub alias_account: Option<String>,
    pub provider: Option<Provider>,
}

/// Collect import candidates: the global git identity first, then SSH host
/// aliases in file order. Missing or unreadable files contribute nothing.
pub fn scan(git: &dyn GitConfigTool, ssh: &SshConfig) -> Vec<DiscoveredAccount> {
    let mut discovered = Vec::new();

    let name = git.get(Some(&Scope::Global), "user.name").unwrap_or_default();
    let email = git.get(Some(&Scope::Global), "user.email").unwrap_or_default();
    if !name.is_empty() || !email.is_empty() {
        discovered.push(DiscoveredAccount {
            name,
            email,
            username: String::new(),
            source: GLOBAL_SOURCE.to_string(),
            suggested: true,
            alias_account: None,
            provider: None,
        });
    }

    for block in ssh.host_blocks() {
        let Some(user) = block.user.as_deref() else {
            continue;
        };
        for pattern in &block.patterns {
            let Some((_, account)) = provider::split_host_alias(pattern) else {
                continue;
            };
            discovered.push(DiscoveredAccount {
                name: String::new(),
                email: String::new(),
                username: user.to_string(),
                source: format!("SSH Config ({})", pattern),
                suggested: false,
                alias_account: Some(account.to_string()),
                provider: provider::detect_from_host_alias(pattern),
            });
        }
    }

    debug!(count = discovered.len(), "discovery scan finished");
    discovered
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;
    use crate::git::tests::FakeGit;

    fn ssh_with(text: &str) -> (tempfile::TempDir, SshConfig) {
        let temp = tempdir().unwrap();
        let dir = temp.path().join(".ssh");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("config"), text).unwrap();
        (temp, SshConfig::new(dir))
    }

    #[test]
    fn test_scan_nothing_configured() {
        let temp = tempdir().unwrap();
        let ssh = SshConfig::new(temp.path().join("missing"));
        assert!(scan(&FakeGit::default(), &ssh).is_empty());
    }

    #[test]
    fn test_scan_global_identity_first() {
        let git = FakeGit::with_global(&[("user.name", "Jane Doe"), ("user.email", "jane@doe.dev")]);
        let (_temp, ssh) = ssh_with("Host github.com-work\n  HostName github.com\n  User git\n");

        let found = scan(&git, &ssh);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].source, GLOBAL_SOURCE);
        assert_eq!(found[0].name, "Jane Doe");
        assert_eq!(found[0].email, "jane@doe.dev");
        assert!(found[0].suggested);

        assert_eq!(found[1].source, "SSH Config (github.com-work)");
        assert_eq!(found[1].username, "git");
        assert_eq!(found[1].alias_account.as_deref(), Some("work"));
        assert_eq!(found[1].provider.as_ref().unwrap().name, "github");
        assert!(!found[1].suggested);
    }

    #[test]
    fn test_scan_email_only_counts() {
        let git = FakeGit::with_global(&[("user.email", "x@y.z")]);
        let temp = tempdir().unwrap();
        let found = scan(&git, &SshConfig::new(temp.path().to_path_buf()));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "");
    }

    #[test]
    fn test_scan_skips_plain_hosts_and_blocks_without_user() {
        let (_temp, ssh) = ssh_with(
            "\
Host github.com
  User git

Host gitlab.com-nouser
  HostName gitlab.com

Host bastion-prod
  User admin

Host git.company.com-me
  User gitea
",
        );

        let found = scan(&FakeGit::default(), &ssh);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].source, "SSH Config (git.company.com-me)");
        assert_eq!(found[0].username, "gitea");
        assert!(found[0].provider.as_ref().unwrap().is_custom());
    }
}
