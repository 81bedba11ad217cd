pub mod include;

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info};

use crate::error::{Error, Result};

pub use include::{write_directory_config, GlobalGitConfig, IncludeOutcome};

/// Where an identity is written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Local(PathBuf),
}

/// Get/set access to git configuration values.
pub trait GitConfigTool {
    fn set(&self, scope: &Scope, key: &str, value: &str) -> Result<()>;

    /// Read a value; `None` scope means whatever git resolves for the
    /// working directory.
    fn get(&self, scope: Option<&Scope>, key: &str) -> Option<String>;
}

/// The system `git` binary. Global values go to an explicit file so the
/// identity and the include stanzas land in the same place.
pub struct GitCli {
    global_file: PathBuf,
}

impl GitCli {
    pub fn new(global_file: PathBuf) -> Self {
        Self { global_file }
    }

    fn command(&self, scope: Option<&Scope>) -> Command {
        let mut cmd = Command::new("git");
        match scope {
            Some(Scope::Global) => {
                cmd.arg("config").arg("--file").arg(&self.global_file);
            }
            Some(Scope::Local(repo)) => {
                cmd.arg("-C").arg(repo).arg("config");
            }
            None => {
                cmd.arg("config");
            }
        }
        cmd
    }
}

impl GitConfigTool for GitCli {
    fn set(&self, scope: &Scope, key: &str, value: &str) -> Result<()> {
        debug!(?scope, key, "running git config");
        let output = self
            .command(Some(scope))
            .args([key, value])
            .output()
            .map_err(|e| Error::GitCommandFailed(format!("could not run git: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::GitCommandFailed(format!(
                "setting {}: {} {}",
                key,
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }

    fn get(&self, scope: Option<&Scope>, key: &str) -> Option<String> {
        let output = self.command(scope).args(["--get", key]).output().ok()?;
        if !output.status.success() {
            return None;
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!value.is_empty()).then_some(value)
    }
}

pub fn is_git_repository(path: &Path) -> bool {
    path.join(".git").is_dir()
}

/// Set `user.name` and `user.email` at `scope`.
pub fn set_identity(tool: &dyn GitConfigTool, name: &str, email: &str, scope: &Scope) -> Result<()> {
    if let Scope::Local(repo) = scope {
        if !is_git_repository(repo) {
            return Err(Error::NotARepository(repo.clone()));
        }
    }

    tool.set(scope, "user.name", name)?;
    tool.set(scope, "user.email", email)?;
    info!(?scope, name, email, "identity updated");
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    /// In-memory stand-in for `git config`.
    #[derive(Default)]
    pub(crate) struct FakeGit {
        pub values: RefCell<HashMap<(Option<Scope>, String), String>>,
        pub fail_on: Option<&'static str>,
    }

    impl FakeGit {
        pub fn with_global(pairs: &[(&str, &str)]) -> Self {
            let git = Self::default();
            for (k, v) in pairs {
                git.values
                    .borrow_mut()
                    .insert((Some(Scope::Global), k.to_string()), v.to_string());
            }
            git
        }
    }

    impl GitConfigTool for FakeGit {
        fn set(&self, scope: &Scope, key: &str, value: &str) -> Result<()> {
            if self.fail_on.is_some_and(|k| k == key) {
                return Err(Error::GitCommandFailed(format!("setting {}: exit status: 1", key)));
            }
            self.values
                .borrow_mut()
                .insert((Some(scope.clone()), key.to_string()), value.to_string());
            Ok(())
        }

        fn get(&self, scope: Option<&Scope>, key: &str) -> Option<String> {
            self.values
                .borrow()
                .get(&(scope.cloned(), key.to_string()))
                .cloned()
        }
    }

    #[test]
    fn test_set_identity_global() {
        let git = FakeGit::default();
        set_identity(&git, "jdoe", "j@doe.com", &Scope::Global).unwrap();
        assert_eq!(git.get(Some(&Scope::Global), "user.name").as_deref(), Some("jdoe"));
        assert_eq!(
            git.get(Some(&Scope::Global), "user.email").as_deref(),
            Some("j@doe.com")
        );
    }

    #[test]
    fn test_set_identity_local_requires_repository() {
        let temp = tempdir().unwrap();
        let git = FakeGit::default();
        let scope = Scope::Local(temp.path().to_path_buf());

        let err = set_identity(&git, "n", "e", &scope).unwrap_err();
        assert!(matches!(err, Error::NotARepository(_)));
        assert!(git.values.borrow().is_empty());

        fs::create_dir(temp.path().join(".git")).unwrap();
        set_identity(&git, "n", "e", &scope).unwrap();
        assert_eq!(git.get(Some(&scope), "user.email").as_deref(), Some("e"));
    }

    #[test]
    fn test_set_identity_stops_on_failure() {
        let git = FakeGit {
            fail_on: Some("user.name"),
            ..Default::default()
        };
        let err = set_identity(&git, "n", "e", &Scope::Global).unwrap_err();
        assert!(matches!(err, Error::GitCommandFailed(_)));
        assert!(git.get(Some(&Scope::Global), "user.email").is_none());
    }

    #[test]
    fn test_git_file_is_not_a_repository() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(".git"), "gitdir: elsewhere").unwrap();
        assert!(!is_git_repository(temp.path()));
    }
}
