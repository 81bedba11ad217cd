use std::path::PathBuf;

/// Errors raised by the account, SSH and git layers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),

    #[error("'{}' is not a git repository", .0.display())]
    NotARepository(PathBuf),

    #[error("git config failed: {0}")]
    GitCommandFailed(String),

    #[error("ssh-keygen failed: {0}")]
    GenerationFailed(String),

    #[error("invalid hostname format: '{0}'")]
    InvalidHostname(String),

    #[error("could not determine home directory")]
    NoHomeDir,

    #[error("config version {found} is newer than supported {supported}")]
    VersionTooNew { found: u32, supported: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("settings error: {0}")]
    Settings(#[from] toml::de::Error),
}

impl Error {
    pub fn account_not_found(name: &str) -> Self {
        Error::NotFound {
            kind: "Account",
            name: name.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
