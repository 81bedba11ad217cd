use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Result;
use crate::parse::{git_line, Line};
use crate::settings::clean_path;
use crate::storage::Account;

const GITDIR_PREFIX: &str = "gitdir:";
const DIRECTORY_CONFIG: &str = ".gitconfig";

/// An `[includeIf "gitdir:..."]` stanza and the file it pulls in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalInclude {
    pub gitdir: String,
    pub path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludeOutcome {
    Added,
    AlreadyPresent,
}

enum State {
    Outside,
    InIncludeIf(String),
    InOtherSection,
}

/// `includeIf "gitdir:/x/"` -> `/x/`
fn gitdir_condition(section: &str) -> Option<&str> {
    let (name, rest) = section.split_at(section.find(char::is_whitespace)?);
    if !name.eq_ignore_ascii_case("includeIf") {
        return None;
    }
    let condition = rest.trim();
    let condition = condition
        .strip_prefix('"')
        .and_then(|c| c.strip_suffix('"'))
        .unwrap_or(condition);
    condition.strip_prefix(GITDIR_PREFIX)
}

/// Pair each gitdir `includeIf` stanza with the first `path` entry before the
/// next section header. Stanzas without one are dropped.
pub fn parse_includes(text: &str) -> Vec<ConditionalInclude> {
    let mut includes = Vec::new();
    let mut state = State::Outside;

    for raw in text.lines() {
        state = match (git_line(raw), state) {
            (Line::Section(section), _) => match gitdir_condition(section) {
                Some(gitdir) => State::InIncludeIf(gitdir.to_string()),
                None => State::InOtherSection,
            },
            (Line::Entry { key, value }, State::InIncludeIf(gitdir))
                if key.eq_ignore_ascii_case("path") =>
            {
                includes.push(ConditionalInclude {
                    gitdir,
                    path: value.to_string(),
                });
                State::InOtherSection
            }
            (_, state) => state,
        };
    }
    includes
}

/// Conditions of every gitdir `includeIf` header, with or without a `path`.
fn include_headers(text: &str) -> Vec<&str> {
    text.lines()
        .filter_map(|raw| match git_line(raw) {
            Line::Section(section) => gitdir_condition(section),
            _ => None,
        })
        .collect()
}

/// Absolute, lexically cleaned form of `dir` with exactly one trailing `/`,
/// as git's `gitdir:` matching expects.
pub fn normalize_gitdir(dir: &Path) -> Result<String> {
    let absolute = if dir.is_absolute() {
        clean_path(dir)
    } else {
        clean_path(&std::env::current_dir()?.join(dir))
    };

    let mut pattern = absolute.to_string_lossy().into_owned();
    if cfg!(windows) {
        pattern = pattern.replace('\\', "/");
    }
    let trimmed_len = pattern.trim_end_matches('/').len();
    pattern.truncate(trimmed_len);
    pattern.push('/');
    Ok(pattern)
}

/// Write `<dir>/.gitconfig` holding the account identity. Overwrites.
pub fn write_directory_config(dir: &Path, account: &Account) -> Result<PathBuf> {
    let path = dir.join(DIRECTORY_CONFIG);
    let contents = format!(
        "[user]\n\tname = {}\n\temail = {}\n",
        account.username, account.email
    );
    fs::write(&path, contents)?;
    info!(path = %path.display(), account = %account.name, "wrote directory config");
    Ok(path)
}

/// The global git configuration file.
pub struct GlobalGitConfig {
    path: PathBuf,
}

impl GlobalGitConfig {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Conditional includes currently configured; a missing file has none.
    pub fn list_conditional_includes(&self) -> Vec<ConditionalInclude> {
        fs::read_to_string(&self.path)
            .map(|text| parse_includes(&text))
            .unwrap_or_default()
    }

    /// Append an `includeIf` stanza for `dir` unless one already exists.
    pub fn add_conditional_include(&self, dir: &Path, included: &Path) -> Result<IncludeOutcome> {
        let gitdir = normalize_gitdir(dir)?;

        let existing = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        if include_headers(&existing).contains(&gitdir.as_str()) {
            debug!(%gitdir, "conditional include already present");
            return Ok(IncludeOutcome::AlreadyPresent);
        }

        let mut stanza = String::new();
        if !existing.is_empty() {
            if !existing.ends_with('\n') {
                stanza.push('\n');
            }
            stanza.push('\n');
        }
        stanza.push_str(&format!(
            "[includeIf \"{}{}\"]\n\tpath = {}\n",
            GITDIR_PREFIX,
            gitdir,
            included.display()
        ));

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(stanza.as_bytes())?;

        info!(%gitdir, path = %self.path.display(), "added conditional include");
        Ok(IncludeOutcome::Added)
    }
}
