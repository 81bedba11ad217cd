use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::{Error, Result};

use super::ensure_private_dir;

/// Something that can produce an Ed25519 key pair at `path` and `path.pub`.
pub trait KeyGenerator {
    fn generate(&self, path: &Path, comment: &str) -> Result<()>;
}

/// The system `ssh-keygen`.
pub struct SshKeygen;

impl KeyGenerator for SshKeygen {
    fn generate(&self, path: &Path, comment: &str) -> Result<()> {
        debug!(path = %path.display(), "running ssh-keygen");
        let output = Command::new("ssh-keygen")
            .args(["-t", "ed25519", "-C", comment, "-q", "-N", ""])
            .arg("-f")
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::GenerationFailed(format!("could not run ssh-keygen: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::GenerationFailed(format!(
                "{} {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

pub fn public_key_path(path: &Path) -> PathBuf {
    let mut p = path.as_os_str().to_owned();
    p.push(".pub");
    PathBuf::from(p)
}

/// Generate a key pair at `path`, refusing to overwrite. Returns the public
/// key path.
pub fn generate_key_pair(gen: &dyn KeyGenerator, path: &Path, comment: &str) -> Result<PathBuf> {
    if path.exists() {
        return Err(Error::AlreadyExists(path.to_path_buf()));
    }
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        ensure_private_dir(dir)?;
    }

    gen.generate(path, comment)?;

    let public = public_key_path(path);
    if !public.exists() {
        return Err(Error::GenerationFailed(format!(
            "public key {} was not written",
            public.display()
        )));
    }
    info!(path = %path.display(), "generated key pair");
    Ok(public)
}

/// File names in `dir` that look like private keys: not `.pub` themselves
/// and with a `.pub` sibling. Sorted; a missing directory yields nothing.
pub fn list_existing_keys(dir: &Path) -> Vec<String> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut keys: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| !e.path().is_dir())
        .filter_map(|e| e.file_name().into_string().ok())
        .filter(|name| !name.ends_with(".pub"))
        .filter(|name| dir.join(format!("{}.pub", name)).exists())
        .collect();
    keys.sort();
    keys
}

/// Delete a private key and its `.pub` companion, reporting each file.
pub fn remove_key_pair(path: &Path) -> Vec<(PathBuf, std::io::Result<()>)> {
    [path.to_path_buf(), public_key_path(path)]
        .into_iter()
        .map(|p| {
            let res = fs::remove_file(&p);
            debug!(path = %p.display(), ok = res.is_ok(), "removing key file");
            (p, res)
        })
        .collect()
}
