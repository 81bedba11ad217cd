pub mod config;
pub mod keygen;

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

pub use config::{AppendOutcome, SshConfig};
pub use keygen::{
    generate_key_pair, list_existing_keys, public_key_path, remove_key_pair, KeyGenerator,
    SshKeygen,
};

/// Create `dir` (and parents) if missing, owner-only on unix.
pub fn ensure_private_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        return Ok(());
    }
    fs::create_dir_all(dir)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
    }

    debug!(dir = %dir.display(), "created directory");
    Ok(())
}
