//! LMDB environment setup.

use std::path::{Path, PathBuf};

use heed::{Env, EnvOpenOptions};

use crate::LmdbError;

/// Default map size. A credential record is tiny; this only bounds growth.
pub const DEFAULT_MAP_SIZE: usize = 1024 * 1024;

/// Named databases opened in the environment.
const MAX_DBS: u32 = 4;

/// Wraps an opened LMDB environment.
pub struct LmdbEnvironment {
    env: Env,
    path: PathBuf,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment in `path`.
    ///
    /// The directory is created if missing and, on Unix, restricted to the
    /// owning user.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)?;
        restrict_permissions(path)?;

        // SAFETY: the environment is opened once per directory by this process
        // and the memory map is never modified outside of heed transactions.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        tracing::debug!(path = %path.display(), "opened LMDB environment");
        Ok(Self {
            env,
            path: path.to_path_buf(),
        })
    }

    pub fn env(&self) -> &Env {
        &self.env
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), LmdbError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), LmdbError> {
    Ok(())
}
