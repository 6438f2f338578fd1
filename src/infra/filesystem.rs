//! Filesystem operations
//!
//! Reads and writes the lockfile. Each operation is a single attempt;
//! errors carry the path and are returned to the caller.

use std::path::{Path, PathBuf};

use crate::config::defaults::{LOCKFILE_MODE, LOCKFILE_NAME};
use crate::core::codec;
use crate::core::lockfile::Lockfile;
use crate::error::{FilesystemError, ModlockError};

/// Location of the lockfile in a workspace
///
/// An empty root gives the bare file name.
pub fn lockfile_path(workspace_root: &Path) -> PathBuf {
    if workspace_root.as_os_str().is_empty() {
        PathBuf::from(LOCKFILE_NAME)
    } else {
        workspace_root.join(LOCKFILE_NAME)
    }
}

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    std::fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Read a file's bytes
pub fn read_file(path: &Path) -> Result<Vec<u8>, FilesystemError> {
    std::fs::read(path).map_err(|e| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Write bytes to a file readable and writable only by its owner
///
/// Parent directories are created as needed.
pub fn write_private_file(path: &Path, content: &[u8]) -> Result<(), FilesystemError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }

    let write_error = |e: std::io::Error| FilesystemError::WriteFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    };

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(LOCKFILE_MODE);
    }

    let mut file = options.open(path).map_err(write_error)?;

    // The mode above only applies to newly created files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(LOCKFILE_MODE))
            .map_err(write_error)?;
    }

    std::io::Write::write_all(&mut file, content).map_err(write_error)
}

/// Read and parse a lockfile
pub fn read_lockfile(path: &Path) -> Result<Lockfile, ModlockError> {
    let data = read_file(path)?;
    let lockfile = codec::parse(&data).map_err(|source| ModlockError::Codec {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        "Read lockfile {} (format version {})",
        path.display(),
        lockfile.version
    );
    Ok(lockfile)
}

/// Read a lockfile, or start an empty one if the file does not exist
pub fn read_lockfile_or_default(path: &Path) -> Result<Lockfile, ModlockError> {
    if path.exists() {
        read_lockfile(path)
    } else {
        tracing::debug!("No lockfile at {}; starting empty", path.display());
        Ok(Lockfile::new())
    }
}

/// Serialize and write a lockfile
pub fn write_lockfile(path: &Path, lockfile: &Lockfile, indent: &str) -> Result<(), ModlockError> {
    let content =
        codec::serialize_for_file(lockfile, indent).map_err(|source| ModlockError::Codec {
            path: path.to_path_buf(),
            source,
        })?;
    write_private_file(path, &content)?;
    tracing::info!("Wrote lockfile {}", path.display());
    Ok(())
}
