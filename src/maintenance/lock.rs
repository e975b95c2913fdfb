//! Cross-process exclusion for maintenance runs.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{DistError, Result};

/// An exclusive advisory lock on the maintenance lock file.
///
/// The lock is released when the value is dropped.
#[derive(Debug)]
pub struct MaintenanceLock {
    file: File,
    path: PathBuf,
}

impl MaintenanceLock {
    /// Try to take the lock without waiting.
    ///
    /// Returns `Ok(None)` when another process holds it.
    pub fn try_acquire(path: &Path) -> Result<Option<Self>> {
        let failed = |e: std::io::Error| DistError::LockFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(failed)?;
        }
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(failed)?;

        match FileExt::try_lock_exclusive(&file) {
            Ok(()) => {
                tracing::debug!("acquired {}", path.display());
                Ok(Some(Self {
                    file,
                    path: path.to_path_buf(),
                }))
            }
            Err(e) if is_contended(&e) => {
                tracing::debug!("{} is held by another process", path.display());
                Ok(None)
            }
            Err(e) => Err(failed(e)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn is_contended(err: &std::io::Error) -> bool {
    err.kind() == std::io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}

impl Drop for MaintenanceLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!("failed to release {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data/nested/maintenance.lock");
        let lock = MaintenanceLock::try_acquire(&path).unwrap();
        assert!(lock.is_some());
        assert!(path.exists());
    }

    #[test]
    fn second_acquire_is_busy() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("maintenance.lock");
        let first = MaintenanceLock::try_acquire(&path).unwrap();
        assert!(first.is_some());
        assert!(MaintenanceLock::try_acquire(&path).unwrap().is_none());
    }

    #[test]
    fn drop_releases() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("maintenance.lock");
        {
            let _held = MaintenanceLock::try_acquire(&path).unwrap();
        }
        let again = MaintenanceLock::try_acquire(&path).unwrap();
        assert_eq!(again.map(|l| l.path().to_path_buf()), Some(path));
    }
}
