//! File-based snapshot backend for persistent storage.

use crate::backend::SnapshotBackend;
use crate::error::{StoreError, StoreResult};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// A file-based snapshot backend.
///
/// Snapshots survive process restarts. Writes go to a sibling temp file,
/// are synced, and are renamed over the snapshot, so an interrupted
/// persist leaves the previous snapshot intact.
///
/// # Locking
///
/// Opening takes an exclusive advisory lock on a sidecar `.lock` file and
/// holds it for the backend's lifetime. A second process opening the same
/// path gets [`StoreError::Locked`]. The lock is on a sidecar because the
/// snapshot file itself is replaced by rename on every persist.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    lock_file: File,
}

impl FileBackend {
    /// Opens a file backend at the given snapshot path.
    ///
    /// Parent directories are created if needed. The snapshot file itself
    /// is not created until the first persist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Locked`] if another process holds the lock,
    /// or an I/O error if directories or the lock file cannot be created.
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let lock_path = Self::lock_path(path);
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        lock_file
            .try_lock_exclusive()
            .map_err(|_| StoreError::Locked)?;

        Ok(Self {
            path: path.to_path_buf(),
            lock_file,
        })
    }

    /// Returns the snapshot path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SnapshotBackend for FileBackend {
    fn load(&mut self) -> StoreResult<Option<Vec<u8>>> {
        match std::fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn persist(&mut self, bytes: &[u8]) -> StoreResult<()> {
        let tmp = self.tmp_path();

        let mut file = File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Drop for FileBackend {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.lock_file);
    }
}
