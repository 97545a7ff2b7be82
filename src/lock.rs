//! Per-document locking for load-modify-save cycles.
//!
//! Two layers:
//! - PathLocks: in-process mutex per document path (always on). Serializes
//!   mutating operations on the same file, so concurrent appends do not lose updates.
//! - fs2 advisory lock file <file>.lock (optional, RosterConfig::process_lock)
//!   for several processes sharing one data directory.
//!
//! Both are released on Drop. Locks are never nested across two documents.

use fs2::FileExt;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::consts::LOCK_SUFFIX;
use crate::error::{Result, StoreError};

/// Registry of per-path mutexes. Entries are created lazily and kept for the
/// lifetime of the registry (the set of documents is small and static).
#[derive(Default)]
pub struct PathLocks {
    inner: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl PathLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, path: &Path) -> Arc<Mutex<()>> {
        // Отравленный мьютекс не страшен: под ним только HashMap без инвариантов.
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(path.to_path_buf())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run `f` while holding the mutex for `path`.
    pub fn with<T>(&self, path: &Path, f: impl FnOnce() -> T) -> T {
        let slot = self.slot(path);
        let _guard: MutexGuard<'_, ()> = slot.lock().unwrap_or_else(|e| e.into_inner());
        f()
    }
}

/// Exclusive fs2 lock on <file>.lock; unlocked on Drop.
pub struct LockGuard {
    file: File,
    path: PathBuf,
}

impl LockGuard {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        // fs2 unlock errors on drop are ignored deliberately.
        let _ = self.file.unlock();
    }
}

pub fn lock_file_path(doc_path: &Path) -> PathBuf {
    let mut s = doc_path.as_os_str().to_os_string();
    s.push(LOCK_SUFFIX);
    PathBuf::from(s)
}

/// Acquire the exclusive lock file for a document. Blocks until acquired.
/// The parent directory must exist.
pub fn acquire_exclusive_lock(doc_path: &Path) -> Result<LockGuard> {
    let path = lock_file_path(doc_path);
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(&path)
        .map_err(|e| StoreError::Lock {
            path: path.clone(),
            source: e,
        })?;
    file.lock_exclusive().map_err(|e| StoreError::Lock {
        path: path.clone(),
        source: e,
    })?;
    Ok(LockGuard { file, path })
}

/// Non-blocking variant. Returns Err if another holder has the lock.
pub fn try_acquire_exclusive_lock(doc_path: &Path) -> Result<LockGuard> {
    let path = lock_file_path(doc_path);
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(&path)
        .map_err(|e| StoreError::Lock {
            path: path.clone(),
            source: e,
        })?;
    file.try_lock_exclusive().map_err(|e| StoreError::Lock {
        path: path.clone(),
        source: e,
    })?;
    Ok(LockGuard { file, path })
}
