//! store/core — Store handle: data directory, config, per-path locks.

use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::codec::{self, Document};
use crate::collection::Collection;
use crate::config::{RosterConfig, StoreBuilder};
use crate::error::{Result, StoreError};
use crate::lock::{acquire_exclusive_lock, PathLocks};
use crate::snapshots::SnapshotManager;

use super::io;

/// Document store rooted at one data directory.
///
/// All operations take a logical `Collection`; the collection -> file
/// mapping is static (`<data_dir>/<name>.json`).
pub struct Store {
    root: PathBuf,
    cfg: RosterConfig,
    locks: PathLocks,
}

impl Store {
    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// Open a store at `root` with the rest of the configuration taken from env.
    pub fn open(root: &Path) -> Result<Self> {
        Self::open_with_config(RosterConfig::from_env().with_data_dir(root))
    }

    pub fn open_with_config(cfg: RosterConfig) -> Result<Self> {
        let root = cfg.data_dir.clone();
        if cfg.sweep_tmp_on_open {
            io::sweep_stale_tmp(&root, cfg.stale_tmp_age)?;
        }
        info!("store: opened {}", cfg);
        Ok(Self {
            root,
            cfg,
            locks: PathLocks::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &RosterConfig {
        &self.cfg
    }

    pub fn path_of(&self, c: Collection) -> PathBuf {
        self.root.join(c.file_name())
    }

    /// Current document, empty list if nothing has been saved yet.
    pub fn load(&self, c: Collection) -> Document {
        self.load_or(c, codec::empty_list())
    }

    pub fn load_or(&self, c: Collection, default: Document) -> Document {
        io::load(&self.path_of(c), default)
    }

    pub(crate) fn save_unlocked(&self, path: &Path, doc: &Document) -> Result<()> {
        io::save(path, doc, self.cfg.fsync)
    }

    /// Run a load-modify-save cycle for `c` under its path lock
    /// (plus the fs2 lock file when process_lock is on).
    pub(crate) fn mutate<T>(&self, c: Collection, f: impl FnOnce(&Path) -> Result<T>) -> Result<T> {
        let path = self.path_of(c);
        self.locks.with(&path, || {
            let _flock = if self.cfg.process_lock {
                if !self.root.exists() {
                    std::fs::create_dir_all(&self.root)
                        .map_err(|e| StoreError::io("create dir", &self.root, e))?;
                }
                Some(acquire_exclusive_lock(&path)?)
            } else {
                None
            };
            debug!("mutate {}: lock held", c);
            f(&path)
        })
    }

    pub fn snapshots(&self) -> SnapshotManager<'_> {
        SnapshotManager::new(self)
    }
}
