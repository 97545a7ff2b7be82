//! store/io — атомарная загрузка/сохранение одного документа по пути.
//!
//! save: tmp+rename в том же каталоге (<file>.tmp -> <file>). Читатель никогда
//! не видит частично записанный файл; падение до rename оставляет прежнюю версию.
//!
//! load: никогда не возвращает ошибку.
//! - файла нет / файл пустой (после trim) → default;
//! - содержимое не парсится → копия в <file>.corrupt_backup (перезаписывает
//!   предыдущую копию) + default;
//! - прочие I/O ошибки → default.
//!
//! Каталог создаётся при первом save. Ошибки создания каталога, записи tmp
//! или rename пробрасываются как StoreError::Io.

use log::{debug, info, warn};
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use crate::codec::{self, Decoded, Document};
use crate::consts::{CORRUPT_BACKUP_SUFFIX, TMP_SUFFIX};
use crate::error::{Result, StoreError};
use crate::metrics::{
    record_load, record_load_io_degraded, record_quarantine, record_save, record_save_failure,
    record_tmp_swept,
};

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut s: OsString = path.as_os_str().to_os_string();
    s.push(suffix);
    PathBuf::from(s)
}

/// <file>.tmp
pub fn tmp_path(path: &Path) -> PathBuf {
    with_suffix(path, TMP_SUFFIX)
}

/// <file>.corrupt_backup
pub fn backup_path(path: &Path) -> PathBuf {
    with_suffix(path, CORRUPT_BACKUP_SUFFIX)
}

/// Load a document, substituting `default` for anything that is not a valid document.
pub fn load(path: &Path, default: Document) -> Document {
    let bytes = match fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("load {}: missing, using default", path.display());
            record_load(true);
            return default;
        }
        Err(e) => {
            warn!("load {}: read failed ({}), using default", path.display(), e);
            record_load_io_degraded();
            record_load(true);
            return default;
        }
    };

    match codec::decode(&bytes) {
        Decoded::Value(v) => {
            debug!("load {}: {} B", path.display(), bytes.len());
            record_load(false);
            v
        }
        Decoded::Empty => {
            debug!("load {}: empty, using default", path.display());
            record_load(true);
            default
        }
        Decoded::Malformed(reason) => {
            quarantine(path, &reason);
            record_load(true);
            default
        }
    }
}

/// Copy an unparseable document aside. The original stays in place until the next save.
fn quarantine(path: &Path, reason: &str) {
    let backup = backup_path(path);
    match fs::copy(path, &backup) {
        Ok(_) => {
            record_quarantine();
            warn!(
                "load {}: corrupt document ({}), backup -> {}",
                path.display(),
                reason,
                backup.display()
            );
        }
        Err(e) => {
            // Бэкап не удался — всё равно отдаём default, доступность важнее.
            warn!(
                "load {}: corrupt document ({}), backup to {} failed: {}",
                path.display(),
                reason,
                backup.display(),
                e
            );
        }
    }
}

/// Write the encoded document to <file>.tmp without publishing it.
///
/// First half of `save`. Until `commit` runs, readers still see the previous version.
pub fn stage(path: &Path, doc: &Document, fsync: bool) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| StoreError::io("create dir", parent, e))?;
        }
    }

    let bytes = codec::encode(doc)?;
    let tmp = tmp_path(path);
    let written = (|| -> std::io::Result<()> {
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)?;
        f.write_all(&bytes)?;
        f.flush()?;
        if fsync {
            f.sync_all()?;
        }
        Ok(())
    })();

    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        record_save_failure();
        return Err(StoreError::io("write tmp", tmp, e));
    }
    debug!("save {}: staged {} B", path.display(), bytes.len());
    Ok(tmp)
}

/// Atomically replace `path` with the staged temp file.
///
/// Only a successful rename counts as a save in metrics.
pub fn commit(tmp: &Path, path: &Path) -> Result<()> {
    let bytes = fs::metadata(tmp).map(|m| m.len()).unwrap_or(0);
    fs::rename(tmp, path).map_err(|e| {
        let _ = fs::remove_file(tmp);
        record_save_failure();
        StoreError::io("rename", tmp, e)
    })?;
    record_save(bytes);
    Ok(())
}

/// Durable all-or-nothing write: stage to <file>.tmp, then rename over <file>.
pub fn save(path: &Path, doc: &Document, fsync: bool) -> Result<()> {
    let tmp = stage(path, doc, fsync)?;
    commit(&tmp, path)
}

/// Remove leftover <file>.tmp in `dir` (writes interrupted before rename).
///
/// Only files not modified for at least `min_age` are removed: a fresh tmp may
/// belong to a save in flight in another process sharing the directory.
/// Missing directory is not an error. Returns the number of removed files.
pub fn sweep_stale_tmp(dir: &Path, min_age: Duration) -> Result<u64> {
    let entries = match fs::read_dir(dir) {
        Ok(it) => it,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(StoreError::io("read dir", dir, e)),
    };

    let now = SystemTime::now();
    let mut removed = 0u64;
    let mut kept = 0u64;
    for e in entries {
        let p = match e {
            Ok(e) => e.path(),
            Err(_) => continue,
        };
        let is_tmp = p
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.ends_with(TMP_SUFFIX))
            .unwrap_or(false);
        if !is_tmp || !p.is_file() {
            continue;
        }
        // mtime в будущем (сдвиг часов) считаем возрастом 0.
        let age = fs::metadata(&p)
            .and_then(|m| m.modified())
            .map(|t| now.duration_since(t).unwrap_or(Duration::ZERO))
            .unwrap_or(Duration::ZERO);
        if age < min_age {
            kept += 1;
            continue;
        }
        match fs::remove_file(&p) {
            Ok(()) => removed += 1,
            Err(e) => warn!("sweep: failed to remove {}: {}", p.display(), e),
        }
    }
    if kept > 0 {
        debug!("sweep: kept {} fresh tmp file(s) in {}", kept, dir.display());
    }
    if removed > 0 {
        info!("sweep: removed {} stale tmp file(s) in {}", removed, dir.display());
        record_tmp_swept(removed);
    }
    Ok(removed)
}

/// Read-only inspection of a document file (used by status; never quarantines).
#[derive(Debug)]
pub enum Inspect {
    Missing,
    Empty { bytes: u64 },
    Ok { bytes: u64, doc: Document },
    Malformed { bytes: u64, reason: String },
    Unreadable(String),
}

pub fn inspect(path: &Path) -> Inspect {
    match fs::read(path) {
        Ok(b) => {
            let bytes = b.len() as u64;
            match codec::decode(&b) {
                Decoded::Empty => Inspect::Empty { bytes },
                Decoded::Value(doc) => Inspect::Ok { bytes, doc },
                Decoded::Malformed(reason) => Inspect::Malformed { bytes, reason },
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Inspect::Missing,
        Err(e) => Inspect::Unreadable(e.to_string()),
    }
}
