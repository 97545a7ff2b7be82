//! Centralized configuration and builder for the roster store.
//!
//! Goals:
//! - Single place to collect tunables instead of scattering env lookups.
//! - RosterConfig::from_env() reads ROSTER_* variables.
//! - StoreBuilder returns a RosterConfig which Store consumes.
//!
//! Defaults:
//! - data_dir = ./data
//! - fsync = true (fsync tmp file before rename)
//! - process_lock = false (только in-process мьютексы; без lock-файлов в data_dir)
//! - sweep_tmp_on_open = true
//! - stale_tmp_age = 3600s (sweep удаляет только *.tmp старше этого)
//! - http_addr = 0.0.0.0:8000 (server binary only)

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::consts::{
    DEFAULT_DATA_DIR, DEFAULT_HTTP_ADDR, DEFAULT_STALE_TMP_SECS, ENV_DATA_DIR, ENV_FSYNC,
    ENV_HTTP_ADDR, ENV_PROCESS_LOCK, ENV_STALE_TMP_SECS, ENV_SWEEP_TMP,
};

/// Top-level configuration for the store (and the server binary).
#[derive(Clone, Debug)]
pub struct RosterConfig {
    /// Directory holding one JSON file per collection.
    /// Env: ROSTER_DATA_DIR (default "data")
    pub data_dir: PathBuf,

    /// fsync the temp file before the atomic rename.
    /// Env: ROSTER_FSYNC (default true; "0|false|off|no" => false)
    pub fsync: bool,

    /// Additionally hold an fs2 exclusive lock file (<file>.lock) around every
    /// load-modify-save, for several processes sharing one data_dir.
    /// Env: ROSTER_PROCESS_LOCK (default false)
    pub process_lock: bool,

    /// Remove leftover <file>.tmp from interrupted writes when the store opens.
    /// Env: ROSTER_SWEEP_TMP (default true)
    pub sweep_tmp_on_open: bool,

    /// Minimum age of a *.tmp before the sweep removes it. Younger files may
    /// be a save in flight in another process sharing data_dir.
    /// Env: ROSTER_STALE_TMP_SECS (default 3600)
    pub stale_tmp_age: Duration,

    /// Listen address of rosterdb_server.
    /// Env: ROSTER_HTTP_ADDR (default "0.0.0.0:8000")
    pub http_addr: String,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            fsync: true,
            process_lock: false,
            sweep_tmp_on_open: true,
            stale_tmp_age: Duration::from_secs(DEFAULT_STALE_TMP_SECS),
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
        }
    }
}

fn parse_bool(v: &str) -> Option<bool> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}

impl RosterConfig {
    /// Load configuration from environment variables on top of defaults.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var(ENV_DATA_DIR) {
            let s = v.trim();
            if !s.is_empty() {
                cfg.data_dir = PathBuf::from(s);
            }
        }

        if let Some(b) = std::env::var(ENV_FSYNC).ok().as_deref().and_then(parse_bool) {
            cfg.fsync = b;
        }

        if let Some(b) = std::env::var(ENV_PROCESS_LOCK)
            .ok()
            .as_deref()
            .and_then(parse_bool)
        {
            cfg.process_lock = b;
        }

        if let Some(b) = std::env::var(ENV_SWEEP_TMP).ok().as_deref().and_then(parse_bool) {
            cfg.sweep_tmp_on_open = b;
        }

        if let Some(secs) = std::env::var(ENV_STALE_TMP_SECS)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            cfg.stale_tmp_age = Duration::from_secs(secs);
        }

        if let Ok(v) = std::env::var(ENV_HTTP_ADDR) {
            let s = v.trim();
            if !s.is_empty() {
                cfg.http_addr = s.to_string();
            }
        }

        cfg
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_data_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_fsync(mut self, on: bool) -> Self {
        self.fsync = on;
        self
    }

    pub fn with_process_lock(mut self, on: bool) -> Self {
        self.process_lock = on;
        self
    }

    pub fn with_sweep_tmp_on_open(mut self, on: bool) -> Self {
        self.sweep_tmp_on_open = on;
        self
    }

    pub fn with_stale_tmp_age(mut self, age: Duration) -> Self {
        self.stale_tmp_age = age;
        self
    }

    pub fn with_http_addr<S: Into<String>>(mut self, addr: S) -> Self {
        self.http_addr = addr.into();
        self
    }
}

impl fmt::Display for RosterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RosterConfig {{ \
             data_dir: {}, \
             fsync: {}, \
             process_lock: {}, \
             sweep_tmp_on_open: {}, \
             stale_tmp_age: {}s, \
             http_addr: {} \
             }}",
            self.data_dir.display(),
            self.fsync,
            self.process_lock,
            self.sweep_tmp_on_open,
            self.stale_tmp_age.as_secs(),
            self.http_addr,
        )
    }
}

/// Lightweight builder that produces a RosterConfig.
/// Store exposes `Store::builder()` returning this builder.
#[derive(Clone, Debug)]
pub struct StoreBuilder {
    cfg: RosterConfig,
}

impl Default for StoreBuilder {
    fn default() -> Self {
        // Start from env, then allow overrides.
        Self {
            cfg: RosterConfig::from_env(),
        }
    }
}

impl StoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a clean default (without reading env).
    pub fn from_default() -> Self {
        Self {
            cfg: RosterConfig::default(),
        }
    }

    pub fn data_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.cfg.data_dir = dir.into();
        self
    }

    pub fn fsync(mut self, on: bool) -> Self {
        self.cfg.fsync = on;
        self
    }

    pub fn process_lock(mut self, on: bool) -> Self {
        self.cfg.process_lock = on;
        self
    }

    pub fn sweep_tmp_on_open(mut self, on: bool) -> Self {
        self.cfg.sweep_tmp_on_open = on;
        self
    }

    pub fn stale_tmp_age(mut self, age: Duration) -> Self {
        self.cfg.stale_tmp_age = age;
        self
    }

    pub fn http_addr<S: Into<String>>(mut self, addr: S) -> Self {
        self.cfg.http_addr = addr.into();
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> RosterConfig {
        self.cfg
    }

    /// Finish the builder and open the store.
    pub fn open(self) -> crate::error::Result<crate::store::Store> {
        crate::store::Store::open_with_config(self.cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::parse_bool;

    #[test]
    fn parse_bool_variants() {
        for s in ["1", "true", " ON ", "yes"] {
            assert_eq!(parse_bool(s), Some(true), "{s}");
        }
        for s in ["0", "false", "Off", "no"] {
            assert_eq!(parse_bool(s), Some(false), "{s}");
        }
        assert_eq!(parse_bool("maybe"), None);
    }
}
