//! Lightweight global metrics for the roster store.
//!
//! Потокобезопасные атомарные счётчики для подсистем:
//! - Document I/O (load/save)
//! - Corruption quarantine / degraded loads
//! - Calendar week snapshots

use std::sync::atomic::{AtomicU64, Ordering};

// ----- Document I/O -----
static DOC_LOADS_TOTAL: AtomicU64 = AtomicU64::new(0);
static DOC_LOADS_DEFAULTED: AtomicU64 = AtomicU64::new(0);
static DOC_SAVES_TOTAL: AtomicU64 = AtomicU64::new(0);
static DOC_BYTES_WRITTEN: AtomicU64 = AtomicU64::new(0);
static DOC_SAVE_FAILURES: AtomicU64 = AtomicU64::new(0);

// ----- Recovery -----
static CORRUPT_QUARANTINED: AtomicU64 = AtomicU64::new(0);
static LOAD_IO_DEGRADED: AtomicU64 = AtomicU64::new(0);
static TMP_SWEPT: AtomicU64 = AtomicU64::new(0);

// ----- Snapshots -----
static SNAPSHOTS_CREATED: AtomicU64 = AtomicU64::new(0);
static SNAPSHOTS_REPLACED: AtomicU64 = AtomicU64::new(0);
static SNAPSHOTS_DELETED: AtomicU64 = AtomicU64::new(0);
static SNAPSHOTS_RESTORED: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    pub doc_loads_total: u64,
    /// Loads answered with the caller's default (missing/empty/corrupt/io).
    pub doc_loads_defaulted: u64,
    pub doc_saves_total: u64,
    pub doc_bytes_written: u64,
    pub doc_save_failures: u64,

    pub corrupt_quarantined: u64,
    pub load_io_degraded: u64,
    pub tmp_swept: u64,

    pub snapshots_created: u64,
    pub snapshots_replaced: u64,
    pub snapshots_deleted: u64,
    pub snapshots_restored: u64,
}

impl MetricsSnapshot {
    pub fn avg_save_bytes(&self) -> f64 {
        if self.doc_saves_total == 0 {
            0.0
        } else {
            self.doc_bytes_written as f64 / self.doc_saves_total as f64
        }
    }
}

// ----- Recorders (I/O) -----
pub fn record_load(defaulted: bool) {
    DOC_LOADS_TOTAL.fetch_add(1, Ordering::Relaxed);
    if defaulted {
        DOC_LOADS_DEFAULTED.fetch_add(1, Ordering::Relaxed);
    }
}

pub fn record_save(bytes: u64) {
    DOC_SAVES_TOTAL.fetch_add(1, Ordering::Relaxed);
    DOC_BYTES_WRITTEN.fetch_add(bytes, Ordering::Relaxed);
}

pub fn record_save_failure() {
    DOC_SAVE_FAILURES.fetch_add(1, Ordering::Relaxed);
}

// ----- Recorders (recovery) -----
pub fn record_quarantine() {
    CORRUPT_QUARANTINED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_load_io_degraded() {
    LOAD_IO_DEGRADED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_tmp_swept(n: u64) {
    TMP_SWEPT.fetch_add(n, Ordering::Relaxed);
}

// ----- Recorders (snapshots) -----
pub fn record_snapshot_created(replaced: bool) {
    SNAPSHOTS_CREATED.fetch_add(1, Ordering::Relaxed);
    if replaced {
        SNAPSHOTS_REPLACED.fetch_add(1, Ordering::Relaxed);
    }
}

pub fn record_snapshot_deleted() {
    SNAPSHOTS_DELETED.fetch_add(1, Ordering::Relaxed);
}

pub fn record_snapshot_restored() {
    SNAPSHOTS_RESTORED.fetch_add(1, Ordering::Relaxed);
}

// ----- Snapshot / Reset -----
pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        doc_loads_total: DOC_LOADS_TOTAL.load(Ordering::Relaxed),
        doc_loads_defaulted: DOC_LOADS_DEFAULTED.load(Ordering::Relaxed),
        doc_saves_total: DOC_SAVES_TOTAL.load(Ordering::Relaxed),
        doc_bytes_written: DOC_BYTES_WRITTEN.load(Ordering::Relaxed),
        doc_save_failures: DOC_SAVE_FAILURES.load(Ordering::Relaxed),

        corrupt_quarantined: CORRUPT_QUARANTINED.load(Ordering::Relaxed),
        load_io_degraded: LOAD_IO_DEGRADED.load(Ordering::Relaxed),
        tmp_swept: TMP_SWEPT.load(Ordering::Relaxed),

        snapshots_created: SNAPSHOTS_CREATED.load(Ordering::Relaxed),
        snapshots_replaced: SNAPSHOTS_REPLACED.load(Ordering::Relaxed),
        snapshots_deleted: SNAPSHOTS_DELETED.load(Ordering::Relaxed),
        snapshots_restored: SNAPSHOTS_RESTORED.load(Ordering::Relaxed),
    }
}

pub fn reset() {
    DOC_LOADS_TOTAL.store(0, Ordering::Relaxed);
    DOC_LOADS_DEFAULTED.store(0, Ordering::Relaxed);
    DOC_SAVES_TOTAL.store(0, Ordering::Relaxed);
    DOC_BYTES_WRITTEN.store(0, Ordering::Relaxed);
    DOC_SAVE_FAILURES.store(0, Ordering::Relaxed);

    CORRUPT_QUARANTINED.store(0, Ordering::Relaxed);
    LOAD_IO_DEGRADED.store(0, Ordering::Relaxed);
    TMP_SWEPT.store(0, Ordering::Relaxed);

    SNAPSHOTS_CREATED.store(0, Ordering::Relaxed);
    SNAPSHOTS_REPLACED.store(0, Ordering::Relaxed);
    SNAPSHOTS_DELETED.store(0, Ordering::Relaxed);
    SNAPSHOTS_RESTORED.store(0, Ordering::Relaxed);
}

/// Prometheus text exposition (served by rosterdb_server at /metrics).
pub fn render_prometheus() -> String {
    let m = snapshot();
    let mut out = String::new();

    let ver = env!("CARGO_PKG_VERSION");
    out.push_str("# HELP rosterdb_build_info Build info.\n");
    out.push_str("# TYPE rosterdb_build_info gauge\n");
    out.push_str(&format!("rosterdb_build_info{{version=\"{}\"}} 1\n", ver));

    let counters: [(&str, &str, u64); 12] = [
        ("rosterdb_doc_loads_total", "Document loads.", m.doc_loads_total),
        (
            "rosterdb_doc_loads_defaulted_total",
            "Loads answered with the default value.",
            m.doc_loads_defaulted,
        ),
        ("rosterdb_doc_saves_total", "Atomic document saves.", m.doc_saves_total),
        ("rosterdb_doc_bytes_written_total", "Bytes written by saves.", m.doc_bytes_written),
        ("rosterdb_doc_save_failures_total", "Failed saves (I/O).", m.doc_save_failures),
        (
            "rosterdb_corrupt_quarantined_total",
            "Corrupt documents copied to .corrupt_backup.",
            m.corrupt_quarantined,
        ),
        (
            "rosterdb_load_io_degraded_total",
            "Loads degraded to default due to I/O errors.",
            m.load_io_degraded,
        ),
        ("rosterdb_tmp_swept_total", "Stale .tmp files removed at open.", m.tmp_swept),
        (
            "rosterdb_snapshots_created_total",
            "Calendar week snapshots written.",
            m.snapshots_created,
        ),
        (
            "rosterdb_snapshots_replaced_total",
            "Snapshots that replaced an existing week.",
            m.snapshots_replaced,
        ),
        (
            "rosterdb_snapshots_deleted_total",
            "Calendar week snapshots deleted.",
            m.snapshots_deleted,
        ),
        (
            "rosterdb_snapshots_restored_total",
            "Overview restores from snapshots.",
            m.snapshots_restored,
        ),
    ];
    for (name, help, v) in counters {
        out.push_str(&format!("# HELP {} {}\n", name, help));
        out.push_str(&format!("# TYPE {} counter\n", name));
        out.push_str(&format!("{} {}\n", name, v));
    }

    out.push_str("# HELP rosterdb_doc_save_bytes_avg Average document size per save.\n");
    out.push_str("# TYPE rosterdb_doc_save_bytes_avg gauge\n");
    out.push_str(&format!("rosterdb_doc_save_bytes_avg {:.2}\n", m.avg_save_bytes()));

    out
}
