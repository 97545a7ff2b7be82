//! store — документное хранилище поверх JSON-файлов.
//!
//! Разделение по подмодулям:
//! - io.rs     — атомарный load/save одного пути, карантин повреждённых файлов, sweep *.tmp
//! - core.rs   — Store (data_dir, конфиг, per-path locks), open
//! - ops.rs    — append/update_at/delete_at/clear/replace/merge_object
//! - status.rs — read-only отчёт по коллекциям

pub mod core;
pub mod io;
pub mod ops;
pub mod status;

pub use self::core::Store;
pub use status::{DocState, DocumentStatus};
