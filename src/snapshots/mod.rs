//! snapshots — point-in-time копии overview по календарным неделям (ISO).
//!
//! Состав:
//! - week.rs    — понедельник ISO-недели, даты Montag..Sonntag, подписи дней.
//! - manager.rs — SnapshotManager: list_all/get/create(upsert)/delete/restore.

pub mod manager;
pub mod week;

pub use manager::{CalendarWeek, SnapshotManager};
