//! Общие константы (файлы документов, суффиксы, ENV, формат дат).

// -------- Data directory --------
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DOC_EXT: &str = "json";

// Временный файл для write-then-rename: <file>.tmp рядом с целевым файлом.
pub const TMP_SUFFIX: &str = ".tmp";
// Карантин повреждённого документа: <file>.corrupt_backup (хранится только последний).
pub const CORRUPT_BACKUP_SUFFIX: &str = ".corrupt_backup";
// Lock-файл на документ (только при process_lock=true).
pub const LOCK_SUFFIX: &str = ".lock";

// -------- Codec --------
pub const JSON_INDENT: &[u8] = b"    ";

// -------- ENV --------
pub const ENV_DATA_DIR: &str = "ROSTER_DATA_DIR";
pub const ENV_FSYNC: &str = "ROSTER_FSYNC";
pub const ENV_PROCESS_LOCK: &str = "ROSTER_PROCESS_LOCK";
pub const ENV_SWEEP_TMP: &str = "ROSTER_SWEEP_TMP";
pub const ENV_HTTP_ADDR: &str = "ROSTER_HTTP_ADDR";
pub const ENV_STALE_TMP_SECS: &str = "ROSTER_STALE_TMP_SECS";

pub const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8000";
// Лимит тела HTTP-запроса (rosterdb_server); больше — 413.
pub const MAX_BODY_BYTES: u64 = 8 * 1024 * 1024;
// Младше этого возраста *.tmp не трогаем при sweep: может быть save в полёте.
pub const DEFAULT_STALE_TMP_SECS: u64 = 3600;

// -------- Calendar weeks --------
pub const WEEKDAY_LABELS: [&str; 7] = [
    "Montag",
    "Dienstag",
    "Mittwoch",
    "Donnerstag",
    "Freitag",
    "Samstag",
    "Sonntag",
];
pub const DAY_DATE_FORMAT: &str = "%d.%m.%Y";

// Допустимый диапазон лет для ISO-недель (как у календаря 1..=9999).
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;
