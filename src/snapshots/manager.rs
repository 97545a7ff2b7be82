//! Snapshot manager: capture/restore of the live overview, keyed by (week, year).
//!
//! Records live in the `calendar-weeks` collection:
//!   { "week": 5, "year": 2024, "days": {"Montag (29.01.2024)": "29.01.2024", ...}, "overview": <overview> }
//!
//! - create: upsert по ключу — существующая запись заменяется на своей позиции,
//!   иначе добавляется в конец. Не более одной записи на (week, year).
//! - restore: перезаписывает live overview содержимым снапшота (без бэкапа).
//! - Live и снапшоты независимы: create не меняет overview, restore не меняет снапшоты.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::codec::{self, Document};
use crate::collection::Collection;
use crate::error::{Result, StoreError};
use crate::metrics::{record_snapshot_created, record_snapshot_deleted, record_snapshot_restored};
use crate::store::{io, Store};

use super::week::{day_labels, week_dates};

/// Typed view of one calendar week snapshot record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarWeek {
    pub week: u32,
    pub year: i32,
    #[serde(default)]
    pub days: Map<String, Value>,
    #[serde(default = "codec::empty_list")]
    pub overview: Document,
}

impl CalendarWeek {
    /// Lenient view of a stored record already matched by key.
    fn from_entry(week: u32, year: i32, entry: &Value) -> Self {
        Self {
            week,
            year,
            days: entry
                .get("days")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            overview: entry
                .get("overview")
                .cloned()
                .unwrap_or_else(codec::empty_list),
        }
    }

    fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

fn matches(entry: &Value, week: u32, year: i32) -> bool {
    entry.get("week").and_then(Value::as_i64) == Some(i64::from(week))
        && entry.get("year").and_then(Value::as_i64) == Some(i64::from(year))
}

fn as_records(doc: Document) -> Vec<Value> {
    match doc {
        Value::Array(v) => v,
        other => {
            warn!(
                "calendar-weeks: document is {:?}, not a list; treating as empty",
                codec::shape_of(&other)
            );
            Vec::new()
        }
    }
}

pub struct SnapshotManager<'a> {
    store: &'a Store,
}

impl<'a> SnapshotManager<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Every stored record, in stored order.
    pub fn list_all(&self) -> Vec<Value> {
        as_records(self.store.load(Collection::CalendarWeeks))
    }

    pub fn get(&self, week: u32, year: i32) -> Result<CalendarWeek> {
        let entry = self.get_record(week, year)?;
        Ok(CalendarWeek::from_entry(week, year, &entry))
    }

    /// Stored record as is, including keys the typed view does not know.
    pub fn get_record(&self, week: u32, year: i32) -> Result<Value> {
        self.list_all()
            .into_iter()
            .find(|e| matches(e, week, year))
            .ok_or(StoreError::WeekNotFound { week, year })
    }

    /// Capture the current overview as week `week` of `year`.
    ///
    /// Returns true when an existing record for the same key was replaced.
    /// An invalid ISO week fails before anything is read or written.
    pub fn create(&self, week: u32, year: i32) -> Result<bool> {
        let dates = week_dates(week, year)?;
        let record = CalendarWeek {
            week,
            year,
            days: day_labels(&dates),
            overview: self.store.load(Collection::Overview),
        }
        .to_value()?;

        let replaced = self.store.mutate(Collection::CalendarWeeks, |path| {
            let mut records = as_records(io::load(path, codec::empty_list()));
            let replaced = match records.iter().position(|e| matches(e, week, year)) {
                Some(pos) => {
                    records[pos] = record;
                    true
                }
                None => {
                    records.push(record);
                    false
                }
            };
            self.store.save_unlocked(path, &Value::Array(records))?;
            Ok(replaced)
        })?;

        record_snapshot_created(replaced);
        info!(
            "snapshot: week {}/{} {} (monday {})",
            week,
            year,
            if replaced { "replaced" } else { "created" },
            dates[0]
        );
        Ok(replaced)
    }

    /// Remove every record for the key. NotFound if none matched.
    pub fn delete(&self, week: u32, year: i32) -> Result<usize> {
        let removed = self.store.mutate(Collection::CalendarWeeks, |path| {
            let records = as_records(io::load(path, codec::empty_list()));
            let before = records.len();
            let kept: Vec<Value> = records
                .into_iter()
                .filter(|e| !matches(e, week, year))
                .collect();
            let removed = before - kept.len();
            if removed == 0 {
                return Err(StoreError::WeekNotFound { week, year });
            }
            self.store.save_unlocked(path, &Value::Array(kept))?;
            Ok(removed)
        })?;

        record_snapshot_deleted();
        info!("snapshot: week {}/{} deleted", week, year);
        Ok(removed)
    }

    /// Overwrite the live overview with the snapshot's overview.
    pub fn restore(&self, week: u32, year: i32) -> Result<()> {
        let snap = self.get(week, year)?;
        self.store.replace(Collection::Overview, &snap.overview)?;
        record_snapshot_restored();
        info!("snapshot: overview restored from week {}/{}", week, year);
        Ok(())
    }
}
