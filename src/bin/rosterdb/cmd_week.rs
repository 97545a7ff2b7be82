use anyhow::{Context, Result};
use serde_json::Value;
use std::path::PathBuf;

use super::util::{open_store, print_json};

/// CLI: week-* — снапшоты overview по календарным неделям.
///
/// Примеры:
///   rosterdb week-create 5 2024 --path ./data
///   rosterdb week-restore 5 2024 --path ./data
pub fn exec_list(path: Option<PathBuf>, json: bool) -> Result<()> {
    let store = open_store(path)?;
    let records = store.snapshots().list_all();
    if json {
        return print_json(&Value::Array(records));
    }
    if records.is_empty() {
        println!("no calendar weeks stored");
        return Ok(());
    }
    for r in &records {
        let week = r.get("week").and_then(Value::as_i64).unwrap_or(-1);
        let year = r.get("year").and_then(Value::as_i64).unwrap_or(-1);
        let entries = match r.get("overview") {
            Some(Value::Array(v)) => v.len().to_string(),
            Some(_) => "object".to_string(),
            None => "0".to_string(),
        };
        println!("KW {:>2}/{}  overview entries: {}", week, year, entries);
    }
    Ok(())
}

pub fn exec_get(path: Option<PathBuf>, week: u32, year: i32) -> Result<()> {
    let store = open_store(path)?;
    let snap = store.snapshots().get(week, year)?;
    print_json(&serde_json::to_value(snap)?)
}

pub fn exec_create(path: Option<PathBuf>, week: u32, year: i32) -> Result<()> {
    let store = open_store(path)?;
    let replaced = store
        .snapshots()
        .create(week, year)
        .with_context(|| format!("create calendar week {}/{}", week, year))?;
    println!(
        "week-create: OK (week={}, year={}, replaced={})",
        week, year, replaced
    );
    Ok(())
}

pub fn exec_delete(path: Option<PathBuf>, week: u32, year: i32) -> Result<()> {
    let store = open_store(path)?;
    let removed = store.snapshots().delete(week, year)?;
    println!("week-delete: OK (week={}, year={}, removed={})", week, year, removed);
    Ok(())
}

pub fn exec_restore(path: Option<PathBuf>, week: u32, year: i32) -> Result<()> {
    let store = open_store(path)?;
    store.snapshots().restore(week, year)?;
    println!("week-restore: OK (overview <- week {}/{})", week, year);
    Ok(())
}
