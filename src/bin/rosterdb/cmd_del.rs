use anyhow::Result;
use std::path::PathBuf;

use super::util::{open_store, parse_collection, print_json};

pub fn exec_delete(path: Option<PathBuf>, collection: String, index: usize) -> Result<()> {
    let store = open_store(path)?;
    let c = parse_collection(&collection)?;
    let removed = store.delete_at(c, index)?;
    println!("DELETED {}[{}]:", c, index);
    print_json(&removed)
}

pub fn exec_clear(path: Option<PathBuf>, collection: String) -> Result<()> {
    let store = open_store(path)?;
    let c = parse_collection(&collection)?;
    store.clear(c)?;
    println!("CLEARED {}", c);
    Ok(())
}
