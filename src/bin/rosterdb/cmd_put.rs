use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

use super::util::{open_store, parse_collection, read_json_arg};

pub fn exec_append(path: Option<PathBuf>, collection: String, json: String) -> Result<()> {
    let store = open_store(path)?;
    let c = parse_collection(&collection)?;
    let item = read_json_arg(&json)?;
    let idx = store
        .append(c, item)
        .with_context(|| format!("append to {}", c))?;
    println!("APPENDED {}[{}]", c, idx);
    Ok(())
}

pub fn exec_update(
    path: Option<PathBuf>,
    collection: String,
    index: usize,
    json: String,
) -> Result<()> {
    let store = open_store(path)?;
    let c = parse_collection(&collection)?;
    let item = read_json_arg(&json)?;
    store.update_at(c, index, item)?;
    println!("UPDATED {}[{}]", c, index);
    Ok(())
}

pub fn exec_replace(path: Option<PathBuf>, collection: String, json: String) -> Result<()> {
    let store = open_store(path)?;
    let c = parse_collection(&collection)?;
    let doc = read_json_arg(&json)?;
    store.replace(c, &doc)?;
    println!("REPLACED {}", c);
    Ok(())
}

pub fn exec_merge(path: Option<PathBuf>, collection: String, json: String) -> Result<()> {
    let store = open_store(path)?;
    let c = parse_collection(&collection)?;
    let partial = match read_json_arg(&json)? {
        serde_json::Value::Object(m) => m,
        _ => return Err(anyhow!("merge expects a JSON object")),
    };
    let keys = partial.len();
    store.merge_object(c, partial)?;
    println!("MERGED {} key(s) into {}", keys, c);
    Ok(())
}
