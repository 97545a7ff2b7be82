use anyhow::Result;
use std::path::PathBuf;

use super::util::{open_store, parse_collection, print_json};

pub fn exec(path: Option<PathBuf>, collection: String) -> Result<()> {
    let store = open_store(path)?;
    let c = parse_collection(&collection)?;
    print_json(&store.read(c))
}
