use anyhow::Result;
use std::path::PathBuf;

use rosterdb::metrics;
use rosterdb::DocState;

use super::util::open_store;

pub fn exec(path: Option<PathBuf>, json: bool) -> Result<()> {
    let store = open_store(path)?;
    let report = store.status();

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("data_dir: {}", store.root().display());
    for st in &report {
        let state = match st.state {
            DocState::Missing => "missing",
            DocState::Empty => "empty",
            DocState::Ok => "ok",
            DocState::Malformed => "MALFORMED",
            DocState::Unreadable => "UNREADABLE",
        };
        let len = st
            .len
            .map(|n| n.to_string())
            .unwrap_or_else(|| "-".to_string());
        print!(
            "  {:<16} {:<10} {:>8} B  len={:<5}",
            st.collection, state, st.bytes, len
        );
        if st.corrupt_backup {
            print!("  [corrupt_backup present]");
        }
        if let Some(d) = &st.detail {
            print!("  ({})", d);
        }
        println!();
    }

    let m = metrics::snapshot();
    if m.tmp_swept > 0 {
        println!("swept stale tmp files: {}", m.tmp_swept);
    }
    Ok(())
}
