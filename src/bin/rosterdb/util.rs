use anyhow::{anyhow, Context, Result};
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use rosterdb::{Collection, RosterConfig, Store};

/// Открыть Store: --path имеет приоритет над ROSTER_DATA_DIR.
pub fn open_store(path: Option<PathBuf>) -> Result<Store> {
    let mut cfg = RosterConfig::from_env();
    if let Some(p) = path {
        cfg = cfg.with_data_dir(p);
    }
    let dir = cfg.data_dir.clone();
    Store::open_with_config(cfg).with_context(|| format!("open store {}", dir.display()))
}

pub fn parse_collection(name: &str) -> Result<Collection> {
    Collection::parse(name).ok_or_else(|| {
        let known: Vec<&str> = Collection::ALL.iter().map(|c| c.name()).collect();
        anyhow!("unknown collection '{}' (known: {})", name, known.join(", "))
    })
}

/// JSON argument: literal, @file or - (stdin).
pub fn read_json_arg(arg: &str) -> Result<serde_json::Value> {
    let text = if arg == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else if let Some(p) = arg.strip_prefix('@') {
        fs::read_to_string(p).with_context(|| format!("read json file {}", p))?
    } else {
        arg.to_string()
    };
    serde_json::from_str(&text).context("parse JSON argument")
}

pub fn print_json(v: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(v)?);
    Ok(())
}
