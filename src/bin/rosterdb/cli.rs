use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Admin CLI для хранилища rosterdb
#[derive(Parser, Debug)]
#[command(
    name = "rosterdb",
    version,
    about = "rosterdb document store CLI",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Data directory (default: ROSTER_DATA_DIR or ./data)
    #[arg(long, global = true)]
    pub path: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand, Debug)]
pub enum Cmd {
    /// Per-collection state: missing/empty/ok/malformed, size, length, corrupt backup
    ///
    /// Пример:
    ///   rosterdb status --path ./data
    ///   rosterdb status --path ./data --json
    Status {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print a collection document (pretty JSON)
    Get {
        collection: String,
    },
    /// Append an item. JSON as literal, @file or - (stdin)
    Append {
        collection: String,
        json: String,
    },
    /// Replace the item at INDEX
    Update {
        collection: String,
        index: usize,
        json: String,
    },
    /// Delete the item at INDEX (later items shift down)
    Delete {
        collection: String,
        index: usize,
    },
    /// Save an empty list
    Clear {
        collection: String,
    },
    /// Replace the whole document
    Replace {
        collection: String,
        json: String,
    },
    /// Shallow-merge a JSON object into a map-shaped document
    Merge {
        collection: String,
        json: String,
    },
    /// List stored calendar week snapshots (week/year/entries)
    WeekList {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Print one calendar week snapshot
    WeekGet {
        week: u32,
        year: i32,
    },
    /// Snapshot the current overview as ISO week WEEK of YEAR (replaces an existing one)
    WeekCreate {
        week: u32,
        year: i32,
    },
    /// Delete a calendar week snapshot
    WeekDelete {
        week: u32,
        year: i32,
    },
    /// Overwrite the live overview with a snapshot (destructive, no backup)
    WeekRestore {
        week: u32,
        year: i32,
    },
}
