//! store/status — read-only per-collection report (для CLI status и диагностики).

use serde::Serialize;
use std::path::PathBuf;

use crate::codec::{shape_of, Shape};
use crate::collection::Collection;

use super::core::Store;
use super::io::{self, Inspect};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocState {
    Missing,
    Empty,
    Ok,
    Malformed,
    Unreadable,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentStatus {
    pub collection: &'static str,
    pub path: PathBuf,
    pub state: DocState,
    pub bytes: u64,
    pub shape: Option<Shape>,
    /// List length or map key count; None for scalars and unreadable files.
    pub len: Option<usize>,
    pub corrupt_backup: bool,
    /// Parse/read error text for malformed or unreadable documents.
    pub detail: Option<String>,
}

impl Store {
    /// Inspect every collection without quarantining anything.
    pub fn status(&self) -> Vec<DocumentStatus> {
        Collection::ALL
            .iter()
            .map(|&c| self.status_of(c))
            .collect()
    }

    pub fn status_of(&self, c: Collection) -> DocumentStatus {
        let path = self.path_of(c);
        let corrupt_backup = io::backup_path(&path).exists();
        let mut st = DocumentStatus {
            collection: c.name(),
            path: path.clone(),
            state: DocState::Missing,
            bytes: 0,
            shape: None,
            len: None,
            corrupt_backup,
            detail: None,
        };
        match io::inspect(&path) {
            Inspect::Missing => {}
            Inspect::Empty { bytes } => {
                st.state = DocState::Empty;
                st.bytes = bytes;
            }
            Inspect::Ok { bytes, doc } => {
                st.state = DocState::Ok;
                st.bytes = bytes;
                st.shape = Some(shape_of(&doc));
                st.len = match &doc {
                    serde_json::Value::Array(v) => Some(v.len()),
                    serde_json::Value::Object(m) => Some(m.len()),
                    _ => None,
                };
            }
            Inspect::Malformed { bytes, reason } => {
                st.state = DocState::Malformed;
                st.bytes = bytes;
                st.detail = Some(reason);
            }
            Inspect::Unreadable(e) => {
                st.state = DocState::Unreadable;
                st.detail = Some(e);
            }
        }
        st
    }
}
