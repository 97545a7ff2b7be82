//! api — thin route layer: (method, url, body) -> JSON reply.
//!
//! Transport independent; rosterdb_server wires it to tiny_http. Each route
//! maps 1:1 onto a Store / SnapshotManager call.
//!
//! Ответы: записи → {"message": ...}, ошибки → {"detail": ...}.
//! NotFound → 404, InvalidInput → 400, ошибки хранилища → 500.

use log::error;
use serde_json::{json, Value};
use std::io::Read;

use crate::codec::Document;
use crate::collection::Collection;
use crate::error::{ErrorKind, StoreError};
use crate::store::Store;

#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    pub fn message(msg: impl Into<String>) -> Self {
        Self::ok(json!({ "message": msg.into() }))
    }

    pub fn detail(status: u16, detail: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "detail": detail.into() }),
        }
    }
}

impl From<StoreError> for Reply {
    fn from(e: StoreError) -> Self {
        match e.kind() {
            ErrorKind::NotFound => Reply::detail(404, e.to_string()),
            ErrorKind::InvalidInput => Reply::detail(400, e.to_string()),
            ErrorKind::Storage => {
                error!("api: storage failure: {}", e);
                Reply::detail(500, "storage failure")
            }
        }
    }
}

type Handled = std::result::Result<Reply, Reply>;

/// Read a request body of at most `limit` bytes.
/// Larger bodies are rejected with 413 without buffering the rest.
pub fn read_body<R: Read>(reader: R, limit: u64) -> std::result::Result<Vec<u8>, Reply> {
    let mut body = Vec::new();
    reader
        .take(limit.saturating_add(1))
        .read_to_end(&mut body)
        .map_err(|e| Reply::detail(400, format!("unreadable body: {e}")))?;
    if body.len() as u64 > limit {
        return Err(Reply::detail(413, format!("request body exceeds {limit} bytes")));
    }
    Ok(body)
}

fn parse_body(body: &[u8]) -> std::result::Result<Document, Reply> {
    serde_json::from_slice(body).map_err(|e| Reply::detail(400, format!("invalid JSON body: {e}")))
}

fn list_body(body: &[u8]) -> std::result::Result<Document, Reply> {
    let doc = parse_body(body)?;
    if doc.is_array() {
        Ok(doc)
    } else {
        Err(Reply::detail(400, "expected a JSON array"))
    }
}

fn parse_index(seg: &str) -> std::result::Result<usize, Reply> {
    // Отрицательный или нечисловой индекс — такой же "not found", как и выход за границы.
    seg.parse::<usize>()
        .map_err(|_| Reply::detail(404, format!("invalid index '{seg}'")))
}

fn parse_week_key(week: &str, year: &str) -> std::result::Result<(u32, i32), Reply> {
    match (week.parse::<u32>(), year.parse::<i32>()) {
        (Ok(w), Ok(y)) => Ok((w, y)),
        _ => Err(Reply::detail(400, format!("invalid calendar week {week}/{year}"))),
    }
}

/// Collections with positional CRUD (append/update/delete).
fn list_collection(seg: &str) -> Option<Collection> {
    match Collection::parse(seg)? {
        c @ (Collection::Employees
        | Collection::Branches
        | Collection::Shifts
        | Collection::WorkActivities) => Some(c),
        _ => None,
    }
}

/// Dispatch one request.
pub fn handle(store: &Store, method: &str, url: &str, body: &[u8]) -> Reply {
    let path = url.split(['?', '#']).next().unwrap_or("");
    let segs: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let method = method.to_ascii_uppercase();

    match route(store, &method, &segs, body) {
        Ok(r) | Err(r) => r,
    }
}

fn route(store: &Store, method: &str, segs: &[&str], body: &[u8]) -> Handled {
    match (method, segs) {
        ("GET", []) => Ok(Reply::ok(json!({ "status": "rosterdb running" }))),

        // ---------- overview ----------
        ("GET", ["overview"]) => Ok(Reply::ok(store.read(Collection::Overview))),
        ("POST", ["overview"]) => {
            let doc = parse_body(body)?;
            store.replace(Collection::Overview, &doc)?;
            Ok(Reply::message("overview saved"))
        }
        ("DELETE", ["overview"]) => {
            store.clear(Collection::Overview)?;
            Ok(Reply::message("overview cleared"))
        }
        ("PUT", ["overview", idx]) => {
            let index = parse_index(idx)?;
            let item = list_body(body)?;
            store.update_at(Collection::Overview, index, item)?;
            Ok(Reply::message("overview entry updated"))
        }
        ("DELETE", ["overview", idx]) => {
            let index = parse_index(idx)?;
            store.delete_at(Collection::Overview, index)?;
            Ok(Reply::message("overview entry deleted"))
        }

        // ---------- teams ----------
        ("GET", ["teams"]) => Ok(Reply::ok(store.read(Collection::Teams))),
        ("POST", ["teams"]) => {
            let doc = list_body(body)?;
            store.replace(Collection::Teams, &doc)?;
            Ok(Reply::message("teams saved"))
        }

        // ---------- calendar weeks ----------
        ("GET", ["calendar-weeks"]) => Ok(Reply::ok(Value::Array(store.snapshots().list_all()))),
        ("GET", ["calendar-weeks", w, y]) => {
            let (week, year) = parse_week_key(w, y)?;
            Ok(Reply::ok(store.snapshots().get_record(week, year)?))
        }
        ("POST", ["calendar-weeks", w, y]) => {
            let (week, year) = parse_week_key(w, y)?;
            let replaced = store.snapshots().create(week, year)?;
            Ok(Reply::ok(json!({
                "message": format!("calendar week {week}/{year} saved"),
                "replaced": replaced,
            })))
        }
        ("DELETE", ["calendar-weeks", w, y]) => {
            let (week, year) = parse_week_key(w, y)?;
            store.snapshots().delete(week, year)?;
            Ok(Reply::message(format!("calendar week {week}/{year} deleted")))
        }
        ("POST", ["calendar-weeks", w, y, "restore"]) => {
            let (week, year) = parse_week_key(w, y)?;
            store.snapshots().restore(week, year)?;
            Ok(Reply::message("overview restored"))
        }

        // ---------- positional collections ----------
        ("GET", [name]) if list_collection(name).is_some() => {
            let c = list_collection(name).ok_or_else(not_found)?;
            Ok(Reply::ok(store.read(c)))
        }
        ("POST", [name]) if list_collection(name).is_some() => {
            let c = list_collection(name).ok_or_else(not_found)?;
            let item = list_body(body)?;
            store.append(c, item)?;
            Ok(Reply::message(format!("{c}: item saved")))
        }
        ("PUT", [name, idx]) if list_collection(name).is_some() => {
            let c = list_collection(name).ok_or_else(not_found)?;
            let index = parse_index(idx)?;
            let item = list_body(body)?;
            store.update_at(c, index, item)?;
            Ok(Reply::message(format!("{c}: item updated")))
        }
        ("DELETE", [name, idx]) if list_collection(name).is_some() => {
            let c = list_collection(name).ok_or_else(not_found)?;
            let index = parse_index(idx)?;
            store.delete_at(c, index)?;
            Ok(Reply::message(format!("{c}: item deleted")))
        }

        (_, segs) if is_known_path(segs) => Err(Reply::detail(405, "method not allowed")),
        _ => Err(not_found()),
    }
}

fn not_found() -> Reply {
    Reply::detail(404, "not found")
}

fn is_known_path(segs: &[&str]) -> bool {
    match segs {
        [] => true,
        [name, ..] => Collection::parse(name).is_some(),
    }
}
