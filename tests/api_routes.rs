use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rosterdb::api::{handle, read_body};
use rosterdb::{Collection, Store, StoreBuilder};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("rosterdb-api-{prefix}-{pid}-{t}-{id}"))
}

fn open(prefix: &str) -> Result<Store> {
    Ok(StoreBuilder::from_default()
        .data_dir(unique_root(prefix))
        .fsync(false)
        .open()?)
}

#[test]
fn root_and_unknown_paths() -> Result<()> {
    let store = open("root")?;
    let r = handle(&store, "GET", "/", b"");
    assert_eq!(r.status, 200);
    assert!(r.body["status"].is_string());

    assert_eq!(handle(&store, "GET", "/nope", b"").status, 404);
    assert_eq!(handle(&store, "GET", "/employees/0/extra", b"").status, 405);
    assert_eq!(handle(&store, "PATCH", "/employees", b"[]").status, 405);
    Ok(())
}

#[test]
fn positional_collection_crud() -> Result<()> {
    let store = open("crud")?;

    assert_eq!(handle(&store, "GET", "/employees", b"").body, json!([]));

    let r = handle(&store, "POST", "/employees", br#"["Anna", "Schmidt", 38.5]"#);
    assert_eq!(r.status, 200);
    assert!(r.body["message"].is_string());
    handle(&store, "POST", "/employees", br#"["Ben", "Meyer", 20]"#);

    let r = handle(&store, "PUT", "/employees/1", br#"["Ben", "Meyer", 25]"#);
    assert_eq!(r.status, 200);
    assert_eq!(
        handle(&store, "GET", "/employees?cache=0", b"").body,
        json!([["Anna", "Schmidt", 38.5], ["Ben", "Meyer", 25]])
    );

    assert_eq!(handle(&store, "DELETE", "/employees/0", b"").status, 200);
    assert_eq!(
        store.read(Collection::Employees),
        json!([["Ben", "Meyer", 25]])
    );
    Ok(())
}

#[test]
fn bad_indices_and_bodies() -> Result<()> {
    let store = open("bad")?;
    handle(&store, "POST", "/branches", br#"["Nord"]"#);

    // Выход за границы, отрицательный и нечисловой индекс — 404.
    for idx in ["1", "-1", "abc"] {
        let r = handle(&store, "PUT", &format!("/branches/{idx}"), br#"["x"]"#);
        assert_eq!(r.status, 404, "PUT index {idx}");
        assert!(r.body["detail"].is_string());
        assert_eq!(handle(&store, "DELETE", &format!("/branches/{idx}"), b"").status, 404);
    }

    assert_eq!(handle(&store, "POST", "/branches", b"{not json").status, 400);
    assert_eq!(handle(&store, "POST", "/branches", r#"{"name": "Süd"}"#.as_bytes()).status, 400);
    assert_eq!(handle(&store, "POST", "/teams", br#""scalar""#).status, 400);
    assert_eq!(store.read(Collection::Branches), json!([["Nord"]]));
    Ok(())
}

#[test]
fn overview_routes() -> Result<()> {
    let store = open("overview")?;
    let body = br#"{"mode": "week", "data": [{"branch": "Nord"}]}"#;
    assert_eq!(handle(&store, "POST", "/overview", body).status, 200);
    assert_eq!(
        handle(&store, "GET", "/overview", b"").body,
        json!({"mode": "week", "data": [{"branch": "Nord"}]})
    );

    // Позиционные операции над map-документом — 404.
    assert_eq!(handle(&store, "PUT", "/overview/0", b"[]").status, 404);

    assert_eq!(handle(&store, "DELETE", "/overview", b"").status, 200);
    assert_eq!(store.read(Collection::Overview), json!([]));

    handle(&store, "POST", "/overview", r#"[["Nord", {}], ["Süd", {}]]"#.as_bytes());
    assert_eq!(handle(&store, "PUT", "/overview/1", br#"["Ost", {}]"#).status, 200);
    assert_eq!(handle(&store, "DELETE", "/overview/0", b"").status, 200);
    assert_eq!(store.read(Collection::Overview), json!([["Ost", {}]]));
    Ok(())
}

#[test]
fn teams_replace_wholesale() -> Result<()> {
    let store = open("teams")?;
    handle(&store, "POST", "/teams", br#"[["A", ["Anna"]], ["B", []]]"#);
    handle(&store, "POST", "/teams", br#"[["C", []]]"#);
    assert_eq!(handle(&store, "GET", "/teams", b"").body, json!([["C", []]]));
    Ok(())
}

#[test]
fn calendar_week_routes() -> Result<()> {
    let store = open("weeks")?;
    handle(&store, "POST", "/overview", br#"["A"]"#);

    let r = handle(&store, "POST", "/calendar-weeks/1/2025", b"");
    assert_eq!(r.status, 200);
    assert_eq!(r.body["replaced"], json!(false));
    let r = handle(&store, "POST", "/calendar-weeks/1/2025", b"");
    assert_eq!(r.body["replaced"], json!(true));

    let r = handle(&store, "GET", "/calendar-weeks/1/2025", b"");
    assert_eq!(r.status, 200);
    assert_eq!(r.body["week"], json!(1));
    assert_eq!(r.body["overview"], json!(["A"]));
    assert_eq!(r.body["days"]["Montag (30.12.2024)"], json!("30.12.2024"));

    let list = handle(&store, "GET", "/calendar-weeks", b"");
    assert_eq!(list.body.as_array().map(|a| a.len()), Some(1));

    handle(&store, "POST", "/overview", br#"["B"]"#);
    assert_eq!(handle(&store, "POST", "/calendar-weeks/1/2025/restore", b"").status, 200);
    assert_eq!(store.read(Collection::Overview), json!(["A"]));

    assert_eq!(handle(&store, "POST", "/calendar-weeks/53/2023", b"").status, 400);
    assert_eq!(handle(&store, "GET", "/calendar-weeks/x/2025", b"").status, 400);
    assert_eq!(handle(&store, "GET", "/calendar-weeks/2/2025", b"").status, 404);
    assert_eq!(handle(&store, "POST", "/calendar-weeks/2/2025/restore", b"").status, 404);

    assert_eq!(handle(&store, "DELETE", "/calendar-weeks/1/2025", b"").status, 200);
    assert_eq!(handle(&store, "DELETE", "/calendar-weeks/1/2025", b"").status, 404);
    assert_eq!(handle(&store, "GET", "/calendar-weeks", b"").body, json!([]));
    Ok(())
}

#[test]
fn storage_failure_maps_to_500() -> Result<()> {
    let root = unique_root("fail");
    // data_dir — это файл: каталог создать нельзя.
    std::fs::write(&root, b"x")?;
    let store = StoreBuilder::from_default()
        .data_dir(&root)
        .sweep_tmp_on_open(false)
        .open()?;
    let r = handle(&store, "POST", "/shifts", r#"["Früh"]"#.as_bytes());
    assert_eq!(r.status, 500);
    assert_eq!(r.body, json!({"detail": "storage failure"}));
    Ok(())
}

#[test]
fn oversized_body_is_rejected_without_buffering() -> Result<()> {
    let small = br#"["Anna"]"#;
    assert_eq!(read_body(&small[..], 64).map_err(|r| r.status), Ok(small.to_vec()));
    // ровно на границе — ещё можно
    assert_eq!(read_body(&[b' '; 64][..], 64).map(|b| b.len()).ok(), Some(64));

    // Бесконечный поток: читается не больше limit + 1 байт.
    let endless = std::io::repeat(b'[');
    let err = read_body(endless, 1024).err().map(|r| (r.status, r.body["detail"].is_string()));
    assert_eq!(err, Some((413, true)));
    Ok(())
}

#[test]
fn calendar_week_get_returns_stored_record_as_is() -> Result<()> {
    let store = open("raw-week")?;
    store.replace(
        Collection::CalendarWeeks,
        &json!([{
            "week": 12,
            "year": 2024,
            "days": {"Montag (18.03.2024)": "18.03.2024"},
            "overview": ["x"],
            "note": "Osterwoche",
        }]),
    )?;
    let r = handle(&store, "GET", "/calendar-weeks/12/2024", b"");
    assert_eq!(r.status, 200);
    assert_eq!(r.body["note"], json!("Osterwoche"));
    assert_eq!(r.body["overview"], json!(["x"]));
    // типизированный вид по-прежнему доступен
    assert_eq!(store.snapshots().get(12, 2024)?.overview, json!(["x"]));
    Ok(())
}
