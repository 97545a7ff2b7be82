// tests/metamorphic_ops.rs
//
// Случайная последовательность append/update/delete/clear сверяется с моделью
// Vec<Value> в памяти. После каждого шага документ на диске обязан совпадать
// с моделью; ошибки out-of-range обязаны возникать ровно тогда, когда модель
// их предсказывает. Раз в несколько шагов store переоткрывается, чтобы читать
// только то, что реально лежит на диске.

use anyhow::Result;
use oorandom::Rand64;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rosterdb::{Collection, ErrorKind, Store, StoreBuilder};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn unique_root(prefix: &str) -> PathBuf {
    let pid = std::process::id();
    let t = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("rosterdb-meta-{prefix}-{pid}-{t}-{id}"))
}

fn open(root: &PathBuf) -> Result<Store> {
    Ok(StoreBuilder::from_default()
        .data_dir(root)
        .fsync(false)
        .open()?)
}

fn random_item(rng: &mut Rand64, step: usize) -> Value {
    match rng.rand_range(0..3) {
        0 => json!([format!("Mitarbeiter {step}"), rng.rand_range(0..60)]),
        1 => json!([format!("Schicht {step}"), "06:00", "14:00"]),
        _ => json!({"step": step, "note": "ä ö ü ß"}),
    }
}

fn run_model(seed: u128, steps: usize) -> Result<()> {
    let root = unique_root(&format!("seed{seed}"));
    let c = Collection::WorkActivities;
    let mut rng = Rand64::new(seed);
    let mut store = open(&root)?;
    let mut model: Vec<Value> = Vec::new();

    for step in 0..steps {
        // Индекс иногда намеренно выходит за границы.
        let idx = rng.rand_range(0..(model.len() as u64 + 2)) as usize;
        match rng.rand_range(0..10) {
            0..=3 => {
                let item = random_item(&mut rng, step);
                let got = store.append(c, item.clone())?;
                model.push(item);
                assert_eq!(got, model.len() - 1, "seed={seed} step={step}");
            }
            4..=5 => {
                let item = random_item(&mut rng, step);
                let res = store.update_at(c, idx, item.clone());
                if idx < model.len() {
                    res?;
                    model[idx] = item;
                } else {
                    let err = res.err().map(|e| e.kind());
                    assert_eq!(err, Some(ErrorKind::NotFound), "seed={seed} step={step}");
                }
            }
            6..=8 => {
                let res = store.delete_at(c, idx);
                if idx < model.len() {
                    assert_eq!(res?, model.remove(idx), "seed={seed} step={step}");
                } else {
                    let err = res.err().map(|e| e.kind());
                    assert_eq!(err, Some(ErrorKind::NotFound), "seed={seed} step={step}");
                }
            }
            _ => {
                store.clear(c)?;
                model.clear();
            }
        }

        if step % 16 == 15 {
            drop(store);
            store = open(&root)?;
        }
        assert_eq!(
            store.read(c),
            Value::Array(model.clone()),
            "seed={seed} step={step}"
        );
    }
    Ok(())
}

#[test]
fn random_ops_match_vec_model() -> Result<()> {
    for seed in [1u128, 7, 42, 2024] {
        run_model(seed, 120)?;
    }
    Ok(())
}
