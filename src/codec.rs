//! codec — сериализация документов (JSON value tree), без бизнес-логики.
//!
//! Документ — это `serde_json::Value` (list | map | scalar). Порядок ключей
//! сохраняется (feature `preserve_order`).
//!
//! Формат на диске: JSON с отступом 4 пробела, не-ASCII пишется как есть,
//! завершающий перевод строки. Побайтовый формат не является контрактом —
//! контракт только логическое дерево значений.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

use crate::consts::JSON_INDENT;

pub type Document = Value;

/// Результат разбора содержимого файла.
#[derive(Debug)]
pub enum Decoded {
    /// Пустой файл или только пробельные символы.
    Empty,
    Value(Document),
    /// Содержимое не является валидным JSON (или не UTF-8).
    Malformed(String),
}

/// Serialize a document into its on-disk form.
pub fn encode(doc: &Document) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(128);
    {
        let fmt = PrettyFormatter::with_indent(JSON_INDENT);
        let mut ser = serde_json::Serializer::with_formatter(&mut out, fmt);
        doc.serialize(&mut ser)?;
    }
    out.push(b'\n');
    Ok(out)
}

/// Parse on-disk bytes. Never fails: malformed input is reported as a value.
pub fn decode(bytes: &[u8]) -> Decoded {
    let text = match std::str::from_utf8(bytes) {
        Ok(s) => s,
        Err(e) => return Decoded::Malformed(format!("invalid utf-8: {e}")),
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Decoded::Empty;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(v) => Decoded::Value(v),
        Err(e) => Decoded::Malformed(e.to_string()),
    }
}

/// Shape of a document, as reported by status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    List,
    Map,
    Scalar,
}

pub fn shape_of(doc: &Document) -> Shape {
    match doc {
        Value::Array(_) => Shape::List,
        Value::Object(_) => Shape::Map,
        _ => Shape::Scalar,
    }
}

pub fn empty_list() -> Document {
    Value::Array(Vec::new())
}

pub fn empty_map() -> Document {
    Value::Object(Map::new())
}
