//! store/ops — list/map operations layered on atomic load/save.
//!
//! Every mutating call is a full load-modify-save under the document's path
//! lock. Position in a list is the only identity: indices shift after delete.

use log::warn;
use serde_json::{Map, Value};

use crate::codec::{self, Document};
use crate::collection::Collection;
use crate::error::{Result, StoreError};

use super::core::Store;
use super::io;

fn out_of_range(c: Collection, index: usize, len: usize) -> StoreError {
    StoreError::IndexOutOfRange {
        collection: c.name().to_string(),
        index,
        len,
    }
}

impl Store {
    /// Full current document (empty list if none saved yet).
    pub fn read(&self, c: Collection) -> Document {
        self.load(c)
    }

    /// Replace the document wholesale (overview/teams save semantics).
    pub fn replace(&self, c: Collection, doc: &Document) -> Result<()> {
        self.mutate(c, |path| self.save_unlocked(path, doc))
    }

    /// Append `item`; returns its index.
    ///
    /// A document that is not a list is reset to an empty list first.
    pub fn append(&self, c: Collection, item: Document) -> Result<usize> {
        self.mutate(c, |path| {
            let mut items = match io::load(path, codec::empty_list()) {
                Value::Array(v) => v,
                other => {
                    warn!(
                        "append {}: document is {:?}, not a list; starting a new list",
                        c,
                        codec::shape_of(&other)
                    );
                    Vec::new()
                }
            };
            items.push(item);
            let idx = items.len() - 1;
            self.save_unlocked(path, &Value::Array(items))?;
            Ok(idx)
        })
    }

    /// Replace the element at `index`. Out of range → IndexOutOfRange, nothing written.
    pub fn update_at(&self, c: Collection, index: usize, item: Document) -> Result<()> {
        self.mutate(c, |path| {
            let mut doc = io::load(path, codec::empty_list());
            let items = match doc.as_array_mut() {
                Some(v) => v,
                // не список — валидных индексов нет
                None => return Err(out_of_range(c, index, 0)),
            };
            if index >= items.len() {
                return Err(out_of_range(c, index, items.len()));
            }
            items[index] = item;
            self.save_unlocked(path, &doc)
        })
    }

    /// Remove and return the element at `index`; later elements shift down.
    pub fn delete_at(&self, c: Collection, index: usize) -> Result<Document> {
        self.mutate(c, |path| {
            let mut doc = io::load(path, codec::empty_list());
            let items = match doc.as_array_mut() {
                Some(v) => v,
                None => return Err(out_of_range(c, index, 0)),
            };
            if index >= items.len() {
                return Err(out_of_range(c, index, items.len()));
            }
            let removed = items.remove(index);
            self.save_unlocked(path, &doc)?;
            Ok(removed)
        })
    }

    /// Save an empty list unconditionally.
    pub fn clear(&self, c: Collection) -> Result<()> {
        self.replace(c, &codec::empty_list())
    }

    /// Shallow merge of `partial` over a map-shaped document.
    ///
    /// Existing keys are overwritten, new keys appended, nested values replaced
    /// as a whole. A document that is not a map is treated as an empty map.
    pub fn merge_object(&self, c: Collection, partial: Map<String, Value>) -> Result<()> {
        self.mutate(c, |path| {
            let mut map = match io::load(path, codec::empty_map()) {
                Value::Object(m) => m,
                other => {
                    warn!(
                        "merge {}: document is {:?}, not a map; merging into an empty map",
                        c,
                        codec::shape_of(&other)
                    );
                    Map::new()
                }
            };
            for (k, v) in partial {
                map.insert(k, v);
            }
            self.save_unlocked(path, &Value::Object(map))
        })
    }
}
