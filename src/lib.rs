// Базовые модули
pub mod consts;
pub mod config;
pub mod error;
pub mod metrics;

// Документы и коллекции
pub mod codec;      // src/codec.rs — JSON value tree <-> bytes
pub mod collection; // src/collection.rs — логические коллекции -> файлы
pub mod lock;       // src/lock.rs — per-path mutex + fs2 lock-файлы

// Хранилище и снапшоты (папки с mod.rs)
pub mod store;      // src/store/{mod,core,io,ops,status}.rs
pub mod snapshots;  // src/snapshots/{mod,week,manager}.rs

// Route layer (используется rosterdb_server)
pub mod api;

// Удобные реэкспорты
pub use codec::Document;
pub use collection::Collection;
pub use config::{RosterConfig, StoreBuilder};
pub use error::{ErrorKind, Result, StoreError};
pub use snapshots::{CalendarWeek, SnapshotManager};
pub use store::{DocState, DocumentStatus, Store};
