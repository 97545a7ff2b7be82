//! Typed store errors.
//!
//! Corruption and shape mismatches never reach this type: they are absorbed
//! inside the store (quarantine + default). What remains is what a caller
//! can act on: a bad index/key, a bad week, or a failed write.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Coarse classification used by the route layer for status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidInput,
    Storage,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("index {index} out of range for '{collection}' (len {len})")]
    IndexOutOfRange {
        collection: String,
        index: usize,
        len: usize,
    },
    #[error("calendar week {week}/{year} not found")]
    WeekNotFound { week: u32, year: i32 },
    #[error("invalid calendar week {week}/{year}")]
    InvalidWeek { week: u32, year: i32 },
    #[error("{op} {}: {source}", path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("lock {}: {source}", path.display())]
    Lock {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("serialize document: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::IndexOutOfRange { .. } | StoreError::WeekNotFound { .. } => {
                ErrorKind::NotFound
            }
            StoreError::InvalidWeek { .. } => ErrorKind::InvalidInput,
            StoreError::Io { .. } | StoreError::Lock { .. } | StoreError::Encode(_) => {
                ErrorKind::Storage
            }
        }
    }

    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        StoreError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}
