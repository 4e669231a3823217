//! Error types for storage and snapshot persistence.

use smol_str::SmolStr;
use thiserror::Error;

/// Errors reported by a [`crate::KeyValueStorage`] backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageError {
    /// No storage is available (private browsing, sandboxed iframe, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The write would exceed the storage quota.
    #[error("storage quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Any other backend failure.
    #[error("storage error: {0}")]
    Backend(String),
}

/// Raw content that cannot be turned into a document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SnapshotError {
    #[error("duplicate block key {0:?}")]
    DuplicateKey(SmolStr),

    #[error("block {block:?} references unknown entity {entity}")]
    UnknownEntity { block: SmolStr, entity: u32 },

    #[error("entity map key {0:?} is not a number")]
    InvalidEntityKey(String),

    #[error("range {offset}+{length} does not fit block {block:?}")]
    RangeOutOfBounds {
        block: SmolStr,
        offset: usize,
        length: usize,
    },
}

/// Errors from saving or loading a snapshot.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PersistError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to parse snapshot: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("invalid snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
}
