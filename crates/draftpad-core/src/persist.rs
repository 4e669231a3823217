//! Saving and loading document snapshots.

use smol_str::SmolStr;

use crate::error::PersistError;
use crate::model::ContentState;
use crate::raw::{RawDraftContentState, convert_from_raw, convert_to_raw};
use crate::storage::KeyValueStorage;

/// Storage key used when the config does not name one.
pub const DEFAULT_STORAGE_KEY: &str = "draft-editor-content";

/// What a successful save wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReceipt {
    pub key: SmolStr,
    pub bytes: usize,
    pub blocks: usize,
}

/// Serialize a document to snapshot JSON.
pub fn encode_snapshot(content: &ContentState) -> Result<String, PersistError> {
    serde_json::to_string(&convert_to_raw(content)).map_err(PersistError::Encode)
}

/// Parse snapshot JSON back into a document.
pub fn decode_snapshot(json: &str) -> Result<ContentState, PersistError> {
    let raw: RawDraftContentState = serde_json::from_str(json).map_err(PersistError::Decode)?;
    Ok(convert_from_raw(&raw)?)
}

/// A document snapshot slot in some key-value storage.
#[derive(Debug)]
pub struct SnapshotStore<S> {
    storage: S,
    key: SmolStr,
}

impl<S: KeyValueStorage> SnapshotStore<S> {
    pub fn new(storage: S, key: impl Into<SmolStr>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Write `content` under this store's key, replacing any earlier snapshot.
    ///
    /// Failures are logged here as well as returned.
    pub fn save(&mut self, content: &ContentState) -> Result<SaveReceipt, PersistError> {
        let receipt = self.write(content).inspect_err(|e| {
            tracing::error!(key = %self.key, error = %e, "failed to save snapshot");
        })?;
        tracing::debug!(
            key = %receipt.key,
            bytes = receipt.bytes,
            blocks = receipt.blocks,
            "snapshot saved"
        );
        Ok(receipt)
    }

    fn write(&mut self, content: &ContentState) -> Result<SaveReceipt, PersistError> {
        let json = encode_snapshot(content)?;
        self.storage.set(&self.key, &json)?;
        Ok(SaveReceipt {
            key: self.key.clone(),
            bytes: json.len(),
            blocks: content.blocks().len(),
        })
    }

    /// Read the snapshot, `Ok(None)` if nothing has been saved yet.
    pub fn load(&self) -> Result<Option<ContentState>, PersistError> {
        let Some(json) = self.storage.get(&self.key)? else {
            tracing::debug!(key = %self.key, "no saved snapshot");
            return Ok(None);
        };
        let content = decode_snapshot(&json)?;
        tracing::debug!(key = %self.key, blocks = content.blocks().len(), "snapshot loaded");
        Ok(Some(content))
    }

    /// Remove the saved snapshot.
    pub fn clear(&mut self) -> Result<(), PersistError> {
        self.storage.remove(&self.key)?;
        Ok(())
    }
}
