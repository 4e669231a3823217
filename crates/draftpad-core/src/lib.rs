//! draftpad-core: block-structured rich text editing without a UI framework.
//!
//! This crate provides:
//! - `ContentState` / `EditorState` - immutable document snapshots with undo
//! - `autoformat` - markdown-like shortcuts (`#`, `*`, `**`, `***`, `` ``` `` + space)
//! - `raw` - the JSON snapshot form of a document
//! - `SnapshotStore` over any `KeyValueStorage` for save/load
//! - `Editor` - the component tying input handling and persistence together

pub mod autoformat;
pub mod config;
pub mod editor;
pub mod error;
pub mod execute;
pub mod keys;
pub mod model;
pub mod modifier;
pub mod persist;
pub mod raw;
pub mod rich_utils;
pub mod selection;
pub mod state;
pub mod storage;

pub use autoformat::{TRIGGER_RULES, TriggerAction, TriggerRule, match_trigger};
pub use config::{EditorConfig, LoadFailurePolicy};
pub use editor::{Editor, HandleResult, Lifecycle};
pub use error::{PersistError, SnapshotError, StorageError};
pub use keys::{Key, KeyCombo, KeyCommand, Modifiers, default_key_binding};
pub use model::{
    BlockKey, BlockType, CharacterMetadata, ContentBlock, ContentState, Entity, EntityKey,
    InlineStyle, Mutability, StyleSet, style_map,
};
pub use persist::{
    DEFAULT_STORAGE_KEY, SaveReceipt, SnapshotStore, decode_snapshot, encode_snapshot,
};
pub use raw::{RawDraftContentState, convert_from_raw, convert_to_raw};
pub use selection::SelectionState;
pub use smol_str::SmolStr;
pub use state::{ChangeType, DEFAULT_HISTORY_LIMIT, EditorState};
pub use storage::{KeyValueStorage, MemoryStorage};
