use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::persist::DEFAULT_STORAGE_KEY;
use crate::state::DEFAULT_HISTORY_LIMIT;

/// What `mount` does when a saved snapshot cannot be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadFailurePolicy {
    /// Log a warning and start with an empty document.
    #[default]
    FallbackToEmpty,
    /// Start with an empty document and return the error to the caller.
    Surface,
}

/// Editor configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Key the snapshot is saved under.
    pub storage_key: SmolStr,
    /// Maximum number of undo steps kept.
    pub history_limit: usize,
    pub on_load_error: LoadFailurePolicy,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            storage_key: SmolStr::new_static(DEFAULT_STORAGE_KEY),
            history_limit: DEFAULT_HISTORY_LIMIT,
            on_load_error: LoadFailurePolicy::default(),
        }
    }
}
