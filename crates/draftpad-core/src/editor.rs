//! The editor component.
//!
//! [`Editor`] owns the live [`EditorState`] and the snapshot store. Hosts feed
//! it before-input text and key events and call [`Editor::save`] from their
//! save action; it loads the saved snapshot once, in [`Editor::mount`].

use crate::autoformat;
use crate::config::{EditorConfig, LoadFailurePolicy};
use crate::error::PersistError;
use crate::execute;
use crate::keys::{KeyCombo, KeyCommand, default_key_binding};
use crate::persist::{SaveReceipt, SnapshotStore};
use crate::rich_utils;
use crate::selection::SelectionState;
use crate::state::EditorState;
use crate::storage::KeyValueStorage;

/// Whether a handler claimed an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleResult {
    /// The handler applied its own change. The host must not insert anything.
    Handled,
    /// The handler did not claim the input.
    NotHandled,
}

impl HandleResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Handled => "handled",
            Self::NotHandled => "not-handled",
        }
    }

    pub fn is_handled(&self) -> bool {
        matches!(self, Self::Handled)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created, saved snapshot not read yet.
    Uninitialized,
    /// Mounted. The document is live and accepts input.
    Ready,
}

/// A single editor instance bound to one snapshot slot.
pub struct Editor<S> {
    state: EditorState,
    store: SnapshotStore<S>,
    config: EditorConfig,
    lifecycle: Lifecycle,
}

impl<S: KeyValueStorage> Editor<S> {
    pub fn new(storage: S, config: EditorConfig) -> Self {
        let store = SnapshotStore::new(storage, config.storage_key.clone());
        Self {
            state: EditorState::create_empty().with_history_limit(config.history_limit),
            store,
            config,
            lifecycle: Lifecycle::Uninitialized,
        }
    }

    /// Load the saved snapshot and become ready.
    ///
    /// With no snapshot the editor starts empty. An unreadable snapshot also
    /// leaves it empty; whether the error is returned depends on
    /// [`EditorConfig::on_load_error`]. The editor is ready either way.
    pub fn mount(&mut self) -> Result<(), PersistError> {
        if self.lifecycle == Lifecycle::Ready {
            tracing::debug!("editor already mounted");
            return Ok(());
        }

        let loaded = self.store.load();
        self.lifecycle = Lifecycle::Ready;
        match loaded {
            Ok(Some(content)) => {
                tracing::info!(
                    key = %self.store.key(),
                    blocks = content.blocks().len(),
                    "restored saved document"
                );
                self.state = EditorState::create_with_content(content)
                    .with_history_limit(self.config.history_limit);
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(e) => match self.config.on_load_error {
                LoadFailurePolicy::FallbackToEmpty => {
                    tracing::warn!(
                        key = %self.store.key(),
                        error = %e,
                        "discarding unreadable snapshot, starting empty"
                    );
                    Ok(())
                }
                LoadFailurePolicy::Surface => Err(e),
            },
        }
    }

    /// Route text that is about to be inserted.
    ///
    /// Autoformat shortcuts get first refusal. If none fires the text is
    /// inserted with the current inline style and the result is
    /// [`HandleResult::NotHandled`].
    pub fn handle_before_input(&mut self, chars: &str) -> HandleResult {
        if !self.is_ready() {
            tracing::warn!("input before mount ignored");
            return HandleResult::NotHandled;
        }
        if let Some(next) = autoformat::handle_before_input(chars, &self.state) {
            self.state = next;
            return HandleResult::Handled;
        }
        self.state = execute::insert_characters(&self.state, chars);
        HandleResult::NotHandled
    }

    /// Run a key command: rich-text handling first, then plain editing.
    pub fn handle_key_command(&mut self, command: &KeyCommand) -> HandleResult {
        if !self.is_ready() {
            tracing::warn!(%command, "key command before mount ignored");
            return HandleResult::NotHandled;
        }
        let next = rich_utils::handle_key_command(&self.state, command)
            .or_else(|| execute::execute_command(&self.state, command));
        match next {
            Some(next) => {
                self.state = next;
                HandleResult::Handled
            }
            None => {
                tracing::trace!(%command, "key command not handled");
                HandleResult::NotHandled
            }
        }
    }

    /// Map a key combination through the default bindings and run it.
    pub fn handle_key(&mut self, combo: &KeyCombo, is_mac: bool) -> HandleResult {
        match default_key_binding(combo, is_mac) {
            Some(command) => self.handle_key_command(&command),
            None => HandleResult::NotHandled,
        }
    }

    /// Save the current document.
    ///
    /// Returns `None` if the save failed. The failure has been logged and
    /// the editor keeps working.
    pub fn save(&mut self) -> Option<SaveReceipt> {
        self.store.save(self.state.current_content()).ok()
    }

    pub fn editor_state(&self) -> &EditorState {
        &self.state
    }

    pub fn set_editor_state(&mut self, state: EditorState) {
        self.state = state;
    }

    /// Move the selection without touching content or history.
    pub fn select(&mut self, selection: SelectionState) {
        self.state = self.state.force_selection(selection);
    }

    /// Place the selection at anchor and focus points reported by the host.
    ///
    /// Offsets count chars and clamp to the block length. Direction comes
    /// from document order. Returns false, leaving the selection as it was,
    /// if either key names no block.
    pub fn set_selection(
        &mut self,
        anchor_key: &str,
        anchor_offset: usize,
        focus_key: &str,
        focus_offset: usize,
    ) -> bool {
        let content = self.state.current_content();
        let point = |key: &str, offset: usize| {
            let index = content.block_index(key)?;
            let block = &content.blocks()[index];
            Some((index, block.key().clone(), offset.min(block.len())))
        };
        let anchor = point(anchor_key, anchor_offset);
        let focus = point(focus_key, focus_offset);
        let (Some(anchor), Some(focus)) = (anchor, focus) else {
            tracing::debug!(anchor_key, focus_key, "selection names an unknown block");
            return false;
        };

        let is_backward = (focus.0, focus.2) < (anchor.0, anchor.2);
        self.select(SelectionState {
            anchor_key: anchor.1,
            anchor_offset: anchor.2,
            focus_key: focus.1,
            focus_offset: focus.2,
            is_backward,
            has_focus: true,
        });
        true
    }

    /// Plain text of the document, blocks joined by newlines.
    pub fn text(&self) -> String {
        self.state.current_content().plain_text("\n")
    }

    pub fn store(&self) -> &SnapshotStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SnapshotStore<S> {
        &mut self.store
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_ready(&self) -> bool {
        self.lifecycle == Lifecycle::Ready
    }
}
