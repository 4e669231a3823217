//! Editor state: the live document snapshot, selection, and undo history.
//!
//! `EditorState` is replaced, never mutated. Every operation returns a new
//! value and the previous one stays valid.

use std::sync::Arc;

use web_time::Instant;

use crate::model::{ContentState, StyleSet};
use crate::selection::SelectionState;

/// Default number of undo steps kept.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Kind of change recorded by [`EditorState::push`].
///
/// Controls whether consecutive edits coalesce into one undo step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    InsertCharacters,
    BackspaceCharacter,
    DeleteCharacter,
    RemoveRange,
    SplitBlock,
    InsertFragment,
    ChangeBlockType,
    ChangeInlineStyle,
    Undo,
    Redo,
}

impl ChangeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsertCharacters => "insert-characters",
            Self::BackspaceCharacter => "backspace-character",
            Self::DeleteCharacter => "delete-character",
            Self::RemoveRange => "remove-range",
            Self::SplitBlock => "split-block",
            Self::InsertFragment => "insert-fragment",
            Self::ChangeBlockType => "change-block-type",
            Self::ChangeInlineStyle => "change-inline-style",
            Self::Undo => "undo",
            Self::Redo => "redo",
        }
    }

    /// Typing and single-character deletes coalesce with a preceding edit of the same kind.
    fn coalesces(&self) -> bool {
        matches!(
            self,
            Self::InsertCharacters | Self::BackspaceCharacter | Self::DeleteCharacter
        )
    }
}

/// A document snapshot kept on the undo or redo stack.
#[derive(Debug, Clone)]
struct HistoryEntry {
    content: Arc<ContentState>,
    /// When the snapshot was superseded.
    recorded_at: Instant,
}

impl HistoryEntry {
    fn new(content: Arc<ContentState>) -> Self {
        Self {
            content,
            recorded_at: Instant::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditorState {
    current: Arc<ContentState>,
    selection: SelectionState,
    inline_style_override: Option<StyleSet>,
    undo_stack: Vec<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    last_change_type: Option<ChangeType>,
    history_limit: usize,
}

impl EditorState {
    /// State holding an empty document.
    pub fn create_empty() -> Self {
        Self::create_with_content(ContentState::create_empty())
    }

    /// State holding `content`, with the caret at the start and no history.
    pub fn create_with_content(content: ContentState) -> Self {
        let selection = SelectionState::collapsed(content.first_block().key().clone(), 0);
        Self {
            current: Arc::new(content),
            selection,
            inline_style_override: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            last_change_type: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }

    /// Cap the undo stack at `limit` steps.
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self.trim_history();
        self
    }

    pub fn current_content(&self) -> &ContentState {
        &self.current
    }

    /// Shared handle to the current snapshot.
    pub fn content_arc(&self) -> Arc<ContentState> {
        Arc::clone(&self.current)
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn last_change_type(&self) -> Option<ChangeType> {
        self.last_change_type
    }

    pub fn inline_style_override(&self) -> Option<&StyleSet> {
        self.inline_style_override.as_ref()
    }

    pub fn history_limit(&self) -> usize {
        self.history_limit
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// When the most recent undo step was recorded.
    pub fn last_step_at(&self) -> Option<Instant> {
        self.undo_stack.last().map(|entry| entry.recorded_at)
    }

    /// Commit `content` as the new current document.
    ///
    /// Opens a new undo step unless this change continues a run of the same
    /// coalescing change type from an unmoved caret. Clears redo and the
    /// inline-style override; the selection moves to `content.selection_after`.
    pub fn push(&self, mut content: ContentState, change_type: ChangeType) -> EditorState {
        let boundary = self.selection != *self.current.selection_after()
            || self.last_change_type != Some(change_type)
            || !change_type.coalesces();

        let mut undo_stack = self.undo_stack.clone();
        if boundary {
            content.set_selection_before(self.selection.clone());
            undo_stack.push(HistoryEntry::new(Arc::clone(&self.current)));
        } else {
            content.set_selection_before(self.current.selection_before().clone());
        }

        let selection = content.selection_after().clone();
        let mut next = EditorState {
            current: Arc::new(content),
            selection,
            inline_style_override: None,
            undo_stack,
            redo_stack: Vec::new(),
            last_change_type: Some(change_type),
            history_limit: self.history_limit,
        };
        next.trim_history();
        next
    }

    /// Step back one undo entry. Returns `None` when there is nothing to undo.
    pub fn undo(&self) -> Option<EditorState> {
        let mut undo_stack = self.undo_stack.clone();
        let previous = undo_stack.pop()?;
        let mut redo_stack = self.redo_stack.clone();
        redo_stack.push(HistoryEntry::new(Arc::clone(&self.current)));

        Some(EditorState {
            selection: self.current.selection_before().clone(),
            current: previous.content,
            inline_style_override: None,
            undo_stack,
            redo_stack,
            last_change_type: Some(ChangeType::Undo),
            history_limit: self.history_limit,
        })
    }

    /// Re-apply the last undone entry. Returns `None` when there is nothing to redo.
    pub fn redo(&self) -> Option<EditorState> {
        let mut redo_stack = self.redo_stack.clone();
        let next = redo_stack.pop()?;
        let mut undo_stack = self.undo_stack.clone();
        undo_stack.push(HistoryEntry::new(Arc::clone(&self.current)));

        let mut state = EditorState {
            selection: next.content.selection_after().clone(),
            current: next.content,
            inline_style_override: None,
            undo_stack,
            redo_stack,
            last_change_type: Some(ChangeType::Redo),
            history_limit: self.history_limit,
        };
        state.trim_history();
        Some(state)
    }

    /// Move the selection without touching content or history.
    pub fn force_selection(&self, selection: SelectionState) -> EditorState {
        let mut next = self.clone();
        next.selection = selection;
        next.inline_style_override = None;
        next
    }

    /// Styles the next typed character would get.
    pub fn set_inline_style_override(&self, style: StyleSet) -> EditorState {
        let mut next = self.clone();
        next.inline_style_override = Some(style);
        next
    }

    /// The inline style at the selection.
    ///
    /// The override wins if set. For a caret: the char before it; at offset 0
    /// the first char of the block; in an empty block the last char of the
    /// nearest non-empty block above. For a range: the first selected char.
    pub fn current_inline_style(&self) -> StyleSet {
        if let Some(style) = &self.inline_style_override {
            return style.clone();
        }

        let content = self.current_content();
        let selection = &self.selection;
        let Some(block) = content.block_for_key(selection.start_key()) else {
            return StyleSet::new();
        };
        let offset = selection.start_offset();

        if !selection.is_collapsed() {
            return block.style_at(offset);
        }
        if offset > 0 {
            return block.style_at(offset - 1);
        }
        if !block.is_empty() {
            return block.style_at(0);
        }
        look_upward_for_style(content, block.key())
    }

    fn trim_history(&mut self) {
        if self.undo_stack.len() > self.history_limit {
            let excess = self.undo_stack.len() - self.history_limit;
            self.undo_stack.drain(..excess);
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::create_empty()
    }
}

fn look_upward_for_style(content: &ContentState, key: &str) -> StyleSet {
    let Some(index) = content.block_index(key) else {
        return StyleSet::new();
    };
    content.blocks()[..index]
        .iter()
        .rev()
        .find(|b| !b.is_empty())
        .map(|b| b.style_at(b.len() - 1))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InlineStyle;
    use crate::modifier;

    fn type_text(state: &EditorState, text: &str) -> EditorState {
        let content = modifier::insert_text(
            state.current_content(),
            state.selection(),
            text,
            &state.current_inline_style(),
            None,
        );
        state.push(content, ChangeType::InsertCharacters)
    }

    #[test]
    fn test_push_moves_selection() {
        let state = EditorState::create_empty();
        let state = type_text(&state, "abc");
        assert_eq!(state.current_content().plain_text("\n"), "abc");
        assert_eq!(state.selection().anchor_offset, 3);
        assert!(state.can_undo());
        assert!(!state.can_redo());
    }

    #[test]
    fn test_typing_coalesces() {
        let mut state = EditorState::create_empty();
        for ch in ["a", "b", "c"] {
            state = type_text(&state, ch);
        }
        assert_eq!(state.undo_depth(), 1);

        let undone = state.undo().expect("one step");
        assert_eq!(undone.current_content().plain_text("\n"), "");
        assert!(undone.undo().is_none());
        assert_eq!(undone.last_change_type(), Some(ChangeType::Undo));
    }

    #[test]
    fn test_distinct_changes_are_separate_steps() {
        let state = type_text(&EditorState::create_empty(), "ab");
        let key = state.selection().anchor_key.clone();
        let removed = modifier::remove_range(
            state.current_content(),
            &SelectionState::range(key.clone(), 0, key, 1),
        );
        let state = state.push(removed, ChangeType::RemoveRange);
        assert_eq!(state.undo_depth(), 2);

        let once = state.undo().expect("undo remove");
        assert_eq!(once.current_content().plain_text("\n"), "ab");
        let redone = once.redo().expect("redo remove");
        assert_eq!(redone.current_content().plain_text("\n"), "b");
        assert_eq!(redone.last_change_type(), Some(ChangeType::Redo));
    }

    #[test]
    fn test_history_limit() {
        let mut state = EditorState::create_empty().with_history_limit(2);
        for _ in 0..5 {
            let content = modifier::split_block(state.current_content(), state.selection());
            state = state.push(content, ChangeType::SplitBlock);
        }
        assert_eq!(state.undo_depth(), 2);
        assert!(state.last_step_at().is_some());
    }

    #[test]
    fn test_override_wins_and_push_clears_it() {
        let state = EditorState::create_empty();
        let state = state.set_inline_style_override(StyleSet::from([InlineStyle::Bold]));
        assert!(state.current_inline_style().contains(&InlineStyle::Bold));

        let state = type_text(&state, "x");
        assert!(state.inline_style_override().is_none());
        // The typed char carries the style, so the lookup still finds it.
        assert!(state.current_inline_style().contains(&InlineStyle::Bold));
    }

    #[test]
    fn test_empty_block_looks_upward() {
        let state = EditorState::create_empty()
            .set_inline_style_override(StyleSet::from([InlineStyle::Italic]));
        let state = type_text(&state, "hi");
        let split = modifier::split_block(state.current_content(), state.selection());
        let state = state.push(split, ChangeType::SplitBlock);
        assert!(state.current_inline_style().contains(&InlineStyle::Italic));
    }

    #[test]
    fn test_force_selection_keeps_history() {
        let state = type_text(&EditorState::create_empty(), "hello");
        let key = state.selection().anchor_key.clone();
        let moved = state.force_selection(SelectionState::collapsed(key, 1));
        assert_eq!(moved.selection().anchor_offset, 1);
        assert_eq!(moved.undo_depth(), state.undo_depth());
    }
}
