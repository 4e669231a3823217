//! Plain-editing defaults.
//!
//! These run when neither the autoformat shortcuts nor the rich-text key
//! commands claim an input: typed characters, backspace/delete, enter, and
//! history. All functions return the next [`EditorState`], or `None` when the
//! input has no effect (backspace at the very start of the document, undo
//! with an empty stack).

use crate::keys::KeyCommand;
use crate::model::ContentState;
use crate::modifier;
use crate::selection::SelectionState;
use crate::state::{ChangeType, EditorState};

/// Execute a key command with plain-editing semantics.
pub fn execute_command(state: &EditorState, command: &KeyCommand) -> Option<EditorState> {
    match command {
        KeyCommand::Backspace => delete_backward(state),
        KeyCommand::BackspaceWord => delete_word_backward(state),
        KeyCommand::BackspaceToStartOfLine => delete_to_block_start(state),
        KeyCommand::Delete => delete_forward(state),
        KeyCommand::DeleteWord => delete_word_forward(state),
        KeyCommand::SplitBlock => Some(split_block(state)),
        KeyCommand::Undo => state.undo(),
        KeyCommand::Redo => state.redo(),
        KeyCommand::Bold
        | KeyCommand::Italic
        | KeyCommand::Underline
        | KeyCommand::Code
        | KeyCommand::Strikethrough
        | KeyCommand::Other(_) => None,
    }
}

/// Replace the selection with `chars` in the current inline style.
pub fn insert_characters(state: &EditorState, chars: &str) -> EditorState {
    let style = state.current_inline_style();
    let content =
        modifier::replace_text(state.current_content(), state.selection(), chars, &style, None);
    let change = if chars.contains('\n') {
        ChangeType::InsertFragment
    } else {
        ChangeType::InsertCharacters
    };
    state.push(content, change)
}

fn split_block(state: &EditorState) -> EditorState {
    let content = modifier::split_block(state.current_content(), state.selection());
    state.push(content, ChangeType::SplitBlock)
}

fn remove_selection(state: &EditorState) -> Option<EditorState> {
    let selection = state.selection();
    if selection.is_collapsed() {
        return None;
    }
    let content = modifier::remove_range(state.current_content(), selection);
    Some(state.push(content, ChangeType::RemoveRange))
}

fn delete_backward(state: &EditorState) -> Option<EditorState> {
    if let Some(next) = remove_selection(state) {
        return Some(next);
    }
    let content = state.current_content();
    let caret = state.selection();
    let key = caret.anchor_key.clone();
    let offset = caret.anchor_offset;

    let range = if offset > 0 {
        SelectionState::range(key.clone(), offset - 1, key, offset)
    } else {
        // Join with the block above.
        let above = content.block_before(&key)?;
        SelectionState::range(above.key().clone(), above.len(), key, 0)
    };
    let next = modifier::remove_range(content, &range.with_focus(caret.has_focus));
    Some(state.push(next, ChangeType::BackspaceCharacter))
}

fn delete_forward(state: &EditorState) -> Option<EditorState> {
    if let Some(next) = remove_selection(state) {
        return Some(next);
    }
    let content = state.current_content();
    let caret = state.selection();
    let key = caret.anchor_key.clone();
    let offset = caret.anchor_offset;
    let block = content.block_for_key(&key)?;

    let range = if offset < block.len() {
        SelectionState::range(key.clone(), offset, key, offset + 1)
    } else {
        let below = content.block_after(&key)?;
        SelectionState::range(key, offset, below.key().clone(), 0)
    };
    let next = modifier::remove_range(content, &range.with_focus(caret.has_focus));
    Some(state.push(next, ChangeType::DeleteCharacter))
}

fn delete_word_backward(state: &EditorState) -> Option<EditorState> {
    if let Some(next) = remove_selection(state) {
        return Some(next);
    }
    let caret = state.selection();
    if caret.anchor_offset == 0 {
        return delete_backward(state);
    }
    let content = state.current_content();
    let block = content.block_for_key(&caret.anchor_key)?;
    let start = find_word_boundary_backward(block.text(), caret.anchor_offset);
    remove_in_block(state, content, start, caret.anchor_offset)
}

fn delete_word_forward(state: &EditorState) -> Option<EditorState> {
    if let Some(next) = remove_selection(state) {
        return Some(next);
    }
    let caret = state.selection();
    let content = state.current_content();
    let block = content.block_for_key(&caret.anchor_key)?;
    if caret.anchor_offset >= block.len() {
        return delete_forward(state);
    }
    let end = find_word_boundary_forward(block.text(), caret.anchor_offset);
    remove_in_block(state, content, caret.anchor_offset, end)
}

fn delete_to_block_start(state: &EditorState) -> Option<EditorState> {
    if let Some(next) = remove_selection(state) {
        return Some(next);
    }
    let caret = state.selection();
    if caret.anchor_offset == 0 {
        return delete_backward(state);
    }
    remove_in_block(state, state.current_content(), 0, caret.anchor_offset)
}

fn remove_in_block(
    state: &EditorState,
    content: &ContentState,
    start: usize,
    end: usize,
) -> Option<EditorState> {
    let caret = state.selection();
    let key = caret.anchor_key.clone();
    let range = SelectionState::range(key.clone(), start, key, end).with_focus(caret.has_focus);
    let next = modifier::remove_range(content, &range);
    Some(state.push(next, ChangeType::RemoveRange))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Char offset of the start of the word before `cursor`.
pub fn find_word_boundary_backward(text: &str, cursor: usize) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut pos = cursor.min(chars.len());

    // Skip any whitespace/punctuation immediately before cursor.
    while pos > 0 && !is_word_char(chars[pos - 1]) {
        pos -= 1;
    }
    while pos > 0 && is_word_char(chars[pos - 1]) {
        pos -= 1;
    }
    pos
}

/// Char offset of the end of the word after `cursor`.
pub fn find_word_boundary_forward(text: &str, cursor: usize) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();
    let mut pos = cursor.min(len);

    while pos < len && !is_word_char(chars[pos]) {
        pos += 1;
    }
    while pos < len && is_word_char(chars[pos]) {
        pos += 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> EditorState {
        insert_characters(&EditorState::create_empty(), text)
    }

    fn text(state: &EditorState) -> String {
        state.current_content().plain_text("|")
    }

    #[test]
    fn test_backspace_char_and_join() {
        let state = typed("ab");
        let state = execute_command(&state, &KeyCommand::SplitBlock).expect("split");
        let state = insert_characters(&state, "c");
        assert_eq!(text(&state), "ab|c");

        let state = execute_command(&state, &KeyCommand::Backspace).expect("backspace");
        assert_eq!(text(&state), "ab|");
        let state = execute_command(&state, &KeyCommand::Backspace).expect("join");
        assert_eq!(text(&state), "ab");
        assert_eq!(state.selection().anchor_offset, 2);
    }

    #[test]
    fn test_backspace_at_document_start() {
        let state = EditorState::create_empty();
        assert!(execute_command(&state, &KeyCommand::Backspace).is_none());
        assert!(execute_command(&state, &KeyCommand::Delete).is_none());
    }

    #[test]
    fn test_delete_forward_joins_below() {
        let state = typed("a\nb");
        let first = state.current_content().first_block().key().clone();
        let state = state.force_selection(SelectionState::collapsed(first, 1));
        let state = execute_command(&state, &KeyCommand::Delete).expect("delete");
        assert_eq!(text(&state), "ab");
    }

    #[test]
    fn test_word_deletes() {
        let state = typed("hello big world");
        let state = execute_command(&state, &KeyCommand::BackspaceWord).expect("word");
        assert_eq!(text(&state), "hello big ");

        let key = state.selection().anchor_key.clone();
        let state = state.force_selection(SelectionState::collapsed(key, 0));
        let state = execute_command(&state, &KeyCommand::DeleteWord).expect("word fwd");
        assert_eq!(text(&state), " big ");
    }

    #[test]
    fn test_backspace_to_line_start() {
        let state = typed("one two");
        let state = execute_command(&state, &KeyCommand::BackspaceToStartOfLine).expect("line");
        assert_eq!(text(&state), "");
    }

    #[test]
    fn test_undo_redo_commands() {
        let state = typed("x");
        let undone = execute_command(&state, &KeyCommand::Undo).expect("undo");
        assert_eq!(text(&undone), "");
        let redone = execute_command(&undone, &KeyCommand::Redo).expect("redo");
        assert_eq!(text(&redone), "x");
        assert!(execute_command(&redone, &KeyCommand::Redo).is_none());
    }

    #[test]
    fn test_word_boundaries() {
        assert_eq!(find_word_boundary_backward("foo bar", 7), 4);
        assert_eq!(find_word_boundary_backward("foo bar ", 8), 4);
        assert_eq!(find_word_boundary_forward("foo bar", 0), 3);
        assert_eq!(find_word_boundary_forward("foo bar", 3), 7);
    }

    #[test]
    fn test_rich_commands_are_not_plain() {
        let state = typed("x");
        assert!(execute_command(&state, &KeyCommand::Bold).is_none());
        assert!(execute_command(&state, &KeyCommand::Other("save".into())).is_none());
    }
}
