//! Block-type and inline-style toggles, and the rich-text key commands.

use crate::keys::KeyCommand;
use crate::model::{BlockType, ContentState, InlineStyle};
use crate::modifier;
use crate::state::{ChangeType, EditorState};

/// Toggle the type of the selected blocks.
///
/// If the block holding the selection start already has `block_type`, the
/// selected blocks revert to `unstyled`; otherwise they all become `block_type`.
pub fn toggle_block_type(state: &EditorState, block_type: &BlockType) -> EditorState {
    let content = state.current_content();
    let selection = state.selection();
    let current = content
        .block_for_key(selection.start_key())
        .map(|b| b.block_type().clone())
        .unwrap_or_default();
    let target = if current == *block_type {
        BlockType::Unstyled
    } else {
        block_type.clone()
    };

    tracing::debug!(from = %current, to = %target, "toggle block type");
    let next = modifier::set_block_type(content, selection, &target);
    state.push(next, ChangeType::ChangeBlockType)
}

/// Toggle an inline style at the selection.
///
/// A caret only changes the style the next typed characters get. A range is
/// styled, or unstyled if its first char already has the style.
pub fn toggle_inline_style(state: &EditorState, style: &InlineStyle) -> EditorState {
    let selection = state.selection();
    let mut current = state.current_inline_style();

    if selection.is_collapsed() {
        if !current.remove(style) {
            current.insert(style.clone());
        }
        return state.set_inline_style_override(current);
    }

    let content = state.current_content();
    let next = if current.contains(style) {
        modifier::remove_inline_style(content, selection, style)
    } else {
        modifier::apply_inline_style(content, selection, style)
    };
    state.push(next, ChangeType::ChangeInlineStyle)
}

/// Handle the key commands that carry rich-text meaning.
///
/// Returns `None` for commands that fall through to plain editing.
pub fn handle_key_command(state: &EditorState, command: &KeyCommand) -> Option<EditorState> {
    match command {
        KeyCommand::Bold => Some(toggle_inline_style(state, &InlineStyle::Bold)),
        KeyCommand::Italic => Some(toggle_inline_style(state, &InlineStyle::Italic)),
        KeyCommand::Underline => Some(toggle_inline_style(state, &InlineStyle::Underline)),
        KeyCommand::Code => Some(toggle_inline_style(state, &InlineStyle::Code)),
        KeyCommand::Strikethrough => Some(toggle_inline_style(state, &InlineStyle::Strikethrough)),
        KeyCommand::Backspace
        | KeyCommand::BackspaceWord
        | KeyCommand::BackspaceToStartOfLine => on_backspace(state),
        _ => None,
    }
}

/// Backspace at the very start of a styled block resets it to `unstyled`
/// instead of merging it into the block above.
pub fn on_backspace(state: &EditorState) -> Option<EditorState> {
    let selection = state.selection();
    if !selection.is_collapsed() || selection.anchor_offset != 0 || selection.focus_offset != 0 {
        return None;
    }
    let next = try_to_remove_block_style(state)?;
    Some(state.push(next, ChangeType::ChangeBlockType))
}

/// The content with the caret block reset to `unstyled`, if that applies.
///
/// A code block directly below a non-empty code block is left alone so that
/// backspace joins the two.
pub fn try_to_remove_block_style(state: &EditorState) -> Option<ContentState> {
    let selection = state.selection();
    if !selection.is_collapsed() || selection.anchor_offset != 0 {
        return None;
    }
    let content = state.current_content();
    let key = &selection.anchor_key;
    let block = content.block_for_key(key)?;

    if *block.block_type() == BlockType::CodeBlock {
        if let Some(before) = content.block_before(key) {
            if *before.block_type() == BlockType::CodeBlock && !before.is_empty() {
                return None;
            }
        }
    }

    if *block.block_type() != BlockType::Unstyled {
        return Some(modifier::set_block_type(content, selection, &BlockType::Unstyled));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ContentBlock, StyleSet};
    use crate::selection::SelectionState;

    fn state_with(blocks: Vec<ContentBlock>) -> EditorState {
        EditorState::create_with_content(ContentState::from_blocks(blocks))
    }

    #[test]
    fn test_toggle_block_type_round_trip() {
        let state = state_with(vec![ContentBlock::with_text(
            "a".into(),
            BlockType::Unstyled,
            "title",
        )]);
        let heading = toggle_block_type(&state, &BlockType::HeaderOne);
        assert_eq!(heading.current_content().first_block().block_type(), &BlockType::HeaderOne);
        assert_eq!(heading.last_change_type(), Some(ChangeType::ChangeBlockType));

        let back = toggle_block_type(&heading, &BlockType::HeaderOne);
        assert_eq!(back.current_content().first_block().block_type(), &BlockType::Unstyled);
    }

    #[test]
    fn test_toggle_inline_style_collapsed_sets_override() {
        let state = EditorState::create_empty();
        let bold = toggle_inline_style(&state, &InlineStyle::Bold);
        assert_eq!(bold.inline_style_override(), Some(&StyleSet::from([InlineStyle::Bold])));
        assert!(!bold.can_undo());

        let off = toggle_inline_style(&bold, &InlineStyle::Bold);
        assert_eq!(off.inline_style_override(), Some(&StyleSet::new()));
    }

    #[test]
    fn test_toggle_inline_style_range() {
        let state = state_with(vec![ContentBlock::with_text(
            "a".into(),
            BlockType::Unstyled,
            "word",
        )]);
        let state = state.force_selection(SelectionState::range("a".into(), 0, "a".into(), 4));
        let styled = toggle_inline_style(&state, &InlineStyle::Italic);
        let block = styled.current_content().first_block();
        assert!((0..4).all(|i| block.style_at(i).contains(&InlineStyle::Italic)));

        let plain = toggle_inline_style(&styled, &InlineStyle::Italic);
        assert!(plain.current_content().same_content(state.current_content()));
    }

    #[test]
    fn test_backspace_resets_block_style() {
        let state = state_with(vec![ContentBlock::with_text(
            "a".into(),
            BlockType::Blockquote,
            "quote",
        )]);
        let next = handle_key_command(&state, &KeyCommand::Backspace).expect("handled");
        assert_eq!(next.current_content().first_block().block_type(), &BlockType::Unstyled);
        assert_eq!(next.current_content().first_block().text(), "quote");
    }

    #[test]
    fn test_backspace_ignored_mid_block() {
        let state = state_with(vec![ContentBlock::with_text(
            "a".into(),
            BlockType::HeaderTwo,
            "abc",
        )]);
        let state = state.force_selection(SelectionState::collapsed("a".into(), 2));
        assert!(handle_key_command(&state, &KeyCommand::Backspace).is_none());

        let unstyled = state_with(vec![ContentBlock::with_text(
            "a".into(),
            BlockType::Unstyled,
            "abc",
        )]);
        assert!(handle_key_command(&unstyled, &KeyCommand::Backspace).is_none());
    }

    #[test]
    fn test_code_block_joins_code_block_above() {
        let state = state_with(vec![
            ContentBlock::with_text("a".into(), BlockType::CodeBlock, "let x = 1;"),
            ContentBlock::with_text("b".into(), BlockType::CodeBlock, "let y = 2;"),
        ]);
        let state = state.force_selection(SelectionState::collapsed("b".into(), 0));
        assert!(try_to_remove_block_style(&state).is_none());
    }

    #[test]
    fn test_plain_commands_fall_through() {
        let state = EditorState::create_empty();
        assert!(handle_key_command(&state, &KeyCommand::SplitBlock).is_none());
        assert!(handle_key_command(&state, &KeyCommand::Delete).is_none());
        assert!(handle_key_command(&state, &KeyCommand::Code).is_some());
    }
}
