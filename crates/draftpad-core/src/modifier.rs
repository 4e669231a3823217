//! Pure document mutations.
//!
//! Every function takes a [`ContentState`] by reference and returns a new one
//! with `selection_before` set to the input range and `selection_after` set
//! to where the caret lands. Offsets outside a block are clamped to its
//! length.

use crate::model::{BlockType, CharacterMetadata, ContentState, EntityKey, InlineStyle, StyleSet};
use crate::selection::SelectionState;

/// Block indices covered by a selection, in document order.
///
/// Returns `None` if either end refers to a block that does not exist.
pub fn block_span(content: &ContentState, selection: &SelectionState) -> Option<(usize, usize)> {
    let start = content.block_index(selection.start_key())?;
    let end = content.block_index(selection.end_key())?;
    Some((start.min(end), start.max(end)))
}

/// Remove the selected text, merging the start and end blocks.
pub fn remove_range(content: &ContentState, selection: &SelectionState) -> ContentState {
    let mut next = content.clone();
    next.set_selection_before(selection.clone());

    let Some((start_index, end_index)) = block_span(content, selection) else {
        next.set_selection_after(selection.clone());
        return next;
    };

    let blocks = next.blocks_mut();
    let start_offset = selection.start_offset().min(blocks[start_index].len());
    let end_offset = selection.end_offset().min(blocks[end_index].len());

    if start_index == end_index {
        let (from, to) = (start_offset.min(end_offset), start_offset.max(end_offset));
        blocks[start_index].splice(from, to, "", &CharacterMetadata::default());
    } else {
        let mut tail_block = blocks[end_index].clone();
        let (tail_text, tail_chars) = tail_block.split_off(end_offset);
        let start_block = &mut blocks[start_index];
        start_block.split_off(start_offset);
        start_block.append(&tail_text, &tail_chars);
        blocks.drain(start_index + 1..=end_index);
    }

    let key = next.blocks()[start_index].key().clone();
    next.set_selection_after(
        SelectionState::collapsed(key, start_offset).with_focus(selection.has_focus),
    );
    next
}

/// Insert `text` at a collapsed selection.
///
/// Newlines split the block; each line lands in its own block.
pub fn insert_text(
    content: &ContentState,
    at: &SelectionState,
    text: &str,
    style: &StyleSet,
    entity: Option<EntityKey>,
) -> ContentState {
    let mut next = if at.is_collapsed() {
        let mut next = content.clone();
        next.set_selection_after(at.clone());
        next
    } else {
        remove_range(content, at)
    };
    let selection_before = at.clone();
    let meta = CharacterMetadata::new(style.clone(), entity);
    let text = text.replace("\r\n", "\n");

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            let caret = next.selection_after().clone();
            next = split_block(&next, &caret);
        }
        let caret = next.selection_after().clone();
        let Some(index) = next.block_index(&caret.anchor_key) else {
            break;
        };
        let block = &mut next.blocks_mut()[index];
        let offset = caret.anchor_offset.min(block.len());
        block.splice(offset, offset, line, &meta);
        let end = offset + line.chars().count();
        let after =
            SelectionState::collapsed(caret.anchor_key.clone(), end).with_focus(caret.has_focus);
        next.set_selection_after(after);
    }

    next.set_selection_before(selection_before);
    next
}

/// Replace the selected range with `text`.
pub fn replace_text(
    content: &ContentState,
    range: &SelectionState,
    text: &str,
    style: &StyleSet,
    entity: Option<EntityKey>,
) -> ContentState {
    let removed = remove_range(content, range);
    let caret = removed.selection_after().clone();
    let mut next = insert_text(&removed, &caret, text, style, entity);
    next.set_selection_before(range.clone());
    next
}

/// Split the block at the caret. The lower half gets a fresh key, keeps the
/// block type and depth, and drops block data.
pub fn split_block(content: &ContentState, selection: &SelectionState) -> ContentState {
    let base = if selection.is_collapsed() {
        content.clone()
    } else {
        remove_range(content, selection)
    };
    let caret = if selection.is_collapsed() {
        selection.clone()
    } else {
        base.selection_after().clone()
    };

    let mut next = base;
    next.set_selection_before(selection.clone());
    let Some(index) = next.block_index(&caret.anchor_key) else {
        next.set_selection_after(caret);
        return next;
    };

    let new_key = next.fresh_key();
    let blocks = next.blocks_mut();
    let offset = caret.anchor_offset.min(blocks[index].len());
    let (tail_text, tail_chars) = blocks[index].split_off(offset);

    let mut below = blocks[index].clone();
    below.set_key(new_key.clone());
    below.clear_data();
    below.split_off(0);
    below.append(&tail_text, &tail_chars);
    blocks.insert(index + 1, below);

    next.set_selection_after(SelectionState::collapsed(new_key, 0).with_focus(caret.has_focus));
    next
}

/// Set the type of every block touched by the selection.
pub fn set_block_type(
    content: &ContentState,
    selection: &SelectionState,
    block_type: &BlockType,
) -> ContentState {
    let mut next = content.clone();
    next.set_selection_before(selection.clone());
    next.set_selection_after(selection.clone());
    if let Some((start, end)) = block_span(content, selection) {
        for block in &mut next.blocks_mut()[start..=end] {
            block.set_type(block_type.clone());
            if *block_type == BlockType::Unstyled {
                block.set_depth(0);
            }
        }
    }
    next
}

/// Add `style` to every selected character.
pub fn apply_inline_style(
    content: &ContentState,
    selection: &SelectionState,
    style: &InlineStyle,
) -> ContentState {
    modify_inline_style(content, selection, |set| {
        set.insert(style.clone());
    })
}

/// Remove `style` from every selected character.
pub fn remove_inline_style(
    content: &ContentState,
    selection: &SelectionState,
    style: &InlineStyle,
) -> ContentState {
    modify_inline_style(content, selection, |set| {
        set.remove(style);
    })
}

fn modify_inline_style(
    content: &ContentState,
    selection: &SelectionState,
    mut apply: impl FnMut(&mut StyleSet),
) -> ContentState {
    let mut next = content.clone();
    next.set_selection_before(selection.clone());
    next.set_selection_after(selection.clone());
    let Some((start_index, end_index)) = block_span(content, selection) else {
        return next;
    };

    for index in start_index..=end_index {
        let block = &mut next.blocks_mut()[index];
        let from = if index == start_index {
            selection.start_offset().min(block.len())
        } else {
            0
        };
        let to = if index == end_index {
            selection.end_offset().min(block.len())
        } else {
            block.len()
        };
        for meta in &mut block.chars_mut()[from..to.max(from)] {
            apply(&mut meta.style);
        }
    }
    next
}
