//! Markdown-like autoformat shortcuts.
//!
//! When a space is about to be inserted and the caret block's entire text is
//! one of the trigger strings, the trigger text is removed and the block is
//! restyled instead of inserting the space. Matching is exact: `##` followed
//! by a space is plain text.

use crate::model::{BlockType, InlineStyle, StyleSet};
use crate::modifier;
use crate::rich_utils;
use crate::selection::SelectionState;
use crate::state::{ChangeType, EditorState};

/// What a trigger does once its text has been removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerAction {
    SetBlockType(BlockType),
    ToggleInlineStyle(InlineStyle),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRule {
    pub trigger: &'static str,
    pub action: TriggerAction,
}

/// The shortcut table, in match priority order.
pub static TRIGGER_RULES: [TriggerRule; 5] = [
    TriggerRule {
        trigger: "#",
        action: TriggerAction::SetBlockType(BlockType::HeaderOne),
    },
    TriggerRule {
        trigger: "*",
        action: TriggerAction::ToggleInlineStyle(InlineStyle::Bold),
    },
    TriggerRule {
        trigger: "**",
        action: TriggerAction::ToggleInlineStyle(InlineStyle::RED),
    },
    TriggerRule {
        trigger: "***",
        action: TriggerAction::ToggleInlineStyle(InlineStyle::Underline),
    },
    TriggerRule {
        trigger: "```",
        action: TriggerAction::SetBlockType(BlockType::CodeBlock),
    },
];

/// The rule whose trigger equals `text` exactly.
pub fn match_trigger(text: &str) -> Option<&'static TriggerRule> {
    TRIGGER_RULES.iter().find(|rule| rule.trigger == text)
}

/// Run the shortcut handler for `chars` about to be inserted.
///
/// Returns the new state if a shortcut fired. `None` means the default
/// insertion should go ahead.
pub fn handle_before_input(chars: &str, state: &EditorState) -> Option<EditorState> {
    if chars != " " {
        return None;
    }

    let content = state.current_content();
    let selection = state.selection();
    let block = content.block_for_key(selection.start_key())?;
    let rule = match_trigger(block.text())?;

    let key = block.key().clone();
    let trigger_len = rule.trigger.chars().count();
    let range = SelectionState::range(key.clone(), 0, key.clone(), trigger_len)
        .with_focus(selection.has_focus);
    let removed = modifier::replace_text(content, &range, "", &StyleSet::new(), None);
    // The removal is its own undo step, separate from the restyle below.
    let removed = state.push(removed, ChangeType::RemoveRange);

    let next = match &rule.action {
        TriggerAction::SetBlockType(block_type) => {
            rich_utils::toggle_block_type(&removed, block_type)
        }
        TriggerAction::ToggleInlineStyle(style) => rich_utils::toggle_inline_style(&removed, style),
    };

    tracing::debug!(trigger = rule.trigger, block = %key, "autoformat shortcut applied");
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execute::insert_characters;

    fn typed(text: &str) -> EditorState {
        insert_characters(&EditorState::create_empty(), text)
    }

    #[test]
    fn test_table_is_exact_match() {
        assert_eq!(match_trigger("#").map(|r| r.trigger), Some("#"));
        assert_eq!(
            match_trigger("**").map(|r| &r.action),
            Some(&TriggerAction::ToggleInlineStyle(InlineStyle::RED))
        );
        assert!(match_trigger("##").is_none());
        assert!(match_trigger("# ").is_none());
        assert!(match_trigger("").is_none());
        assert!(match_trigger("``").is_none());
    }

    #[test]
    fn test_triggers_are_distinct() {
        for (i, a) in TRIGGER_RULES.iter().enumerate() {
            for b in &TRIGGER_RULES[i + 1..] {
                assert_ne!(a.trigger, b.trigger);
            }
        }
    }

    #[test]
    fn test_only_space_triggers() {
        let state = typed("#");
        assert!(handle_before_input("x", &state).is_none());
        assert!(handle_before_input("  ", &state).is_none());
        assert!(handle_before_input(" ", &state).is_some());
    }

    #[test]
    fn test_heading_shortcut() {
        let next = handle_before_input(" ", &typed("#")).expect("handled");
        let block = next.current_content().first_block();
        assert_eq!(block.block_type(), &BlockType::HeaderOne);
        assert_eq!(block.text(), "");
        assert_eq!(next.selection().anchor_offset, 0);
    }

    #[test]
    fn test_code_block_shortcut() {
        let next = handle_before_input(" ", &typed("```")).expect("handled");
        assert_eq!(next.current_content().first_block().block_type(), &BlockType::CodeBlock);
    }

    #[test]
    fn test_text_after_trigger_does_not_match() {
        assert!(handle_before_input(" ", &typed("# title")).is_none());
        assert!(handle_before_input(" ", &typed("##")).is_none());
    }
}
