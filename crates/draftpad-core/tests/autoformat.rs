use draftpad_core::{
    BlockType, ContentBlock, ContentState, Editor, EditorConfig, EditorState, HandleResult,
    InlineStyle, Key, KeyCombo, KeyCommand, MemoryStorage, SelectionState,
};

fn mounted() -> Editor<MemoryStorage> {
    let mut editor = Editor::new(MemoryStorage::new(), EditorConfig::default());
    editor.mount().unwrap();
    editor
}

/// Feed `text` one char at a time, as a browser would.
fn type_text(editor: &mut Editor<MemoryStorage>, text: &str) -> Vec<HandleResult> {
    text.chars()
        .map(|c| editor.handle_before_input(&c.to_string()))
        .collect()
}

fn first_block(editor: &Editor<MemoryStorage>) -> &ContentBlock {
    editor.editor_state().current_content().first_block()
}

fn undo(editor: &mut Editor<MemoryStorage>) {
    assert_eq!(editor.handle_key_command(&KeyCommand::Undo), HandleResult::Handled);
}

#[test]
fn hash_space_makes_heading() {
    let mut editor = mounted();
    type_text(&mut editor, "#");
    assert_eq!(editor.handle_before_input(" "), HandleResult::Handled);

    let block = first_block(&editor);
    assert_eq!(block.block_type(), &BlockType::HeaderOne);
    assert_eq!(block.text(), "");
}

#[test]
fn hash_space_on_heading_toggles_back() {
    let content = ContentState::from_blocks(vec![ContentBlock::with_text(
        "h1".into(),
        BlockType::HeaderOne,
        "#",
    )]);
    let mut editor = mounted();
    editor.set_editor_state(EditorState::create_with_content(content));
    editor.select(SelectionState::collapsed("h1".into(), 1));

    assert_eq!(editor.handle_before_input(" "), HandleResult::Handled);
    let block = first_block(&editor);
    assert_eq!(block.block_type(), &BlockType::Unstyled);
    assert_eq!(block.text(), "");
}

#[test]
fn triggers_need_exact_block_text() {
    let mut editor = mounted();
    type_text(&mut editor, "##");
    assert_eq!(editor.handle_before_input(" "), HandleResult::NotHandled);
    assert_eq!(editor.text(), "## ");
    assert_eq!(first_block(&editor).block_type(), &BlockType::Unstyled);

    let mut editor = mounted();
    type_text(&mut editor, "a#");
    assert_eq!(editor.handle_before_input(" "), HandleResult::NotHandled);
    assert_eq!(editor.text(), "a# ");
}

#[test]
fn only_space_fires_a_trigger() {
    let mut editor = mounted();
    let results = type_text(&mut editor, "#a");
    assert!(results.iter().all(|r| *r == HandleResult::NotHandled));
    assert_eq!(editor.text(), "#a");
}

#[test]
fn star_space_toggles_bold_for_following_text() {
    let mut editor = mounted();
    type_text(&mut editor, "*");
    assert_eq!(editor.handle_before_input(" "), HandleResult::Handled);
    assert_eq!(editor.text(), "");

    type_text(&mut editor, "loud");
    let block = first_block(&editor);
    assert_eq!(block.text(), "loud");
    assert!((0..4).all(|i| block.style_at(i).contains(&InlineStyle::Bold)));
}

#[test]
fn star_space_toggles_against_current_style() {
    let mut editor = mounted();
    type_text(&mut editor, "*");
    editor.handle_before_input(" ");
    type_text(&mut editor, "bold");
    editor.handle_key(&KeyCombo::new(Key::Enter), false);

    // The new block inherits bold from the block above, so `*` toggles it off.
    type_text(&mut editor, "*");
    assert_eq!(editor.handle_before_input(" "), HandleResult::Handled);
    type_text(&mut editor, "plain");

    let content = editor.editor_state().current_content();
    let second = content.last_block();
    assert_eq!(second.text(), "plain");
    assert!(second.style_at(0).is_empty());
    assert!(content.first_block().style_at(3).contains(&InlineStyle::Bold));
}

#[test]
fn double_star_is_red_not_bold() {
    let mut editor = mounted();
    type_text(&mut editor, "**");
    assert_eq!(editor.handle_before_input(" "), HandleResult::Handled);
    type_text(&mut editor, "warn");

    let style = first_block(&editor).style_at(0);
    assert!(style.contains(&InlineStyle::RED));
    assert!(!style.contains(&InlineStyle::Bold));
}

#[test]
fn triple_star_is_underline() {
    let mut editor = mounted();
    type_text(&mut editor, "***");
    assert_eq!(editor.handle_before_input(" "), HandleResult::Handled);
    type_text(&mut editor, "u");

    let style = first_block(&editor).style_at(0);
    assert!(style.contains(&InlineStyle::Underline));
    assert_eq!(style.len(), 1);
}

#[test]
fn backticks_make_code_block() {
    let mut editor = mounted();
    type_text(&mut editor, "```");
    assert_eq!(editor.handle_before_input(" "), HandleResult::Handled);

    let block = first_block(&editor);
    assert_eq!(block.block_type(), &BlockType::CodeBlock);
    assert_eq!(block.text(), "");
}

#[test]
fn trigger_applies_to_caret_block_only() {
    let mut editor = mounted();
    type_text(&mut editor, "intro");
    editor.handle_key(&KeyCombo::new(Key::Enter), false);
    type_text(&mut editor, "#");
    editor.handle_before_input(" ");
    type_text(&mut editor, "Section");

    let content = editor.editor_state().current_content();
    assert_eq!(content.blocks().len(), 2);
    assert_eq!(content.first_block().block_type(), &BlockType::Unstyled);
    assert_eq!(content.first_block().text(), "intro");
    assert_eq!(content.last_block().block_type(), &BlockType::HeaderOne);
    assert_eq!(content.last_block().text(), "Section");
}

#[test]
fn heading_shortcut_undoes_in_two_steps() {
    let mut editor = mounted();
    type_text(&mut editor, "#");
    editor.handle_before_input(" ");

    undo(&mut editor);
    let block = first_block(&editor);
    assert_eq!(block.block_type(), &BlockType::Unstyled);
    assert_eq!(block.text(), "");

    undo(&mut editor);
    assert_eq!(first_block(&editor).text(), "#");
}

#[test]
fn style_shortcut_undoes_in_one_step() {
    let mut editor = mounted();
    type_text(&mut editor, "*");
    editor.handle_before_input(" ");

    undo(&mut editor);
    assert_eq!(editor.text(), "*");
    assert!(editor.editor_state().inline_style_override().is_none());
}

#[test]
fn typing_coalesces_into_one_undo_step() {
    let mut editor = mounted();
    type_text(&mut editor, "hello");
    assert_eq!(editor.editor_state().undo_depth(), 1);
    undo(&mut editor);
    assert_eq!(editor.text(), "");
}

#[test]
fn backspace_at_start_of_heading_unstyles_it() {
    let mut editor = mounted();
    type_text(&mut editor, "#");
    editor.handle_before_input(" ");
    assert_eq!(
        editor.handle_key(&KeyCombo::new(Key::Backspace), false),
        HandleResult::Handled
    );
    assert_eq!(first_block(&editor).block_type(), &BlockType::Unstyled);
}

#[test]
fn shortcut_follows_a_caret_moved_by_the_host() {
    let mut editor = mounted();
    editor.handle_key_command(&KeyCommand::SplitBlock);
    type_text(&mut editor, "intro");
    editor.handle_key_command(&KeyCommand::SplitBlock);
    type_text(&mut editor, "x");
    let empty = first_block(&editor).key().clone();
    assert!(first_block(&editor).is_empty());

    assert!(editor.set_selection(&empty, 0, &empty, 0));
    type_text(&mut editor, "#");
    assert_eq!(editor.handle_before_input(" "), HandleResult::Handled);

    let content = editor.editor_state().current_content();
    assert_eq!(content.first_block().block_type(), &BlockType::HeaderOne);
    assert_eq!(content.first_block().text(), "");
    assert_eq!(content.last_block().block_type(), &BlockType::Unstyled);
    assert_eq!(editor.text(), "\nintro\nx");
}
