//! Browser event handling for the editor.
//!
//! Translates `beforeinput` and `keydown` events into editor input. Parsing
//! and dispatch are plain Rust so they can be tested off the browser; only
//! the `*_from_event` helpers touch web-sys.

use draftpad_core::{Editor, HandleResult, Key, KeyCombo, KeyCommand, KeyValueStorage, Modifiers};

/// W3C Input Events `inputType` values the editor distinguishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputType {
    InsertText,
    InsertCompositionText,
    InsertLineBreak,
    InsertParagraph,
    InsertFromPaste,
    InsertFromDrop,
    InsertReplacementText,
    DeleteContentBackward,
    DeleteContentForward,
    DeleteWordBackward,
    DeleteWordForward,
    DeleteHardLineBackward,
    DeleteByCut,
    HistoryUndo,
    HistoryRedo,
    FormatBold,
    FormatItalic,
    FormatUnderline,
    FormatStrikethrough,
    Unknown(String),
}

/// Parse a browser inputType string to an InputType enum.
pub fn parse_browser_input_type(s: &str) -> InputType {
    match s {
        // Insertion
        "insertText" => InputType::InsertText,
        "insertCompositionText" => InputType::InsertCompositionText,
        "insertLineBreak" => InputType::InsertLineBreak,
        "insertParagraph" => InputType::InsertParagraph,
        "insertFromPaste" => InputType::InsertFromPaste,
        "insertFromDrop" => InputType::InsertFromDrop,
        "insertReplacementText" => InputType::InsertReplacementText,

        // Deletion
        "deleteContentBackward" => InputType::DeleteContentBackward,
        "deleteContentForward" => InputType::DeleteContentForward,
        "deleteWordBackward" | "deleteEntireWordBackward" => InputType::DeleteWordBackward,
        "deleteWordForward" | "deleteEntireWordForward" => InputType::DeleteWordForward,
        "deleteHardLineBackward" | "deleteSoftLineBackward" => InputType::DeleteHardLineBackward,
        "deleteByCut" => InputType::DeleteByCut,

        // History
        "historyUndo" => InputType::HistoryUndo,
        "historyRedo" => InputType::HistoryRedo,

        // Formatting
        "formatBold" => InputType::FormatBold,
        "formatItalic" => InputType::FormatItalic,
        "formatUnderline" => InputType::FormatUnderline,
        "formatStrikethrough" => InputType::FormatStrikethrough,

        other => InputType::Unknown(other.to_string()),
    }
}

/// Result of handling a beforeinput event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeforeInputResult {
    /// A shortcut or command claimed the event.
    Handled,
    /// No shortcut fired; the text was inserted by the editor.
    Inserted,
    /// Leave the event to the browser (IME composition, drops).
    PassThrough,
}

impl BeforeInputResult {
    /// Whether the caller should `preventDefault()` and re-render.
    pub fn prevents_default(&self) -> bool {
        !matches!(self, Self::PassThrough)
    }
}

/// Context for beforeinput handling.
#[derive(Debug, Clone)]
pub struct BeforeInputContext {
    pub input_type: InputType,
    /// The text to insert, if any.
    pub data: Option<String>,
    /// Whether the event is part of an IME composition.
    pub is_composing: bool,
}

impl BeforeInputContext {
    pub fn from_event(event: &web_sys::InputEvent) -> Self {
        Self {
            input_type: parse_browser_input_type(&event.input_type()),
            data: event.data().filter(|d| !d.is_empty()),
            is_composing: event.is_composing(),
        }
    }
}

/// Handle a beforeinput event against `editor`.
pub fn handle_beforeinput<S: KeyValueStorage>(
    editor: &mut Editor<S>,
    ctx: &BeforeInputContext,
) -> BeforeInputResult {
    // During composition, let the browser handle everything but history.
    let is_history = matches!(ctx.input_type, InputType::HistoryUndo | InputType::HistoryRedo);
    if ctx.is_composing && !is_history {
        return BeforeInputResult::PassThrough;
    }

    let command = match &ctx.input_type {
        InputType::InsertText | InputType::InsertFromPaste | InputType::InsertReplacementText => {
            let Some(text) = ctx.data.as_deref() else {
                return BeforeInputResult::PassThrough;
            };
            return match editor.handle_before_input(text) {
                HandleResult::Handled => BeforeInputResult::Handled,
                HandleResult::NotHandled => BeforeInputResult::Inserted,
            };
        }
        InputType::InsertParagraph | InputType::InsertLineBreak => KeyCommand::SplitBlock,
        InputType::DeleteContentBackward | InputType::DeleteByCut => KeyCommand::Backspace,
        InputType::DeleteContentForward => KeyCommand::Delete,
        InputType::DeleteWordBackward => KeyCommand::BackspaceWord,
        InputType::DeleteWordForward => KeyCommand::DeleteWord,
        InputType::DeleteHardLineBackward => KeyCommand::BackspaceToStartOfLine,
        InputType::HistoryUndo => KeyCommand::Undo,
        InputType::HistoryRedo => KeyCommand::Redo,
        InputType::FormatBold => KeyCommand::Bold,
        InputType::FormatItalic => KeyCommand::Italic,
        InputType::FormatUnderline => KeyCommand::Underline,
        InputType::FormatStrikethrough => KeyCommand::Strikethrough,
        InputType::InsertCompositionText | InputType::InsertFromDrop | InputType::Unknown(_) => {
            return BeforeInputResult::PassThrough;
        }
    };

    // The DOM is re-rendered from the model, so a no-op command still
    // suppresses the browser's own edit.
    editor.handle_key_command(&command);
    BeforeInputResult::Handled
}

/// Build a key combination from a keydown event.
pub fn key_combo_from_event(event: &web_sys::KeyboardEvent) -> KeyCombo {
    KeyCombo::with_modifiers(
        Key::from_dom(&event.key()),
        Modifiers {
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            shift: event.shift_key(),
            meta: event.meta_key(),
        },
    )
}

/// Whether a `navigator.platform` / user agent string is an Apple platform.
pub fn is_mac_platform(platform: &str) -> bool {
    ["Mac", "iPhone", "iPad", "iPod"]
        .iter()
        .any(|p| platform.contains(p))
}

/// Platform check against the running browser.
pub fn detect_mac() -> bool {
    web_sys::window()
        .and_then(|w| w.navigator().platform().ok())
        .is_some_and(|p| is_mac_platform(&p))
}
