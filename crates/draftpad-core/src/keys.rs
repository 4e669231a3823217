//! Key input and key commands.
//!
//! Platform code converts native key events into a [`KeyCombo`];
//! [`default_key_binding`] maps that to a [`KeyCommand`], which the editor
//! then routes through [`crate::rich_utils::handle_key_command`] and the
//! plain-editing defaults in [`crate::execute`].

use std::fmt;

use smol_str::SmolStr;

/// Key values for keyboard input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A character key.
    Character(SmolStr),

    /// Unknown/unidentified key.
    Unidentified,

    // === Whitespace / editing ===
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
    Space,

    // === Navigation ===
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,

    // === Modifiers ===
    Alt,
    Control,
    Meta,
    Shift,
}

impl Key {
    /// Create a character key.
    pub fn character(s: impl Into<SmolStr>) -> Self {
        Self::Character(s.into())
    }

    /// Parse a DOM `KeyboardEvent.key` value.
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Escape" => Self::Escape,
            " " | "Spacebar" => Self::Space,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Alt" => Self::Alt,
            "Control" => Self::Control,
            "Meta" => Self::Meta,
            "Shift" => Self::Shift,
            "" | "Unidentified" => Self::Unidentified,
            other if other.chars().count() == 1 => Self::Character(SmolStr::new(other)),
            _ => Self::Unidentified,
        }
    }

    /// Lowercased character, if this is a character key.
    fn letter(&self) -> Option<char> {
        match self {
            Self::Character(s) => {
                let mut chars = s.chars();
                let c = chars.next()?;
                chars.next().is_none().then(|| c.to_ascii_lowercase())
            }
            _ => None,
        }
    }
}

/// Modifier key state for a key combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const CTRL: Self = Self {
        ctrl: true,
        alt: false,
        shift: false,
        meta: false,
    };

    pub const ALT: Self = Self {
        ctrl: false,
        alt: true,
        shift: false,
        meta: false,
    };

    pub const META: Self = Self {
        ctrl: false,
        alt: false,
        shift: false,
        meta: true,
    };

    /// Get the primary modifier for the platform (Cmd on Mac, Ctrl elsewhere).
    pub fn primary(is_mac: bool) -> Self {
        if is_mac { Self::META } else { Self::CTRL }
    }

    /// True if the platform's primary modifier is held.
    pub fn has_primary(&self, is_mac: bool) -> bool {
        if is_mac { self.meta } else { self.ctrl }
    }
}

/// A key combination for triggering an action.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyCombo {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyCombo {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn primary(key: Key, is_mac: bool) -> Self {
        Self {
            key,
            modifiers: Modifiers::primary(is_mac),
        }
    }
}

/// Named editing command produced by a key binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyCommand {
    Bold,
    Italic,
    Underline,
    Code,
    Strikethrough,
    Backspace,
    BackspaceWord,
    BackspaceToStartOfLine,
    Delete,
    DeleteWord,
    SplitBlock,
    Undo,
    Redo,
    /// A command this crate has no handler for, kept by name.
    Other(SmolStr),
}

impl KeyCommand {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::Underline => "underline",
            Self::Code => "code",
            Self::Strikethrough => "strikethrough",
            Self::Backspace => "backspace",
            Self::BackspaceWord => "backspace-word",
            Self::BackspaceToStartOfLine => "backspace-to-start-of-line",
            Self::Delete => "delete",
            Self::DeleteWord => "delete-word",
            Self::SplitBlock => "split-block",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Other(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "bold" => Self::Bold,
            "italic" => Self::Italic,
            "underline" => Self::Underline,
            "code" => Self::Code,
            "strikethrough" => Self::Strikethrough,
            "backspace" => Self::Backspace,
            "backspace-word" => Self::BackspaceWord,
            "backspace-to-start-of-line" => Self::BackspaceToStartOfLine,
            "delete" => Self::Delete,
            "delete-word" => Self::DeleteWord,
            "split-block" => Self::SplitBlock,
            "undo" => Self::Undo,
            "redo" => Self::Redo,
            other => Self::Other(SmolStr::new(other)),
        }
    }
}

impl fmt::Display for KeyCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The default key binding table.
///
/// Returns `None` for keys that should reach the input pipeline (plain
/// characters, navigation, modifiers on their own).
pub fn default_key_binding(combo: &KeyCombo, is_mac: bool) -> Option<KeyCommand> {
    let mods = combo.modifiers;
    match &combo.key {
        Key::Backspace => {
            if is_mac && mods.meta {
                Some(KeyCommand::BackspaceToStartOfLine)
            } else if mods.alt || (!is_mac && mods.ctrl) {
                Some(KeyCommand::BackspaceWord)
            } else {
                Some(KeyCommand::Backspace)
            }
        }
        Key::Delete => {
            if mods.alt || (!is_mac && mods.ctrl) {
                Some(KeyCommand::DeleteWord)
            } else {
                Some(KeyCommand::Delete)
            }
        }
        Key::Enter if !mods.shift => Some(KeyCommand::SplitBlock),
        key if mods.has_primary(is_mac) && !mods.alt => match (key.letter()?, mods.shift) {
            ('b', false) => Some(KeyCommand::Bold),
            ('i', false) => Some(KeyCommand::Italic),
            ('u', false) => Some(KeyCommand::Underline),
            ('j', false) => Some(KeyCommand::Code),
            ('x', true) => Some(KeyCommand::Strikethrough),
            ('z', false) => Some(KeyCommand::Undo),
            ('z', true) => Some(KeyCommand::Redo),
            ('y', false) if !is_mac => Some(KeyCommand::Redo),
            _ => None,
        },
        _ => None,
    }
}
