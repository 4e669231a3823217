//! Document model: blocks, block types, inline styles and per-character metadata.
//!
//! A [`ContentState`] is an immutable value. Every edit in [`crate::modifier`]
//! builds a new one; [`crate::EditorState`] keeps the old ones behind `Arc`
//! as undo steps.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smol_str::SmolStr;

use crate::selection::SelectionState;

/// Identifier of a block, unique within one document.
pub type BlockKey = SmolStr;

/// Identifier of an entity in the document's entity map.
pub type EntityKey = u32;

/// The set of inline styles applied to one character.
pub type StyleSet = BTreeSet<InlineStyle>;

/// Paragraph-level type of a block.
///
/// Unknown tags survive a snapshot round-trip through [`BlockType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum BlockType {
    #[default]
    Unstyled,
    Paragraph,
    HeaderOne,
    HeaderTwo,
    HeaderThree,
    HeaderFour,
    HeaderFive,
    HeaderSix,
    UnorderedListItem,
    OrderedListItem,
    Blockquote,
    CodeBlock,
    Atomic,
    Other(SmolStr),
}

impl BlockType {
    /// The tag used in serialized snapshots.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Unstyled => "unstyled",
            Self::Paragraph => "paragraph",
            Self::HeaderOne => "header-one",
            Self::HeaderTwo => "header-two",
            Self::HeaderThree => "header-three",
            Self::HeaderFour => "header-four",
            Self::HeaderFive => "header-five",
            Self::HeaderSix => "header-six",
            Self::UnorderedListItem => "unordered-list-item",
            Self::OrderedListItem => "ordered-list-item",
            Self::Blockquote => "blockquote",
            Self::CodeBlock => "code-block",
            Self::Atomic => "atomic",
            Self::Other(tag) => tag,
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "unstyled" => Self::Unstyled,
            "paragraph" => Self::Paragraph,
            "header-one" => Self::HeaderOne,
            "header-two" => Self::HeaderTwo,
            "header-three" => Self::HeaderThree,
            "header-four" => Self::HeaderFour,
            "header-five" => Self::HeaderFive,
            "header-six" => Self::HeaderSix,
            "unordered-list-item" => Self::UnorderedListItem,
            "ordered-list-item" => Self::OrderedListItem,
            "blockquote" => Self::Blockquote,
            "code-block" => Self::CodeBlock,
            "atomic" => Self::Atomic,
            other => Self::Other(SmolStr::new(other)),
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A character-range annotation.
///
/// The built-in styles have dedicated variants; anything else (such as the
/// `RED` colour style) is carried by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InlineStyle {
    Bold,
    Italic,
    Underline,
    Code,
    Strikethrough,
    Custom(SmolStr),
}

impl InlineStyle {
    /// Custom red text colour, the target of the `**` shortcut.
    pub const RED: InlineStyle = InlineStyle::Custom(SmolStr::new_static("RED"));

    pub fn as_str(&self) -> &str {
        match self {
            Self::Bold => "BOLD",
            Self::Italic => "ITALIC",
            Self::Underline => "UNDERLINE",
            Self::Code => "CODE",
            Self::Strikethrough => "STRIKETHROUGH",
            Self::Custom(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "BOLD" => Self::Bold,
            "ITALIC" => Self::Italic,
            "UNDERLINE" => Self::Underline,
            "CODE" => Self::Code,
            "STRIKETHROUGH" => Self::Strikethrough,
            other => Self::Custom(SmolStr::new(other)),
        }
    }
}

impl fmt::Display for InlineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CSS declarations for custom inline styles.
///
/// Built-in styles are rendered by the host; only named styles need a map.
pub fn style_map() -> BTreeMap<SmolStr, &'static str> {
    let mut map = BTreeMap::new();
    map.insert(SmolStr::new_static("RED"), "color: red");
    map
}

/// Style and entity attached to a single character.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharacterMetadata {
    pub style: StyleSet,
    pub entity: Option<EntityKey>,
}

impl CharacterMetadata {
    pub fn new(style: StyleSet, entity: Option<EntityKey>) -> Self {
        Self { style, entity }
    }

    pub fn has_style(&self, style: &InlineStyle) -> bool {
        self.style.contains(style)
    }
}

/// How an entity reacts to edits inside its range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mutability {
    #[default]
    Mutable,
    Immutable,
    Segmented,
}

/// Opaque annotation (link, mention, ...) referenced from character metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub entity_type: SmolStr,
    pub mutability: Mutability,
    pub data: Map<String, Value>,
}

static NEXT_KEY: AtomicU64 = AtomicU64::new(0);

/// Generate a fresh block key.
///
/// Keys are short base-36 strings. Uniqueness inside a document is checked
/// by [`ContentState::fresh_key`], since restored documents bring their own keys.
pub fn generate_block_key() -> BlockKey {
    const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    // Offset so that keys start out five characters long.
    let mut n = NEXT_KEY.fetch_add(1, Ordering::Relaxed) + 36u64.pow(4);
    let mut digits = Vec::with_capacity(8);
    while n > 0 {
        digits.push(ALPHABET[(n % 36) as usize] as char);
        n /= 36;
    }
    digits.into_iter().rev().collect()
}

/// One paragraph-level unit of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentBlock {
    key: BlockKey,
    block_type: BlockType,
    text: String,
    chars: Vec<CharacterMetadata>,
    depth: u32,
    data: Map<String, Value>,
}

impl ContentBlock {
    /// An empty block of the given type.
    pub fn new(key: BlockKey, block_type: BlockType) -> Self {
        Self {
            key,
            block_type,
            text: String::new(),
            chars: Vec::new(),
            depth: 0,
            data: Map::new(),
        }
    }

    /// A block holding unstyled text.
    pub fn with_text(key: BlockKey, block_type: BlockType, text: impl Into<String>) -> Self {
        let text = text.into();
        let chars = vec![CharacterMetadata::default(); text.chars().count()];
        Self {
            key,
            block_type,
            text,
            chars,
            depth: 0,
            data: Map::new(),
        }
    }

    /// Build a block from text plus one metadata entry per char.
    ///
    /// Returns `None` if the metadata length does not match the char count.
    pub fn from_parts(
        key: BlockKey,
        block_type: BlockType,
        text: String,
        chars: Vec<CharacterMetadata>,
        depth: u32,
        data: Map<String, Value>,
    ) -> Option<Self> {
        if text.chars().count() != chars.len() {
            return None;
        }
        Some(Self {
            key,
            block_type,
            text,
            chars,
            depth,
            data,
        })
    }

    pub fn key(&self) -> &BlockKey {
        &self.key
    }

    pub fn block_type(&self) -> &BlockType {
        &self.block_type
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in chars.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn char_metadata(&self) -> &[CharacterMetadata] {
        &self.chars
    }

    /// Styles of the char at `offset`, empty when out of bounds.
    pub fn style_at(&self, offset: usize) -> StyleSet {
        self.chars
            .get(offset)
            .map(|c| c.style.clone())
            .unwrap_or_default()
    }

    /// Char offset for a UTF-16 offset, as a DOM selection reports it.
    ///
    /// An offset inside a surrogate pair rounds up to the next char. Offsets
    /// past the end clamp to the block length.
    pub fn char_offset_from_utf16(&self, utf16_offset: usize) -> usize {
        let mut units = 0;
        for (i, c) in self.text.chars().enumerate() {
            if units >= utf16_offset {
                return i;
            }
            units += c.len_utf16();
        }
        self.len()
    }

    pub(crate) fn set_type(&mut self, block_type: BlockType) {
        self.block_type = block_type;
    }

    pub(crate) fn set_depth(&mut self, depth: u32) {
        self.depth = depth;
    }

    pub(crate) fn set_key(&mut self, key: BlockKey) {
        self.key = key;
    }

    pub(crate) fn clear_data(&mut self) {
        self.data = Map::new();
    }

    pub(crate) fn chars_mut(&mut self) -> &mut [CharacterMetadata] {
        &mut self.chars
    }

    /// Replace chars `start..end` with `text`, every new char getting `meta`.
    pub(crate) fn splice(
        &mut self,
        start: usize,
        end: usize,
        text: &str,
        meta: &CharacterMetadata,
    ) {
        let byte_start = byte_offset(&self.text, start);
        let byte_end = byte_offset(&self.text, end);
        self.text.replace_range(byte_start..byte_end, text);
        let inserted = std::iter::repeat_n(meta.clone(), text.chars().count());
        self.chars.splice(start..end, inserted);
    }

    /// Cut everything from `offset` on, returning the removed text and metadata.
    pub(crate) fn split_off(&mut self, offset: usize) -> (String, Vec<CharacterMetadata>) {
        let byte = byte_offset(&self.text, offset);
        let tail_text = self.text.split_off(byte);
        let tail_chars = self.chars.split_off(offset.min(self.chars.len()));
        (tail_text, tail_chars)
    }

    pub(crate) fn append(&mut self, text: &str, chars: &[CharacterMetadata]) {
        self.text.push_str(text);
        self.chars.extend_from_slice(chars);
    }
}

/// Byte index of the char at `char_offset`, clamped to the end of `text`.
pub(crate) fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// The whole document: ordered blocks plus the entity map.
///
/// There is always at least one block.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentState {
    blocks: Vec<ContentBlock>,
    entity_map: BTreeMap<EntityKey, Entity>,
    selection_before: SelectionState,
    selection_after: SelectionState,
}

impl ContentState {
    /// A document with a single empty unstyled block.
    pub fn create_empty() -> Self {
        Self::from_blocks(Vec::new())
    }

    /// Build a document from plain text, one unstyled block per line.
    pub fn from_text(text: &str) -> Self {
        let blocks = text
            .split('\n')
            .map(|line| ContentBlock::with_text(generate_block_key(), BlockType::Unstyled, line))
            .collect();
        Self::from_blocks(blocks)
    }

    pub fn from_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self::from_parts(blocks, BTreeMap::new())
    }

    /// Build a document from blocks and an entity map.
    ///
    /// An empty block list becomes a single empty block.
    pub fn from_parts(
        mut blocks: Vec<ContentBlock>,
        entity_map: BTreeMap<EntityKey, Entity>,
    ) -> Self {
        if blocks.is_empty() {
            blocks.push(ContentBlock::new(generate_block_key(), BlockType::Unstyled));
        }
        let selection = SelectionState::collapsed(blocks[0].key().clone(), 0);
        Self {
            blocks,
            entity_map,
            selection_before: selection.clone(),
            selection_after: selection,
        }
    }

    pub fn blocks(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn block_for_key(&self, key: &str) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| b.key() == key)
    }

    pub fn block_index(&self, key: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.key() == key)
    }

    pub fn block_before(&self, key: &str) -> Option<&ContentBlock> {
        let index = self.block_index(key)?;
        index.checked_sub(1).map(|i| &self.blocks[i])
    }

    pub fn block_after(&self, key: &str) -> Option<&ContentBlock> {
        let index = self.block_index(key)?;
        self.blocks.get(index + 1)
    }

    pub fn first_block(&self) -> &ContentBlock {
        &self.blocks[0]
    }

    pub fn last_block(&self) -> &ContentBlock {
        &self.blocks[self.blocks.len() - 1]
    }

    /// All block texts joined by `delimiter`.
    pub fn plain_text(&self, delimiter: &str) -> String {
        self.blocks
            .iter()
            .map(|b| b.text())
            .collect::<Vec<_>>()
            .join(delimiter)
    }

    /// True if any block holds text (a lone empty block does not count).
    pub fn has_text(&self) -> bool {
        self.blocks.len() > 1 || !self.blocks[0].is_empty()
    }

    pub fn entity_map(&self) -> &BTreeMap<EntityKey, Entity> {
        &self.entity_map
    }

    pub fn entity(&self, key: EntityKey) -> Option<&Entity> {
        self.entity_map.get(&key)
    }

    /// Add an entity, returning its key.
    pub fn create_entity(&mut self, entity: Entity) -> EntityKey {
        let key = self
            .entity_map
            .keys()
            .next_back()
            .map(|k| k + 1)
            .unwrap_or(0);
        self.entity_map.insert(key, entity);
        key
    }

    pub fn selection_before(&self) -> &SelectionState {
        &self.selection_before
    }

    pub fn selection_after(&self) -> &SelectionState {
        &self.selection_after
    }

    pub(crate) fn set_selection_before(&mut self, selection: SelectionState) {
        self.selection_before = selection;
    }

    pub(crate) fn set_selection_after(&mut self, selection: SelectionState) {
        self.selection_after = selection;
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<ContentBlock> {
        &mut self.blocks
    }

    /// A block key not used by any block in this document.
    pub(crate) fn fresh_key(&self) -> BlockKey {
        loop {
            let key = generate_block_key();
            if self.block_for_key(&key).is_none() {
                return key;
            }
        }
    }

    /// Compare blocks and entities, ignoring selection bookkeeping.
    pub fn same_content(&self, other: &ContentState) -> bool {
        self.blocks == other.blocks && self.entity_map == other.entity_map
    }
}

impl Default for ContentState {
    fn default() -> Self {
        Self::create_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_type_tags_round_trip() {
        for ty in [
            BlockType::Unstyled,
            BlockType::HeaderOne,
            BlockType::HeaderSix,
            BlockType::CodeBlock,
            BlockType::UnorderedListItem,
            BlockType::Other("figure".into()),
        ] {
            assert_eq!(BlockType::from_tag(ty.as_str()), ty);
        }
    }

    #[test]
    fn custom_style_keeps_its_name() {
        assert_eq!(InlineStyle::from_name("RED"), InlineStyle::RED);
        assert_eq!(InlineStyle::RED.as_str(), "RED");
        assert_eq!(InlineStyle::from_name("BOLD"), InlineStyle::Bold);
        assert_eq!(style_map().get("RED"), Some(&"color: red"));
    }

    #[test]
    fn generated_keys_are_distinct() {
        let a = generate_block_key();
        let b = generate_block_key();
        assert_ne!(a, b);
        assert!(a.len() >= 5);
    }

    #[test]
    fn splice_keeps_metadata_aligned() {
        let mut block = ContentBlock::with_text("a".into(), BlockType::Unstyled, "héllo");
        let bold = CharacterMetadata::new(StyleSet::from([InlineStyle::Bold]), None);
        block.splice(1, 3, "ÉÉÉ", &bold);
        assert_eq!(block.text(), "hÉÉÉlo");
        assert_eq!(block.len(), 6);
        assert!(block.style_at(2).contains(&InlineStyle::Bold));
        assert!(block.style_at(4).is_empty());
    }

    #[test]
    fn utf16_offsets_map_to_chars() {
        let block = ContentBlock::with_text("a".into(), BlockType::Unstyled, "a😀b");
        assert_eq!(block.char_offset_from_utf16(0), 0);
        assert_eq!(block.char_offset_from_utf16(1), 1);
        assert_eq!(block.char_offset_from_utf16(3), 2);
        assert_eq!(block.char_offset_from_utf16(4), 3);
        assert_eq!(block.char_offset_from_utf16(40), 3);
    }

    #[test]
    fn from_parts_rejects_misaligned_metadata() {
        let block = ContentBlock::from_parts(
            "a".into(),
            BlockType::Unstyled,
            "ab".into(),
            vec![CharacterMetadata::default()],
            0,
            Map::new(),
        );
        assert!(block.is_none());
    }

    #[test]
    fn empty_document_has_one_block() {
        let content = ContentState::create_empty();
        assert_eq!(content.blocks().len(), 1);
        assert!(!content.has_text());
        assert_eq!(content.selection_after().anchor_key, *content.first_block().key());

        let content = ContentState::from_text("one\ntwo");
        assert_eq!(content.blocks().len(), 2);
        assert_eq!(content.plain_text("\n"), "one\ntwo");
        assert_eq!(content.block_before(content.last_block().key()), Some(content.first_block()));
    }

    #[test]
    fn entity_keys_are_sequential() {
        let mut content = ContentState::create_empty();
        let entity = Entity {
            entity_type: "LINK".into(),
            mutability: Mutability::Mutable,
            data: Map::new(),
        };
        assert_eq!(content.create_entity(entity.clone()), 0);
        assert_eq!(content.create_entity(entity), 1);
    }
}
