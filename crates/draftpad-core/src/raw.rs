//! Raw snapshot form of a document.
//!
//! This is the JSON shape written to storage. Offsets and lengths in the
//! range lists count UTF-16 code units, matching what a JavaScript host sees
//! for the same text; everything else in this crate counts chars.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smol_str::SmolStr;

use crate::error::SnapshotError;
use crate::model::{
    BlockType, CharacterMetadata, ContentBlock, ContentState, Entity, EntityKey, InlineStyle,
    Mutability, generate_block_key,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RawDraftContentState {
    #[serde(default)]
    pub blocks: Vec<RawDraftContentBlock>,
    #[serde(default)]
    pub entity_map: BTreeMap<String, RawDraftEntity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDraftContentBlock {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub text: String,
    #[serde(rename = "type", default = "default_block_type")]
    pub block_type: String,
    #[serde(default)]
    pub depth: u32,
    #[serde(default)]
    pub inline_style_ranges: Vec<RawInlineStyleRange>,
    #[serde(default)]
    pub entity_ranges: Vec<RawEntityRange>,
    #[serde(default)]
    pub data: Map<String, Value>,
}

fn default_block_type() -> String {
    BlockType::Unstyled.as_str().to_owned()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInlineStyleRange {
    pub offset: usize,
    pub length: usize,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntityRange {
    pub offset: usize,
    pub length: usize,
    pub key: EntityKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDraftEntity {
    #[serde(rename = "type")]
    pub entity_type: String,
    #[serde(default)]
    pub mutability: Mutability,
    #[serde(default)]
    pub data: Map<String, Value>,
}

/// UTF-16 start offset of every char, followed by the total length.
fn utf16_starts(text: &str) -> Vec<usize> {
    let mut starts = Vec::with_capacity(text.len() + 1);
    let mut at = 0;
    for c in text.chars() {
        starts.push(at);
        at += c.len_utf16();
    }
    starts.push(at);
    starts
}

/// Maximal runs of consecutive chars for which `pick` returns the same `Some`.
fn runs<T: PartialEq>(
    len: usize,
    mut pick: impl FnMut(usize) -> Option<T>,
) -> Vec<(usize, usize, T)> {
    let mut out = Vec::new();
    let mut current: Option<(usize, T)> = None;
    for i in 0..=len {
        let value = if i < len { pick(i) } else { None };
        let continues = matches!((&current, &value), (Some((_, a)), Some(b)) if a == b);
        if continues {
            continue;
        }
        if let Some((start, v)) = current.take() {
            out.push((start, i, v));
        }
        current = value.map(|v| (i, v));
    }
    out
}

/// Convert a document into its raw snapshot form.
pub fn convert_to_raw(content: &ContentState) -> RawDraftContentState {
    let blocks = content.blocks().iter().map(block_to_raw).collect();
    let entity_map = content
        .entity_map()
        .iter()
        .map(|(key, entity)| {
            let raw = RawDraftEntity {
                entity_type: entity.entity_type.to_string(),
                mutability: entity.mutability,
                data: entity.data.clone(),
            };
            (key.to_string(), raw)
        })
        .collect();
    RawDraftContentState { blocks, entity_map }
}

fn block_to_raw(block: &ContentBlock) -> RawDraftContentBlock {
    let chars = block.char_metadata();
    let starts = &utf16_starts(block.text());

    // Styles in order of first appearance.
    let mut styles: Vec<&InlineStyle> = Vec::new();
    for meta in chars {
        for style in &meta.style {
            if !styles.contains(&style) {
                styles.push(style);
            }
        }
    }

    let inline_style_ranges = styles
        .into_iter()
        .flat_map(|style| {
            runs(chars.len(), |i| chars[i].has_style(style).then_some(()))
                .into_iter()
                .map(move |(start, end, ())| RawInlineStyleRange {
                    offset: starts[start],
                    length: starts[end] - starts[start],
                    style: style.as_str().to_owned(),
                })
        })
        .collect();

    let entity_ranges = runs(chars.len(), |i| chars[i].entity)
        .into_iter()
        .map(|(start, end, key)| RawEntityRange {
            offset: starts[start],
            length: starts[end] - starts[start],
            key,
        })
        .collect();

    RawDraftContentBlock {
        key: block.key().to_string(),
        text: block.text().to_owned(),
        block_type: block.block_type().as_str().to_owned(),
        depth: block.depth(),
        inline_style_ranges,
        entity_ranges,
        data: block.data().clone(),
    }
}

/// Rebuild a document from its raw snapshot form.
///
/// Blocks with a missing key get a fresh one. An empty block list yields an
/// empty document.
pub fn convert_from_raw(raw: &RawDraftContentState) -> Result<ContentState, SnapshotError> {
    let mut entity_map = BTreeMap::new();
    for (key, entity) in &raw.entity_map {
        let parsed: EntityKey = key
            .parse()
            .map_err(|_| SnapshotError::InvalidEntityKey(key.clone()))?;
        entity_map.insert(
            parsed,
            Entity {
                entity_type: SmolStr::new(&entity.entity_type),
                mutability: entity.mutability,
                data: entity.data.clone(),
            },
        );
    }

    let mut seen = HashSet::new();
    let mut blocks = Vec::with_capacity(raw.blocks.len());
    for raw_block in &raw.blocks {
        let key = if raw_block.key.is_empty() {
            loop {
                let key = generate_block_key();
                if !seen.contains(&key) && !raw.blocks.iter().any(|b| b.key == key.as_str()) {
                    break key;
                }
            }
        } else {
            SmolStr::new(&raw_block.key)
        };
        if !seen.insert(key.clone()) {
            return Err(SnapshotError::DuplicateKey(key));
        }
        blocks.push(block_from_raw(key, raw_block, &entity_map)?);
    }

    Ok(ContentState::from_parts(blocks, entity_map))
}

fn block_from_raw(
    key: SmolStr,
    raw: &RawDraftContentBlock,
    entity_map: &BTreeMap<EntityKey, Entity>,
) -> Result<ContentBlock, SnapshotError> {
    let starts = utf16_starts(&raw.text);
    let char_count = starts.len() - 1;
    let utf16_len = starts[char_count];
    let mut chars = vec![CharacterMetadata::default(); char_count];

    // Chars whose first code unit falls inside the range.
    let covered = |offset: usize, length: usize| -> Result<std::ops::Range<usize>, SnapshotError> {
        let end = offset
            .checked_add(length)
            .filter(|end| *end <= utf16_len)
            .ok_or_else(|| SnapshotError::RangeOutOfBounds {
                block: key.clone(),
                offset,
                length,
            })?;
        let first = starts[..char_count].partition_point(|s| *s < offset);
        let last = starts[..char_count].partition_point(|s| *s < end);
        Ok(first..last)
    };

    for range in &raw.inline_style_ranges {
        let style = InlineStyle::from_name(&range.style);
        for meta in &mut chars[covered(range.offset, range.length)?] {
            meta.style.insert(style.clone());
        }
    }

    for range in &raw.entity_ranges {
        if !entity_map.contains_key(&range.key) {
            return Err(SnapshotError::UnknownEntity {
                block: key.clone(),
                entity: range.key,
            });
        }
        for meta in &mut chars[covered(range.offset, range.length)?] {
            meta.entity = Some(range.key);
        }
    }

    let block_type = BlockType::from_tag(&raw.block_type);
    // Lengths agree by construction.
    ContentBlock::from_parts(
        key.clone(),
        block_type,
        raw.text.clone(),
        chars,
        raw.depth,
        raw.data.clone(),
    )
    .ok_or(SnapshotError::RangeOutOfBounds {
        block: key,
        offset: 0,
        length: utf16_len,
    })
}
