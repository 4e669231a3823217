//! Selection within a block-structured document.

use crate::model::BlockKey;

/// Anchor and focus points, each a block key plus a char offset.
///
/// The anchor is where the selection started, the focus is where the caret is
/// now. `is_backward` records whether the focus comes before the anchor in
/// document order, which cannot be derived from the keys alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectionState {
    pub anchor_key: BlockKey,
    pub anchor_offset: usize,
    pub focus_key: BlockKey,
    pub focus_offset: usize,
    pub is_backward: bool,
    pub has_focus: bool,
}

impl SelectionState {
    /// Collapsed selection (caret) at `offset` in block `key`.
    pub fn collapsed(key: BlockKey, offset: usize) -> Self {
        Self {
            anchor_key: key.clone(),
            anchor_offset: offset,
            focus_key: key,
            focus_offset: offset,
            is_backward: false,
            has_focus: false,
        }
    }

    /// Forward selection from `start` to `end`.
    pub fn range(
        start_key: BlockKey,
        start_offset: usize,
        end_key: BlockKey,
        end_offset: usize,
    ) -> Self {
        Self {
            anchor_key: start_key,
            anchor_offset: start_offset,
            focus_key: end_key,
            focus_offset: end_offset,
            is_backward: false,
            has_focus: false,
        }
    }

    pub fn with_focus(mut self, has_focus: bool) -> Self {
        self.has_focus = has_focus;
        self
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor_key == self.focus_key && self.anchor_offset == self.focus_offset
    }

    pub fn start_key(&self) -> &BlockKey {
        if self.is_backward {
            &self.focus_key
        } else {
            &self.anchor_key
        }
    }

    pub fn start_offset(&self) -> usize {
        if self.is_backward {
            self.focus_offset
        } else {
            self.anchor_offset
        }
    }

    pub fn end_key(&self) -> &BlockKey {
        if self.is_backward {
            &self.anchor_key
        } else {
            &self.focus_key
        }
    }

    pub fn end_offset(&self) -> usize {
        if self.is_backward {
            self.anchor_offset
        } else {
            self.focus_offset
        }
    }
}
