//! JsEditor - the editor component exposed to JavaScript.

use draftpad_core::{
    Editor, EditorConfig, InlineStyle, KeyCommand, KeyValueStorage, SaveReceipt, convert_to_raw,
    style_map,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::events::{BeforeInputContext, detect_mac, handle_beforeinput, key_combo_from_event};
use crate::storage::open_storage;

/// Payload passed to the `onSaved` callback.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveAck<'a> {
    key: &'a str,
    bytes: usize,
    blocks: usize,
}

/// A mounted editor bound to `localStorage`.
#[wasm_bindgen]
pub struct JsEditor {
    editor: Editor<Box<dyn KeyValueStorage>>,
    on_saved: Option<js_sys::Function>,
    load_error: Option<String>,
    is_mac: bool,
}

#[wasm_bindgen]
impl JsEditor {
    /// Create and mount an editor.
    ///
    /// `config` is an optional object with `storageKey`, `historyLimit` and
    /// `onLoadError` (`"fallback-to-empty"` or `"surface"`).
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsEditor, JsError> {
        let config: EditorConfig = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsError::new(&format!("Invalid config: {e}")))?
        };

        let mut editor = Editor::new(open_storage(), config);
        let load_error = editor.mount().err().map(|e| e.to_string());
        Ok(Self {
            editor,
            on_saved: None,
            load_error,
            is_mac: detect_mac(),
        })
    }

    /// Error from the mount-time load, when the config asked for it.
    #[wasm_bindgen(getter, js_name = loadError)]
    pub fn load_error(&self) -> Option<String> {
        self.load_error.clone()
    }

    /// Offer `chars` to the shortcut handler, inserting them if unclaimed.
    ///
    /// Returns `"handled"` or `"not-handled"`.
    #[wasm_bindgen(js_name = handleBeforeInput)]
    pub fn handle_before_input(&mut self, chars: &str) -> String {
        self.editor.handle_before_input(chars).as_str().to_owned()
    }

    /// Handle a `beforeinput` event. Returns true if the caller should
    /// prevent the default action.
    #[wasm_bindgen(js_name = handleBeforeInputEvent)]
    pub fn handle_before_input_event(&mut self, event: &web_sys::InputEvent) -> bool {
        let ctx = BeforeInputContext::from_event(event);
        handle_beforeinput(&mut self.editor, &ctx).prevents_default()
    }

    /// Handle a `keydown` event through the default key bindings. Returns
    /// true if a command ran.
    #[wasm_bindgen(js_name = handleKeydown)]
    pub fn handle_keydown(&mut self, event: &web_sys::KeyboardEvent) -> bool {
        let combo = key_combo_from_event(event);
        self.editor.handle_key(&combo, self.is_mac).is_handled()
    }

    /// Run a named key command such as `"bold"` or `"split-block"`.
    #[wasm_bindgen(js_name = handleKeyCommand)]
    pub fn handle_key_command(&mut self, command: &str) -> String {
        self.editor
            .handle_key_command(&KeyCommand::from_name(command))
            .as_str()
            .to_owned()
    }

    /// Move the model selection to match the DOM selection.
    ///
    /// Keys are block keys as rendered (see `blockKeys`). Offsets are UTF-16
    /// code units, as `Selection.anchorOffset` reports them. Returns false if
    /// either key is unknown.
    #[wasm_bindgen(js_name = setSelection)]
    pub fn set_selection(
        &mut self,
        anchor_key: &str,
        anchor_offset: usize,
        focus_key: &str,
        focus_offset: usize,
    ) -> bool {
        let content = self.editor.editor_state().current_content();
        let to_chars = |key: &str, offset: usize| {
            content
                .block_for_key(key)
                .map_or(offset, |b| b.char_offset_from_utf16(offset))
        };
        let anchor_offset = to_chars(anchor_key, anchor_offset);
        let focus_offset = to_chars(focus_key, focus_offset);
        self.editor
            .set_selection(anchor_key, anchor_offset, focus_key, focus_offset)
    }

    /// Keys of every block, in document order.
    #[wasm_bindgen(js_name = blockKeys)]
    pub fn block_keys(&self) -> Vec<String> {
        self.editor
            .editor_state()
            .current_content()
            .blocks()
            .iter()
            .map(|b| b.key().to_string())
            .collect()
    }

    /// Save the document. Returns false if the save failed.
    pub fn save(&mut self) -> bool {
        match self.editor.save() {
            Some(receipt) => {
                self.acknowledge(&receipt);
                true
            }
            None => false,
        }
    }

    /// Remove the saved snapshot.
    #[wasm_bindgen(js_name = clearSaved)]
    pub fn clear_saved(&mut self) -> Result<(), JsError> {
        self.editor
            .store_mut()
            .clear()
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Register the save acknowledgment callback, or clear it with `undefined`.
    #[wasm_bindgen(js_name = setOnSaved)]
    pub fn set_on_saved(&mut self, callback: Option<js_sys::Function>) {
        self.on_saved = callback;
    }

    /// Plain text, blocks joined by newlines.
    pub fn text(&self) -> String {
        self.editor.text()
    }

    /// The document in raw snapshot form, as a plain JS object.
    #[wasm_bindgen(js_name = rawContent)]
    pub fn raw_content(&self) -> Result<JsValue, JsError> {
        let raw = convert_to_raw(self.editor.editor_state().current_content());
        raw.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Type tag of the block holding the caret.
    #[wasm_bindgen(js_name = currentBlockType)]
    pub fn current_block_type(&self) -> String {
        let state = self.editor.editor_state();
        state
            .current_content()
            .block_for_key(state.selection().start_key())
            .map(|b| b.block_type().as_str().to_owned())
            .unwrap_or_default()
    }

    /// Inline styles the next typed character would get.
    #[wasm_bindgen(js_name = currentInlineStyle)]
    pub fn current_inline_style(&self) -> Vec<String> {
        self.editor
            .editor_state()
            .current_inline_style()
            .iter()
            .map(InlineStyle::to_string)
            .collect()
    }

    /// CSS for custom inline styles, keyed by style name.
    #[wasm_bindgen(js_name = styleMap)]
    pub fn style_map(&self) -> Result<JsValue, JsError> {
        style_map()
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| JsError::new(&e.to_string()))
    }
}

impl JsEditor {
    fn acknowledge(&self, receipt: &SaveReceipt) {
        let Some(callback) = &self.on_saved else {
            tracing::info!(key = %receipt.key, bytes = receipt.bytes, "document saved");
            return;
        };
        let ack = SaveAck {
            key: &receipt.key,
            bytes: receipt.bytes,
            blocks: receipt.blocks,
        };
        let payload = match ack.serialize(&serde_wasm_bindgen::Serializer::json_compatible()) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(error = %e, "failed to build save acknowledgment");
                return;
            }
        };
        if let Err(e) = callback.call1(&JsValue::NULL, &payload) {
            tracing::warn!(error = ?e, "onSaved callback threw");
        }
    }
}
