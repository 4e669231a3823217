//! Browser layer for the draftpad editor.
//!
//! - `storage`: `localStorage` as a [`KeyValueStorage`]
//! - `events`: beforeinput and keydown translation
//! - `component`: the `JsEditor` wasm_bindgen wrapper
//!
//! Re-exports `draftpad-core`, so consumers only need this crate.

pub use draftpad_core;
pub use draftpad_core::*;

pub mod component;
pub mod events;
pub mod storage;

pub use component::JsEditor;
pub use events::{
    BeforeInputContext, BeforeInputResult, InputType, handle_beforeinput, is_mac_platform,
    parse_browser_input_type,
};
pub use storage::{LocalStorage, open_storage};

use wasm_bindgen::prelude::*;

/// Install the panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    {
        use tracing::Level;
        use tracing::subscriber::set_global_default;
        use tracing_subscriber::Registry;
        use tracing_subscriber::layer::SubscriberExt;

        console_error_panic_hook::set_once();

        let console_level = if cfg!(debug_assertions) {
            Level::DEBUG
        } else {
            Level::INFO
        };

        let wasm_layer = tracing_wasm::WASMLayer::new(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(console_level)
                .build(),
        );

        let _ = set_global_default(Registry::default().with(wasm_layer));
    }
}
