//! `localStorage` persistence for the editor.

use draftpad_core::{KeyValueStorage, MemoryStorage, StorageError};
use wasm_bindgen::{JsCast, JsValue};

/// The window's `localStorage`.
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    /// Open `window.localStorage`.
    ///
    /// Fails when there is no window (workers) or the browser refuses access
    /// (disabled storage, some private browsing modes).
    pub fn open() -> Result<Self, StorageError> {
        let window =
            web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
        let inner = window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(js_message(&e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is null".into()))?;
        Ok(Self { inner })
    }
}

impl KeyValueStorage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key).map_err(classify_js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set_item(key, value).map_err(classify_js_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.inner.remove_item(key).map_err(classify_js_error)
    }
}

/// `localStorage` if available, otherwise in-memory storage for the session.
pub fn open_storage() -> Box<dyn KeyValueStorage> {
    match LocalStorage::open() {
        Ok(storage) => Box::new(storage),
        Err(e) => {
            tracing::warn!(error = %e, "localStorage unavailable, edits will not outlive the page");
            Box::new(MemoryStorage::new())
        }
    }
}

fn classify_js_error(err: JsValue) -> StorageError {
    match err.dyn_ref::<web_sys::DomException>() {
        Some(dom) => classify_dom_error(&dom.name(), dom.message()),
        None => StorageError::Backend(js_message(&err)),
    }
}

/// Map a DOMException name to a storage error.
pub(crate) fn classify_dom_error(name: &str, message: String) -> StorageError {
    match name {
        // Firefox used its own name for the same condition.
        "QuotaExceededError" | "NS_ERROR_DOM_QUOTA_REACHED" => StorageError::QuotaExceeded(message),
        "SecurityError" => StorageError::Unavailable(message),
        _ => StorageError::Backend(format!("{name}: {message}")),
    }
}

fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{value:?}"))
}
