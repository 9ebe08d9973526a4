//! # Browser localStorage — web-side persistence
//!
//! [`LocalStorage`] is the [`KeyValueStorage`] implementation used on the
//! **web platform**. It reads and writes `window.localStorage` through
//! `web-sys`, so the family list written by earlier versions of the web client
//! under the same key is picked up unchanged.
//!
//! ## Error handling
//!
//! A missing `window` or a disabled storage area (private browsing, policy)
//! maps to [`StorageError::Unavailable`]. A rejected `setItem` (quota
//! exceeded) maps to [`StorageError::Write`]. The profile store turns both
//! into degraded, in-memory-only operation.

use wasm_bindgen::JsValue;
use web_sys::Storage;

use crate::storage::{KeyValueStorage, StorageError};

/// `window.localStorage`-backed storage for the web platform.
///
/// Zero-size and `Clone`: the `Storage` handle is looked up on every call
/// because `web_sys::Storage` is not `Send`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn area() -> Result<Storage, StorageError> {
        let window = web_sys::window()
            .ok_or_else(|| StorageError::Unavailable("no window".to_string()))?;
        window
            .local_storage()
            .map_err(|e| StorageError::Unavailable(describe(&e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".to_string()))
    }
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

impl KeyValueStorage for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::area()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(describe(&e)))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::area()?
            .set_item(key, value)
            .map_err(|e| StorageError::Write(describe(&e)))
    }
}
