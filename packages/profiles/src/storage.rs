//! # Durable key/value storage
//!
//! [`KeyValueStorage`] is the seam between [`crate::ProfileStore`] and whatever
//! keeps data across restarts. Implementations live in sibling modules:
//!
//! | Backend | Platform | Module |
//! |---------|----------|--------|
//! | [`crate::MemoryStorage`] | tests, fallback | `memory` |
//! | [`crate::FileStorage`] | desktop / mobile | `file_store` |
//! | `LocalStorage` | web (`web` feature) | `local_storage` |
//!
//! Reads and writes report failures as [`StorageError`]. The profile store
//! decides how to degrade; backends never swallow write errors.

use thiserror::Error;

/// Errors reported by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backend cannot be reached at all (private browsing, no window).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The backend refused the write (quota exceeded, read-only medium).
    #[error("storage write rejected: {0}")]
    Write(String),

    #[error("could not encode value for storage: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Async string key/value storage.
pub trait KeyValueStorage {
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>, StorageError>>;
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = Result<(), StorageError>>;
}
