//! Shared profile store constructor for all platforms.
//!
//! Returns a [`profiles::ProfileStore`] backed by the appropriate storage:
//! - **Web** (WASM + `web` feature): `window.localStorage` via `profiles::LocalStorage`
//! - **Desktop / Mobile** (native): filesystem via [`profiles::FileStorage`]

use profiles::ProfileStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type PlatformStorage = profiles::LocalStorage;
#[cfg(not(all(target_arch = "wasm32", feature = "web")))]
pub type PlatformStorage = profiles::FileStorage;

pub type PlatformProfileStore = ProfileStore<PlatformStorage>;

/// Create a platform-appropriate profile store persisting under `key`.
///
/// On native platforms the data lives in `<data_dir>/allwayscare/<key>.json`.
pub fn make_profile_store(key: &str) -> PlatformProfileStore {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        ProfileStore::with_key(profiles::LocalStorage::new(), key)
    }
    #[cfg(not(all(target_arch = "wasm32", feature = "web")))]
    {
        ProfileStore::with_key(profiles::FileStorage::new(data_dir().join("allwayscare")), key)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn data_dir() -> std::path::PathBuf {
    dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."))
}

// wasm without the `web` feature has no platform data directory
#[cfg(all(target_arch = "wasm32", not(feature = "web")))]
fn data_dir() -> std::path::PathBuf {
    std::path::PathBuf::from(".")
}
