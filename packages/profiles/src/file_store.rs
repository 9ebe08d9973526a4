//! # Filesystem-backed storage
//!
//! [`FileStorage`] is a [`KeyValueStorage`] implementation that keeps each key
//! in its own file. It is used on desktop and mobile platforms so family
//! profiles survive app restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! └── <key>.json        # e.g. allwayscare-family-members.json
//! ```
//!
//! Writes go to `<key>.json.tmp` first and are renamed into place, so a crash
//! mid-write leaves the previous payload intact.
//!
//! ## Platform data directories
//!
//! Use [`dirs::data_dir()`] to obtain a platform-appropriate base:
//!
//! | Platform | Path |
//! |----------|------|
//! | macOS / iOS | `~/Library/Application Support/allwayscare/` |
//! | Linux | `~/.local/share/allwayscare/` |
//! | Windows | `C:\Users\<user>\AppData\Roaming\allwayscare\` |
//!
//! [`dirs::data_dir()`]: https://docs.rs/dirs

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::storage::{KeyValueStorage, StorageError};

/// Filesystem-backed storage for desktop and mobile persistence.
#[derive(Clone, Debug)]
pub struct FileStorage {
    base: PathBuf,
}

impl FileStorage {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    fn key_path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect();
        self.base.join(format!("{name}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.key_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.base)?;
        let path = self.key_path(key);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewFamilyMember, ProfileStore};

    #[tokio::test]
    async fn test_missing_file_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));
        assert_eq!(storage.get("absent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_set_creates_directory_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("allwayscare"));

        storage.set("profile", "one").await.unwrap();
        storage.set("profile", "two").await.unwrap();

        assert_eq!(storage.get("profile").await.unwrap().as_deref(), Some("two"));
        assert!(dir.path().join("allwayscare/profile.json").exists());
        assert!(!dir.path().join("allwayscare/profile.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_key_separators_stay_inside_base() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().to_path_buf());
        storage.set("../escape", "x").await.unwrap();
        assert!(dir.path().join(".._escape.json").exists());
    }

    #[tokio::test]
    async fn test_profile_store_survives_restart() {
        let dir = tempfile::tempdir().unwrap();

        let store = ProfileStore::new(FileStorage::new(dir.path().to_path_buf()));
        store.hydrate().await;
        store
            .add_member(NewFamilyMember::new("Meera", "mother", "1962-08-14"))
            .await
            .unwrap();

        // Re-open from the same directory
        let reopened = ProfileStore::new(FileStorage::new(dir.path().to_path_buf()));
        reopened.hydrate().await;

        let members = reopened.members();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].display_name, "Meera");
        assert_eq!(members, store.members());
    }
}
