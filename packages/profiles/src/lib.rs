//! Family profile state for the AllWaysCare client shell.
//!
//! [`ProfileStore`] owns the family member list and the active selection and
//! persists the list through a [`KeyValueStorage`] backend.

pub mod error;
pub mod family;
pub mod models;
pub mod payload;
pub mod storage;

mod memory;
pub use memory::MemoryStorage;

mod file_store;
pub use file_store::FileStorage;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local_storage::LocalStorage;

pub use error::ProfileError;
pub use family::{Hydration, ProfileStore};
pub use models::{FamilyMember, FamilySnapshot, NewFamilyMember, CURRENT_USER_ID};
pub use payload::FAMILY_MEMBERS_KEY;
pub use storage::{KeyValueStorage, StorageError};
