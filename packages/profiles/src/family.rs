//! # Profile store — who is this data for
//!
//! [`ProfileStore`] is the single source of truth for the family member list
//! and the active selection. It is constructed once per authenticated session
//! and handed to every screen that scopes data by family member; clones share
//! the same state.
//!
//! ## Lifecycle
//!
//! | Step | Method | Effect |
//! |------|--------|--------|
//! | construct | [`new`](ProfileStore::new) | empty list, selection = [`CURRENT_USER_ID`], not hydrated |
//! | load | [`hydrate`](ProfileStore::hydrate) | reads [`FAMILY_MEMBERS_KEY`] once; absent, unreadable or corrupt data ⇒ empty list |
//! | mutate | [`add_member`](ProfileStore::add_member), [`remove_member`](ProfileStore::remove_member) | hydrate if needed, write-through to storage, then memory, then publish |
//! | select | [`select_member`](ProfileStore::select_member) | memory only |
//! | read | [`selected_member`](ProfileStore::selected_member), [`members`](ProfileStore::members), [`subscribe`](ProfileStore::subscribe) | never fails |
//!
//! ## Write path
//!
//! Mutations hold an async writer lock for the whole read-modify-write, so
//! memory and storage never disagree for a caller that only goes through this
//! type. The new list is written to storage first. If the write fails the list
//! is still applied in memory and published, and
//! [`ProfileError::NotPersisted`] is returned: the session keeps working for
//! the current run without persistence.
//!
//! The current state lives inside a `tokio::sync::watch` sender, which doubles
//! as the publication channel for screens.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::error::ProfileError;
use crate::models::{FamilyMember, FamilySnapshot, NewFamilyMember, CURRENT_USER_ID};
use crate::payload::{decode_members, encode_members, retain_valid, FAMILY_MEMBERS_KEY};
use crate::storage::{KeyValueStorage, StorageError};

/// What [`ProfileStore::hydrate`] found in storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hydration {
    /// A payload was decoded; carries the number of members kept.
    Loaded(usize),
    /// Nothing was stored under the key.
    Empty,
    /// Storage could not be read or held a corrupt payload; started empty.
    Discarded,
    /// The store had already been hydrated; nothing was read.
    AlreadyHydrated,
}

/// Shared handle to the family profile state.
pub struct ProfileStore<S> {
    inner: Arc<Inner<S>>,
}

struct Inner<S> {
    storage: S,
    key: String,
    state: watch::Sender<FamilySnapshot>,
    writer: Mutex<()>,
    sequence: AtomicU64,
}

impl<S> Clone for ProfileStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: KeyValueStorage> ProfileStore<S> {
    /// Create a store persisting under [`FAMILY_MEMBERS_KEY`].
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, FAMILY_MEMBERS_KEY)
    }

    /// Create a store persisting under a custom key.
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        let (state, _) = watch::channel(FamilySnapshot::default());
        Self {
            inner: Arc::new(Inner {
                storage,
                key: key.into(),
                state,
                writer: Mutex::new(()),
                sequence: AtomicU64::new(0),
            }),
        }
    }

    /// Load the persisted member list. Runs once; later calls are no-ops.
    ///
    /// A mutation that arrives first hydrates the store itself, so stored
    /// members are never overwritten by a list that has not seen them.
    pub async fn hydrate(&self) -> Hydration {
        let _guard = self.inner.writer.lock().await;
        if self.is_hydrated() {
            debug!("family store already hydrated");
            return Hydration::AlreadyHydrated;
        }
        self.hydrate_locked().await
    }

    /// Caller must hold the writer lock.
    async fn hydrate_locked(&self) -> Hydration {
        let (members, outcome) = match self.inner.storage.get(&self.inner.key).await {
            Ok(None) => (Vec::new(), Hydration::Empty),
            Ok(Some(raw)) => match decode_members(&raw) {
                Ok(mut members) => {
                    let dropped = retain_valid(&mut members);
                    if dropped > 0 {
                        warn!(dropped, "dropped reserved or duplicate family member ids");
                    }
                    let count = members.len();
                    (members, Hydration::Loaded(count))
                }
                Err(e) => {
                    warn!(error = %e, "discarding persisted family members");
                    (Vec::new(), Hydration::Discarded)
                }
            },
            Err(e) => {
                warn!(error = %e, "family members unreadable, starting empty");
                (Vec::new(), Hydration::Discarded)
            }
        };

        self.inner.state.send_modify(|state| {
            state.members = members;
            state.hydrated = true;
        });
        info!(outcome = ?outcome, "family store hydrated");
        outcome
    }

    async fn ensure_hydrated_locked(&self) {
        if !self.is_hydrated() {
            debug!("hydrating family store ahead of first mutation");
            self.hydrate_locked().await;
        }
    }

    /// Append a member under a freshly generated id.
    pub async fn add_member(&self, member: NewFamilyMember) -> Result<FamilyMember, ProfileError> {
        let _guard = self.inner.writer.lock().await;
        self.ensure_hydrated_locked().await;

        let mut members = self.members();
        let member = member.into_member(self.next_id(&members));
        members.push(member.clone());

        let persisted = self.persist(&members).await;
        self.inner.state.send_modify(|state| state.members = members);

        match persisted {
            Ok(()) => {
                debug!(id = %member.id, "family member added");
                Ok(member)
            }
            Err(source) => {
                warn!(id = %member.id, error = %source, "family member added without persistence");
                Err(ProfileError::NotPersisted {
                    id: member.id,
                    source,
                })
            }
        }
    }

    /// Remove the member with `id`. Returns whether a member was removed.
    ///
    /// The selection is left alone; a dangling selection resolves to the
    /// account holder in [`selected_member`](Self::selected_member).
    pub async fn remove_member(&self, id: &str) -> Result<bool, ProfileError> {
        let _guard = self.inner.writer.lock().await;
        self.ensure_hydrated_locked().await;

        let mut members = self.members();
        let before = members.len();
        members.retain(|m| m.id != id);
        if members.len() == before {
            debug!(id, "no family member to remove");
            return Ok(false);
        }

        let persisted = self.persist(&members).await;
        self.inner.state.send_modify(|state| state.members = members);

        match persisted {
            Ok(()) => {
                debug!(id, "family member removed");
                Ok(true)
            }
            Err(source) => {
                warn!(id, error = %source, "family member removed without persistence");
                Err(ProfileError::NotPersisted {
                    id: id.to_string(),
                    source,
                })
            }
        }
    }

    /// Set the active selection. Any id is accepted, including ones not in the list.
    pub fn select_member(&self, id: impl Into<String>) {
        let id = id.into();
        debug!(id = %id, "family member selected");
        self.inner
            .state
            .send_modify(|state| state.selected_member_id = id);
    }

    /// Resolve the selection, falling back to `current_user`.
    pub fn selected_member(&self, current_user: &FamilyMember) -> FamilyMember {
        self.inner.state.borrow().selected_member(current_user)
    }

    pub fn selected_member_id(&self) -> String {
        self.inner.state.borrow().selected_member_id.clone()
    }

    /// Members in insertion order.
    pub fn members(&self) -> Vec<FamilyMember> {
        self.inner.state.borrow().members.clone()
    }

    pub fn member(&self, id: &str) -> Option<FamilyMember> {
        self.inner
            .state
            .borrow()
            .members
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    pub fn is_hydrated(&self) -> bool {
        self.inner.state.borrow().hydrated
    }

    pub fn snapshot(&self) -> FamilySnapshot {
        self.inner.state.borrow().clone()
    }

    /// Receive every published state change.
    pub fn subscribe(&self) -> watch::Receiver<FamilySnapshot> {
        self.inner.state.subscribe()
    }

    async fn persist(&self, members: &[FamilyMember]) -> Result<(), StorageError> {
        let raw = encode_members(members)?;
        self.inner.storage.set(&self.inner.key, &raw).await
    }

    /// Timestamp-derived id, unique within this store.
    fn next_id(&self, members: &[FamilyMember]) -> String {
        loop {
            let seq = self.inner.sequence.fetch_add(1, Ordering::Relaxed);
            let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
            let id = format!("{stamp}-{seq}");
            if id != CURRENT_USER_ID && !members.iter().any(|m| m.id == id) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStorage;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn account_holder() -> FamilyMember {
        NewFamilyMember::new("Priya", "self", "1984-02-29").into_member(CURRENT_USER_ID.to_string())
    }

    fn asha() -> NewFamilyMember {
        NewFamilyMember::new("Asha", "daughter", "2010-01-01")
    }

    async fn hydrated_store() -> ProfileStore<MemoryStorage> {
        let store = ProfileStore::new(MemoryStorage::new());
        store.hydrate().await;
        store
    }

    #[tokio::test]
    async fn test_initial_state() {
        let store = ProfileStore::new(MemoryStorage::new());
        assert!(store.members().is_empty());
        assert_eq!(store.selected_member_id(), CURRENT_USER_ID);
        assert!(!store.is_hydrated());
    }

    #[tokio::test]
    async fn test_hydrate_without_stored_data() {
        let store = ProfileStore::new(MemoryStorage::new());
        assert_eq!(store.hydrate().await, Hydration::Empty);
        assert!(store.is_hydrated());
        assert!(store.members().is_empty());
    }

    #[tokio::test]
    async fn test_hydrate_twice_is_idempotent() {
        let storage = MemoryStorage::new();
        let seed = ProfileStore::new(storage.clone());
        seed.hydrate().await;
        seed.add_member(asha()).await.unwrap();

        let store = ProfileStore::new(storage);
        assert_eq!(store.hydrate().await, Hydration::Loaded(1));
        let first = store.members();
        assert_eq!(store.hydrate().await, Hydration::AlreadyHydrated);
        assert_eq!(store.members(), first);
    }

    #[tokio::test]
    async fn test_hydrate_treats_corrupt_payload_as_empty() {
        let storage = MemoryStorage::new();
        storage.insert_raw(FAMILY_MEMBERS_KEY, "[{\"id\": 12");

        let store = ProfileStore::new(storage);
        assert_eq!(store.hydrate().await, Hydration::Discarded);
        assert!(store.is_hydrated());
        assert!(store.members().is_empty());
    }

    #[tokio::test]
    async fn test_hydrate_treats_unreadable_storage_as_empty() {
        let storage = MemoryStorage::new();
        storage.insert_raw(FAMILY_MEMBERS_KEY, &encode_members(&[asha().into_member("a".into())]).unwrap());
        storage.fail_reads(true);

        let store = ProfileStore::new(storage);
        assert_eq!(store.hydrate().await, Hydration::Discarded);
        assert!(store.is_hydrated());
        assert!(store.members().is_empty());
    }

    async fn seeded_storage() -> MemoryStorage {
        let storage = MemoryStorage::new();
        let seed = ProfileStore::new(storage.clone());
        seed.hydrate().await;
        seed.add_member(NewFamilyMember::new("Nani", "grandmother", "1942-03-15"))
            .await
            .unwrap();
        seed.add_member(NewFamilyMember::new("Ravi", "husband", "1981-09-09"))
            .await
            .unwrap();
        storage
    }

    #[tokio::test]
    async fn test_add_before_hydrate_keeps_stored_members() {
        let storage = seeded_storage().await;

        let store = ProfileStore::new(storage.clone());
        store.add_member(asha()).await.unwrap();
        assert!(store.is_hydrated());
        assert_eq!(store.hydrate().await, Hydration::AlreadyHydrated);

        let names: Vec<_> = store.members().iter().map(|m| m.display_name.clone()).collect();
        assert_eq!(names, ["Nani", "Ravi", "Asha"]);

        let restarted = ProfileStore::new(storage);
        assert_eq!(restarted.hydrate().await, Hydration::Loaded(3));
        assert_eq!(restarted.members(), store.members());
    }

    #[tokio::test]
    async fn test_remove_before_hydrate_keeps_other_members() {
        let storage = seeded_storage().await;
        let stored = decode_members(&storage.raw(FAMILY_MEMBERS_KEY).unwrap()).unwrap();

        let store = ProfileStore::new(storage.clone());
        assert!(store.remove_member(&stored[0].id).await.unwrap());
        assert_eq!(store.members(), stored[1..].to_vec());

        let restarted = ProfileStore::new(storage);
        restarted.hydrate().await;
        assert_eq!(restarted.members()[0].display_name, "Ravi");
        assert_eq!(restarted.members().len(), 1);
    }

    #[tokio::test]
    async fn test_hydrate_reads_legacy_array_and_drops_sentinel() {
        let storage = MemoryStorage::new();
        storage.insert_raw(
            FAMILY_MEMBERS_KEY,
            r#"[
                {"id":"currentUser","displayName":"Me","relationship":"self","dateOfBirth":"1980-01-01"},
                {"id":"2024-06-01T10:00:00.000Z","displayName":"Nani","relationship":"grandmother","dateOfBirth":"1940-07-07","allergies":["penicillin"]}
            ]"#,
        );

        let store = ProfileStore::new(storage);
        assert_eq!(store.hydrate().await, Hydration::Loaded(1));
        let members = store.members();
        assert_eq!(members[0].display_name, "Nani");
        assert!(members[0].extra.contains_key("allergies"));
    }

    #[tokio::test]
    async fn test_add_member_appends_and_persists() {
        let storage = MemoryStorage::new();
        let store = ProfileStore::new(storage.clone());
        store.hydrate().await;

        let added = store.add_member(asha()).await.unwrap();
        assert!(!added.id.is_empty());
        assert_ne!(added.id, CURRENT_USER_ID);

        let second = store
            .add_member(NewFamilyMember::new("Rohan", "son", "2013-04-20"))
            .await
            .unwrap();
        let names: Vec<_> = store.members().iter().map(|m| m.display_name.clone()).collect();
        assert_eq!(names, ["Asha", "Rohan"]);

        let stored = decode_members(&storage.raw(FAMILY_MEMBERS_KEY).unwrap()).unwrap();
        assert_eq!(stored, store.members());
        assert_eq!(store.member(&second.id), Some(second));
    }

    #[tokio::test]
    async fn test_add_member_degrades_when_storage_rejects_write() {
        let storage = MemoryStorage::new();
        let store = ProfileStore::new(storage.clone());
        store.hydrate().await;
        storage.fail_writes(true);

        let err = store.add_member(asha()).await.unwrap_err();
        assert!(matches!(err, ProfileError::NotPersisted { .. }));

        // Still usable for this run
        assert_eq!(store.members().len(), 1);
        assert_eq!(store.members()[0].id, err.id());
        assert!(storage.raw(FAMILY_MEMBERS_KEY).is_none());
    }

    #[tokio::test]
    async fn test_remove_missing_member_is_noop() {
        let storage = MemoryStorage::new();
        let store = ProfileStore::new(storage.clone());
        store.hydrate().await;
        store.add_member(asha()).await.unwrap();
        let before = storage.raw(FAMILY_MEMBERS_KEY);

        assert!(!store.remove_member("nobody").await.unwrap());
        assert_eq!(store.members().len(), 1);
        assert_eq!(storage.raw(FAMILY_MEMBERS_KEY), before);
    }

    #[tokio::test]
    async fn test_remove_member_degrades_when_storage_rejects_write() {
        let storage = MemoryStorage::new();
        let store = ProfileStore::new(storage.clone());
        store.hydrate().await;
        let added = store.add_member(asha()).await.unwrap();
        storage.fail_writes(true);

        let err = store.remove_member(&added.id).await.unwrap_err();
        assert_eq!(err.id(), added.id);
        assert!(store.members().is_empty());

        let stored = decode_members(&storage.raw(FAMILY_MEMBERS_KEY).unwrap()).unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn test_select_member_accepts_unknown_id() {
        let store = hydrated_store().await;
        store.select_member("not-yet-added");
        assert_eq!(store.selected_member_id(), "not-yet-added");
        assert_eq!(store.selected_member(&account_holder()), account_holder());
    }

    #[tokio::test]
    async fn test_family_member_lifecycle() {
        let store = hydrated_store().await;
        let me = account_holder();

        let added = store.add_member(asha()).await.unwrap();
        assert_eq!(store.members().len(), 1);

        store.select_member(added.id.clone());
        let selected = store.selected_member(&me);
        assert_eq!(selected.display_name, "Asha");
        assert_eq!(selected.relationship, "daughter");
        assert_eq!(selected.date_of_birth, "2010-01-01");

        assert!(store.remove_member(&added.id).await.unwrap());
        // Selection is left dangling and resolves to the account holder
        assert_eq!(store.selected_member_id(), added.id);
        assert_eq!(store.selected_member(&me), me);
    }

    #[tokio::test]
    async fn test_select_current_user_sentinel() {
        let store = hydrated_store().await;
        let added = store.add_member(asha()).await.unwrap();
        store.select_member(added.id);
        store.select_member(CURRENT_USER_ID);
        assert_eq!(store.selected_member(&account_holder()), account_holder());
    }

    #[tokio::test]
    async fn test_subscribers_see_mutations() {
        let store = hydrated_store().await;
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        store.add_member(asha()).await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().members.len(), 1);

        store.select_member("x");
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().selected_member_id, "x");
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = hydrated_store().await;
        let screen_handle = store.clone();
        store.add_member(asha()).await.unwrap();
        assert_eq!(screen_handle.members().len(), 1);
    }

    #[tokio::test]
    async fn test_custom_key() {
        let storage = MemoryStorage::new();
        let store = ProfileStore::with_key(storage.clone(), "family-test");
        store.hydrate().await;
        store.add_member(asha()).await.unwrap();
        assert!(storage.raw("family-test").is_some());
        assert!(storage.raw(FAMILY_MEMBERS_KEY).is_none());
    }

    fn run<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(future)
    }

    proptest! {
        #[test]
        fn prop_add_member_grows_by_one_with_unique_ids(names in prop::collection::vec("[A-Za-z]{1,12}", 1..40)) {
            run(async {
                let store = hydrated_store().await;
                let mut ids = HashSet::new();
                for (i, name) in names.iter().enumerate() {
                    let added = store
                        .add_member(NewFamilyMember::new(name.clone(), "cousin", "2000-01-01"))
                        .await
                        .unwrap();
                    assert_eq!(store.members().len(), i + 1);
                    assert_ne!(added.id, CURRENT_USER_ID);
                    assert!(ids.insert(added.id));
                }
            });
        }

        #[test]
        fn prop_restart_round_trips_members(
            entries in prop::collection::vec(("[A-Za-z ]{1,16}", "[a-z]{3,10}", "[0-9]{4}-[0-9]{2}-[0-9]{2}"), 0..12),
            removals in prop::collection::vec(any::<prop::sample::Index>(), 0..4),
        ) {
            run(async {
                let storage = MemoryStorage::new();
                let store = ProfileStore::new(storage.clone());
                store.hydrate().await;
                for (name, relationship, dob) in &entries {
                    store
                        .add_member(NewFamilyMember::new(name.clone(), relationship.clone(), dob.clone()).with_attribute("notes", name.len() as u64))
                        .await
                        .unwrap();
                }
                for index in &removals {
                    let members = store.members();
                    if members.is_empty() {
                        break;
                    }
                    let id = members[index.index(members.len())].id.clone();
                    store.remove_member(&id).await.unwrap();
                }

                let restarted = ProfileStore::new(storage);
                restarted.hydrate().await;
                assert_eq!(restarted.members(), store.members());
            });
        }
    }
}
