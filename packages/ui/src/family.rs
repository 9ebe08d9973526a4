//! Family profile context and hooks for screens.

use dioxus::prelude::*;
use profiles::{FamilyMember, FamilySnapshot};
use shell::ShellConfig;

use crate::storage::{make_profile_store, PlatformProfileStore};

/// Get the shared profile store handle (for add/remove/select).
pub fn use_family_store() -> PlatformProfileStore {
    use_context::<PlatformProfileStore>()
}

/// Get the family state.
/// Returns a signal that updates on every store change.
pub fn use_family() -> Signal<FamilySnapshot> {
    use_context::<Signal<FamilySnapshot>>()
}

/// Resolve the member the current screen should scope its data to.
pub fn use_selected_member(current_user: &FamilyMember) -> FamilyMember {
    use_family().read().selected_member(current_user)
}

/// Provider component that owns the profile store for one login.
/// Mount it inside the authenticated part of the app; it hydrates on mount.
#[component]
pub fn FamilyProvider(children: Element) -> Element {
    let key = use_hook(|| {
        try_consume_context::<ShellConfig>()
            .unwrap_or_default()
            .storage
            .family_members_key
    });
    let store = use_context_provider(|| make_profile_store(&key));
    let mut family = use_context_provider(|| Signal::new(store.snapshot()));

    // Hydrate, then mirror every store publication into the signal
    use_future(move || {
        let store = store.clone();
        async move {
            store.hydrate().await;
            let mut rx = store.subscribe();
            family.set(rx.borrow_and_update().clone());
            while rx.changed().await.is_ok() {
                family.set(rx.borrow_and_update().clone());
            }
        }
    });

    rsx! {
        {children}
    }
}
