//! Dioxus glue exposing the family profile store and navigation state to
//! screens. Screens themselves live elsewhere.

mod storage;
pub use storage::{make_profile_store, PlatformProfileStore, PlatformStorage};

mod family;
pub use family::{use_family, use_family_store, use_selected_member, FamilyProvider};

mod navigation;
pub use navigation::{use_active_view, use_coordinator, use_navigation_bus, ShellProvider};

mod speech;
pub use speech::{NoLiveSession, SpeechAnnouncer};
