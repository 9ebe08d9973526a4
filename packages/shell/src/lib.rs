//! # Shell crate — navigation and session coordination
//!
//! Couples the live voice session, UI clicks and the family profile store to
//! the screen the client shows.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`view`] | Closed set of screens, id parsing with dashboard fallback |
//! | [`bus`] | Navigation bus carrying view requests between decoupled components |
//! | [`coordinator`] | Active view, announcements, live session dispatch |
//! | [`collaborators`] | Live session and speech interfaces consumed by the coordinator |
//! | [`accessibility`] | Visual cue selection for listening and live states |
//! | [`session`] | Per-login wiring of profiles, bus and coordinator |
//! | [`config`] | `allwayscare.toml` |

pub mod accessibility;
pub mod bus;
pub mod collaborators;
pub mod config;
pub mod coordinator;
pub mod session;
pub mod view;

#[cfg(test)]
mod testing;

pub use accessibility::{visual_cue, AccessibilitySettings, Persona, VisualCue};
pub use bus::{NavSubscription, NavigationBus};
pub use collaborators::{Announcer, LiveSession, SharedAnnouncer, SharedLiveSession};
pub use config::{ConfigError, ShellConfig, SpeechConfig, StorageConfig};
pub use coordinator::{Coordinator, LiveToggle, SessionState};
pub use session::AppSession;
pub use view::{UnknownView, View};

pub use profiles;
