//! # Authenticated session wiring
//!
//! [`AppSession`] is what the login shell mounts after a successful login and
//! drops at logout. It builds the [`ProfileStore`], the [`NavigationBus`] and
//! the [`Coordinator`] from a [`ShellConfig`], subscribes the coordinator to
//! the bus and hydrates the store exactly once.
//!
//! The session is driven cooperatively: the host calls
//! [`pump`](AppSession::pump) from its event loop to apply queued navigation
//! requests, one at a time and each to completion.

use profiles::{Hydration, KeyValueStorage, ProfileStore};
use tracing::info;

use crate::bus::{NavSubscription, NavigationBus};
use crate::collaborators::{SharedAnnouncer, SharedLiveSession};
use crate::config::ShellConfig;
use crate::coordinator::Coordinator;

pub struct AppSession<S> {
    profiles: ProfileStore<S>,
    bus: NavigationBus,
    coordinator: Coordinator,
    subscription: NavSubscription,
    hydration: Hydration,
}

impl<S: KeyValueStorage> AppSession<S> {
    /// Build the session collaborators, hydrate profiles and announce the
    /// initial screen.
    pub async fn start(
        config: &ShellConfig,
        storage: S,
        live: SharedLiveSession,
        announcer: SharedAnnouncer,
    ) -> Self {
        let profiles = ProfileStore::with_key(storage, config.storage.family_members_key.clone());
        let bus = NavigationBus::new();
        let subscription = bus.subscribe();
        let coordinator = Coordinator::with_speech(config.speech.clone(), live, announcer);

        let hydration = profiles.hydrate().await;
        coordinator.announce_current();
        info!(hydration = ?hydration, "session started");

        Self {
            profiles,
            bus,
            coordinator,
            subscription,
            hydration,
        }
    }

    pub fn profiles(&self) -> &ProfileStore<S> {
        &self.profiles
    }

    /// Handle for producers such as the live voice session.
    pub fn bus(&self) -> &NavigationBus {
        &self.bus
    }

    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    pub fn hydration(&self) -> Hydration {
        self.hydration
    }

    /// Apply queued navigation requests. Returns how many were applied.
    pub fn pump(&mut self) -> usize {
        self.coordinator.drain(&mut self.subscription)
    }

    /// Logout: close any live session and return to the dashboard.
    ///
    /// Profile data stays in durable storage for the next login.
    pub fn end(self) {
        self.coordinator.stop_live_session();
        self.coordinator.reset();
        info!("session ended");
    }
}
