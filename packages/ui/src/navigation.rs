//! Navigation context: coordinator, bus and the active view signal.
//!
//! The view-dispatch layer reads [`use_active_view`] and mounts the matching
//! screen. Anything that wants to switch screens without holding the
//! coordinator (the live voice session, toasts) publishes on the bus from
//! [`use_navigation_bus`].

use std::sync::Arc;
use std::time::Duration;

use dioxus::prelude::*;
use shell::{Coordinator, NavigationBus, SharedLiveSession, ShellConfig, View};

use crate::speech::{NoLiveSession, SpeechAnnouncer};

/// How often the provider checks whether the live session has closed.
const LIVE_SESSION_POLL: Duration = Duration::from_millis(500);

pub fn use_coordinator() -> Coordinator {
    use_context::<Coordinator>()
}

pub fn use_navigation_bus() -> NavigationBus {
    use_context::<NavigationBus>()
}

/// Get the active view.
/// Returns a signal that updates on every navigation.
pub fn use_active_view() -> Signal<View> {
    use_context::<Signal<View>>()
}

/// Provider component that owns navigation for one login.
///
/// Picks up the [`SharedLiveSession`] and [`ShellConfig`] from an outer
/// provider when present.
#[component]
pub fn ShellProvider(children: Element) -> Element {
    let coordinator = use_context_provider(|| {
        let config = try_consume_context::<ShellConfig>().unwrap_or_default();
        let live = try_consume_context::<SharedLiveSession>()
            .unwrap_or_else(|| Arc::new(NoLiveSession) as SharedLiveSession);
        Coordinator::with_speech(config.speech, live, Arc::new(SpeechAnnouncer))
    });
    let bus = use_context_provider(NavigationBus::new);
    let mut active_view = use_context_provider(|| Signal::new(coordinator.active_view()));

    // Announce the first screen once
    use_hook({
        let coordinator = coordinator.clone();
        move || coordinator.announce_current()
    });

    // Route bus requests into the coordinator
    use_future({
        let coordinator = coordinator.clone();
        move || {
            let coordinator = coordinator.clone();
            let subscription = bus.subscribe();
            async move { coordinator.run(subscription).await }
        }
    });

    // Re-announce the current screen once the live session closes
    use_future({
        let coordinator = coordinator.clone();
        move || {
            let coordinator = coordinator.clone();
            async move {
                loop {
                    #[cfg(target_arch = "wasm32")]
                    gloo_timers::future::sleep(LIVE_SESSION_POLL).await;
                    #[cfg(not(target_arch = "wasm32"))]
                    tokio::time::sleep(LIVE_SESSION_POLL).await;

                    coordinator.observe_live_session();
                }
            }
        }
    });

    // Mirror view changes into the signal
    use_future(move || {
        let mut rx = coordinator.subscribe();
        async move {
            while rx.changed().await.is_ok() {
                let view = *rx.borrow_and_update();
                active_view.set(view);
            }
        }
    });

    rsx! {
        {children}
    }
}
