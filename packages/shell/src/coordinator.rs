//! # Navigation/session coordinator
//!
//! [`Coordinator`] owns the active [`View`] and mediates between UI clicks,
//! voice-driven requests arriving over the [`crate::NavigationBus`] and the
//! screen currently mounted by the view-dispatch layer.
//!
//! ## Navigation
//!
//! Last write wins: whichever [`navigate`](Coordinator::navigate) lands last
//! sets the view. Each navigation is announced as `"Opening <screen>"` through
//! the [`crate::Announcer`], except while the live voice session is open so the shell
//! does not talk over it. Screens follow changes through
//! [`subscribe`](Coordinator::subscribe).
//!
//! ## Live session
//!
//! The coordinator observes the [`crate::LiveSession`] but does not own audio I/O.
//! [`toggle_live_session`](Coordinator::toggle_live_session) only dispatches
//! start or stop. The host calls
//! [`observe_live_session`](Coordinator::observe_live_session) periodically;
//! when it sees the session close, the current screen is announced again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tracing::{debug, info};

use crate::bus::NavSubscription;
use crate::collaborators::{SharedAnnouncer, SharedLiveSession};
use crate::config::SpeechConfig;
use crate::view::View;

/// What the shell exposes to screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionState {
    pub active_view: View,
    pub is_live_active: bool,
}

/// Which request [`Coordinator::toggle_live_session`] dispatched.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiveToggle {
    Started,
    Stopped,
}

/// Shared handle to the navigation state. Clones share the same view.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<Inner>,
}

struct Inner {
    live: SharedLiveSession,
    announcer: SharedAnnouncer,
    speech: Mutex<SpeechConfig>,
    view: watch::Sender<View>,
    live_seen: AtomicBool,
}

impl Coordinator {
    pub fn new(live: SharedLiveSession, announcer: SharedAnnouncer) -> Self {
        Self::with_speech(SpeechConfig::default(), live, announcer)
    }

    pub fn with_speech(
        speech: SpeechConfig,
        live: SharedLiveSession,
        announcer: SharedAnnouncer,
    ) -> Self {
        let (view, _) = watch::channel(View::Dashboard);
        Self {
            inner: Arc::new(Inner {
                live,
                announcer,
                speech: Mutex::new(speech),
                view,
                live_seen: AtomicBool::new(false),
            }),
        }
    }

    /// Switch to `view` and announce it unless a live session is open.
    pub fn navigate(&self, view: View) {
        self.inner.view.send_replace(view);
        info!(view = %view, "navigated");
        self.announce(view);
    }

    /// Switch to a view by id. Unknown ids land on the dashboard.
    pub fn navigate_named(&self, id: &str) {
        self.navigate(View::parse_or_default(id));
    }

    /// Emergency SOS shortcut.
    pub fn trigger_emergency(&self) {
        info!("emergency shortcut triggered");
        self.navigate(View::EmergencyMode);
    }

    /// Close action used by full-screen views such as telemedicine.
    pub fn return_to_dashboard(&self) {
        self.navigate(View::Dashboard);
    }

    /// Stop the live session if one is open, otherwise start one.
    pub fn toggle_live_session(&self) -> LiveToggle {
        if self.inner.live.is_active() {
            info!("stopping live session");
            self.inner.live.stop_session();
            LiveToggle::Stopped
        } else {
            info!("starting live session");
            self.inner.live.start_session();
            LiveToggle::Started
        }
    }

    /// Stop the live session. Returns `false` when none was open.
    pub fn stop_live_session(&self) -> bool {
        if !self.inner.live.is_active() {
            debug!("no live session to stop");
            return false;
        }
        info!("stopping live session");
        self.inner.live.stop_session();
        true
    }

    /// Compare the live session against the last observation. Once it has
    /// closed, the current screen is announced again. Returns `true` on that
    /// transition.
    pub fn observe_live_session(&self) -> bool {
        let active = self.inner.live.is_active();
        let was_active = self.inner.live_seen.swap(active, Ordering::SeqCst);
        if was_active && !active {
            debug!("live session closed");
            self.announce_current();
            return true;
        }
        false
    }

    /// Announce the active view, e.g. when the shell is first mounted.
    pub fn announce_current(&self) {
        self.announce(self.active_view());
    }

    /// Apply every queued bus request in order. Returns how many were applied.
    pub fn drain(&self, subscription: &mut NavSubscription) -> usize {
        let mut applied = 0;
        while let Some(view) = subscription.try_recv() {
            self.navigate(view);
            applied += 1;
        }
        applied
    }

    /// Apply bus requests as they arrive until every bus handle is dropped.
    pub async fn run(&self, mut subscription: NavSubscription) {
        while let Some(view) = subscription.recv().await {
            self.navigate(view);
        }
        debug!("navigation bus closed");
    }

    /// Back to the dashboard without an announcement (logout).
    pub fn reset(&self) {
        self.inner.view.send_replace(View::Dashboard);
        debug!("navigation reset");
    }

    pub fn active_view(&self) -> View {
        *self.inner.view.borrow()
    }

    pub fn is_live_active(&self) -> bool {
        self.inner.live.is_active()
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            active_view: self.active_view(),
            is_live_active: self.is_live_active(),
        }
    }

    /// Receive every view change.
    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.inner.view.subscribe()
    }

    pub fn language(&self) -> String {
        self.speech().language_code.clone()
    }

    /// Switch the announcement language. A change re-announces the current
    /// screen in the new language.
    pub fn set_language(&self, code: impl Into<String>) {
        let code = code.into();
        let previous = std::mem::replace(&mut self.speech().language_code, code.clone());
        if previous != code {
            debug!(language = %code, "announcement language changed");
            self.announce_current();
        }
    }

    fn speech(&self) -> std::sync::MutexGuard<'_, SpeechConfig> {
        self.inner.speech.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn announce(&self, view: View) {
        if self.inner.live.is_active() {
            debug!(view = %view, "announcement suppressed during live session");
            return;
        }
        let (enabled, language) = {
            let speech = self.speech();
            (speech.announce_navigation, speech.language_code.clone())
        };
        if enabled {
            let text = format!("Opening {}", view.spoken_name());
            self.inner.announcer.announce(&text, &language);
        }
    }
}
