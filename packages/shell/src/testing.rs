//! Recording collaborators for unit tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::collaborators::{Announcer, LiveSession};

#[derive(Debug, Default)]
pub struct FakeLiveSession {
    active: AtomicBool,
    starts: AtomicUsize,
    stops: AtomicUsize,
}

impl FakeLiveSession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }

    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

impl LiveSession for FakeLiveSession {
    fn start_session(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.set_active(true);
    }

    fn stop_session(&self) {
        self.stops.fetch_add(1, Ordering::SeqCst);
        self.set_active(false);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Default)]
pub struct RecordingAnnouncer {
    spoken: Mutex<Vec<(String, String)>>,
}

impl RecordingAnnouncer {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// `(text, language_code)` pairs in call order.
    pub fn spoken(&self) -> Vec<(String, String)> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.spoken().into_iter().map(|(text, _)| text).collect()
    }
}

impl Announcer for RecordingAnnouncer {
    fn announce(&self, text: &str, language_code: &str) {
        self.spoken
            .lock()
            .unwrap()
            .push((text.to_string(), language_code.to_string()));
    }
}
