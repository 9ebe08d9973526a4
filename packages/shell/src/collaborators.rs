//! Interfaces the coordinator consumes from the rest of the client.
//!
//! Neither trait does any work inside this crate: the live-audio session and
//! the speech engine are owned elsewhere and only observed or poked.

use std::sync::Arc;

/// The continuously open voice channel.
pub trait LiveSession: Send + Sync {
    fn start_session(&self);
    /// Must be safe to call when no session is open.
    fn stop_session(&self);
    fn is_active(&self) -> bool;
}

/// Fire-and-forget text-to-speech.
pub trait Announcer: Send + Sync {
    fn announce(&self, text: &str, language_code: &str);
}

pub type SharedLiveSession = Arc<dyn LiveSession>;
pub type SharedAnnouncer = Arc<dyn Announcer>;

