//! # Navigation bus
//!
//! Carries view-change requests from decoupled producers (the live voice
//! session, emergency shortcuts, screens) to whoever routes views, usually a
//! [`crate::Coordinator`].
//!
//! Each [`NavSubscription`] owns an unbounded queue, so:
//!
//! - every request published while a subscriber is alive reaches it (nothing
//!   is dropped for slow consumers);
//! - requests from one publisher arrive in publish order;
//! - nothing survives a restart (the bus holds no persisted state).
//!
//! Subscriptions that have been dropped are pruned on the next publish.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::{debug, trace};

use crate::view::View;

/// Publish/subscribe channel for [`View`] requests.
#[derive(Clone, Debug, Default)]
pub struct NavigationBus {
    subscribers: Arc<Mutex<Vec<UnboundedSender<View>>>>,
}

impl NavigationBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a request for every live subscriber. Returns how many received it.
    pub fn publish(&self, view: View) -> usize {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| tx.send(view).is_ok());
        trace!(view = %view, delivered = subscribers.len(), "navigation request published");
        subscribers.len()
    }

    /// Publish a raw view id (e.g. from a voice command). Unknown ids become
    /// [`View::Dashboard`].
    pub fn publish_named(&self, id: &str) -> usize {
        self.publish(View::parse_or_default(id))
    }

    pub fn subscribe(&self) -> NavSubscription {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        debug!("navigation bus subscriber added");
        NavSubscription { rx }
    }

    pub fn subscriber_count(&self) -> usize {
        let mut subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|tx| !tx.is_closed());
        subscribers.len()
    }
}

/// Receiving end of a [`NavigationBus`] subscription.
#[derive(Debug)]
pub struct NavSubscription {
    rx: UnboundedReceiver<View>,
}

impl NavSubscription {
    /// Wait for the next request. `None` once every bus handle is gone and
    /// the queue is drained.
    pub async fn recv(&mut self) -> Option<View> {
        self.rx.recv().await
    }

    /// Take the next queued request without waiting.
    pub fn try_recv(&mut self) -> Option<View> {
        match self.rx.try_recv() {
            Ok(view) => Some(view),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let bus = NavigationBus::new();
        assert_eq!(bus.publish(View::Forum), 0);
    }

    #[test]
    fn test_every_subscriber_gets_every_request_in_order() {
        let bus = NavigationBus::new();
        let mut router = bus.subscribe();
        let mut overlay = bus.subscribe();

        let requests = [View::Vitals, View::Cart, View::Vitals, View::HealthPlan];
        for view in requests {
            assert_eq!(bus.publish(view), 2);
        }

        for sub in [&mut router, &mut overlay] {
            let received: Vec<_> = std::iter::from_fn(|| sub.try_recv()).collect();
            assert_eq!(received, requests);
        }
    }

    #[test]
    fn test_unknown_named_request_becomes_dashboard() {
        let bus = NavigationBus::new();
        let mut sub = bus.subscribe();
        bus.publish_named("symptom-checker");
        bus.publish_named("warp-drive");
        assert_eq!(sub.try_recv(), Some(View::SymptomChecker));
        assert_eq!(sub.try_recv(), Some(View::Dashboard));
        assert_eq!(sub.try_recv(), None);
    }

    #[test]
    fn test_dropped_subscribers_are_pruned() {
        let bus = NavigationBus::new();
        let kept = bus.subscribe();
        let dropped = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(dropped);
        assert_eq!(bus.publish(View::Profile), 1);
        assert_eq!(bus.subscriber_count(), 1);
        drop(kept);
    }

    #[test]
    fn test_publishers_share_one_bus() {
        let bus = NavigationBus::new();
        let voice = bus.clone();
        let click = bus.clone();
        let mut sub = bus.subscribe();

        voice.publish(View::Telemedicine);
        click.publish(View::Forum);
        voice.publish(View::Wearables);

        // Per-publisher order holds; last write wins overall
        assert_eq!(sub.try_recv(), Some(View::Telemedicine));
        assert_eq!(sub.try_recv(), Some(View::Forum));
        assert_eq!(sub.try_recv(), Some(View::Wearables));
    }

    #[tokio::test]
    async fn test_recv_ends_when_bus_dropped() {
        let bus = NavigationBus::new();
        let mut sub = bus.subscribe();
        bus.publish(View::Favorites);
        drop(bus);

        assert_eq!(sub.recv().await, Some(View::Favorites));
        assert_eq!(sub.recv().await, None);
    }
}
