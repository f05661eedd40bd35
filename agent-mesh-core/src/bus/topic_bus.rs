//! Topic bus implementation

use super::topic::{Envelope, Topic};
use futures::Stream;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tracing::debug;

struct SubscriberSlot {
    id: u64,
    tx: mpsc::UnboundedSender<Envelope>,
}

struct BusInner {
    subscribers: RwLock<HashMap<Topic, Vec<SubscriberSlot>>>,
    next_id: AtomicU64,
}

/// In-process publish/subscribe bus keyed by topic.
///
/// Each subscriber gets its own unbounded buffer, so `publish` never blocks
/// on a slow consumer and fan-out is O(current subscriber count). Cloning
/// the bus clones a handle to the same subscriber set.
#[derive(Clone)]
pub struct TopicBus {
    inner: Arc<BusInner>,
}

impl TopicBus {
    /// Create a new bus with no subscribers
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                subscribers: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Publish a payload to every current subscriber of `topic`.
    ///
    /// Publishing with no subscribers is a no-op. The subscriber set is
    /// snapshotted under a read lock; sends are non-blocking.
    pub fn publish(&self, topic: Topic, payload: serde_json::Value) {
        let subscribers = self.inner.subscribers.read();
        let Some(slots) = subscribers.get(&topic) else {
            debug!(topic = %topic, "No subscribers for topic");
            return;
        };
        for slot in slots {
            // A send error means the receiver was just dropped; its slot is
            // removed by Subscription::cancel, so the error is ignorable.
            let _ = slot.tx.send(Envelope::new(topic, payload.clone()));
        }
    }

    /// Subscribe to `topic`.
    ///
    /// The returned stream yields every envelope published after this call
    /// returns; nothing published earlier is replayed. Dropping or
    /// cancelling the subscription releases the bus-side slot immediately.
    pub fn subscribe(&self, topic: Topic) -> Subscription {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner
            .subscribers
            .write()
            .entry(topic)
            .or_default()
            .push(SubscriberSlot { id, tx });
        debug!(topic = %topic, id, "Subscriber attached");
        Subscription {
            topic,
            id,
            rx,
            bus: Arc::downgrade(&self.inner),
            cancelled: false,
        }
    }

    /// Number of live subscribers for a topic
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.inner
            .subscribers
            .read()
            .get(&topic)
            .map_or(0, |slots| slots.len())
    }
}

impl Default for TopicBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A cancellable, per-call lazy stream of envelopes for one topic.
pub struct Subscription {
    topic: Topic,
    id: u64,
    rx: mpsc::UnboundedReceiver<Envelope>,
    bus: Weak<BusInner>,
    cancelled: bool,
}

impl Subscription {
    /// The topic this subscription is attached to
    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Receive the next envelope, or `None` once cancelled and drained
    pub async fn recv(&mut self) -> Option<Envelope> {
        self.rx.recv().await
    }

    /// Receive without waiting; used by tests and polling callers
    pub fn try_recv(&mut self) -> Option<Envelope> {
        self.rx.try_recv().ok()
    }

    /// Release the bus-side slot. Idempotent; dropping the subscription
    /// calls this too.
    pub fn cancel(&mut self) {
        if self.cancelled {
            return;
        }
        self.cancelled = true;
        if let Some(bus) = self.bus.upgrade() {
            let mut subscribers = bus.subscribers.write();
            let now_empty = match subscribers.get_mut(&self.topic) {
                Some(slots) => {
                    slots.retain(|slot| slot.id != self.id);
                    slots.is_empty()
                }
                None => false,
            };
            if now_empty {
                subscribers.remove(&self.topic);
            }
        }
        self.rx.close();
        debug!(topic = %self.topic, id = self.id, "Subscriber detached");
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl Stream for Subscription {
    type Item = Envelope;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_publish_without_subscribers_is_noop() {
        let bus = TopicBus::new();
        bus.publish(Topic::MessageCreated, json!({"id": 1}));
        assert_eq!(bus.subscriber_count(Topic::MessageCreated), 0);
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_payload() {
        let bus = TopicBus::new();
        let mut sub = bus.subscribe(Topic::GroupCreated);

        bus.publish(Topic::GroupCreated, json!({"name": "ops"}));

        let envelope = sub.recv().await.unwrap();
        assert_eq!(envelope.topic, Topic::GroupCreated);
        assert_eq!(envelope.payload["name"], "ops");
    }

    #[tokio::test]
    async fn test_fan_out_to_all_subscribers() {
        let bus = TopicBus::new();
        let mut a = bus.subscribe(Topic::MessageCreated);
        let mut b = bus.subscribe(Topic::MessageCreated);

        bus.publish(Topic::MessageCreated, json!({"id": 7}));

        assert_eq!(a.recv().await.unwrap().payload["id"], 7);
        assert_eq!(b.recv().await.unwrap().payload["id"], 7);
    }

    #[tokio::test]
    async fn test_no_replay_for_late_subscriber() {
        let bus = TopicBus::new();
        let mut early = bus.subscribe(Topic::AgentCreated);

        bus.publish(Topic::AgentCreated, json!({"name": "a1"}));
        let mut late = bus.subscribe(Topic::AgentCreated);

        assert_eq!(early.try_recv().unwrap().payload["name"], "a1");
        assert!(late.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_topics_are_isolated() {
        let bus = TopicBus::new();
        let mut sub = bus.subscribe(Topic::GroupUpdated);

        bus.publish(Topic::GroupCreated, json!({"name": "ops"}));
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_cancel_stops_delivery_and_is_idempotent() {
        let bus = TopicBus::new();
        let mut sub = bus.subscribe(Topic::MessageCreated);
        assert_eq!(bus.subscriber_count(Topic::MessageCreated), 1);

        sub.cancel();
        sub.cancel();
        assert_eq!(bus.subscriber_count(Topic::MessageCreated), 0);

        // Publishing after cancel must neither deliver nor panic.
        bus.publish(Topic::MessageCreated, json!({"id": 1}));
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_drop_releases_slot() {
        let bus = TopicBus::new();
        {
            let _sub = bus.subscribe(Topic::AgentUpdated);
            assert_eq!(bus.subscriber_count(Topic::AgentUpdated), 1);
        }
        assert_eq!(bus.subscriber_count(Topic::AgentUpdated), 0);
    }

    #[tokio::test]
    async fn test_cancel_does_not_affect_other_subscribers() {
        let bus = TopicBus::new();
        let mut kept = bus.subscribe(Topic::MessageCreated);
        let mut dropped = bus.subscribe(Topic::MessageCreated);

        dropped.cancel();
        bus.publish(Topic::MessageCreated, json!({"id": 2}));

        assert_eq!(kept.recv().await.unwrap().payload["id"], 2);
    }
}
