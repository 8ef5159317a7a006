use super::event::{Event, EventKind};
use std::collections::HashMap;

pub type SubscriptionId = u64;

/// Callback invoked synchronously for every matching event.
/// Subscribers must return quickly; they run inside the scheduler step.
pub type Subscriber = Box<dyn FnMut(&Event)>;

/// Sink for scheduler notifications
pub trait EventBus {
    fn publish(&mut self, event: &Event);
}

/// Records every published event; handy for tests and replay
impl EventBus for Vec<Event> {
    fn publish(&mut self, event: &Event) {
        self.push(event.clone());
    }
}

/// Subscription registry routing events by kind
pub struct Subscribers {
    subscriptions: HashMap<EventKind, Vec<(SubscriptionId, Subscriber)>>,
    next_id: SubscriptionId,
}

impl Subscribers {
    /// Create a registry with no subscribers
    pub fn new() -> Self {
        Self {
            subscriptions: HashMap::new(),
            next_id: 0,
        }
    }

    /// Register a callback for one event kind
    pub fn subscribe(&mut self, kind: EventKind, subscriber: Subscriber) -> SubscriptionId {
        let id = self.next_id;
        self.next_id += 1;
        self.subscriptions
            .entry(kind)
            .or_insert_with(Vec::new)
            .push((id, subscriber));
        id
    }

    /// Remove a subscription, returning whether it existed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for subscribers in self.subscriptions.values_mut() {
            if let Some(index) = subscribers.iter().position(|(sub_id, _)| *sub_id == id) {
                subscribers.remove(index);
                return true;
            }
        }
        false
    }

    /// Drop every subscription
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscriptions.get(&kind).map_or(0, Vec::len)
    }
}

impl EventBus for Subscribers {
    fn publish(&mut self, event: &Event) {
        if let Some(subscribers) = self.subscriptions.get_mut(&event.kind()) {
            for (_, subscriber) in subscribers.iter_mut() {
                subscriber(event);
            }
        }
    }
}

impl Default for Subscribers {
    fn default() -> Self {
        Self::new()
    }
}
