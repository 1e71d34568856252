//! The event bus — typed publish/subscribe for race notifications.
//!
//! RULE: Handlers for a kind run in subscription order. Emitting with no
//! subscribers is a no-op, never an error.

use crate::event::{EventKind, RaceEvent};
use std::fmt;

pub type Handler = Box<dyn FnMut(&RaceEvent)>;

/// Returned by `on`; pass to `off` to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

struct Subscriber {
    id:      SubscriptionId,
    kind:    EventKind,
    handler: Handler,
}

#[derive(Default)]
pub struct EventBus {
    next_id:     u64,
    subscribers: Vec<Subscriber>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&RaceEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push(Subscriber {
            id,
            kind,
            handler: Box::new(handler),
        });
        id
    }

    /// Remove a handler. Returns false if it was not subscribed to `kind`.
    pub fn off(&mut self, kind: EventKind, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| !(s.id == id && s.kind == kind));
        self.subscribers.len() != before
    }

    pub fn emit(&mut self, event: &RaceEvent) {
        let kind = event.kind();
        for sub in self.subscribers.iter_mut().filter(|s| s.kind == kind) {
            (sub.handler)(event);
        }
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.subscribers.iter().filter(|s| s.kind == kind).count()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
