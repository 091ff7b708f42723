//! Client events
//!
//! Subscribers receive a copy of every event on their own channel.
//! Receivers that have been dropped are pruned on the next emit.

use crossbeam::channel::{self, Receiver, Sender};
use parking_lot::Mutex;

use crate::model::Snapshot;

/// Notifications emitted after state-affecting client operations
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    Connected,
    Disconnected,

    /// Status and queue fetched by a refresh
    Refreshed(Snapshot),
}

/// Fan-out of client events to any number of subscribers
#[derive(Default)]
pub struct EventBus {
    subscribers: Mutex<Vec<Sender<ClientEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber
    pub fn subscribe(&self) -> Receiver<ClientEvent> {
        let (tx, rx) = channel::unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    /// Deliver `event` to every live subscriber
    pub fn emit(&self, event: ClientEvent) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        tracing::trace!("Client event delivered to {} subscribers", subscribers.len());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}
