//! Event subscription manager.
//!
//! Binds the reducer to a live connection's event stream: exactly one
//! handler per recognized event name, each forwarding its parsed event into
//! the store. Teardown is explicit and consumes the value, so a connection's
//! listeners are released deterministically and can never accumulate across
//! reconnects; a fresh connection gets a fresh [`Subscriptions::bind`].

use log::{debug, warn};
use std::rc::Rc;

use crate::session::{EventBus, ListenerId};

use super::events::GameEvent;
use super::store::SharedGameStore;

/// Live listener registrations for one connection.
#[derive(Debug)]
pub struct Subscriptions {
    listeners: Vec<ListenerId>,
}

impl Subscriptions {
    /// Register one handler per recognized event name on `bus`, wired into
    /// `store`.
    pub fn bind(bus: &mut dyn EventBus, store: &SharedGameStore) -> Self {
        let mut listeners = Vec::with_capacity(GameEvent::NAMES.len());
        for name in GameEvent::NAMES {
            let store = Rc::clone(store);
            let id = bus.on(
                name,
                Box::new(move |payload: &serde_json::Value| match GameEvent::parse(name, payload) {
                    Ok(Some(event)) => store.borrow_mut().dispatch(&event),
                    Ok(None) => debug!("ignoring unrecognized event {name}"),
                    Err(err) => warn!("dropping malformed {name} event: {err}"),
                }),
            );
            listeners.push(id);
        }
        Self { listeners }
    }

    /// Release every listener registered by [`Subscriptions::bind`].
    pub fn unbind(self, bus: &mut dyn EventBus) {
        for id in self.listeners {
            bus.off(id);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
