//! Observable game-state container.
//!
//! Holds the reduced state and notifies subscribed views on every mutation.
//! There are exactly three write paths: [`GameStore::dispatch`] (the reducer
//! path for inbound events), [`GameStore::begin_win_claim`] (the local
//! optimistic half of the win-claim round-trip), and
//! [`GameStore::set_language`] (the local selector). All execution is
//! single-threaded, so no locking is involved; the handle is passed
//! explicitly rather than living in a global.

use log::debug;
use std::{cell::RefCell, rc::Rc};

use super::entities::Language;
use super::events::GameEvent;
use super::reducer::reduce;
use super::state::GameState;

/// Handle shared between the subscription manager, the commander, and the
/// views. Single-threaded by design.
pub type SharedGameStore = Rc<RefCell<GameStore>>;

/// Identifies one view subscription for later removal.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SubscriberId(u64);

type Subscriber = Box<dyn FnMut(&GameState)>;

/// The process-wide game state container.
///
/// Subscribers are invoked synchronously during a mutation and must not
/// call back into the store.
#[derive(Default)]
pub struct GameStore {
    state: GameState,
    subscribers: Vec<(SubscriberId, Subscriber)>,
    next_id: u64,
}

impl GameStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared() -> SharedGameStore {
        Rc::new(RefCell::new(Self::new()))
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&GameState) + 'static) -> SubscriberId {
        let id = SubscriberId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Remove a subscription. Returns whether it was present.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    /// Run one inbound event through the reducer and notify views.
    pub fn dispatch(&mut self, event: &GameEvent) {
        debug!("applying {event}");
        self.state = reduce(&self.state, event);
        self.notify();
    }

    /// Local optimistic half of the win-claim two-phase commit: set the
    /// pending lock and hide the claim button before the authoritative
    /// `win-result` lands. Returns false when no claim is currently open.
    pub fn begin_win_claim(&mut self) -> bool {
        if !self.state.can_claim_win() {
            return false;
        }
        self.state.pending_win_claim = true;
        self.state.show_win_claim = false;
        self.notify();
        true
    }

    pub fn set_language(&mut self, language: Language) {
        if self.state.settings.language == language {
            return;
        }
        self.state.settings.language = language;
        self.notify();
    }

    fn notify(&mut self) {
        let state = &self.state;
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::GamePhase;

    #[test]
    fn test_dispatch_applies_event_and_notifies() {
        let count = Rc::new(RefCell::new(0));
        let mut store = GameStore::new();
        {
            let count = Rc::clone(&count);
            store.subscribe(move |_| *count.borrow_mut() += 1);
        }
        store.dispatch(&GameEvent::GamePaused);
        assert_eq!(store.state().phase, GamePhase::Paused);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_unsubscribe_stops_notifications() {
        let count = Rc::new(RefCell::new(0));
        let mut store = GameStore::new();
        let id = {
            let count = Rc::clone(&count);
            store.subscribe(move |_| *count.borrow_mut() += 1)
        };
        store.dispatch(&GameEvent::WinAvailable);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.dispatch(&GameEvent::GamePaused);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn test_begin_win_claim_requires_open_claim() {
        let mut store = GameStore::new();
        assert!(!store.begin_win_claim());
        store.dispatch(&GameEvent::WinAvailable);
        assert!(store.begin_win_claim());
        let state = store.state();
        assert!(state.pending_win_claim);
        assert!(!state.show_win_claim);
        // The lock holds until win-result clears it.
        assert!(!store.begin_win_claim());
    }

    #[test]
    fn test_claim_round_trip_clears_pending() {
        let mut store = GameStore::new();
        store.dispatch(&GameEvent::WinAvailable);
        assert!(store.begin_win_claim());
        store.dispatch(&GameEvent::WinResult { valid: false });
        assert!(!store.state().pending_win_claim);
    }

    #[test]
    fn test_set_language_notifies_only_on_change() {
        let count = Rc::new(RefCell::new(0));
        let mut store = GameStore::new();
        {
            let count = Rc::clone(&count);
            store.subscribe(move |_| *count.borrow_mut() += 1);
        }
        store.set_language(Language::Es);
        assert_eq!(*count.borrow(), 0);
        store.set_language(Language::En);
        assert_eq!(*count.borrow(), 1);
        assert_eq!(store.state().settings.language, Language::En);
    }

    #[test]
    fn test_subscriber_sees_latest_state() {
        let seen = Rc::new(RefCell::new(None));
        let mut store = GameStore::new();
        {
            let seen = Rc::clone(&seen);
            store.subscribe(move |state: &GameState| {
                *seen.borrow_mut() = Some(state.phase);
            });
        }
        store.dispatch(&GameEvent::GamePaused);
        assert_eq!(*seen.borrow(), Some(GamePhase::Paused));
    }
}
