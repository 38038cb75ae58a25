//! Integration tests for the event pipeline: wire events delivered through
//! a bus are parsed by the subscription manager and reduced into the store.
//! Also covers the listener lifecycle contract across unbind/rebind.

use loteria::{
    GameEvent, GamePhase, GameStore, SessionError, Subscriptions, WinPattern,
    session::{EventBus, EventHandler, ListenerId},
};
use serde_json::{Value, json};
use std::collections::HashMap;

/// In-memory bus with real handler registration, standing in for the
/// session collaborator's transport.
#[derive(Default)]
struct MockBus {
    handlers: HashMap<String, Vec<(ListenerId, EventHandler)>>,
    emitted: Vec<(String, Value)>,
    next_id: u64,
}

impl EventBus for MockBus {
    fn emit(&mut self, event: &str, payload: Value) -> Result<(), SessionError> {
        self.emitted.push((event.to_string(), payload));
        Ok(())
    }

    fn on(&mut self, event: &str, handler: EventHandler) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.handlers
            .entry(event.to_string())
            .or_default()
            .push((id, handler));
        id
    }

    fn off(&mut self, id: ListenerId) -> bool {
        let mut removed = false;
        for listeners in self.handlers.values_mut() {
            let before = listeners.len();
            listeners.retain(|(listener_id, _)| *listener_id != id);
            removed |= listeners.len() != before;
        }
        removed
    }
}

impl MockBus {
    fn deliver(&mut self, event: &str, payload: Value) {
        if let Some(listeners) = self.handlers.get_mut(event) {
            for (_, handler) in listeners.iter_mut() {
                handler(&payload);
            }
        }
    }

    fn handler_count(&self, event: &str) -> usize {
        self.handlers.get(event).map_or(0, Vec::len)
    }
}

fn card_json(id: u32) -> Value {
    json!({
        "id": id,
        "name_es": format!("carta {id}"),
        "name_en": format!("card {id}"),
    })
}

fn tabla_json() -> Value {
    let cells: Vec<Value> = (0..16)
        .map(|position| {
            json!({
                "card": card_json(position as u32 + 1),
                "marked": false,
                "position": position,
            })
        })
        .collect();
    json!({ "tabla": cells })
}

#[test]
fn bind_registers_exactly_one_handler_per_event_name() {
    let store = GameStore::shared();
    let mut bus = MockBus::default();
    let subscriptions = Subscriptions::bind(&mut bus, &store);
    assert_eq!(subscriptions.len(), GameEvent::NAMES.len());
    for name in GameEvent::NAMES {
        assert_eq!(bus.handler_count(name), 1, "{name}");
    }
}

#[test]
fn a_full_round_reduces_into_the_store() {
    let store = GameStore::shared();
    let mut bus = MockBus::default();
    let _subscriptions = Subscriptions::bind(&mut bus, &store);

    bus.deliver(
        "game-started",
        json!({ "winPattern": "line", "drawSpeed": 8, "totalCards": 54, "playerCount": 2 }),
    );
    bus.deliver("tabla-assigned", tabla_json());
    bus.deliver("card-drawn", json!({ "card": card_json(7) }));
    bus.deliver("mark-confirmed", json!({ "cardId": 7, "position": 6 }));
    bus.deliver("win-available", Value::Null);
    bus.deliver(
        "game-over",
        json!({
            "reason": "winner",
            "winner": { "id": "p1", "name": "Ana", "pattern": [4, 5, 6, 7] },
        }),
    );

    let store = store.borrow();
    let state = store.state();
    assert_eq!(state.phase, GamePhase::Finished);
    assert_eq!(state.settings.win_patterns, vec![WinPattern::Line]);
    assert_eq!(state.drawn_cards.len(), 1);
    assert!(state.tabla.cell_by_card(7).unwrap().marked);
    assert!(state.show_win_claim);
    assert_eq!(state.winner.as_ref().unwrap().name, "Ana");
}

#[test]
fn malformed_payloads_are_dropped_without_poisoning_state() {
    let store = GameStore::shared();
    let mut bus = MockBus::default();
    let _subscriptions = Subscriptions::bind(&mut bus, &store);

    bus.deliver("game-started", json!({ "winPattern": "line", "drawSpeed": 8 }));
    let before = store.borrow().state().clone();

    // A three-cell tabla and a draw without a card both fail to parse.
    bus.deliver(
        "tabla-assigned",
        json!({ "tabla": [{ "card": card_json(1), "position": 0 }] }),
    );
    bus.deliver("card-drawn", json!({ "deck": "missing" }));

    assert_eq!(*store.borrow().state(), before);
}

#[test]
fn duplicate_draw_delivery_does_not_grow_the_sequence() {
    let store = GameStore::shared();
    let mut bus = MockBus::default();
    let _subscriptions = Subscriptions::bind(&mut bus, &store);

    bus.deliver("game-started", json!({ "winPattern": "line", "drawSpeed": 0 }));
    bus.deliver("card-drawn", json!({ "card": card_json(9) }));
    bus.deliver("card-drawn", json!({ "card": card_json(9) }));

    assert_eq!(store.borrow().state().drawn_cards.len(), 1);
}

#[test]
fn unbind_releases_every_listener() {
    let store = GameStore::shared();
    let mut bus = MockBus::default();
    let subscriptions = Subscriptions::bind(&mut bus, &store);
    subscriptions.unbind(&mut bus);

    for name in GameEvent::NAMES {
        assert_eq!(bus.handler_count(name), 0, "{name}");
    }
    bus.deliver("game-paused", Value::Null);
    assert_eq!(store.borrow().state().phase, GamePhase::Waiting);
}

#[test]
fn rebinding_after_reconnect_never_accumulates_handlers() {
    let store = GameStore::shared();

    // First connection.
    let mut bus = MockBus::default();
    let subscriptions = Subscriptions::bind(&mut bus, &store);
    subscriptions.unbind(&mut bus);

    // The transport hands back a fresh connection object; handlers are
    // rebuilt from scratch.
    let mut bus = MockBus::default();
    let _subscriptions = Subscriptions::bind(&mut bus, &store);
    for name in GameEvent::NAMES {
        assert_eq!(bus.handler_count(name), 1, "{name}");
    }

    // Each delivery applies exactly once.
    bus.deliver("card-drawn", json!({ "card": card_json(3) }));
    assert_eq!(store.borrow().state().drawn_cards.len(), 1);
}

#[test]
fn store_subscribers_observe_reductions_from_the_wire() {
    let store = GameStore::shared();
    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    {
        let seen = std::rc::Rc::clone(&seen);
        store
            .borrow_mut()
            .subscribe(move |state: &loteria::GameState| seen.borrow_mut().push(state.phase));
    }

    let mut bus = MockBus::default();
    let _subscriptions = Subscriptions::bind(&mut bus, &store);
    bus.deliver("game-started", json!({ "winPattern": "line", "drawSpeed": 8 }));
    bus.deliver("game-paused", Value::Null);
    bus.deliver("game-resumed", Value::Null);

    assert_eq!(
        *seen.borrow(),
        vec![GamePhase::Playing, GamePhase::Paused, GamePhase::Playing]
    );
}
