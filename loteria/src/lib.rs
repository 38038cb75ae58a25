//! # Lotería Client Core
//!
//! Game-state synchronization engine for a real-time multiplayer Lotería
//! (Mexican bingo) client.
//!
//! The engine receives an ordered stream of named game events from a
//! transport, reduces them into a consistent local view of the board, and
//! derives the active screen deterministically from that state. Room and
//! roster management, host election, and the transport itself belong to an
//! external session collaborator and are consumed only through the
//! capability surface in [`session`].
//!
//! ## Architecture
//!
//! - [`game::events`]: the closed vocabulary of inbound events and outbound
//!   commands, parsed strictly at the transport boundary.
//! - [`game::reducer`]: a pure, deterministic mapping from
//!   (state, event) to the next state. No I/O, independently replayable.
//! - [`game::store`]: the observable single-writer state container.
//! - [`game::subscriptions`]: listener lifecycle, exactly one handler per
//!   event name per connection.
//! - [`game::screen`] and [`game::commands`]: the phase controller, which
//!   selects the active screen and gates locally-initiated commands.
//!
//! ## Example
//!
//! ```
//! use loteria::{GameStore, GameEvent, GamePhase};
//! use serde_json::json;
//!
//! let store = GameStore::shared();
//! let event = GameEvent::parse(
//!     "game-started",
//!     &json!({ "winPattern": "line", "drawSpeed": 8 }),
//! )
//! .unwrap()
//! .unwrap();
//! store.borrow_mut().dispatch(&event);
//! assert_eq!(store.borrow().state().phase, GamePhase::Playing);
//! ```

/// Game entities, events, reducer, store, and the phase controller.
pub mod game;
pub use game::{
    commands::{CommandError, Commander},
    constants,
    entities::{
        self, Card, CardId, GamePhase, GameSettings, Language, Tabla, TablaCell, WinPattern,
        Winner,
    },
    events::{EventError, GameCommand, GameEvent, GameOverReason},
    reducer::reduce,
    screen::{Screen, active_screen},
    state::GameState,
    store::{GameStore, SharedGameStore, SubscriberId},
    subscriptions::Subscriptions,
};

/// Capability surface of the external session collaborator.
pub mod session;
pub use session::{
    EventBus, ListenerId, Player, RoomCode, SessionControl, SessionError, SessionView,
};
