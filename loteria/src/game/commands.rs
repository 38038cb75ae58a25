//! Locally-initiated game commands.
//!
//! Every command here is fire-and-forget: it is checked against local
//! preconditions, emitted to the transport, and forgotten. The
//! authoritative effect only ever lands as a later inbound event through
//! the reducer. When the session is not connected, commands are simply not
//! emitted; there is no queueing and no retry.
//!
//! Host-only commands (start/draw/pause/resume/reset) are not gated on the
//! host signal here. The view layer consults `SessionView::is_host` before
//! offering them, and the remote authority is the one that actually
//! enforces authority.

use log::debug;

use crate::session::{EventBus, SessionError, SessionView};

use super::entities::{CardId, WinPattern};
use super::events::GameCommand;
use super::store::SharedGameStore;

/// Reasons a local command was blocked at the boundary. These never
/// surface as hard errors; the views use them for transient feedback at
/// most.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("not connected")]
    NotConnected,
    #[error("that card has not been drawn yet")]
    CardNotDrawn,
    #[error("that cell is already marked")]
    AlreadyMarked,
    #[error("that card is not on this tabla")]
    CardNotOnTabla,
    #[error("no win claim is open")]
    ClaimUnavailable,
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Emits local commands against the store's current state.
pub struct Commander {
    store: SharedGameStore,
}

impl Commander {
    #[must_use]
    pub fn new(store: SharedGameStore) -> Self {
        Self { store }
    }

    /// Request a mark for `card_id`. The cell is not flipped locally; the
    /// authoritative `mark-confirmed` does that, so a rejected request can
    /// never desync the board.
    pub fn mark_card(
        &self,
        session: &SessionView,
        bus: &mut dyn EventBus,
        card_id: CardId,
    ) -> Result<(), CommandError> {
        if !session.connected {
            return Err(CommandError::NotConnected);
        }
        {
            let store = self.store.borrow();
            let state = store.state();
            let cell = state
                .tabla
                .cell_by_card(card_id)
                .ok_or(CommandError::CardNotOnTabla)?;
            if cell.marked {
                return Err(CommandError::AlreadyMarked);
            }
            if !state.is_drawn(card_id) {
                return Err(CommandError::CardNotDrawn);
            }
        }
        self.send(bus, GameCommand::MarkCard { card_id })
    }

    /// Claim a win. Locks the local pending flag eagerly so the claim
    /// cannot be double-submitted; only the authoritative `win-result`
    /// clears the lock.
    pub fn claim_win(
        &self,
        session: &SessionView,
        bus: &mut dyn EventBus,
    ) -> Result<(), CommandError> {
        if !session.connected {
            return Err(CommandError::NotConnected);
        }
        if !self.store.borrow().state().can_claim_win() {
            return Err(CommandError::ClaimUnavailable);
        }
        self.send(bus, GameCommand::ClaimWin)?;
        self.store.borrow_mut().begin_win_claim();
        Ok(())
    }

    pub fn start_game(
        &self,
        session: &SessionView,
        bus: &mut dyn EventBus,
        win_pattern: WinPattern,
        draw_speed_secs: u32,
    ) -> Result<(), CommandError> {
        self.send_host_command(
            session,
            bus,
            GameCommand::StartGame {
                win_pattern,
                draw_speed_secs,
            },
        )
    }

    pub fn draw_card(
        &self,
        session: &SessionView,
        bus: &mut dyn EventBus,
    ) -> Result<(), CommandError> {
        self.send_host_command(session, bus, GameCommand::DrawCard)
    }

    pub fn pause_game(
        &self,
        session: &SessionView,
        bus: &mut dyn EventBus,
    ) -> Result<(), CommandError> {
        self.send_host_command(session, bus, GameCommand::PauseGame)
    }

    pub fn resume_game(
        &self,
        session: &SessionView,
        bus: &mut dyn EventBus,
    ) -> Result<(), CommandError> {
        self.send_host_command(session, bus, GameCommand::ResumeGame)
    }

    pub fn reset_game(
        &self,
        session: &SessionView,
        bus: &mut dyn EventBus,
    ) -> Result<(), CommandError> {
        self.send_host_command(session, bus, GameCommand::ResetGame)
    }

    fn send_host_command(
        &self,
        session: &SessionView,
        bus: &mut dyn EventBus,
        command: GameCommand,
    ) -> Result<(), CommandError> {
        if !session.connected {
            return Err(CommandError::NotConnected);
        }
        self.send(bus, command)
    }

    fn send(&self, bus: &mut dyn EventBus, command: GameCommand) -> Result<(), CommandError> {
        debug!("emitting {command}");
        bus.emit(command.name(), command.payload())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::constants::TABLA_SIZE;
    use crate::game::entities::{Card, Tabla, TablaCell};
    use crate::game::events::GameEvent;
    use crate::game::store::GameStore;
    use crate::session::ListenerId;
    use serde_json::{Value, json};

    #[derive(Default)]
    struct MockBus {
        emitted: Vec<(String, Value)>,
    }

    impl EventBus for MockBus {
        fn emit(&mut self, event: &str, payload: Value) -> Result<(), SessionError> {
            self.emitted.push((event.to_string(), payload));
            Ok(())
        }

        fn on(&mut self, _event: &str, _handler: crate::session::EventHandler) -> ListenerId {
            ListenerId(0)
        }

        fn off(&mut self, _id: ListenerId) -> bool {
            false
        }
    }

    fn test_card(id: CardId) -> Card {
        Card {
            id,
            name_es: format!("carta {id}"),
            name_en: format!("card {id}"),
            verse_es: String::new(),
            verse_en: String::new(),
            image: String::new(),
            vo_es: String::new(),
            vo_en: String::new(),
        }
    }

    fn test_tabla() -> Tabla {
        let cells = (0..TABLA_SIZE)
            .map(|position| TablaCell {
                card: test_card(position as CardId + 1),
                marked: false,
                position,
            })
            .collect();
        Tabla::from_cells(cells).unwrap()
    }

    fn connected_session() -> SessionView {
        SessionView {
            room_code: Some("AB3D".to_string()),
            player_name: Some("Ana".to_string()),
            connected: true,
            ..SessionView::default()
        }
    }

    fn commander_with_board() -> (Commander, SharedGameStore) {
        let store = GameStore::shared();
        store.borrow_mut().dispatch(&GameEvent::TablaAssigned {
            tabla: test_tabla(),
        });
        (Commander::new(std::rc::Rc::clone(&store)), store)
    }

    #[test]
    fn test_mark_requires_drawn_card() {
        let (commander, _store) = commander_with_board();
        let mut bus = MockBus::default();
        let result = commander.mark_card(&connected_session(), &mut bus, 5);
        assert_eq!(result, Err(CommandError::CardNotDrawn));
        assert!(bus.emitted.is_empty());
    }

    #[test]
    fn test_mark_emits_for_drawn_unmarked_cell() {
        let (commander, store) = commander_with_board();
        store.borrow_mut().dispatch(&GameEvent::CardDrawn {
            card: test_card(5),
            card_number: None,
            total_cards: None,
            drawn_card_ids: Vec::new(),
        });
        let mut bus = MockBus::default();
        commander
            .mark_card(&connected_session(), &mut bus, 5)
            .unwrap();
        assert_eq!(
            bus.emitted,
            vec![("mark-card".to_string(), json!({ "cardId": 5 }))]
        );
        // No local flip: confirmation is server-driven.
        assert!(!store.borrow().state().tabla.cell_by_card(5).unwrap().marked);
    }

    #[test]
    fn test_mark_rejects_already_marked_cell() {
        let (commander, store) = commander_with_board();
        store.borrow_mut().dispatch(&GameEvent::CardDrawn {
            card: test_card(5),
            card_number: None,
            total_cards: None,
            drawn_card_ids: Vec::new(),
        });
        store.borrow_mut().dispatch(&GameEvent::MarkConfirmed {
            card_id: 5,
            position: 4,
        });
        let mut bus = MockBus::default();
        let result = commander.mark_card(&connected_session(), &mut bus, 5);
        assert_eq!(result, Err(CommandError::AlreadyMarked));
    }

    #[test]
    fn test_mark_rejects_card_off_tabla() {
        let (commander, _store) = commander_with_board();
        let mut bus = MockBus::default();
        let result = commander.mark_card(&connected_session(), &mut bus, 40);
        assert_eq!(result, Err(CommandError::CardNotOnTabla));
    }

    #[test]
    fn test_claim_win_sets_pending_lock() {
        let (commander, store) = commander_with_board();
        store.borrow_mut().dispatch(&GameEvent::WinAvailable);
        let mut bus = MockBus::default();
        commander.claim_win(&connected_session(), &mut bus).unwrap();
        assert_eq!(bus.emitted.len(), 1);
        assert_eq!(bus.emitted[0].0, "claim-win");
        let state = store.borrow().state().clone();
        assert!(state.pending_win_claim);
        assert!(!state.show_win_claim);
    }

    #[test]
    fn test_claim_win_cannot_double_submit() {
        let (commander, store) = commander_with_board();
        store.borrow_mut().dispatch(&GameEvent::WinAvailable);
        let mut bus = MockBus::default();
        commander.claim_win(&connected_session(), &mut bus).unwrap();
        let result = commander.claim_win(&connected_session(), &mut bus);
        assert_eq!(result, Err(CommandError::ClaimUnavailable));
        assert_eq!(bus.emitted.len(), 1);
    }

    #[test]
    fn test_claim_win_requires_availability_signal() {
        let (commander, _store) = commander_with_board();
        let mut bus = MockBus::default();
        let result = commander.claim_win(&connected_session(), &mut bus);
        assert_eq!(result, Err(CommandError::ClaimUnavailable));
    }

    #[test]
    fn test_commands_are_not_emitted_while_disconnected() {
        let (commander, store) = commander_with_board();
        store.borrow_mut().dispatch(&GameEvent::WinAvailable);
        let session = SessionView::default();
        let mut bus = MockBus::default();
        assert_eq!(
            commander.claim_win(&session, &mut bus),
            Err(CommandError::NotConnected)
        );
        assert_eq!(
            commander.draw_card(&session, &mut bus),
            Err(CommandError::NotConnected)
        );
        assert!(bus.emitted.is_empty());
        // The lock was never taken.
        assert!(!store.borrow().state().pending_win_claim);
    }

    #[test]
    fn test_host_commands_carry_wire_names() {
        let (commander, _store) = commander_with_board();
        let session = connected_session();
        let mut bus = MockBus::default();
        commander
            .start_game(&session, &mut bus, WinPattern::Corners, 5)
            .unwrap();
        commander.draw_card(&session, &mut bus).unwrap();
        commander.pause_game(&session, &mut bus).unwrap();
        commander.resume_game(&session, &mut bus).unwrap();
        commander.reset_game(&session, &mut bus).unwrap();
        let names: Vec<&str> = bus.emitted.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "start-game",
                "draw-card",
                "pause-game",
                "resume-game",
                "reset-game"
            ]
        );
        assert_eq!(
            bus.emitted[0].1,
            json!({ "winPattern": "corners", "drawSpeed": 5 })
        );
    }
}
