//! Pure event reducer.
//!
//! Maps (prior state, inbound event) to the next state with no I/O, so the
//! whole game stream can be replayed deterministically without a live
//! connection. Events whose stated phase precondition does not hold are
//! still applied: the remote authority is trusted and the transport
//! delivers in order per room, so latest-authority-wins beats strict
//! rejection here.

use super::entities::{GamePhase, GameSettings, WinPattern};
use super::events::{GameEvent, GameOverReason};
use super::state::GameState;

/// Reduce one inbound event into the next state.
#[must_use]
pub fn reduce(state: &GameState, event: &GameEvent) -> GameState {
    let mut next = state.clone();
    match event {
        GameEvent::GameStarted {
            win_patterns,
            draw_speed_secs,
            ..
        } => {
            next.settings = GameSettings {
                win_patterns: if win_patterns.is_empty() {
                    vec![WinPattern::Line]
                } else {
                    win_patterns.clone()
                },
                draw_speed_secs: *draw_speed_secs,
                // The authority carries no language; the local selector
                // survives settings replacement.
                language: state.settings.language,
            };
            next.phase = GamePhase::Playing;
        }
        GameEvent::TablaAssigned { tabla } => {
            next.tabla = tabla.clone();
        }
        GameEvent::CardDrawn { card, .. } => {
            // At-least-once delivery: a redelivered draw must not grow the
            // sequence.
            if !next.is_drawn(card.id) {
                next.drawn_cards.push(card.clone());
            }
            next.current_card = Some(card.clone());
        }
        GameEvent::MarkConfirmed { card_id, .. } => {
            // Cells are resolved by card identity; a mismatched position in
            // the payload cannot mark the wrong cell.
            next.tabla.mark(*card_id);
        }
        GameEvent::WinAvailable => {
            next.show_win_claim = true;
        }
        GameEvent::WinResult { .. } => {
            // Valid or not, the round-trip is over. A win lands separately
            // as game-over.
            next.pending_win_claim = false;
        }
        GameEvent::GameOver { reason, winner } => {
            next.phase = GamePhase::Finished;
            next.winner = match reason {
                GameOverReason::Winner => winner.clone(),
                GameOverReason::DeckEmpty => None,
            };
        }
        GameEvent::GamePaused => {
            next.phase = GamePhase::Paused;
        }
        GameEvent::GameResumed => {
            next.phase = GamePhase::Playing;
        }
        GameEvent::GameReset => {
            next = GameState::default();
        }
    }
    next
}
