//! Screen selection.
//!
//! The active screen is derived, never stored: it is a function of the game
//! phase plus two collaborator signals (is the local identity in a room,
//! has it submitted a name).

use std::fmt;

use crate::session::SessionView;

use super::entities::GamePhase;

/// Top-level screens of the client.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Screen {
    /// Not in a room: room-code entry.
    JoinRoom,
    /// In a room without a name: name entry.
    NameEntry,
    /// Named and waiting for the host to start.
    Lobby,
    /// A round is underway (playing or paused): the tabla.
    Board,
    /// The round ended.
    Finished,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::JoinRoom => "join",
            Self::NameEntry => "name",
            Self::Lobby => "lobby",
            Self::Board => "board",
            Self::Finished => "finished",
        };
        write!(f, "{repr}")
    }
}

/// Derive the active screen from the game phase and session signals.
#[must_use]
pub fn active_screen(phase: GamePhase, session: &SessionView) -> Screen {
    if !session.in_room() {
        return Screen::JoinRoom;
    }
    if !session.has_name() {
        return Screen::NameEntry;
    }
    match phase {
        GamePhase::Waiting => Screen::Lobby,
        GamePhase::Playing | GamePhase::Paused => Screen::Board,
        GamePhase::Finished => Screen::Finished,
    }
}
