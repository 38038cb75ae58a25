//! Capability surface of the external session collaborator.
//!
//! Room creation, roster management, host election, and the transport
//! itself live outside this crate. The engine consumes them only through
//! the signals and commands defined here, and validates its own inputs at
//! this boundary before anything reaches the wire.

pub mod bus;
pub use bus::{EventBus, EventHandler, ListenerId};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::constants::{MAX_NAME_LEN, MIN_NAME_LEN, ROOM_CODE_LEN};

/// Errors at the session boundary.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("not connected")]
    NotConnected,
    #[error("room code must be 4 letters or digits")]
    InvalidRoomCode,
    #[error("name must be at least 2 characters")]
    NameTooShort,
    #[error("transport error: {0}")]
    Transport(String),
}

/// A validated 4-character room code, uppercased on parse.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
pub struct RoomCode(String);

impl RoomCode {
    pub fn parse(s: &str) -> Result<Self, SessionError> {
        let code = s.trim().to_ascii_uppercase();
        if code.chars().count() != ROOM_CODE_LEN
            || !code.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(SessionError::InvalidRoomCode);
        }
        Ok(Self(code))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Normalize and validate a player name: trimmed, at least two characters,
/// truncated past twenty.
pub fn validate_player_name(name: &str) -> Result<String, SessionError> {
    let mut name = name.trim().to_string();
    if name.chars().count() < MIN_NAME_LEN {
        return Err(SessionError::NameTooShort);
    }
    if let Some((idx, _)) = name.char_indices().nth(MAX_NAME_LEN) {
        name.truncate(idx);
    }
    Ok(name)
}

/// A roster entry as reported by the collaborator.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Player {
    pub id: String,
    pub name: String,
}

/// Read-only identity and room signals owned by the collaborator.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionView {
    pub room_code: Option<String>,
    pub player_name: Option<String>,
    pub player_id: Option<String>,
    pub players: Vec<Player>,
    pub host_id: Option<String>,
    pub connected: bool,
    pub error: Option<String>,
}

impl SessionView {
    /// Whether the local identity currently holds host authority.
    #[must_use]
    pub fn is_host(&self) -> bool {
        matches!((&self.player_id, &self.host_id), (Some(me), Some(host)) if me == host)
    }

    #[must_use]
    pub fn in_room(&self) -> bool {
        self.room_code.is_some()
    }

    #[must_use]
    pub fn has_name(&self) -> bool {
        self.player_name.is_some()
    }
}

/// Commands consumed from the collaborator. Implementations forward to the
/// transport; authority enforcement stays on the remote side.
pub trait SessionControl {
    fn join_room(&mut self, code: &RoomCode) -> Result<(), SessionError>;
    fn submit_name(&mut self, name: &str) -> Result<(), SessionError>;
    fn kick_player(&mut self, player_id: &str) -> Result<(), SessionError>;
    fn transfer_host(&mut self, player_id: &str) -> Result<(), SessionError>;
}
