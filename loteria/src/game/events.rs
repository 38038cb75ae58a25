//! The wire vocabulary of the game stream.
//!
//! Inbound events arrive from the transport as `(name, payload)` pairs and
//! are parsed here into a closed tagged union; anything that fails to parse
//! into a known variant is dropped by the caller rather than trusted.
//! Outbound commands carry their wire name and payload with them.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

use super::entities::{Card, CardId, Tabla, TablaCell, TablaError, WinPattern, Winner};

/// Errors from parsing a recognized event's payload.
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("malformed {name} payload: {source}")]
    MalformedPayload {
        name: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid tabla: {0}")]
    InvalidTabla(#[from] TablaError),
}

/// How a round ended.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameOverReason {
    Winner,
    DeckEmpty,
}

/// An inbound game event, reduced into local state by the reducer.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    GameStarted {
        win_patterns: Vec<WinPattern>,
        draw_speed_secs: u32,
        total_cards: Option<u32>,
        player_count: Option<u32>,
    },
    TablaAssigned {
        tabla: Tabla,
    },
    CardDrawn {
        card: Card,
        card_number: Option<u32>,
        total_cards: Option<u32>,
        drawn_card_ids: Vec<CardId>,
    },
    MarkConfirmed {
        card_id: CardId,
        position: usize,
    },
    WinAvailable,
    WinResult {
        valid: bool,
    },
    GameOver {
        reason: GameOverReason,
        winner: Option<Winner>,
    },
    GamePaused,
    GameResumed,
    GameReset,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameStartedPayload {
    #[serde(default)]
    win_pattern: Option<WinPattern>,
    #[serde(default)]
    win_patterns: Option<Vec<WinPattern>>,
    draw_speed: u32,
    #[serde(default)]
    total_cards: Option<u32>,
    #[serde(default)]
    player_count: Option<u32>,
}

#[derive(Deserialize)]
struct TablaAssignedPayload {
    tabla: Vec<TablaCell>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CardDrawnPayload {
    card: Card,
    #[serde(default)]
    card_number: Option<u32>,
    #[serde(default)]
    total_cards: Option<u32>,
    #[serde(default)]
    drawn_card_ids: Vec<CardId>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarkConfirmedPayload {
    card_id: CardId,
    position: usize,
}

#[derive(Deserialize)]
struct WinResultPayload {
    valid: bool,
}

#[derive(Deserialize)]
struct GameOverPayload {
    reason: GameOverReason,
    #[serde(default)]
    winner: Option<Winner>,
}

fn payload<'de, T: Deserialize<'de>>(
    name: &'static str,
    value: &'de Value,
) -> Result<T, EventError> {
    T::deserialize(value).map_err(|source| EventError::MalformedPayload { name, source })
}

impl GameEvent {
    /// Every recognized inbound event name, in protocol order.
    pub const NAMES: [&'static str; 10] = [
        "game-started",
        "tabla-assigned",
        "card-drawn",
        "mark-confirmed",
        "win-available",
        "win-result",
        "game-over",
        "game-paused",
        "game-resumed",
        "game-reset",
    ];

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::GameStarted { .. } => "game-started",
            Self::TablaAssigned { .. } => "tabla-assigned",
            Self::CardDrawn { .. } => "card-drawn",
            Self::MarkConfirmed { .. } => "mark-confirmed",
            Self::WinAvailable => "win-available",
            Self::WinResult { .. } => "win-result",
            Self::GameOver { .. } => "game-over",
            Self::GamePaused => "game-paused",
            Self::GameResumed => "game-resumed",
            Self::GameReset => "game-reset",
        }
    }

    /// Parse a wire event. Unrecognized names yield `Ok(None)` so unknown
    /// events pass through silently; recognized names with payloads that do
    /// not fit their shape yield an error for the caller to log and drop.
    pub fn parse(name: &str, data: &Value) -> Result<Option<Self>, EventError> {
        let event = match name {
            "game-started" => {
                let p: GameStartedPayload = payload("game-started", data)?;
                let win_patterns = match (p.win_patterns, p.win_pattern) {
                    (Some(patterns), _) => patterns,
                    (None, Some(pattern)) => vec![pattern],
                    (None, None) => Vec::new(),
                };
                Self::GameStarted {
                    win_patterns,
                    draw_speed_secs: p.draw_speed,
                    total_cards: p.total_cards,
                    player_count: p.player_count,
                }
            }
            "tabla-assigned" => {
                let p: TablaAssignedPayload = payload("tabla-assigned", data)?;
                Self::TablaAssigned {
                    tabla: Tabla::from_cells(p.tabla)?,
                }
            }
            "card-drawn" => {
                let p: CardDrawnPayload = payload("card-drawn", data)?;
                Self::CardDrawn {
                    card: p.card,
                    card_number: p.card_number,
                    total_cards: p.total_cards,
                    drawn_card_ids: p.drawn_card_ids,
                }
            }
            "mark-confirmed" => {
                let p: MarkConfirmedPayload = payload("mark-confirmed", data)?;
                Self::MarkConfirmed {
                    card_id: p.card_id,
                    position: p.position,
                }
            }
            "win-available" => Self::WinAvailable,
            "win-result" => {
                let p: WinResultPayload = payload("win-result", data)?;
                Self::WinResult { valid: p.valid }
            }
            "game-over" => {
                let p: GameOverPayload = payload("game-over", data)?;
                Self::GameOver {
                    reason: p.reason,
                    winner: p.winner,
                }
            }
            "game-paused" => Self::GamePaused,
            "game-resumed" => Self::GameResumed,
            "game-reset" => Self::GameReset,
            _ => return Ok(None),
        };
        Ok(Some(event))
    }
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::GameStarted {
                draw_speed_secs: 0, ..
            } => "game started (manual draw)".to_string(),
            Self::GameStarted {
                draw_speed_secs, ..
            } => format!("game started ({draw_speed_secs}s per draw)"),
            Self::TablaAssigned { .. } => "tabla assigned".to_string(),
            Self::CardDrawn {
                card,
                card_number: Some(n),
                total_cards: Some(total),
                ..
            } => format!("card {n}/{total}: {card}"),
            Self::CardDrawn { card, .. } => format!("card drawn: {card}"),
            Self::MarkConfirmed { card_id, position } => {
                format!("mark confirmed for card {card_id} at position {position}")
            }
            Self::WinAvailable => "a winning pattern is available".to_string(),
            Self::WinResult { valid: true } => "win claim accepted".to_string(),
            Self::WinResult { valid: false } => "win claim rejected".to_string(),
            Self::GameOver {
                reason: GameOverReason::Winner,
                winner: Some(winner),
            } => format!("game over, {} wins", winner.name),
            Self::GameOver {
                reason: GameOverReason::DeckEmpty,
                ..
            } => "game over, deck exhausted".to_string(),
            Self::GameOver { .. } => "game over".to_string(),
            Self::GamePaused => "game paused".to_string(),
            Self::GameResumed => "game resumed".to_string(),
            Self::GameReset => "game reset".to_string(),
        };
        write!(f, "{repr}")
    }
}

/// A locally-initiated command, emitted fire-and-forget to the transport.
/// The authoritative effect only lands via a later inbound [`GameEvent`].
#[derive(Clone, Debug, PartialEq)]
pub enum GameCommand {
    StartGame {
        win_pattern: WinPattern,
        draw_speed_secs: u32,
    },
    DrawCard,
    PauseGame,
    ResumeGame,
    ResetGame,
    MarkCard {
        card_id: CardId,
    },
    ClaimWin,
}

impl GameCommand {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::StartGame { .. } => "start-game",
            Self::DrawCard => "draw-card",
            Self::PauseGame => "pause-game",
            Self::ResumeGame => "resume-game",
            Self::ResetGame => "reset-game",
            Self::MarkCard { .. } => "mark-card",
            Self::ClaimWin => "claim-win",
        }
    }

    #[must_use]
    pub fn payload(&self) -> Value {
        match self {
            Self::StartGame {
                win_pattern,
                draw_speed_secs,
            } => json!({ "winPattern": win_pattern, "drawSpeed": draw_speed_secs }),
            Self::MarkCard { card_id } => json!({ "cardId": card_id }),
            _ => json!({}),
        }
    }
}

impl fmt::Display for GameCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::StartGame {
                win_pattern,
                draw_speed_secs,
            } => format!("start game ({win_pattern}, {draw_speed_secs}s)"),
            Self::DrawCard => "draw a card".to_string(),
            Self::PauseGame => "pause the game".to_string(),
            Self::ResumeGame => "resume the game".to_string(),
            Self::ResetGame => "reset the game".to_string(),
            Self::MarkCard { card_id } => format!("mark card {card_id}"),
            Self::ClaimWin => "claim a win".to_string(),
        };
        write!(f, "{repr}")
    }
}
