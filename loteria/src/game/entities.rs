use serde::{Deserialize, Serialize};
use std::fmt;

use super::constants::{DEFAULT_DRAW_SPEED_SECS, MANUAL_DRAW, TABLA_SIZE};

/// Identity of a card within the deck.
pub type CardId = u32;

/// Card text language selector.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Es,
    En,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Es => "es",
            Self::En => "en",
        };
        write!(f, "{repr}")
    }
}

/// A single Lotería card as received from the authority. Identity is `id`;
/// the remaining fields are display material and are never mutated after
/// receipt.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Card {
    pub id: CardId,
    pub name_es: String,
    pub name_en: String,
    #[serde(default)]
    pub verse_es: String,
    #[serde(default)]
    pub verse_en: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub vo_es: String,
    #[serde(default)]
    pub vo_en: String,
}

impl Card {
    #[must_use]
    pub fn name(&self, language: Language) -> &str {
        match language {
            Language::Es => &self.name_es,
            Language::En => &self.name_en,
        }
    }

    #[must_use]
    pub fn verse(&self, language: Language) -> &str {
        match language {
            Language::Es => &self.verse_es,
            Language::En => &self.verse_en,
        }
    }

    #[must_use]
    pub fn voice_over(&self, language: Language) -> &str {
        match language {
            Language::Es => &self.vo_es,
            Language::En => &self.vo_en,
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.name_es.fmt(f)
    }
}

/// One cell on a tabla. `marked` only ever goes false to true; the whole
/// board is replaced on reset.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct TablaCell {
    pub card: Card,
    #[serde(default)]
    pub marked: bool,
    pub position: usize,
}

/// Errors from assembling a tabla out of authority-supplied cells.
#[derive(Debug, Eq, PartialEq, thiserror::Error)]
pub enum TablaError {
    #[error("expected 16 cells, got {0}")]
    WrongCellCount(usize),
    #[error("cell positions must cover 0..16 exactly")]
    BadPositions,
}

/// The player's 4x4 board: exactly 16 cells, index = board position.
/// Constructed only through [`Tabla::from_cells`], so an assigned tabla is
/// always complete and position-ordered.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Tabla(Vec<TablaCell>);

impl Tabla {
    /// Build a tabla from authority-supplied cells, sorting them into
    /// position order.
    pub fn from_cells(mut cells: Vec<TablaCell>) -> Result<Self, TablaError> {
        if cells.len() != TABLA_SIZE {
            return Err(TablaError::WrongCellCount(cells.len()));
        }
        cells.sort_by_key(|cell| cell.position);
        if cells.iter().enumerate().any(|(i, cell)| cell.position != i) {
            return Err(TablaError::BadPositions);
        }
        Ok(Self(cells))
    }

    #[must_use]
    pub fn cells(&self) -> &[TablaCell] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn cell(&self, position: usize) -> Option<&TablaCell> {
        self.0.get(position)
    }

    #[must_use]
    pub fn cell_by_card(&self, card_id: CardId) -> Option<&TablaCell> {
        self.0.iter().find(|cell| cell.card.id == card_id)
    }

    /// Mark the cell holding `card_id`. Returns whether a cell matched.
    pub fn mark(&mut self, card_id: CardId) -> bool {
        match self.0.iter_mut().find(|cell| cell.card.id == card_id) {
            Some(cell) => {
                cell.marked = true;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn marked_positions(&self) -> Vec<usize> {
        self.0
            .iter()
            .filter(|cell| cell.marked)
            .map(|cell| cell.position)
            .collect()
    }
}

/// The winning player announced by the authority at the end of a round won
/// by pattern completion.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Winner {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pattern: Vec<usize>,
}

/// Round lifecycle. Transitions come only from inbound events.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GamePhase {
    #[default]
    Waiting,
    Playing,
    Paused,
    Finished,
}

impl GamePhase {
    /// Whether a round is underway (board is showing).
    #[must_use]
    pub fn in_round(&self) -> bool {
        matches!(self, Self::Playing | Self::Paused)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Waiting => "waiting",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Finished => "finished",
        };
        write!(f, "{repr}")
    }
}

/// Board patterns the authority can verify a win against.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WinPattern {
    #[default]
    Line,
    Corners,
    Center,
    X,
    Full,
}

impl WinPattern {
    pub const ALL: [Self; 5] = [Self::Line, Self::Corners, Self::Center, Self::X, Self::Full];
}

impl fmt::Display for WinPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Line => "line",
            Self::Corners => "corners",
            Self::Center => "center",
            Self::X => "x",
            Self::Full => "full",
        };
        write!(f, "{repr}")
    }
}

#[derive(Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown win pattern: {0}")]
pub struct UnknownPattern(pub String);

impl std::str::FromStr for WinPattern {
    type Err = UnknownPattern;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" => Ok(Self::Line),
            "corners" => Ok(Self::Corners),
            "center" => Ok(Self::Center),
            "x" => Ok(Self::X),
            "full" => Ok(Self::Full),
            other => Err(UnknownPattern(other.to_string())),
        }
    }
}

/// Round configuration. The server-owned fields are replaced wholesale on
/// `game-started`; `language` is a local selector.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GameSettings {
    pub win_patterns: Vec<WinPattern>,
    pub draw_speed_secs: u32,
    pub language: Language,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            win_patterns: vec![WinPattern::Line],
            draw_speed_secs: DEFAULT_DRAW_SPEED_SECS,
            language: Language::Es,
        }
    }
}

impl GameSettings {
    /// Whether the host draws each card by hand.
    #[must_use]
    pub fn is_manual_draw(&self) -> bool {
        self.draw_speed_secs == MANUAL_DRAW
    }
}
