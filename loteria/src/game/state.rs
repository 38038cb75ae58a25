use super::entities::{Card, CardId, GamePhase, GameSettings, Tabla, Winner};

/// The reduced local view of one game round. This is the single source of
/// truth the views render from; it is only written through the store.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GameState {
    pub phase: GamePhase,
    pub tabla: Tabla,
    pub current_card: Option<Card>,
    pub drawn_cards: Vec<Card>,
    pub settings: GameSettings,
    pub show_win_claim: bool,
    pub pending_win_claim: bool,
    pub winner: Option<Winner>,
}

impl GameState {
    #[must_use]
    pub fn is_drawn(&self, card_id: CardId) -> bool {
        self.drawn_cards.iter().any(|card| card.id == card_id)
    }

    /// Whether a mark request for `card_id` would pass the command
    /// boundary: the card is on this tabla, has been drawn, and is unmarked.
    #[must_use]
    pub fn can_mark(&self, card_id: CardId) -> bool {
        self.is_drawn(card_id)
            && self
                .tabla
                .cell_by_card(card_id)
                .is_some_and(|cell| !cell.marked)
    }

    #[must_use]
    pub fn can_claim_win(&self) -> bool {
        self.show_win_claim && !self.pending_win_claim
    }
}
