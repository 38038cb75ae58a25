//! Game-wide constants.

/// Number of cells on a tabla (4x4 board).
pub const TABLA_SIZE: usize = 16;

/// Number of columns (and rows) on a tabla.
pub const TABLA_COLS: usize = 4;

/// Number of cards in a full Lotería deck.
pub const DECK_SIZE: usize = 54;

/// Default seconds between automatic card draws.
pub const DEFAULT_DRAW_SPEED_SECS: u32 = 8;

/// Draw speed value meaning the host draws each card by hand.
pub const MANUAL_DRAW: u32 = 0;

/// Draw speed presets offered to the host, slowest last.
pub const DRAW_SPEED_CHOICES: [u32; 4] = [5, DEFAULT_DRAW_SPEED_SECS, 12, MANUAL_DRAW];

/// Length of a room code.
pub const ROOM_CODE_LEN: usize = 4;

/// Minimum accepted player name length.
pub const MIN_NAME_LEN: usize = 2;

/// Maximum accepted player name length. Longer names are truncated.
pub const MAX_NAME_LEN: usize = 20;
