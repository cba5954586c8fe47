// src/defs.rs
// Shared constants for the bingo card layout and the card store.

/// Cells per row and rows per card.
pub const CARD_SIZE: usize = 5;

/// Number of lines evaluated on every card: rows, columns and both diagonals.
pub const LINES_PER_CARD: usize = 2 * CARD_SIZE + 2;

/// Sentinel written in card files for the free cell. An empty cell means the same.
pub const FREE_TOKEN: &str = "FREE";

/// Extension of card files inside a collection folder.
pub const CARD_FILE_EXT: &str = "csv";

/// Default upper bound on cards loaded from one collection.
pub const DEFAULT_MAX_CARDS: usize = 20;

/// Numbers per column band on a generated card (B: 1-15, I: 16-30, ...).
pub const NUMBERS_PER_COLUMN: u32 = 15;
