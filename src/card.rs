// src/card.rs
// Card data model: canonical tokens, cells, the 5x5 card and its text format.

use crate::defs::{CARD_SIZE, FREE_TOKEN, NUMBERS_PER_COLUMN};

use std::cmp::Ordering;
use std::fmt;
use rand::seq::SliceRandom;
use rand::rng;
use serde::{Deserialize, Serialize};

/// A cell value or called value in canonical text form.
///
/// Stored card values and caller input go through the same normalization,
/// so `"7"`, `" 07 "` and `"7.0"` all compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

/// A caller token that is not a positive integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidInput {
    pub token: String,
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a positive whole number", self.token)
    }
}

impl std::error::Error for InvalidInput {}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

fn strip_leading_zeros(digits: &str) -> &str {
    let stripped = digits.trim_start_matches('0');
    if stripped.is_empty() { "0" } else { stripped }
}

impl Token {
    /// Normalize a stored cell value. Never fails: non-numeric text is kept
    /// verbatim (trimmed) as an opaque token.
    pub fn from_cell(raw: &str) -> Self {
        let trimmed = raw.trim();
        if is_digits(trimmed) {
            return Token(strip_leading_zeros(trimmed).to_string());
        }
        // Spreadsheet exports write integral numbers as "7.0"
        if let Some((int_part, frac_part)) = trimmed.split_once('.') {
            if is_digits(int_part) && is_digits(frac_part) && frac_part.bytes().all(|b| b == b'0') {
                return Token(strip_leading_zeros(int_part).to_string());
            }
        }
        Token(trimmed.to_string())
    }

    /// Parse one caller token: trimmed, digits only, greater than zero.
    pub fn parse_called(raw: &str) -> Result<Self, InvalidInput> {
        let trimmed = raw.trim();
        if !is_digits(trimmed) {
            return Err(InvalidInput { token: trimmed.to_string() });
        }
        let canonical = strip_leading_zeros(trimmed);
        if canonical == "0" {
            return Err(InvalidInput { token: trimmed.to_string() });
        }
        Ok(Token(canonical.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_numeric(&self) -> bool {
        is_digits(&self.0)
    }
}

impl From<u32> for Token {
    fn from(number: u32) -> Self {
        Token(number.to_string())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Numeric tokens order by value and come before any other text.
// Canonical numeric tokens carry no leading zeros, so a longer one is larger.
impl Ord for Token {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_numeric(), other.is_numeric()) {
            (true, true) => self.0.len().cmp(&other.0.len()).then_with(|| self.0.cmp(&other.0)),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for Token {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Value(Token),
    Free,
}

impl Cell {
    /// Read a cell from card text. Empty text and `FREE` are the free cell.
    /// One pair of surrounding double quotes is dropped.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let trimmed = trimmed
            .strip_prefix('"')
            .and_then(|inner| inner.strip_suffix('"'))
            .map_or(trimmed, str::trim);
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(FREE_TOKEN) {
            Cell::Free
        } else {
            Cell::Value(Token::from_cell(trimmed))
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, Cell::Free)
    }

    pub fn token(&self) -> Option<&Token> {
        match self {
            Cell::Value(token) => Some(token),
            Cell::Free => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Value(token) => write!(f, "{token}"),
            Cell::Free => f.write_str(FREE_TOKEN),
        }
    }
}

#[derive(Debug)]
pub enum CardParseError {
    RowCount(usize),
    ColumnCount { row: usize, found: usize },
    FreeCellCount(usize),
    Io(std::io::Error),
}

impl fmt::Display for CardParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardParseError::RowCount(found) => {
                write!(f, "expected {CARD_SIZE} rows, found {found}")
            }
            CardParseError::ColumnCount { row, found } => {
                write!(f, "row {} has {found} cells, expected {CARD_SIZE}", row + 1)
            }
            CardParseError::FreeCellCount(found) => {
                write!(f, "expected exactly one free cell, found {found}")
            }
            CardParseError::Io(e) => write!(f, "cannot read card: {e}"),
        }
    }
}

impl std::error::Error for CardParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CardParseError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CardParseError {
    fn from(e: std::io::Error) -> Self {
        CardParseError::Io(e)
    }
}

/// A 5x5 bingo card with exactly one free cell. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    cells: [[Cell; CARD_SIZE]; CARD_SIZE],
}

impl Card {
    /// Build a card from rows of cells, checking the shape and the free cell.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self, CardParseError> {
        if rows.len() != CARD_SIZE {
            return Err(CardParseError::RowCount(rows.len()));
        }
        if let Some((row, cells)) = rows.iter().enumerate().find(|(_, r)| r.len() != CARD_SIZE) {
            return Err(CardParseError::ColumnCount { row, found: cells.len() });
        }

        let free_cells = rows.iter().flatten().filter(|cell| cell.is_free()).count();
        if free_cells != 1 {
            return Err(CardParseError::FreeCellCount(free_cells));
        }

        let mut rows = rows.into_iter();
        let cells = std::array::from_fn(|_| {
            let mut row = rows.next().unwrap_or_default().into_iter();
            std::array::from_fn(|_| row.next().unwrap_or(Cell::Free))
        });
        Ok(Card { cells })
    }

    /// Parse the row-per-line text format. Blank lines and a leading
    /// byte order mark are skipped.
    pub fn parse_csv(text: &str) -> Result<Self, CardParseError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let rows = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.split(',').map(Cell::parse).collect())
            .collect();
        Card::from_rows(rows)
    }

    /// Write the card in the same format `parse_csv` reads.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for row in &self.cells {
            let line: Vec<String> = row.iter().map(Cell::to_string).collect();
            out.push_str(&line.join(","));
            out.push('\n');
        }
        out
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.cells[row][col]
    }

    pub fn rows(&self) -> &[[Cell; CARD_SIZE]; CARD_SIZE] {
        &self.cells
    }
}

/// Generates classic B-I-N-G-O cards: column k holds five distinct numbers
/// from `15k+1..=15k+15`, sorted top to bottom, with a free centre.
#[derive(Debug, Clone, Default)]
pub struct CardGenerator;

impl CardGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate_card(&self) -> Card {
        let mut rng = rng();
        let mut columns: Vec<Vec<u32>> = Vec::with_capacity(CARD_SIZE);
        for col in 0..CARD_SIZE as u32 {
            let start = col * NUMBERS_PER_COLUMN + 1;
            let mut band: Vec<u32> = (start..start + NUMBERS_PER_COLUMN).collect();
            band.shuffle(&mut rng);
            band.truncate(CARD_SIZE);
            band.sort();
            columns.push(band);
        }

        let centre = CARD_SIZE / 2;
        let cells = std::array::from_fn(|r| {
            std::array::from_fn(|c| {
                if r == centre && c == centre {
                    Cell::Free
                } else {
                    Cell::Value(Token::from(columns[c][r]))
                }
            })
        });
        Card { cells }
    }

    pub fn generate_cards(&self, count: usize) -> Vec<Card> {
        (0..count).map(|_| self.generate_card()).collect()
    }
}
