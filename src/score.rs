// src/score.rs
// Card evaluation: which lines of a card are complete or one cell short.

use serde::{Deserialize, Serialize};

use crate::called::CalledSet;
use crate::card::{Card, Cell, Token};
use crate::defs::CARD_SIZE;

/// Card-level outcome. Ordered so the best outcome is the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardStatus {
    None,
    Reach,
    Bingo,
}

impl CardStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CardStatus::None => "",
            CardStatus::Reach => "REACH!",
            CardStatus::Bingo => "BINGO!",
        }
    }
}

/// One of the twelve lines of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum Line {
    Row(usize),
    Column(usize),
    /// Top-left to bottom-right.
    MainDiagonal,
    /// Top-right to bottom-left.
    AntiDiagonal,
}

impl Line {
    /// Rows, then columns, then the two diagonals.
    pub fn all() -> impl Iterator<Item = Line> {
        (0..CARD_SIZE)
            .map(Line::Row)
            .chain((0..CARD_SIZE).map(Line::Column))
            .chain([Line::MainDiagonal, Line::AntiDiagonal])
    }

    /// False for a row or column index past the edge of the card.
    pub fn is_on_card(&self) -> bool {
        match *self {
            Line::Row(i) | Line::Column(i) => i < CARD_SIZE,
            Line::MainDiagonal | Line::AntiDiagonal => true,
        }
    }

    /// The (row, column) coordinates of the line's cells.
    pub fn positions(&self) -> [(usize, usize); CARD_SIZE] {
        std::array::from_fn(|i| match *self {
            Line::Row(r) => (r, i),
            Line::Column(c) => (i, c),
            Line::MainDiagonal => (i, i),
            Line::AntiDiagonal => (i, CARD_SIZE - 1 - i),
        })
    }
}

/// A line one cell short of completion, and the value that would complete it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReachLine {
    pub line: Line,
    pub missing: Token,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardReport {
    pub status: CardStatus,
    pub complete_lines: Vec<Line>,
    pub reach_lines: Vec<ReachLine>,
}

/// A cell is marked when it is the free cell or its value has been called.
/// Used both for scoring and for highlighting.
pub fn is_marked(cell: &Cell, called: &CalledSet) -> bool {
    match cell {
        Cell::Free => true,
        Cell::Value(token) => called.contains_token(token),
    }
}

pub fn marked_mask(card: &Card, called: &CalledSet) -> [[bool; CARD_SIZE]; CARD_SIZE] {
    std::array::from_fn(|r| std::array::from_fn(|c| is_marked(card.cell(r, c), called)))
}

/// Outcome of a single line: `Bingo` at five marked cells, `Reach` at four.
pub fn line_status(card: &Card, called: &CalledSet, line: Line) -> CardStatus {
    if !line.is_on_card() {
        return CardStatus::None;
    }
    let marked = line
        .positions()
        .iter()
        .filter(|&&(r, c)| is_marked(card.cell(r, c), called))
        .count();

    match marked {
        n if n == CARD_SIZE => CardStatus::Bingo,
        n if n == CARD_SIZE - 1 => CardStatus::Reach,
        _ => CardStatus::None,
    }
}

/// Status of the whole card. A complete line anywhere wins over any
/// number of lines one cell short.
pub fn evaluate(card: &Card, called: &CalledSet) -> CardStatus {
    Line::all()
        .map(|line| line_status(card, called, line))
        .max()
        .unwrap_or(CardStatus::None)
}

/// Like `evaluate`, but also lists the complete lines and the reach lines.
pub fn assess(card: &Card, called: &CalledSet) -> CardReport {
    let mut complete_lines = Vec::new();
    let mut reach_lines = Vec::new();

    for line in Line::all() {
        let unmarked: Vec<&Cell> = line
            .positions()
            .iter()
            .map(|&(r, c)| card.cell(r, c))
            .filter(|cell| !is_marked(cell, called))
            .collect();

        match unmarked.as_slice() {
            [] => complete_lines.push(line),
            [cell] => {
                // The free cell is always marked, so the missing one holds a value
                if let Some(token) = cell.token() {
                    reach_lines.push(ReachLine { line, missing: token.clone() });
                }
            }
            _ => {}
        }
    }

    let status = if !complete_lines.is_empty() {
        CardStatus::Bingo
    } else if !reach_lines.is_empty() {
        CardStatus::Reach
    } else {
        CardStatus::None
    };

    CardReport { status, complete_lines, reach_lines }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defs::LINES_PER_CARD;
    use proptest::prelude::*;

    const SAMPLE: &str = "1,2,3,4,5\n6,7,8,9,10\n11,12,FREE,13,14\n15,16,17,18,19\n20,21,22,23,24";

    fn sample_card() -> Card {
        Card::parse_csv(SAMPLE).unwrap()
    }

    fn called_from(input: &str) -> CalledSet {
        let mut called = CalledSet::new();
        let report = called.toggle_batch(input);
        assert!(report.rejected.is_empty());
        called
    }

    #[test]
    fn test_line_enumeration() {
        let lines: Vec<Line> = Line::all().collect();
        assert_eq!(lines.len(), LINES_PER_CARD);
        assert_eq!(Line::MainDiagonal.positions(), [(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]);
        assert_eq!(Line::AntiDiagonal.positions(), [(0, 4), (1, 3), (2, 2), (3, 1), (4, 0)]);
        assert_eq!(Line::Column(3).positions()[4], (4, 3));
    }

    #[test]
    fn test_empty_called_is_none() {
        assert_eq!(evaluate(&sample_card(), &CalledSet::new()), CardStatus::None);
    }

    #[test]
    fn test_row_reach_then_bingo() {
        let card = sample_card();
        let mut called = called_from("1,2,3,4");
        assert_eq!(evaluate(&card, &called), CardStatus::Reach);

        called.toggle("5").unwrap();
        assert_eq!(evaluate(&card, &called), CardStatus::Bingo);
    }

    #[test]
    fn test_free_cell_completes_middle_row() {
        let card = sample_card();
        let called = called_from("11,12,13,14");
        assert_eq!(evaluate(&card, &called), CardStatus::Bingo);

        let report = assess(&card, &called);
        assert_eq!(report.complete_lines, vec![Line::Row(2)]);
    }

    #[test]
    fn test_diagonal_through_free_cell() {
        let card = sample_card();
        let called = called_from("1,7,18");
        assert_eq!(evaluate(&card, &called), CardStatus::Reach);
        let report = assess(&card, &called);
        assert_eq!(
            report.reach_lines,
            vec![ReachLine { line: Line::MainDiagonal, missing: Token::from(24) }]
        );

        let called = called_from("5,9,16,20");
        assert_eq!(assess(&card, &called).complete_lines, vec![Line::AntiDiagonal]);
    }

    #[test]
    fn test_column_reach() {
        let card = sample_card();
        let called = called_from("1,6,11,15");
        let report = assess(&card, &called);
        assert_eq!(report.status, CardStatus::Reach);
        assert_eq!(report.reach_lines[0], ReachLine { line: Line::Column(0), missing: Token::from(20) });
    }

    #[test]
    fn test_bingo_overrides_reach() {
        let card = sample_card();
        // Row 0 complete, column 4 one short (5, 10, 14, 19 called; 24 missing)
        let called = called_from("1,2,3,4,5,10,14,19");
        let report = assess(&card, &called);
        assert_eq!(report.status, CardStatus::Bingo);
        assert!(report.reach_lines.iter().any(|r| r.line == Line::Column(4)));
        assert_eq!(evaluate(&card, &called), CardStatus::Bingo);
    }

    #[test]
    fn test_three_marked_is_none() {
        let card = sample_card();
        assert_eq!(evaluate(&card, &called_from("1,2,3")), CardStatus::None);
    }

    #[test]
    fn test_stored_values_normalized_against_input() {
        let text = "01,2.0, 3 ,4,5\n6,7,8,9,10\n11,12,,13,14\n15,16,17,18,19\n20,21,22,23,24";
        let card = Card::parse_csv(text).unwrap();
        assert_eq!(evaluate(&card, &called_from("1,2,3,4,5")), CardStatus::Bingo);
    }

    #[test]
    fn test_free_cell_off_centre_counts() {
        let text = "FREE,2,3,4,5\n6,7,8,9,10\n11,12,99,13,14\n15,16,17,18,19\n20,21,22,23,24";
        let card = Card::parse_csv(text).unwrap();
        assert_eq!(evaluate(&card, &called_from("2,3,4,5")), CardStatus::Bingo);
        assert_eq!(evaluate(&card, &called_from("7,99")), CardStatus::None);
        assert_eq!(evaluate(&card, &called_from("7,99,18")), CardStatus::Reach);
    }

    #[test]
    fn test_marked_mask_matches_predicate() {
        let card = sample_card();
        let called = called_from("1,13");
        let mask = marked_mask(&card, &called);
        assert!(mask[0][0]);
        assert!(mask[2][2]);
        assert!(mask[2][3]);
        assert_eq!(mask.iter().flatten().filter(|&&m| m).count(), 3);
    }

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&CardStatus::Reach).unwrap(), "\"REACH\"");
        assert_eq!(serde_json::to_string(&CardStatus::None).unwrap(), "\"NONE\"");
    }

    #[test]
    fn test_line_off_the_card_is_none() {
        let card = sample_card();
        let called: CalledSet = all_values(&card).into_iter().collect();
        assert!(!Line::Row(7).is_on_card());
        assert!(!Line::Column(CARD_SIZE).is_on_card());
        assert_eq!(line_status(&card, &called, Line::Row(7)), CardStatus::None);
        assert_eq!(line_status(&card, &called, Line::Column(CARD_SIZE)), CardStatus::None);
        assert!(Line::all().all(|line| line.is_on_card()));
    }

    fn arb_card() -> impl Strategy<Value = Card> {
        (
            proptest::collection::hash_set(1u32..1000, CARD_SIZE * CARD_SIZE),
            0..CARD_SIZE * CARD_SIZE,
        )
            .prop_map(|(values, free)| {
                let values: Vec<u32> = values.into_iter().collect();
                let rows = (0..CARD_SIZE)
                    .map(|r| {
                        (0..CARD_SIZE)
                            .map(|c| {
                                let idx = r * CARD_SIZE + c;
                                if idx == free {
                                    Cell::Free
                                } else {
                                    Cell::Value(Token::from(values[idx]))
                                }
                            })
                            .collect()
                    })
                    .collect();
                Card::from_rows(rows).unwrap()
            })
    }

    fn all_values(card: &Card) -> Vec<Token> {
        card.rows().iter().flatten().filter_map(|cell| cell.token().cloned()).collect()
    }

    proptest! {
        #[test]
        fn prop_empty_called_is_none(card in arb_card()) {
            prop_assert_eq!(evaluate(&card, &CalledSet::new()), CardStatus::None);
        }

        #[test]
        fn prop_all_values_called_is_bingo(card in arb_card()) {
            let called: CalledSet = all_values(&card).into_iter().collect();
            let report = assess(&card, &called);
            prop_assert_eq!(report.status, CardStatus::Bingo);
            prop_assert_eq!(report.complete_lines.len(), LINES_PER_CARD);
        }

        #[test]
        fn prop_insertion_order_irrelevant(
            card in arb_card(),
            picks in proptest::collection::vec(0usize..24, 0..24),
        ) {
            let values = all_values(&card);
            let chosen: Vec<Token> = picks.iter().map(|&i| values[i].clone()).collect();
            let forward: CalledSet = chosen.iter().cloned().collect();
            let backward: CalledSet = chosen.iter().rev().cloned().collect();
            prop_assert_eq!(evaluate(&card, &forward), evaluate(&card, &backward));
        }

        #[test]
        fn prop_evaluate_agrees_with_assess(
            card in arb_card(),
            picks in proptest::collection::vec(0usize..24, 0..24),
        ) {
            let values = all_values(&card);
            let called: CalledSet = picks.iter().map(|&i| values[i].clone()).collect();
            let report = assess(&card, &called);
            prop_assert_eq!(evaluate(&card, &called), report.status);
            let reach_count = Line::all()
                .filter(|&line| line_status(&card, &called, line) == CardStatus::Reach)
                .count();
            prop_assert_eq!(report.reach_lines.len(), reach_count);
        }

        #[test]
        fn prop_four_of_a_row_is_reach(card in arb_card(), row in 0..CARD_SIZE, skip in 0..CARD_SIZE) {
            // Only this row is called, so no other line can get past two marked cells
            let positions = Line::Row(row).positions();
            let valued: Vec<(usize, usize)> = positions
                .iter()
                .copied()
                .filter(|&(r, c)| !card.cell(r, c).is_free())
                .collect();
            let left_out = valued[skip % valued.len()];
            let called: CalledSet = valued
                .iter()
                .filter(|&&pos| pos != left_out)
                .filter_map(|&(r, c)| card.cell(r, c).token().cloned())
                .collect();
            prop_assert_eq!(evaluate(&card, &called), CardStatus::Reach);
            prop_assert_eq!(line_status(&card, &called, Line::Row(row)), CardStatus::Reach);
        }
    }
}
