// src/terminal.rs
// Terminal output for the bingo scoreboard and caller input.

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    execute,
    style::Stylize,
    terminal::{Clear, ClearType},
};

use crate::defs::FREE_TOKEN;
use crate::game::{CardView, Scoreboard};
use crate::score::CardStatus;

/// Cards drawn side by side on one band of the screen.
pub const CARDS_PER_BAND: usize = 4;

const CELL_WIDTH: usize = 4;
const CARD_GAP: &str = "   ";

fn card_width(card: &CardView) -> usize {
    card.cells.first().map_or(0, Vec::len) * CELL_WIDTH
}

/// Header line for a card: its name and, if any, its status.
pub fn card_title(card: &CardView) -> String {
    match card.status {
        CardStatus::None => format!("Card {}", card.name),
        status => format!("Card {} {}", card.name, status.label()),
    }
}

/// One styled string per screen line: the title, then one line per row.
/// Marked cells are highlighted, the free cell shown as `*`.
pub fn card_lines(card: &CardView) -> Vec<String> {
    let width = card_width(card);
    let title = format!("{:<width$}", card_title(card));
    let title = match card.status {
        CardStatus::Bingo => title.bold().green().to_string(),
        CardStatus::Reach => title.bold().yellow().to_string(),
        CardStatus::None => title,
    };

    let mut lines = vec![title];
    for (row, marks) in card.cells.iter().zip(&card.marked) {
        let mut line = String::new();
        for (cell, &marked) in row.iter().zip(marks) {
            let text = if cell.as_str() == FREE_TOKEN { "*" } else { cell.as_str() };
            let padded = format!("{text:>CELL_WIDTH$}");
            if marked {
                line.push_str(&padded.black().on_yellow().to_string());
            } else {
                line.push_str(&padded);
            }
        }
        lines.push(line);
    }
    lines
}

/// Comma-separated called values, already in numeric order.
pub fn called_line(board: &Scoreboard) -> String {
    if board.called.is_empty() {
        return "(none)".to_string();
    }
    board.called.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

pub fn clear_screen() {
    let mut stdout = io::stdout();
    // Not fatal if the terminal refuses; the next frame is just drawn below
    let _ = execute!(stdout, Clear(ClearType::All), MoveTo(0, 0));
}

pub fn show_scoreboard(board: &Scoreboard) {
    println!("{}", format!("Bingo - collection '{}'", board.collection).bold());
    println!("Called numbers: {}", called_line(board));
    println!(
        "{} BINGO, {} REACH, {} cards",
        board.bingo_count,
        board.reach_count,
        board.cards.len()
    );
    println!();

    for band in board.cards.chunks(CARDS_PER_BAND) {
        let rendered: Vec<Vec<String>> = band.iter().map(card_lines).collect();
        let height = rendered.iter().map(Vec::len).max().unwrap_or(0);
        for i in 0..height {
            let parts: Vec<&str> = rendered
                .iter()
                .map(|lines| lines.get(i).map_or("", String::as_str))
                .collect();
            println!("{}", parts.join(CARD_GAP));
        }
        println!();
    }

    for warning in &board.warnings {
        println!("{}", format!("Warning: {warning}").yellow());
    }
}

/// Print a prompt and read one line. `None` on end of input.
pub fn prompt_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Token;

    fn view(status: CardStatus) -> CardView {
        let cells = (0..5)
            .map(|r| (0..5).map(|c| if r == 2 && c == 2 { "FREE".to_string() } else { (r * 5 + c).to_string() }).collect())
            .collect();
        let marked = (0..5).map(|r| (0..5).map(|c| r == 2 && c == 2).collect()).collect();
        CardView {
            name: "07".to_string(),
            status,
            cells,
            marked,
            complete_lines: Vec::new(),
            reach_lines: Vec::new(),
        }
    }

    #[test]
    fn test_card_title() {
        assert_eq!(card_title(&view(CardStatus::None)), "Card 07");
        assert_eq!(card_title(&view(CardStatus::Reach)), "Card 07 REACH!");
        assert_eq!(card_title(&view(CardStatus::Bingo)), "Card 07 BINGO!");
    }

    #[test]
    fn test_card_lines_shape() {
        let lines = card_lines(&view(CardStatus::None));
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0].len(), 20);
        assert_eq!(lines[1], "   0   1   2   3   4");
        assert!(lines[3].contains('*'));
    }

    #[test]
    fn test_called_line() {
        let board = Scoreboard {
            collection: "c".to_string(),
            called: vec![Token::from(2), Token::from(10)],
            cards: Vec::new(),
            bingo_count: 0,
            reach_count: 0,
            warnings: Vec::new(),
        };
        assert_eq!(called_line(&board), "2, 10");

        let empty = Scoreboard { called: Vec::new(), ..board };
        assert_eq!(called_line(&empty), "(none)");
    }
}
