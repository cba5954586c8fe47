// src/game.rs
// Session state for one bingo event: the loaded cards and the called set.
// The called set is the only mutable game state; every scoreboard is
// recomputed from it on request.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::called::{CalledSet, ToggleReport};
use crate::card::Token;
use crate::logging::{log_info, log_warning};
use crate::score::{assess, marked_mask, CardStatus, Line, ReachLine};
use crate::store::{CardCollection, CardStore, StoreError};

/// One card as shown on the scoreboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    pub name: String,
    pub status: CardStatus,
    pub cells: Vec<Vec<String>>,
    pub marked: Vec<Vec<bool>>,
    pub complete_lines: Vec<Line>,
    pub reach_lines: Vec<ReachLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scoreboard {
    pub collection: String,
    pub called: Vec<Token>,
    pub cards: Vec<CardView>,
    pub bingo_count: usize,
    pub reach_count: usize,
    pub warnings: Vec<String>,
}

/// Shared session. Cloning hands out another handle to the same state:
/// toggles take the write lock, scoreboards only read.
#[derive(Clone)]
pub struct Session {
    created_at: SystemTime,
    cards: Arc<RwLock<CardCollection>>,
    called: Arc<RwLock<CalledSet>>,
}

impl Session {
    pub fn new(collection: CardCollection) -> Self {
        Self {
            created_at: SystemTime::now(),
            cards: Arc::new(RwLock::new(collection)),
            called: Arc::new(RwLock::new(CalledSet::new())),
        }
    }

    /// Load a collection from the store and start a session on it.
    pub fn open(store: &CardStore, collection_id: &str) -> Result<Self, StoreError> {
        Ok(Self::new(store.load(collection_id)?))
    }

    fn read_called(&self) -> Result<RwLockReadGuard<'_, CalledSet>, String> {
        self.called.read().map_err(|_| "Failed to acquire called set lock".to_string())
    }

    fn write_called(&self) -> Result<RwLockWriteGuard<'_, CalledSet>, String> {
        self.called.write().map_err(|_| "Failed to acquire called set lock".to_string())
    }

    fn read_cards(&self) -> Result<RwLockReadGuard<'_, CardCollection>, String> {
        self.cards.read().map_err(|_| "Failed to acquire card collection lock".to_string())
    }

    pub fn created_at_string(&self) -> String {
        let datetime: DateTime<Utc> = self.created_at.into();
        datetime.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }

    /// Apply a comma-separated caller submission.
    pub fn toggle(&self, input: &str) -> Result<ToggleReport, String> {
        let report = self.write_called()?.toggle_batch(input);

        for token in &report.added {
            log_info(&format!("Called {token}"));
        }
        for token in &report.removed {
            log_info(&format!("Uncalled {token}"));
        }
        if let Some(warning) = report.warning() {
            log_warning(&warning);
        }
        Ok(report)
    }

    /// Clear the called set for a new round.
    pub fn reset(&self) -> Result<(), String> {
        self.write_called()?.clear();
        log_info("Called numbers cleared");
        Ok(())
    }

    /// Re-read the current collection from the store. The called set is kept.
    pub fn reload(&self, store: &CardStore) -> Result<usize, String> {
        let id = self.collection_id()?;
        let collection = store.load(&id).map_err(|e| e.to_string())?;
        let count = collection.cards.len();
        let mut cards = self.cards.write().map_err(|_| "Failed to acquire card collection lock".to_string())?;
        *cards = collection;
        Ok(count)
    }

    pub fn collection_id(&self) -> Result<String, String> {
        Ok(self.read_cards()?.id.clone())
    }

    pub fn card_count(&self) -> Result<usize, String> {
        Ok(self.read_cards()?.cards.len())
    }

    pub fn called_sorted(&self) -> Result<Vec<Token>, String> {
        Ok(self.read_called()?.list_sorted())
    }

    /// Evaluate every card against the current called set.
    pub fn scoreboard(&self) -> Result<Scoreboard, String> {
        let collection = self.read_cards()?;
        let called = self.read_called()?;
        Ok(build_scoreboard(&collection, &called))
    }
}

pub fn build_scoreboard(collection: &CardCollection, called: &CalledSet) -> Scoreboard {
    let cards: Vec<CardView> = collection
        .cards
        .iter()
        .map(|named| {
            let report = assess(&named.card, called);
            let mask = marked_mask(&named.card, called);
            CardView {
                name: named.name.clone(),
                status: report.status,
                cells: named
                    .card
                    .rows()
                    .iter()
                    .map(|row| row.iter().map(ToString::to_string).collect())
                    .collect(),
                marked: mask.iter().map(|row| row.to_vec()).collect(),
                complete_lines: report.complete_lines,
                reach_lines: report.reach_lines,
            }
        })
        .collect();

    let bingo_count = cards.iter().filter(|c| c.status == CardStatus::Bingo).count();
    let reach_count = cards.iter().filter(|c| c.status == CardStatus::Reach).count();

    Scoreboard {
        collection: collection.id.clone(),
        called: called.list_sorted(),
        cards,
        bingo_count,
        reach_count,
        warnings: collection.warnings.iter().map(ToString::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;
    use crate::store::NamedCard;

    const SAMPLE: &str = "1,2,3,4,5\n6,7,8,9,10\n11,12,FREE,13,14\n15,16,17,18,19\n20,21,22,23,24";
    const SHIFTED: &str = "31,32,33,34,35\n36,37,38,39,40\n41,42,FREE,43,44\n45,46,47,48,49\n50,51,52,53,54";

    fn session() -> Session {
        let collection = CardCollection {
            id: "test".to_string(),
            cards: vec![
                NamedCard { name: "01".to_string(), card: Card::parse_csv(SAMPLE).unwrap() },
                NamedCard { name: "02".to_string(), card: Card::parse_csv(SHIFTED).unwrap() },
            ],
            warnings: Vec::new(),
        };
        Session::new(collection)
    }

    fn statuses(board: &Scoreboard) -> Vec<CardStatus> {
        board.cards.iter().map(|c| c.status).collect()
    }

    #[test]
    fn test_scoreboard_follows_toggles() {
        let session = session();
        assert_eq!(statuses(&session.scoreboard().unwrap()), vec![CardStatus::None, CardStatus::None]);

        session.toggle("1,2,3,4").unwrap();
        let board = session.scoreboard().unwrap();
        assert_eq!(statuses(&board), vec![CardStatus::Reach, CardStatus::None]);
        assert_eq!(board.reach_count, 1);

        session.toggle("5").unwrap();
        let board = session.scoreboard().unwrap();
        assert_eq!(statuses(&board), vec![CardStatus::Bingo, CardStatus::None]);
        assert_eq!(board.bingo_count, 1);
        assert_eq!(board.reach_count, 0);

        // Undo the last call
        session.toggle("5").unwrap();
        assert_eq!(statuses(&session.scoreboard().unwrap())[0], CardStatus::Reach);
    }

    #[test]
    fn test_scoreboard_cells_and_marks() {
        let session = session();
        session.toggle("13").unwrap();
        let board = session.scoreboard().unwrap();
        let card = &board.cards[0];
        assert_eq!(card.cells[2][2], "FREE");
        assert_eq!(card.cells[2][3], "13");
        assert!(card.marked[2][2]);
        assert!(card.marked[2][3]);
        assert!(!card.marked[0][0]);
    }

    #[test]
    fn test_called_listed_numerically() {
        let session = session();
        let report = session.toggle("10, 2, zz, 33").unwrap();
        assert_eq!(report.rejected, vec!["zz".to_string()]);
        let called: Vec<String> = session.called_sorted().unwrap().iter().map(ToString::to_string).collect();
        assert_eq!(called, vec!["2", "10", "33"]);
        assert_eq!(session.scoreboard().unwrap().called.len(), 3);
    }

    #[test]
    fn test_reset_clears_called() {
        let session = session();
        session.toggle("11,12,13,14").unwrap();
        assert_eq!(session.scoreboard().unwrap().bingo_count, 1);
        session.reset().unwrap();
        let board = session.scoreboard().unwrap();
        assert!(board.called.is_empty());
        assert_eq!(board.bingo_count, 0);
    }

    #[test]
    fn test_clones_share_state() {
        let session = session();
        let viewer = session.clone();
        session.toggle("7").unwrap();
        assert_eq!(viewer.called_sorted().unwrap(), vec![Token::from(7)]);
    }

    #[test]
    fn test_scoreboard_json_shape() {
        let session = session();
        session.toggle("1,2,3,4").unwrap();
        let json = serde_json::to_value(session.scoreboard().unwrap()).unwrap();
        assert_eq!(json["called"], serde_json::json!(["1", "2", "3", "4"]));
        assert_eq!(json["cards"][0]["status"], "REACH");
        assert_eq!(json["cards"][0]["reach_lines"][0]["line"]["kind"], "row");
        assert_eq!(json["cards"][0]["reach_lines"][0]["missing"], "5");
    }

    #[test]
    fn test_reload_picks_up_new_cards_and_keeps_called() {
        let dir = tempfile::TempDir::new().unwrap();
        let folder = dir.path().join("hall");
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join("1.csv"), SAMPLE).unwrap();
        let store = CardStore::new(dir.path(), 20);

        let session = Session::open(&store, "hall").unwrap();
        session.toggle("31,32,33,34").unwrap();
        assert_eq!(session.card_count().unwrap(), 1);

        std::fs::write(folder.join("2.csv"), SHIFTED).unwrap();
        assert_eq!(session.reload(&store).unwrap(), 2);
        assert_eq!(session.card_count().unwrap(), 2);
        assert_eq!(session.called_sorted().unwrap().len(), 4);

        let board = session.scoreboard().unwrap();
        assert_eq!(statuses(&board), vec![CardStatus::None, CardStatus::Reach]);
    }

    #[test]
    fn test_reload_of_removed_collection_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let folder = dir.path().join("hall");
        std::fs::create_dir_all(&folder).unwrap();
        std::fs::write(folder.join("1.csv"), SAMPLE).unwrap();
        let store = CardStore::new(dir.path(), 20);

        let session = Session::open(&store, "hall").unwrap();
        std::fs::remove_dir_all(&folder).unwrap();
        assert!(session.reload(&store).is_err());
        assert_eq!(session.card_count().unwrap(), 1);
    }
}
