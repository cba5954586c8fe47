// src/store.rs
// Card store: one folder per collection, one `<N>.csv` file per card.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::card::{Card, CardParseError};
use crate::defs::CARD_FILE_EXT;
use crate::logging::{log_info, log_warning};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedCard {
    pub name: String,
    pub card: Card,
}

/// A card file that could not be read and was left out of the collection.
#[derive(Debug)]
pub struct SkippedCard {
    pub name: String,
    pub error: CardParseError,
}

impl fmt::Display for SkippedCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Card {} skipped: {}", self.name, self.error)
    }
}

#[derive(Debug, Default)]
pub struct CardCollection {
    pub id: String,
    pub cards: Vec<NamedCard>,
    pub warnings: Vec<SkippedCard>,
}

#[derive(Debug)]
pub enum StoreError {
    InvalidCollectionId(String),
    IndexExhausted(String),
    Io { path: PathBuf, source: std::io::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::InvalidCollectionId(id) => write!(f, "invalid collection id '{id}'"),
            StoreError::IndexExhausted(id) => write!(f, "no card index left in collection '{id}'"),
            StoreError::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            StoreError::InvalidCollectionId(_) | StoreError::IndexExhausted(_) => None,
        }
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io { path: path.to_path_buf(), source }
}

/// Collection ids become folder names, so only a safe alphabet is accepted.
pub fn is_valid_collection_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Card index from a file name such as `12.csv`. The stem must be plain
/// digits without a leading zero, so `01.csv` and `+1.csv` are not cards.
fn card_index(path: &Path) -> Option<u32> {
    if path.extension()?.to_str()? != CARD_FILE_EXT {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem.starts_with('0') || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}

#[derive(Debug, Clone)]
pub struct CardStore {
    root: PathBuf,
    max_cards: usize,
}

impl CardStore {
    pub fn new<P: AsRef<Path>>(root: P, max_cards: usize) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            max_cards,
        }
    }

    fn collection_dir(&self, id: &str) -> Result<PathBuf, StoreError> {
        if !is_valid_collection_id(id) {
            return Err(StoreError::InvalidCollectionId(id.to_string()));
        }
        Ok(self.root.join(id))
    }

    /// Collection folders under the store root, sorted by name.
    pub fn collections(&self) -> Result<Vec<String>, StoreError> {
        let entries = fs::read_dir(&self.root).map_err(io_error(&self.root))?;
        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_error(&self.root))?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_valid_collection_id(name) {
                    ids.push(name.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Load every card of a collection in index order. Cards that fail to
    /// parse are skipped and reported in `warnings`.
    pub fn load(&self, id: &str) -> Result<CardCollection, StoreError> {
        let dir = self.collection_dir(id)?;
        let entries = fs::read_dir(&dir).map_err(io_error(&dir))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(io_error(&dir))?.path();
            if let Some(index) = card_index(&path) {
                files.push((index, path));
            }
        }
        files.sort_by_key(|(index, _)| *index);
        files.truncate(self.max_cards);

        let mut collection = CardCollection {
            id: id.to_string(),
            ..Default::default()
        };
        for (index, path) in files {
            let name = format!("{index:02}");
            match read_card(&path) {
                Ok(card) => collection.cards.push(NamedCard { name, card }),
                Err(error) => {
                    let skipped = SkippedCard { name, error };
                    log_warning(&format!("{} ({})", skipped, path.display()));
                    collection.warnings.push(skipped);
                }
            }
        }

        log_info(&format!(
            "Loaded {} cards from collection '{}' ({} skipped)",
            collection.cards.len(),
            id,
            collection.warnings.len()
        ));
        Ok(collection)
    }

    /// Write a card as `<index>.csv`, creating the collection folder if needed.
    pub fn save(&self, id: &str, index: u32, card: &Card) -> Result<PathBuf, StoreError> {
        let dir = self.collection_dir(id)?;
        fs::create_dir_all(&dir).map_err(io_error(&dir))?;
        let path = dir.join(format!("{index}.{CARD_FILE_EXT}"));
        fs::write(&path, card.to_csv()).map_err(io_error(&path))?;
        Ok(path)
    }

    /// First free index in a collection, so new cards never overwrite old ones.
    pub fn next_index(&self, id: &str) -> Result<u32, StoreError> {
        let dir = self.collection_dir(id)?;
        if !dir.exists() {
            return Ok(1);
        }
        let entries = fs::read_dir(&dir).map_err(io_error(&dir))?;
        let mut highest: u32 = 0;
        for entry in entries {
            let path = entry.map_err(io_error(&dir))?.path();
            if let Some(index) = card_index(&path) {
                highest = highest.max(index);
            }
        }
        highest
            .checked_add(1)
            .ok_or_else(|| StoreError::IndexExhausted(id.to_string()))
    }
}

fn read_card(path: &Path) -> Result<Card, CardParseError> {
    let text = fs::read_to_string(path)?;
    Card::parse_csv(&text)
}
