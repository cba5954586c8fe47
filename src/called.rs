// src/called.rs
// The set of values announced by the caller.

use std::collections::BTreeSet;
use serde::{Deserialize, Serialize};

use crate::card::{InvalidInput, Token};

/// Values the caller has announced. Toggling a value that is already
/// present removes it, so a mistyped number is undone by typing it again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalledSet {
    called: BTreeSet<Token>,
}

/// What a batch toggle did, token by token, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleReport {
    pub added: Vec<Token>,
    pub removed: Vec<Token>,
    pub rejected: Vec<String>,
}

impl ToggleReport {
    /// Warning text for the rejected tokens, if any.
    pub fn warning(&self) -> Option<String> {
        if self.rejected.is_empty() {
            None
        } else {
            Some(format!("Ignored invalid input: {}", self.rejected.join(", ")))
        }
    }
}

impl CalledSet {
    pub fn new() -> Self {
        CalledSet { called: BTreeSet::new() }
    }

    /// Toggle one raw token. Returns whether the value is now present.
    /// An invalid token leaves the set unchanged.
    pub fn toggle(&mut self, raw: &str) -> Result<bool, InvalidInput> {
        let token = Token::parse_called(raw)?;
        Ok(self.toggle_token(token))
    }

    fn toggle_token(&mut self, token: Token) -> bool {
        if self.called.remove(&token) {
            false
        } else {
            self.called.insert(token);
            true
        }
    }

    /// Toggle every comma-separated token of `input` in order.
    /// Blank pieces are skipped; invalid ones are reported without
    /// stopping the rest of the batch.
    pub fn toggle_batch(&mut self, input: &str) -> ToggleReport {
        let mut report = ToggleReport::default();

        for piece in input.split(',') {
            if piece.trim().is_empty() {
                continue;
            }
            match Token::parse_called(piece) {
                Ok(token) => {
                    if self.toggle_token(token.clone()) {
                        report.added.push(token);
                    } else {
                        report.removed.push(token);
                    }
                }
                Err(e) => report.rejected.push(e.token),
            }
        }

        report
    }

    /// Membership with the same normalization as `toggle`.
    pub fn contains(&self, raw: &str) -> bool {
        Token::parse_called(raw).is_ok_and(|token| self.called.contains(&token))
    }

    /// Membership for an already normalized token, e.g. a card cell.
    pub fn contains_token(&self, token: &Token) -> bool {
        self.called.contains(token)
    }

    /// Called values in ascending numeric order.
    pub fn list_sorted(&self) -> Vec<Token> {
        self.called.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.called.clear();
    }

    pub fn len(&self) -> usize {
        self.called.len()
    }

    pub fn is_empty(&self) -> bool {
        self.called.is_empty()
    }
}

impl FromIterator<Token> for CalledSet {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        CalledSet { called: iter.into_iter().collect() }
    }
}
