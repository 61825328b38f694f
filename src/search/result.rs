//! The "3 of 17" readout returned to the host after every operation.

use crate::search::position::{MatchSpan, Position};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Snapshot of the current search status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultInfo {
    /// All matches in document order
    pub matches: Vec<MatchSpan>,
    /// Number of matches
    pub total: usize,
    /// Index of the match the cursor is on or just past (0-based), or -1
    pub cur_match_num: isize,
}

impl ResultInfo {
    /// The result of a search with nothing to report.
    pub fn empty() -> Self {
        Self {
            matches: Vec::new(),
            total: 0,
            cur_match_num: -1,
        }
    }

    /// Build the readout for `matches` as seen from `cursor`.
    ///
    /// The current match is the one containing the cursor, or else the
    /// closest one before it. A cursor before every match yields -1.
    pub fn from_matches(matches: Vec<MatchSpan>, cursor: Position) -> Self {
        let cur_match_num = current_match_index(&matches, cursor);
        Self {
            total: matches.len(),
            matches,
            cur_match_num,
        }
    }

    /// 1-based index of the current match, if there is one.
    pub fn display_index(&self) -> Option<usize> {
        usize::try_from(self.cur_match_num).ok().map(|i| i + 1)
    }

    pub fn has_matches(&self) -> bool {
        self.total > 0
    }
}

impl fmt::Display for ResultInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.total == 0 {
            return write!(f, "No matches");
        }
        match self.display_index() {
            Some(index) => write!(f, "{} of {}", index, self.total),
            None => write!(f, "? of {}", self.total),
        }
    }
}

fn current_match_index(matches: &[MatchSpan], cursor: Position) -> isize {
    for (i, span) in matches.iter().enumerate() {
        if span.touches(cursor) {
            return i as isize;
        }
        if cursor < span.from {
            return i as isize - 1;
        }
    }
    matches.len() as isize - 1
}
