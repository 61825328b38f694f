//! Document coordinates used by the search engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A location in the document: zero-based line and character column.
///
/// Ordered lexicographically by `(line, column)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// The first position of any document.
    pub const fn origin() -> Self {
        Self::new(0, 0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-based, the way editors show it in a status bar
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// A half-open `[from, to)` range in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchSpan {
    pub from: Position,
    pub to: Position,
}

impl MatchSpan {
    pub const fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    /// Whether `pos` lies within the span, both ends inclusive.
    ///
    /// A cursor sitting right after a match is still "on" it.
    pub fn touches(&self, pos: Position) -> bool {
        self.from <= pos && pos <= self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_ordering() {
        assert!(Position::new(0, 5) < Position::new(1, 0));
        assert!(Position::new(2, 1) < Position::new(2, 3));
        assert_eq!(Position::origin(), Position::default());
    }

    #[test]
    fn test_position_display_is_one_based() {
        assert_eq!(Position::new(0, 0).to_string(), "1:1");
        assert_eq!(Position::new(4, 9).to_string(), "5:10");
    }

    #[test]
    fn test_span_touches() {
        let span = MatchSpan::new(Position::new(0, 3), Position::new(0, 6));
        assert!(span.touches(Position::new(0, 3)));
        assert!(span.touches(Position::new(0, 6)));
        assert!(!span.touches(Position::new(0, 7)));
        assert!(!span.touches(Position::new(1, 4)));
    }
}
