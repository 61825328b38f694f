//! Line/column mapping over UTF-8 text
//!
//! Match positions are reported as `(line, column)` pairs where the column
//! counts characters, while the regex engine works in byte offsets over the
//! whole document. These helpers convert between the two without ever
//! slicing inside a multi-byte character.
//!
//! # Example
//! ```ignore
//! let index = LineIndex::new("héllo\nwörld");
//! assert_eq!(index.line_col(8), (1, 1)); // byte 8 is the 'ö'
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundary Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the largest index that is less than or equal to `index`
/// and is on a UTF-8 character boundary.
///
/// If `index` is greater than the string length, returns the string length.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Byte offset of the character at `column` within `line`.
///
/// Columns past the end of the line clamp to the line length.
pub fn char_to_byte(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map(|(byte, _)| byte)
        .unwrap_or(line.len())
}

/// Number of characters in `line`.
#[inline]
pub fn char_len(line: &str) -> usize {
    line.chars().count()
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Index
// ─────────────────────────────────────────────────────────────────────────────

/// Start offsets of every line in a `\n`-separated text.
///
/// Built once per scan so that converting many match offsets does not
/// rescan the document from the start each time.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    /// Index the line starts of `text`.
    pub fn new(text: &'a str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { text, starts }
    }

    /// Convert a byte offset into `(line, char column)`.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let offset = floor_char_boundary(self.text, offset);
        let line = match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let start = self.starts[line];
        let column = self.text[start..offset].chars().count();
        (line, column)
    }

    /// Convert `(line, char column)` into a byte offset.
    ///
    /// Lines past the end clamp to the end of the text; columns past the end
    /// of a line clamp to that line's end.
    pub fn offset(&self, line: usize, column: usize) -> usize {
        let Some(&start) = self.starts.get(line) else {
            return self.text.len();
        };
        let end = self
            .starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        start + char_to_byte(&self.text[start..end], column)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_char_boundary() {
        let s = "Hei på deg"; // 'å' occupies bytes 5..7
        assert_eq!(floor_char_boundary(s, 5), 5);
        assert_eq!(floor_char_boundary(s, 6), 5);
        assert_eq!(floor_char_boundary(s, 100), s.len());
    }

    #[test]
    fn test_char_to_byte() {
        let line = "a🎉b";
        assert_eq!(char_to_byte(line, 0), 0);
        assert_eq!(char_to_byte(line, 1), 1);
        assert_eq!(char_to_byte(line, 2), 5);
        assert_eq!(char_to_byte(line, 9), line.len());
        assert_eq!(char_len(line), 3);
    }

    #[test]
    fn test_line_index_line_col() {
        let text = "héllo\nwörld\n";
        let index = LineIndex::new(text);
        assert_eq!(index.line_col(0), (0, 0));
        assert_eq!(index.line_col(6), (0, 5)); // the newline itself
        assert_eq!(index.line_col(7), (1, 0));
        assert_eq!(index.line_col(8), (1, 1));
        assert_eq!(index.line_col(text.len()), (2, 0));
    }

    #[test]
    fn test_line_index_offset() {
        let text = "héllo\nwörld";
        let index = LineIndex::new(text);
        assert_eq!(index.offset(0, 2), 3);
        assert_eq!(index.offset(1, 2), 10);
        assert_eq!(index.offset(1, 50), text.len());
        assert_eq!(index.offset(0, 50), 6);
        assert_eq!(index.offset(7, 0), text.len());
    }
}
