//! In-memory text component
//!
//! A plain line buffer implementing [`TextComponent`]: it keeps the
//! document, a selection, and the registered overlays. The command-line
//! harness searches files through it, and the session tests use it as the
//! editor stand-in.

use crate::search::editor::{OverlayHandle, TextComponent};
use crate::search::position::{MatchSpan, Position};
use crate::search::query::Matcher;
use crate::string_utils::{char_len, LineIndex};
use log::debug;

/// A highlight layer registered against the buffer.
#[derive(Debug, Clone)]
struct Overlay {
    handle: OverlayHandle,
    matcher: Matcher,
    priority: i32,
}

/// A `\n`-separated document with a selection and overlays.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// Document lines, never empty
    lines: Vec<String>,
    /// Selection anchor (where the selection started)
    anchor: Position,
    /// Selection head (the cursor)
    head: Position,
    overlays: Vec<Overlay>,
    next_handle: u64,
    /// Last span passed to `scroll_into_view`
    scrolled_to: Option<MatchSpan>,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new("")
    }
}

impl TextBuffer {
    /// Create a buffer holding `text` with the cursor at the start.
    pub fn new(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
            anchor: Position::origin(),
            head: Position::origin(),
            overlays: Vec::new(),
            next_handle: 1,
            scrolled_to: None,
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Collapse the selection to `pos`.
    pub fn set_cursor(&mut self, pos: Position) {
        let pos = self.clamp(pos);
        self.anchor = pos;
        self.head = pos;
    }

    /// Number of live overlays.
    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    /// Spans painted by the live overlays, highest priority layer first.
    pub fn highlights(&self) -> Vec<MatchSpan> {
        let mut overlays: Vec<&Overlay> = self.overlays.iter().collect();
        overlays.sort_by_key(|overlay| std::cmp::Reverse(overlay.priority));
        overlays
            .into_iter()
            .flat_map(|overlay| self.enumerate_matches(&overlay.matcher))
            .collect()
    }

    /// The last span scrolled into view.
    pub fn scrolled_to(&self) -> Option<MatchSpan> {
        self.scrolled_to
    }

    /// Swap in new contents, keeping the selection inside the document.
    fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.anchor = self.clamp(self.anchor);
        self.head = self.clamp(self.head);
    }

    /// Clamp `pos` into the document.
    fn clamp(&self, pos: Position) -> Position {
        let line = pos.line.min(self.lines.len() - 1);
        let column = pos.column.min(char_len(&self.lines[line]));
        Position::new(line, column)
    }
}

impl TextComponent for TextBuffer {
    fn register_overlay(&mut self, matcher: &Matcher, priority: i32) -> OverlayHandle {
        let handle = OverlayHandle(self.next_handle);
        self.next_handle += 1;
        self.overlays.push(Overlay {
            handle,
            matcher: matcher.clone(),
            priority,
        });
        debug!("Registered overlay {:?} for {}", handle, matcher.as_str());
        handle
    }

    fn unregister_overlay(&mut self, handle: OverlayHandle) {
        self.overlays.retain(|overlay| overlay.handle != handle);
    }

    fn enumerate_matches(&self, matcher: &Matcher) -> Vec<MatchSpan> {
        let text = self.text();
        let index = LineIndex::new(&text);
        matcher
            .find_iter(&text)
            .map(|(start, end)| {
                let (line, column) = index.line_col(start);
                let from = Position::new(line, column);
                let (line, column) = index.line_col(end);
                MatchSpan::new(from, Position::new(line, column))
            })
            .collect()
    }

    fn cursor(&self) -> Position {
        self.head
    }

    fn selection(&self) -> (Position, Position) {
        if self.anchor <= self.head {
            (self.anchor, self.head)
        } else {
            (self.head, self.anchor)
        }
    }

    fn set_selection(&mut self, from: Position, to: Position) {
        self.anchor = self.clamp(from);
        self.head = self.clamp(to);
    }

    fn scroll_into_view(&mut self, span: &MatchSpan, _margin: u32) {
        self.scrolled_to = Some(*span);
    }

    fn selected_text(&self) -> String {
        let (from, to) = self.selection();
        self.text_range(from, to)
    }

    fn text_range(&self, from: Position, to: Position) -> String {
        let text = self.text();
        let index = LineIndex::new(&text);
        let start = index.offset(from.line, from.column);
        let end = index.offset(to.line, to.column);
        if start >= end {
            return String::new();
        }
        text[start..end].to_string()
    }

    fn replace_range(&mut self, from: Position, to: Position, replacement: &str) -> MatchSpan {
        let mut text = self.text();
        let (start, end) = {
            let index = LineIndex::new(&text);
            let start = index.offset(from.line, from.column);
            (start, index.offset(to.line, to.column).max(start))
        };
        text.replace_range(start..end, replacement);

        let index = LineIndex::new(&text);
        let (line, column) = index.line_col(start);
        let inserted_from = Position::new(line, column);
        let (line, column) = index.line_col(start + replacement.len());
        let inserted_to = Position::new(line, column);

        self.set_text(&text);
        MatchSpan::new(inserted_from, inserted_to)
    }

    fn replace_ranges(&mut self, edits: &[(MatchSpan, String)]) {
        let text = self.text();
        let index = LineIndex::new(&text);
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        for (span, replacement) in edits {
            let start = index.offset(span.from.line, span.from.column).max(copied);
            let end = index.offset(span.to.line, span.to.column).max(start);
            out.push_str(&text[copied..start]);
            out.push_str(replacement);
            copied = end;
        }
        out.push_str(&text[copied..]);

        debug!("Applied {} edits in one pass", edits.len());
        self.set_text(&out);
    }

    fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn line(&self, line: usize) -> Option<String> {
        self.lines.get(line).cloned()
    }

    fn doc_end(&self) -> Position {
        let last = self.lines.len() - 1;
        Position::new(last, char_len(&self.lines[last]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::query::{CompileOptions, Query};

    fn matcher(raw: &str) -> Matcher {
        Query::compile(raw, CompileOptions::new(true, false, false)).matcher()
    }

    #[test]
    fn test_enumerate_matches_positions() {
        let buffer = TextBuffer::new("foo bar\nbar foo\nfoo");
        let spans = buffer.enumerate_matches(&matcher("foo"));
        assert_eq!(
            spans,
            vec![
                MatchSpan::new(Position::new(0, 0), Position::new(0, 3)),
                MatchSpan::new(Position::new(1, 4), Position::new(1, 7)),
                MatchSpan::new(Position::new(2, 0), Position::new(2, 3)),
            ]
        );
    }

    #[test]
    fn test_enumerate_multiline_match() {
        let buffer = TextBuffer::new("one\ntwo");
        let spans = buffer.enumerate_matches(&Query::parse(r"e\nt").matcher());
        assert_eq!(
            spans,
            vec![MatchSpan::new(Position::new(0, 2), Position::new(1, 1))]
        );
    }

    #[test]
    fn test_columns_count_characters() {
        let buffer = TextBuffer::new("ünï foo");
        let spans = buffer.enumerate_matches(&matcher("foo"));
        assert_eq!(spans[0].from, Position::new(0, 4));
    }

    #[test]
    fn test_selection_is_ordered() {
        let mut buffer = TextBuffer::new("hello world");
        buffer.set_selection(Position::new(0, 8), Position::new(0, 2));
        assert_eq!(
            buffer.selection(),
            (Position::new(0, 2), Position::new(0, 8))
        );
        assert_eq!(buffer.cursor(), Position::new(0, 2));
        assert_eq!(buffer.selected_text(), "llo wo");
    }

    #[test]
    fn test_selection_clamps_to_document() {
        let mut buffer = TextBuffer::new("ab\ncd");
        buffer.set_cursor(Position::new(9, 9));
        assert_eq!(buffer.cursor(), Position::new(1, 2));
        assert_eq!(buffer.doc_end(), Position::new(1, 2));
    }

    #[test]
    fn test_replace_range_returns_inserted_span() {
        let mut buffer = TextBuffer::new("foo bar\nbaz");
        let span = buffer.replace_range(Position::new(0, 4), Position::new(1, 0), "x\ny\n");
        assert_eq!(buffer.text(), "foo x\ny\nbaz");
        assert_eq!(
            span,
            MatchSpan::new(Position::new(0, 4), Position::new(2, 0))
        );
        assert_eq!(buffer.line(1).as_deref(), Some("y"));
    }

    #[test]
    fn test_replace_ranges_applies_edits_in_one_pass() {
        let mut buffer = TextBuffer::new("foo bar\nfoo\nbaz foo");
        buffer.set_cursor(Position::new(2, 7));
        let edits = vec![
            (MatchSpan::new(Position::new(0, 0), Position::new(0, 3)), "a\nb".to_string()),
            (MatchSpan::new(Position::new(1, 0), Position::new(1, 3)), String::new()),
            (MatchSpan::new(Position::new(2, 4), Position::new(2, 7)), "quux".to_string()),
        ];
        buffer.replace_ranges(&edits);
        assert_eq!(buffer.text(), "a\nb bar\n\nbaz quux");
        assert_eq!(buffer.line_count(), 4);
        assert_eq!(buffer.cursor(), Position::new(2, 0));
    }

    #[test]
    fn test_text_range() {
        let buffer = TextBuffer::new("abc\ndef");
        assert_eq!(buffer.text_range(Position::new(0, 1), Position::new(1, 2)), "bc\nde");
        assert_eq!(buffer.text_range(Position::new(1, 2), Position::new(0, 1)), "");
    }

    #[test]
    fn test_overlays_register_and_unregister() {
        let mut buffer = TextBuffer::new("foo foo");
        let first = buffer.register_overlay(&matcher("foo"), -5);
        let second = buffer.register_overlay(&matcher("o"), 0);
        assert_ne!(first, second);
        assert_eq!(buffer.overlay_count(), 2);
        // higher priority layer comes first
        assert_eq!(buffer.highlights().len(), 6);
        assert_eq!(buffer.highlights()[0].to, Position::new(0, 2));

        buffer.unregister_overlay(first);
        assert_eq!(buffer.overlay_count(), 1);
        buffer.unregister_overlay(first);
        assert_eq!(buffer.overlay_count(), 1);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = TextBuffer::default();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.doc_end(), Position::origin());
        assert!(buffer.enumerate_matches(&matcher("x")).is_empty());
    }
}
