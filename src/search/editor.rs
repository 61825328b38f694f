//! The text component contract consumed by a search session.
//!
//! The search engine never touches a concrete editor. Anything that can
//! host an overlay, enumerate matches, report and move the selection, and
//! apply a text replacement can be searched.

use crate::search::position::{MatchSpan, Position};
use crate::search::query::Matcher;

/// Registration token for a live highlight overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayHandle(pub u64);

/// Capabilities a text-editing component offers to the search engine.
pub trait TextComponent {
    /// Install a live highlight layer for `matcher`.
    fn register_overlay(&mut self, matcher: &Matcher, priority: i32) -> OverlayHandle;

    /// Remove a layer installed by `register_overlay`. Unknown handles are ignored.
    fn unregister_overlay(&mut self, handle: OverlayHandle);

    /// All matches of `matcher` in document order.
    fn enumerate_matches(&self, matcher: &Matcher) -> Vec<MatchSpan>;

    /// The selection head.
    fn cursor(&self) -> Position;

    /// The selection as an ordered `(from, to)` pair.
    fn selection(&self) -> (Position, Position);

    fn set_selection(&mut self, from: Position, to: Position);

    /// Scroll so that `span` is visible with `margin` lines of context.
    fn scroll_into_view(&mut self, span: &MatchSpan, margin: u32);

    /// Text covered by the selection, empty when nothing is selected.
    fn selected_text(&self) -> String;

    fn text_range(&self, from: Position, to: Position) -> String;

    /// The whole document, lines joined with `\n`.
    fn text(&self) -> String;

    /// Replace `[from, to)` with `text`, returning the span of the inserted text.
    fn replace_range(&mut self, from: Position, to: Position, text: &str) -> MatchSpan;

    /// Apply several replacements as one edit.
    ///
    /// `edits` are in document order and do not overlap. Positions refer to
    /// the document before any of them is applied.
    fn replace_ranges(&mut self, edits: &[(MatchSpan, String)]) {
        for (span, text) in edits.iter().rev() {
            self.replace_range(span.from, span.to, text);
        }
    }

    /// Contents of line `line`, without its terminator.
    fn line(&self, line: usize) -> Option<String>;

    /// The position just past the last character of the document.
    fn doc_end(&self) -> Position;
}
