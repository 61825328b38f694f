//! Per-editor search session
//!
//! A [`SearchSession`] owns the search state for one text component: the
//! active query, its overlay registration, the cached match list and the
//! navigation origin. It moves between two states:
//!
//! - **Idle**: no query, no overlay, no matches
//! - **Active**: query set, exactly one overlay registered
//!
//! `start` enters Active (replacing any previous search), `clear` returns
//! to Idle. The cached matches go stale whenever the document changes and
//! are recomputed before they are next read.

use crate::config::Settings;
use crate::search::editor::{OverlayHandle, TextComponent};
use crate::search::position::{MatchSpan, Position};
use crate::search::query::{CompileOptions, Matcher, Query};
use crate::search::replace::expand_backreferences;
use crate::search::result::ResultInfo;
use crate::string_utils::LineIndex;
use log::{debug, warn};
use regex::Regex;

/// Callback invoked with fresh results after every match recomputation.
pub type MatchesUpdated = Box<dyn FnMut(&ResultInfo)>;

// ─────────────────────────────────────────────────────────────────────────────
// Search State
// ─────────────────────────────────────────────────────────────────────────────

/// Live state of one session.
#[derive(Debug, Default)]
struct SearchState {
    /// Rendered form of the active query, used to detect a changed query
    query_text: Option<String>,
    /// The active query; `None` while idle
    query: Option<Query>,
    matcher: Option<Matcher>,
    /// Query retained by `clear` for a later bare `find_next`
    last_query: Option<Query>,
    /// Navigation origin: start of the current selection
    cursor_from: Position,
    /// Navigation origin: end of the current selection
    cursor_to: Position,
    overlay: Option<OverlayHandle>,
    /// Matches in document order, valid only while `stale` is false
    matches: Vec<MatchSpan>,
    stale: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Search Session
// ─────────────────────────────────────────────────────────────────────────────

/// Search and replace over a single text component.
pub struct SearchSession<E: TextComponent> {
    editor: E,
    state: SearchState,
    overlay_priority: i32,
    scroll_margin: u32,
    /// Characters that make up a token for `token_at_cursor`
    pub(crate) word_chars: Option<Regex>,
    on_update: Option<MatchesUpdated>,
}

impl<E: TextComponent> SearchSession<E> {
    /// Create an idle session with default settings.
    pub fn new(editor: E) -> Self {
        Self::with_settings(editor, &Settings::default())
    }

    /// Create an idle session configured from `settings`.
    pub fn with_settings(editor: E, settings: &Settings) -> Self {
        Self {
            editor,
            state: SearchState::default(),
            overlay_priority: settings.overlay_priority,
            scroll_margin: settings.scroll_margin,
            word_chars: settings.word_chars_regex(),
            on_update: None,
        }
    }

    pub fn editor(&self) -> &E {
        &self.editor
    }

    /// Mutable access to the text component.
    ///
    /// The caller may edit the document through it, so cached matches are
    /// treated as stale afterwards.
    pub fn editor_mut(&mut self) -> &mut E {
        self.state.stale = true;
        &mut self.editor
    }

    pub fn into_editor(self) -> E {
        self.editor
    }

    /// Whether a query is active.
    pub fn is_active(&self) -> bool {
        self.state.query.is_some()
    }

    pub fn query(&self) -> Option<&Query> {
        self.state.query.as_ref()
    }

    /// The query retained by the last `clear`.
    pub fn last_query(&self) -> Option<&Query> {
        self.state.last_query.as_ref()
    }

    /// Register the callback run after every match recomputation.
    ///
    /// Replaces any previously registered callback.
    pub fn on_matches_updated<F>(&mut self, callback: F)
    where
        F: FnMut(&ResultInfo) + 'static,
    {
        self.on_update = Some(Box::new(callback));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // State Transitions
    // ─────────────────────────────────────────────────────────────────────────

    /// Compile `raw` and start searching for it.
    pub fn start_with(&mut self, raw: &str, options: CompileOptions) {
        self.start(Query::compile(raw, options));
    }

    /// Start searching for `query`.
    ///
    /// Does nothing when `query` is already the active query. Otherwise the
    /// previous overlay is dropped, a new one registered, the matches
    /// recomputed, and the navigation origin reset to the selection.
    pub fn start(&mut self, query: Query) {
        let query_text = query.to_string();
        if self.state.query_text.as_deref() == Some(query_text.as_str()) {
            return;
        }

        if let Some(handle) = self.state.overlay.take() {
            self.editor.unregister_overlay(handle);
        }

        let matcher = query.matcher();
        self.state.overlay = Some(self.editor.register_overlay(&matcher, self.overlay_priority));
        debug!("Starting search for {}", query_text);

        self.state.query_text = Some(query_text);
        self.state.query = Some(query);
        self.state.matcher = Some(matcher);

        let (from, to) = self.editor.selection();
        self.state.cursor_from = from;
        self.state.cursor_to = to;

        self.refresh();
        self.notify();
    }

    /// Stop searching: drop the overlay and forget the active query.
    ///
    /// The query is kept as the last query for a later bare `find_next`.
    pub fn clear(&mut self) {
        if let Some(query) = self.state.query.take() {
            debug!("Clearing search for {}", query);
            self.state.last_query = Some(query);
        }
        self.state.query_text = None;
        self.state.matcher = None;
        self.state.matches.clear();
        self.state.stale = false;
        if let Some(handle) = self.state.overlay.take() {
            self.editor.unregister_overlay(handle);
        }
    }

    /// Notify the session that the document changed.
    ///
    /// With an update callback registered, the matches are recomputed and
    /// reported right away; otherwise on the next read.
    pub fn document_changed(&mut self) {
        if !self.is_active() {
            return;
        }
        self.state.stale = true;
        if self.on_update.is_some() {
            self.refresh();
            self.notify();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    /// Select the next match, or the previous one when `reverse` is set.
    ///
    /// Without an active query the search is seeded from the selected text,
    /// or failing that from the last query. Navigation wraps around the
    /// document once; when nothing matches anywhere the selection is left
    /// alone and the result reports no current match.
    pub fn find_next(&mut self, reverse: bool) -> ResultInfo {
        if !self.is_active() {
            match self.seed_query() {
                Some(query) => self.start(query),
                None => return ResultInfo::empty(),
            }
        }
        self.ensure_fresh();

        let origin = if reverse {
            self.state.cursor_from
        } else {
            self.state.cursor_to
        };

        let found = nearest(&self.state.matches, origin, reverse).or_else(|| {
            let boundary = if reverse {
                self.editor.doc_end()
            } else {
                Position::origin()
            };
            debug!("Search wrapped around to {}", boundary);
            nearest(&self.state.matches, boundary, reverse)
        });

        if let Some(span) = found {
            self.select(span);
        }
        self.result_info()
    }

    /// Current search status, with the current match taken from the
    /// start of the selection.
    pub fn result_info(&mut self) -> ResultInfo {
        if !self.is_active() {
            return ResultInfo::empty();
        }
        self.ensure_fresh();
        let (cursor, _) = self.editor.selection();
        ResultInfo::from_matches(self.state.matches.clone(), cursor)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Replacement
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the first match at or after the selection, then select the
    /// following match without replacing it.
    ///
    /// Any active search is cleared first. When no other match remains the
    /// replaced text stays selected.
    pub fn replace_one(&mut self, query: &Query, replacement: &str) {
        self.clear();

        let matcher = query.matcher();
        let (origin, _) = self.editor.selection();
        let matches = self.editor.enumerate_matches(&matcher);
        let Some(target) = nearest(&matches, origin, false).or_else(|| matches.first().copied())
        else {
            debug!("Nothing to replace for {}", query);
            return;
        };

        let Some((span, text)) = self.expansions(&matcher, &[target], replacement).pop() else {
            return;
        };
        let inserted = self.editor.replace_range(span.from, span.to, &text);

        let matches = self.editor.enumerate_matches(&matcher);
        let next = nearest(&matches, inserted.to, false).or_else(|| {
            matches
                .first()
                .copied()
                .filter(|span| span.from != inserted.from)
        });
        match next {
            Some(span) => self.select(span),
            None => self.editor.set_selection(inserted.from, inserted.to),
        }
    }

    /// Replace every match of `query` in a single pass, then restart the
    /// search so highlighting reflects the new document.
    ///
    /// Returns the number of substitutions made.
    pub fn replace_all(&mut self, query: &Query, replacement: &str) -> usize {
        self.clear();

        let matcher = query.matcher();
        let matches = self.editor.enumerate_matches(&matcher);
        let edits = self.expansions(&matcher, &matches, replacement);
        self.editor.replace_ranges(&edits);
        debug!("Replaced {} matches of {}", edits.len(), query);

        self.start(query.clone());
        edits.len()
    }

    /// Pair each of `spans` with its replacement text.
    ///
    /// Pattern queries expand `$n` against captures taken from the whole
    /// document, so the groups are those of the match as enumerated.
    fn expansions(
        &self,
        matcher: &Matcher,
        spans: &[MatchSpan],
        replacement: &str,
    ) -> Vec<(MatchSpan, String)> {
        if !matcher.expands_groups() {
            return spans
                .iter()
                .map(|span| (*span, replacement.to_string()))
                .collect();
        }

        let doc = self.editor.text();
        let index = LineIndex::new(&doc);
        spans
            .iter()
            .map(|span| {
                let start = index.offset(span.from.line, span.from.column);
                let end = index.offset(span.to.line, span.to.column);
                let text = match matcher.captures_at(&doc, start, end) {
                    Some(caps) => expand_backreferences(replacement, &caps),
                    None => {
                        warn!("No captures for match at {}, inserting text as typed", span.from);
                        replacement.to_string()
                    }
                };
                (*span, text)
            })
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    /// Query to use for a bare `find_next`: the selected text, else the
    /// last query unless it matches nothing.
    fn seed_query(&self) -> Option<Query> {
        let selected = self.editor.selected_text();
        if !selected.is_empty() {
            return Some(Query::parse(&selected));
        }
        self.state
            .last_query
            .clone()
            .filter(|query| !query.is_never())
    }

    /// Move the selection to `span` and make it the navigation origin.
    fn select(&mut self, span: MatchSpan) {
        self.editor.set_selection(span.from, span.to);
        self.editor.scroll_into_view(&span, self.scroll_margin);
        self.state.cursor_from = span.from;
        self.state.cursor_to = span.to;
    }

    fn ensure_fresh(&mut self) {
        if self.state.stale {
            self.refresh();
        }
    }

    fn refresh(&mut self) {
        self.state.matches = match &self.state.matcher {
            Some(matcher) => self.editor.enumerate_matches(matcher),
            None => Vec::new(),
        };
        self.state.stale = false;
    }

    fn notify(&mut self) {
        if self.on_update.is_none() {
            return;
        }
        let (cursor, _) = self.editor.selection();
        let info = ResultInfo::from_matches(self.state.matches.clone(), cursor);
        if let Some(callback) = self.on_update.as_mut() {
            callback(&info);
        }
    }
}

/// The closest match from `origin` in the search direction: the first one
/// starting at or after it, or going backwards the last one ending at or
/// before it.
fn nearest(matches: &[MatchSpan], origin: Position, reverse: bool) -> Option<MatchSpan> {
    if reverse {
        matches.iter().rev().find(|span| span.to <= origin).copied()
    } else {
        matches.iter().find(|span| span.from >= origin).copied()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
