//! Entry points for the host search bar
//!
//! Each command takes the raw text of the search field plus the option
//! toggles, clears whatever search was running, compiles a fresh query and
//! drives the session. None of them can fail: bad input shows up as an
//! empty or unmatched result.

use crate::search::editor::TextComponent;
use crate::search::query::{CompileOptions, Query};
use crate::search::result::ResultInfo;
use crate::search::session::SearchSession;

impl<E: TextComponent> SearchSession<E> {
    /// Search for `raw` and move to the next (or previous) match.
    ///
    /// With `highlight_only` the matches are highlighted and reported but
    /// the selection does not move.
    pub fn search(
        &mut self,
        raw: &str,
        reverse: bool,
        highlight_only: bool,
        options: CompileOptions,
    ) -> ResultInfo {
        self.clear();
        self.start(Query::compile(raw, options));
        if highlight_only {
            return self.result_info();
        }
        self.find_next(reverse)
    }

    /// Replace every match of `raw` with `replacement`, leaving the query
    /// highlighted afterwards. Returns the number of substitutions.
    pub fn replace_all_text(&mut self, raw: &str, replacement: &str, options: CompileOptions) -> usize {
        let query = Query::compile(raw, options);
        self.replace_all(&query, replacement)
    }

    /// Replace the next match of `raw` and select the one after it.
    pub fn replace_next(&mut self, raw: &str, replacement: &str, options: CompileOptions) {
        let query = Query::compile(raw, options);
        self.replace_one(&query, replacement);
    }

    /// Stop the running search and remove its highlighting.
    pub fn clear_active_search(&mut self) {
        self.clear();
    }

    /// The latest search status.
    pub fn current_match_info(&mut self) -> ResultInfo {
        self.result_info()
    }

    /// The word under or next to the cursor, used to prefill the search
    /// field. `None` when text is selected or the cursor touches no word.
    pub fn token_at_cursor(&self) -> Option<String> {
        let (from, to) = self.editor().selection();
        if from != to {
            return None;
        }

        let line: Vec<char> = self.editor().line(from.line)?.chars().collect();
        let is_word = |c: char| match &self.word_chars {
            Some(regex) => regex.is_match(c.encode_utf8(&mut [0; 4])),
            None => c.is_alphanumeric() || c == '_' || c == '$',
        };

        let column = from.column.min(line.len());
        let mut start = column;
        let mut end = column;
        while start > 0 && is_word(line[start - 1]) {
            start -= 1;
        }
        while end < line.len() && is_word(line[end]) {
            end += 1;
        }

        (start < end).then(|| line[start..end].iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Settings;
    use crate::search::buffer::TextBuffer;
    use crate::search::editor::TextComponent;
    use crate::search::position::{MatchSpan, Position};
    use crate::search::query::{CompileOptions, Query};
    use crate::search::session::SearchSession;

    fn span(from: usize, to: usize) -> MatchSpan {
        MatchSpan::new(Position::new(0, from), Position::new(0, to))
    }

    fn selection(session: &SearchSession<TextBuffer>) -> MatchSpan {
        let (from, to) = session.editor().selection();
        MatchSpan::new(from, to)
    }

    fn case_sensitive() -> CompileOptions {
        CompileOptions::new(true, false, false)
    }

    #[test]
    fn test_search_walks_and_wraps() {
        let mut session = SearchSession::new(TextBuffer::new("foo bar foo baz"));

        let info = session.search("foo", false, false, case_sensitive());
        assert_eq!(info.total, 2);
        assert_eq!(selection(&session), span(0, 3));

        let info = session.search("foo", false, false, case_sensitive());
        assert_eq!(selection(&session), span(8, 11));
        assert_eq!(info.to_string(), "2 of 2");

        session.search("foo", false, false, case_sensitive());
        assert_eq!(selection(&session), span(0, 3));
    }

    #[test]
    fn test_search_reverse_from_current_match() {
        let mut session = SearchSession::new(TextBuffer::new("foo bar foo baz"));
        session.search("foo", false, false, case_sensitive());
        session.search("foo", false, false, case_sensitive());
        session.search("foo", true, false, case_sensitive());
        assert_eq!(selection(&session), span(0, 3));
    }

    #[test]
    fn test_highlight_only_leaves_selection() {
        let mut session = SearchSession::new(TextBuffer::new("one foo two foo"));
        session.editor_mut().set_cursor(Position::new(0, 9));
        let info = session.search("foo", false, true, case_sensitive());
        assert_eq!(info.total, 2);
        assert_eq!(info.cur_match_num, 0);
        assert_eq!(session.editor().cursor(), Position::new(0, 9));
        assert_eq!(session.editor().overlay_count(), 1);
    }

    #[test]
    fn test_search_empty_query() {
        let mut session = SearchSession::new(TextBuffer::new("foo"));
        let info = session.search("", false, false, CompileOptions::default());
        assert_eq!(info.total, 0);
        assert_eq!(info.cur_match_num, -1);
        assert_eq!(session.current_match_info().total, 0);
    }

    #[test]
    fn test_search_invalid_regex_does_not_fail() {
        let mut session = SearchSession::new(TextBuffer::new("call(a, b)"));
        let info = session.search("call(", false, false, CompileOptions::new(true, false, true));
        assert_eq!(info.total, 1);
        assert_eq!(selection(&session), span(0, 5));
    }

    #[test]
    fn test_replace_next_with_delimited_pattern() {
        let mut session = SearchSession::new(TextBuffer::new("Foo foo FOOO"));
        session.replace_next("/f(o+)/i", "[$1]", case_sensitive());
        assert_eq!(session.editor().text(), "[oo] foo FOOO");
    }

    #[test]
    fn test_replace_all_then_search_finds_nothing() {
        let mut session = SearchSession::new(TextBuffer::new("cat dog cat"));
        let replaced = session.replace_all_text("cat", "bird", case_sensitive());
        assert_eq!(replaced, 2);
        assert_eq!(session.editor().text(), "bird dog bird");
        assert_eq!(session.current_match_info().total, 0);
        assert_eq!(session.search("cat", false, false, case_sensitive()).total, 0);
    }

    #[test]
    fn test_replace_all_whole_word() {
        let mut session = SearchSession::new(TextBuffer::new("test testing test"));
        session.replace_all_text("test", "ok", CompileOptions::new(true, true, false));
        assert_eq!(session.editor().text(), "ok testing ok");
    }

    #[test]
    fn test_clear_active_search() {
        let mut session = SearchSession::new(TextBuffer::new("foo"));
        session.search("foo", false, true, case_sensitive());
        session.clear_active_search();
        assert_eq!(session.editor().overlay_count(), 0);
        assert_eq!(session.current_match_info().total, 0);
        assert_eq!(
            session.last_query(),
            Some(&Query::compile("foo", case_sensitive()))
        );
    }

    #[test]
    fn test_token_at_cursor() {
        let mut session = SearchSession::new(TextBuffer::new("let $value = other_name;"));
        session.editor_mut().set_cursor(Position::new(0, 7));
        assert_eq!(session.token_at_cursor().as_deref(), Some("$value"));

        // right after a word
        session.editor_mut().set_cursor(Position::new(0, 23));
        assert_eq!(session.token_at_cursor().as_deref(), Some("other_name"));

        session.editor_mut().set_cursor(Position::new(0, 12));
        assert_eq!(session.token_at_cursor(), None);
    }

    #[test]
    fn test_token_at_cursor_with_selection() {
        let mut session = SearchSession::new(TextBuffer::new("word"));
        session
            .editor_mut()
            .set_selection(Position::new(0, 0), Position::new(0, 2));
        assert_eq!(session.token_at_cursor(), None);
    }

    #[test]
    fn test_token_at_cursor_custom_word_chars() {
        let settings = Settings {
            word_chars: "[a-z-]".to_string(),
            ..Settings::default()
        };
        let mut session = SearchSession::with_settings(TextBuffer::new("x = kebab-case_name"), &settings);
        session.editor_mut().set_cursor(Position::new(0, 6));
        assert_eq!(session.token_at_cursor().as_deref(), Some("kebab-case"));
    }
}
