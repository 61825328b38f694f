//! Query compilation
//!
//! Turns the text typed into the search field, together with the
//! match-case / whole-word / regex toggles, into a [`Query`] and from there
//! into a compiled [`Matcher`].
//!
//! Compilation never fails from the caller's point of view:
//! - an empty query becomes the never-matching query
//! - an invalid `/pattern/flags` query becomes the never-matching query
//! - an invalid regex-mode query falls back to literal matching of the raw text
//! - any pattern that can match the empty string becomes never-matching

use crate::error::{Error, Result};
use log::{debug, warn};
use regex::{Captures, Regex, RegexBuilder};
use std::fmt;

/// Source of the never-matching pattern: an `x` followed by a line start.
const NEVER_SOURCE: &str = "x^";

// ─────────────────────────────────────────────────────────────────────────────
// Compile Options
// ─────────────────────────────────────────────────────────────────────────────

/// The search bar toggles that shape how a query is compiled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Match case exactly (ignored when a delimited query carries `i`)
    pub match_case: bool,
    /// Only match at word boundaries
    pub whole_word: bool,
    /// Interpret the raw query as a regular expression
    pub regex_mode: bool,
}

impl CompileOptions {
    pub fn new(match_case: bool, whole_word: bool, regex_mode: bool) -> Self {
        Self {
            match_case,
            whole_word,
            regex_mode,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Query
// ─────────────────────────────────────────────────────────────────────────────

/// A compiled search term.
///
/// Literal queries use smart case: they ignore case when written entirely
/// in lowercase. Pattern queries carry their case sensitivity explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Literal(String),
    Pattern {
        source: String,
        case_insensitive: bool,
    },
}

impl Query {
    /// The query that matches nothing.
    pub fn never() -> Self {
        Query::Pattern {
            source: NEVER_SOURCE.to_string(),
            case_insensitive: false,
        }
    }

    /// Whether this is the never-matching query.
    pub fn is_never(&self) -> bool {
        matches!(self, Query::Pattern { source, .. } if source == NEVER_SOURCE)
    }

    /// Whether matching ignores case.
    pub fn case_insensitive(&self) -> bool {
        match self {
            Query::Literal(text) => *text == text.to_lowercase(),
            Query::Pattern {
                case_insensitive, ..
            } => *case_insensitive,
        }
    }

    /// Whether replacements expand `$n` backreferences.
    pub fn is_pattern(&self) -> bool {
        matches!(self, Query::Pattern { .. })
    }

    /// Compile the query from the search bar.
    ///
    /// Always yields a pattern query; see the module docs for how invalid
    /// input degrades.
    pub fn compile(raw: &str, options: CompileOptions) -> Query {
        if raw.is_empty() {
            return Query::never();
        }

        if let Some((body, flags)) = split_delimited(raw) {
            if body.is_empty() {
                return Query::never();
            }
            let query = Query::Pattern {
                source: wrap_whole_word(body, options.whole_word),
                case_insensitive: flags.contains('i') || !options.match_case,
            };
            return query.validated().unwrap_or_else(|e| {
                warn!("{}, matching nothing", e);
                Query::never()
            });
        }

        if options.regex_mode {
            let query = Query::Pattern {
                source: wrap_whole_word(raw, options.whole_word),
                case_insensitive: !options.match_case,
            };
            return query.validated().unwrap_or_else(|e| {
                warn!("{}, falling back to literal search", e);
                literal_pattern(raw, options)
            });
        }

        literal_pattern(raw, options)
    }

    /// Parse a bare query string, as used when seeding a search from the
    /// current selection.
    ///
    /// `/body/flags` becomes a pattern honouring only the `i` flag. Anything
    /// else, including a delimited body that does not compile, becomes a
    /// smart-case literal; undelimited text has `\n`, `\r`, `\t` and `\\`
    /// decoded first.
    pub fn parse(raw: &str) -> Query {
        let query = match split_delimited(raw) {
            Some((body, flags)) => {
                let pattern = Query::Pattern {
                    source: body.to_string(),
                    case_insensitive: flags.contains('i'),
                };
                pattern.validated().unwrap_or_else(|e| {
                    debug!("{}, searching for the text instead", e);
                    Query::Literal(raw.to_string())
                })
            }
            None => Query::Literal(decode_escapes(raw)),
        };

        match &query {
            Query::Literal(text) if text.is_empty() => Query::never(),
            _ => query,
        }
    }

    /// Build the regex for this query.
    fn build_regex(&self) -> Result<Regex> {
        let (source, case_insensitive) = match self {
            Query::Literal(text) => (regex::escape(text), self.case_insensitive()),
            Query::Pattern {
                source,
                case_insensitive,
            } => (source.clone(), *case_insensitive),
        };

        RegexBuilder::new(&source)
            .case_insensitive(case_insensitive)
            .multi_line(true)
            .build()
            .map_err(|e| Error::InvalidPattern {
                pattern: source,
                source: e,
            })
    }

    /// Check that the query compiles and cannot produce empty matches.
    fn validated(self) -> Result<Query> {
        let regex = self.build_regex()?;
        if regex.is_match("") {
            debug!("Query {} matches the empty string, matching nothing", self);
            return Ok(Query::never());
        }
        Ok(self)
    }

    /// Compile the query into a matcher.
    ///
    /// A hand-built pattern that does not compile yields a matcher that
    /// matches nothing.
    pub fn matcher(&self) -> Matcher {
        let regex = match self.build_regex() {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!("{}, matching nothing", e);
                None
            }
        };
        Matcher {
            regex,
            expands_groups: self.is_pattern(),
        }
    }
}

/// Renders the way the query text is compared between searches:
/// `/source/flags` for patterns, the raw text for literals.
impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Literal(text) => write!(f, "{}", text),
            Query::Pattern {
                source,
                case_insensitive,
            } => write!(f, "/{}/{}", source, if *case_insensitive { "i" } else { "" }),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Matcher
// ─────────────────────────────────────────────────────────────────────────────

/// A compiled query, ready to run against document text.
#[derive(Debug, Clone)]
pub struct Matcher {
    /// `None` when the query could not be compiled at all
    regex: Option<Regex>,
    expands_groups: bool,
}

impl Matcher {
    /// Byte ranges of all non-empty, non-overlapping matches in `text`.
    pub fn find_iter<'a>(&'a self, text: &'a str) -> impl Iterator<Item = (usize, usize)> + 'a {
        self.regex
            .iter()
            .flat_map(move |regex| regex.find_iter(text))
            .filter(|m| !m.is_empty())
            .map(|m| (m.start(), m.end()))
    }

    /// Capture groups of the match spanning exactly `start..end` of `text`.
    ///
    /// The search runs over the whole of `text`, so look-around such as
    /// `\b` or `^` at the edges of the match sees the surrounding document.
    pub fn captures_at<'t>(&self, text: &'t str, start: usize, end: usize) -> Option<Captures<'t>> {
        let caps = self.regex.as_ref()?.captures_at(text, start)?;
        let whole = caps.get(0)?;
        if whole.start() == start && whole.end() == end {
            Some(caps)
        } else {
            None
        }
    }

    /// Whether replacement text should expand `$n` references.
    pub fn expands_groups(&self) -> bool {
        self.expands_groups
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_ref().map_or(NEVER_SOURCE, |regex| regex.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Split `/body/flags` into its body and lowercase flags.
fn split_delimited(raw: &str) -> Option<(&str, &str)> {
    let rest = raw.strip_prefix('/')?;
    let close = rest.rfind('/')?;
    let (body, flags) = (&rest[..close], &rest[close + 1..]);
    if body.contains('\n') || !flags.chars().all(|c| c.is_ascii_lowercase()) {
        return None;
    }
    Some((body, flags))
}

fn wrap_whole_word(source: &str, whole_word: bool) -> String {
    if whole_word {
        format!(r"\b(?:{})\b", source)
    } else {
        source.to_string()
    }
}

/// Escaped literal search over the raw text.
fn literal_pattern(raw: &str, options: CompileOptions) -> Query {
    let query = Query::Pattern {
        source: wrap_whole_word(&regex::escape(raw), options.whole_word),
        case_insensitive: !options.match_case,
    };
    query.validated().unwrap_or_else(|e| {
        warn!("{}, matching nothing", e);
        Query::never()
    })
}

/// Decode `\n`, `\r`, `\t` and `\\`; other backslashes stay as typed.
fn decode_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let decoded = match chars.peek() {
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('\\') => '\\',
            _ => {
                out.push(c);
                continue;
            }
        };
        chars.next();
        out.push(decoded);
    }
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
