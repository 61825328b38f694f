//! User settings for padsearch
//!
//! This module defines the `Settings` struct that holds the search
//! defaults and editor integration knobs, with serde support for JSON
//! persistence.

use crate::search::CompileOptions;
use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Default character class for `token_at_cursor`.
pub const DEFAULT_WORD_CHARS: &str = r"[\w$]";

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Search preferences.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Search Toggles
    // ─────────────────────────────────────────────────────────────────────────
    /// Whether searches match case by default
    pub match_case: bool,

    /// Whether searches match whole words by default
    pub whole_word: bool,

    /// Whether queries are regular expressions by default
    pub regex_mode: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Editor Integration
    // ─────────────────────────────────────────────────────────────────────────
    /// Priority of the search highlight overlay
    pub overlay_priority: i32,

    /// Lines of context kept around a match scrolled into view
    pub scroll_margin: u32,

    /// Character class making up a word for `token_at_cursor`
    pub word_chars: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            match_case: false,
            whole_word: false,
            regex_mode: false,

            // below selection highlighting
            overlay_priority: -5,
            scroll_margin: 20,
            word_chars: DEFAULT_WORD_CHARS.to_string(),
        }
    }
}

impl Settings {
    /// Maximum scroll margin.
    pub const MAX_SCROLL_MARGIN: u32 = 200;

    /// The search bar toggles these settings start from.
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions::new(self.match_case, self.whole_word, self.regex_mode)
    }

    /// Compiled `word_chars`, `None` if it is not a valid pattern.
    pub fn word_chars_regex(&self) -> Option<Regex> {
        Regex::new(&self.word_chars).ok()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.scroll_margin = self.scroll_margin.min(Self::MAX_SCROLL_MARGIN);

        if self.word_chars.is_empty() || self.word_chars_regex().is_none() {
            warn!(
                "Invalid word character class '{}', using {}",
                self.word_chars, DEFAULT_WORD_CHARS
            );
            self.word_chars = DEFAULT_WORD_CHARS.to_string();
        }
    }

    /// Load settings and sanitize them to ensure validity.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
