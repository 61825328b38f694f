//! padsearch - find and replace for an embedded code editor
//!
//! The engine behind the search bar of an online Dart playground: it
//! compiles what the user typed into a matcher, keeps a live highlight
//! overlay in sync with the document, and implements find-next,
//! find-previous, replace and replace-all with wraparound.
//!
//! The editor itself stays outside the crate; anything implementing
//! [`search::TextComponent`] can be searched.
//!
//! ```ignore
//! use padsearch::search::{CompileOptions, SearchSession, TextBuffer};
//!
//! let mut session = SearchSession::new(TextBuffer::new("foo bar foo"));
//! let info = session.search("foo", false, false, CompileOptions::default());
//! assert_eq!(info.to_string(), "1 of 2");
//! ```

pub mod config;
pub mod error;
pub mod search;
pub mod string_utils;

pub use error::{Error, Result};
