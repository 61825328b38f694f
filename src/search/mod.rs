//! Search module for padsearch
//!
//! This module contains the find/replace engine that runs against a text
//! component: query compilation, the per-editor search session, and the
//! entry points used by the host search bar.

mod buffer;
mod commands;
mod editor;
mod position;
mod query;
mod replace;
mod result;
mod session;

pub use buffer::TextBuffer;
pub use editor::{OverlayHandle, TextComponent};
pub use position::{MatchSpan, Position};
pub use query::{CompileOptions, Matcher, Query};
pub use replace::expand_backreferences;
pub use result::ResultInfo;
pub use session::{MatchesUpdated, SearchSession};
