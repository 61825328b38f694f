//! Error type for padsearch
//!
//! Searching itself never fails: a bad pattern or an empty query degrades
//! to a literal or never-matching search inside the query compiler. What
//! can fail is everything around it: the settings file, and the document
//! and output handled by the command-line harness.

use log::warn;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Document
    // ─────────────────────────────────────────────────────────────────────────
    /// The document to search could not be read
    ReadDocument { path: PathBuf, source: io::Error },

    /// The edited document could not be written back
    WriteDocument { path: PathBuf, source: io::Error },

    /// The search result could not be rendered as JSON
    EncodeResult(serde_json::Error),

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────
    ConfigLoad {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    ConfigSave {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The settings file is not valid settings JSON
    ConfigParse {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// No platform config directory (e.g. `HOME` unset)
    ConfigDirNotFound,

    // ─────────────────────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────────────────────
    /// A search pattern failed to compile.
    ///
    /// Never returned to callers of the search API; the query compiler
    /// turns it into a fallback query and logs it.
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ReadDocument { path, source } => {
                write!(f, "Cannot read '{}': {}", path.display(), source)
            }
            Error::WriteDocument { path, source } => {
                write!(f, "Cannot write '{}': {}", path.display(), source)
            }
            Error::EncodeResult(source) => write!(f, "Cannot encode search result: {}", source),

            Error::ConfigLoad { path, source } => {
                write!(f, "Failed to load settings from '{}': {}", path.display(), source)
            }
            Error::ConfigSave { path, source } => {
                write!(f, "Failed to save settings to '{}': {}", path.display(), source)
            }
            Error::ConfigParse { message, .. } => write!(f, "Invalid settings file: {}", message),
            Error::ConfigDirNotFound => write!(f, "Configuration directory not found"),

            Error::InvalidPattern { pattern, source } => {
                write!(f, "Invalid search pattern '{}': {}", pattern, source)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ReadDocument { source, .. } | Error::WriteDocument { source, .. } => {
                Some(source)
            }
            Error::EncodeResult(source) => Some(source),
            Error::ConfigLoad { source, .. } | Error::ConfigSave { source, .. } => {
                Some(source.as_ref())
            }
            Error::ConfigParse { source, .. } => source
                .as_ref()
                .map(|s| s.as_ref() as &(dyn std::error::Error + 'static)),
            Error::InvalidPattern { source, .. } => Some(source),
            Error::ConfigDirNotFound => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graceful Degradation
// ─────────────────────────────────────────────────────────────────────────────

/// Fall back to a default instead of failing, for errors the user should
/// only hear about in the log.
pub trait ResultExt<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T;
}

impl<T> ResultExt<T> for Result<T> {
    fn unwrap_or_warn_default(self, default: T, context: &str) -> T {
        self.unwrap_or_else(|err| {
            warn!("{}: {}. Using default.", context, err);
            default
        })
    }
}
