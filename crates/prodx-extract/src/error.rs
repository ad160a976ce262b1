use std::path::PathBuf;

use prodx_core::Section;
use thiserror::Error;

/// A fault observed while running one extractor.
///
/// These never escape [`crate::assemble`]; they are collected into each
/// [`crate::ExtractorReport`] so callers and tests can see what went wrong
/// without the record being lost.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    #[error("could not coerce {raw:?} to a number for {field}")]
    Coercion { field: String, raw: String },

    #[error("embedded data for {field} is not valid JSON: {reason}")]
    ScriptJson { field: String, reason: String },

    #[error("{section} extractor panicked: {message}")]
    Panicked { section: Section, message: String },
}

/// Errors writing or reading persisted records.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
