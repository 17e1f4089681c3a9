//! Error types for EmbedKit
//!
//! This module provides the error taxonomy for the discovery pipeline using
//! `thiserror`. Only two conditions cross the pipeline boundary as failures:
//! a malformed input URI and an unreachable/missing page. Everything else
//! degrades to a partial or empty result.

use thiserror::Error;

/// The main error type for EmbedKit operations
#[derive(Error, Debug)]
pub enum Error {
    /// The target page does not exist (DNS failure or 404 class).
    ///
    /// Callers should surface this as "not found", distinct from generic
    /// fetch failures.
    #[error("Page not found: {0}")]
    PageNotFound(String),

    /// Missing or unparseable URI at pipeline entry
    #[error("Malformed input URI: {0}")]
    MalformedInput(String),

    /// Generic page fetch failure (anything other than the not-found class)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// A plugin produced an error during extraction.
    ///
    /// Never crosses the pipeline boundary; recovered by the extraction
    /// runner and recorded in the debug trace.
    #[error("Plugin extraction error: {0}")]
    PluginExtraction(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for EmbedKit operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a plugin extraction error from a string
    pub fn plugin<S: Into<String>>(msg: S) -> Self {
        Error::PluginExtraction(msg.into())
    }

    /// Whether this error is the distinguishable "not found" condition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::PageNotFound(_))
    }
}
