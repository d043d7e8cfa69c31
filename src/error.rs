//! Typed error variants for internal fallible operations.
//!
//! The public rendering surface never propagates these: every failure
//! degrades locally (a missing excerpt, a positional argument label) so that
//! a diagnostic page is always produced. The typed variants exist so the
//! degradation log lines carry the real cause.

use thiserror::Error;

/// Errors raised while gathering material for a diagnostic page.
#[derive(Debug, Error)]
pub enum CaptureError {
    /// A source file needed for an excerpt could not be read from disk.
    #[error("source file read failed for '{path}': {source}")]
    SourceRead {
        /// Path to the source file that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No source file path was supplied for an excerpt.
    #[error("no source path supplied for excerpt")]
    NoSourcePath,
}
