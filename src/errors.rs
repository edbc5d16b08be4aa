/*!
 * Error types for the transcript-ingest library.
 *
 * Only the fatal kinds live in `TranscriptError`; they are the ones that
 * reach the caller. Per-timestamp failures are `TimestampError`s that the
 * parsers absorb and report through the diagnostic sink instead.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors returned by the ingestion entry points
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// The source could not be opened or read
    #[error("Failed to read transcript {path:?}: {source}")]
    IoFailure {
        /// Path that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The source has no content at all
    #[error("Transcript is empty: {0}")]
    EmptyInput(String),

    /// No decoder, lossy or not, could produce text
    #[error("Could not decode transcript: {0}")]
    DecodeFailure(String),

    /// Detection and every fallback sniff failed
    #[error("Unsupported transcript format: {0}")]
    UnsupportedFormat(String),
}

impl TranscriptError {
    /// Wrap an I/O error together with the path that caused it
    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::IoFailure {
            path: path.into(),
            source,
        }
    }
}

/// Errors produced by the timestamp grammar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    /// The token did not match any accepted time shape
    #[error("Malformed timestamp: '{0}'")]
    Malformed(String),
}
