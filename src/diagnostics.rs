/*!
 * Recoverable parse events and the sinks that receive them.
 *
 * Nothing in here ever aborts a parse. The engine hands each event to a
 * `DiagnosticSink` supplied by the caller; `LogSink` forwards to the `log`
 * facade, a `Vec<ParseWarning>` collects them, `SilentSink` drops them.
 */

use std::fmt;

use log::{info, warn};

use crate::file_utils::TextEncoding;
use crate::formats::TranscriptFormat;
use crate::validation::DropReason;

/// A recoverable event raised while reading, parsing or validating
#[derive(Debug, Clone, PartialEq)]
pub enum ParseWarning {
    /// The source was decoded with something other than plain UTF-8
    NonDefaultEncoding { encoding: TextEncoding },
    /// Invalid byte sequences were replaced with U+FFFD
    LossyDecode,
    /// Detection confidence fell under the configured minimum
    LowConfidence {
        format: TranscriptFormat,
        confidence: f64,
    },
    /// A fallback parser was chosen by extension or content sniffing
    FallbackUsed { format: TranscriptFormat, reason: String },
    /// A timestamp failed its grammar; the owning block was skipped
    MalformedTimestamp { format: TranscriptFormat, value: String },
    /// A structured record lacked a usable start or text
    InvalidRecord { index: usize, detail: String },
    /// A segment failed validation and was excluded
    SegmentDropped { index: usize, reason: DropReason },
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseWarning::NonDefaultEncoding { encoding } => {
                write!(f, "Decoded using {} encoding", encoding)
            }
            ParseWarning::LossyDecode => {
                write!(f, "Decoded with character replacement due to encoding issues")
            }
            ParseWarning::LowConfidence { format, confidence } => {
                write!(f, "Low confidence detection: {} ({:.2})", format, confidence)
            }
            ParseWarning::FallbackUsed { format, reason } => {
                write!(f, "Falling back to {} parser: {}", format, reason)
            }
            ParseWarning::MalformedTimestamp { format, value } => {
                write!(f, "Skipped {} block with malformed timestamp '{}'", format, value)
            }
            ParseWarning::InvalidRecord { index, detail } => {
                write!(f, "Skipped record {}: {}", index, detail)
            }
            ParseWarning::SegmentDropped { index, reason } => {
                write!(f, "Skipping segment {}: {}", index, reason)
            }
        }
    }
}

/// Receiver for recoverable parse events
pub trait DiagnosticSink {
    fn record(&mut self, warning: ParseWarning);
}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn record(&mut self, warning: ParseWarning) {
        match warning {
            // Encoding choices are informational, not a problem with the input
            ParseWarning::NonDefaultEncoding { .. } | ParseWarning::FallbackUsed { .. } => {
                info!("{}", warning)
            }
            _ => warn!("{}", warning),
        }
    }
}

/// Discards every event
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl DiagnosticSink for SilentSink {
    fn record(&mut self, _warning: ParseWarning) {}
}

impl DiagnosticSink for Vec<ParseWarning> {
    fn record(&mut self, warning: ParseWarning) {
        self.push(warning);
    }
}
