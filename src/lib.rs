/*!
 * # transcript-ingest - Transcript format detection, parsing and validation
 *
 * A Rust library that turns arbitrary transcript text into clean, timed
 * segments.
 *
 * ## Features
 *
 * - Detect the format of transcript text with a confidence score
 * - Parse five formats into `(start, end, text)` segments:
 *   - WebVTT
 *   - SubRip (SRT)
 *   - YouTube transcript-panel copy/paste
 *   - JSON arrays of timed records
 *   - Plain prose with estimated timings
 * - Read files through a UTF-8 / CP1252 / ISO-8859-1 decoding chain
 * - Fall back to file extension or content sniffing when detection is unsure
 * - Filter invalid segments and order the survivors by start time
 * - Render segments back to canonical WebVTT
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `timestamp`: Timestamp grammar shared by the parsers
 * - `formats`: Format detection and the per-format parsers:
 *   - `formats::detector`: Confidence scoring
 *   - `formats::vtt`, `formats::srt`, `formats::youtube`, `formats::json`, `formats::plain`
 * - `validation`: Segment filtering and ordering
 * - `transcript_processor`: Ingestion entry points and WebVTT rendering
 * - `diagnostics`: Recoverable parse events and their sinks
 * - `file_utils`: File system operations and text decoding
 * - `app_controller`: Command implementations used by the CLI
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
// Test names follow test_subject_withCondition_shouldOutcome
#![cfg_attr(test, allow(non_snake_case))]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod diagnostics;
pub mod errors;
pub mod file_utils;
pub mod formats;
pub mod timestamp;
pub mod transcript_processor;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use diagnostics::{DiagnosticSink, LogSink, ParseWarning, SilentSink};
pub use errors::{TimestampError, TranscriptError};
pub use formats::{detect, DetectionResult, TranscriptFormat};
pub use transcript_processor::{
    convert_to_vtt, parse_to_segments, segments_to_vtt, ParseOutcome, TranscriptParser,
    TranscriptSegment,
};
pub use validation::{validate_segments, DropReason, ValidationSummary};
