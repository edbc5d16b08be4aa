/*!
 * Transcript formats: detection and the per-format parsers.
 *
 * - `detector`: confidence scoring across the five formats
 * - `vtt`: WebVTT cues
 * - `srt`: SubRip blocks
 * - `youtube`: text copied from the YouTube transcript panel
 * - `json`: arrays of objects carrying timing and text keys
 * - `plain`: prose with estimated timings
 *
 * Every parser returns raw segments; validation happens later in
 * `crate::validation`.
 */

pub mod detector;
pub mod json;
pub mod plain;
pub mod srt;
pub mod vtt;
pub mod youtube;

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::app_config::TimingConfig;
use crate::diagnostics::DiagnosticSink;
use crate::transcript_processor::TranscriptSegment;

pub use detector::{detect, DetectionResult};

// @const: Inline markup tags
static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

// @const: Named and numeric HTML entities
static ENTITY_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"&[a-zA-Z0-9#]+;").unwrap());

// @const: Blank-line block separator
static BLOCK_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Supported transcript formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptFormat {
    Vtt,
    Srt,
    YoutubeCopyPaste,
    PlainText,
    JsonTimestamps,
    Unknown,
}

/// Human-readable description of a format
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub example: &'static str,
}

impl TranscriptFormat {
    /// Every format the engine can parse, in detection order
    pub const SUPPORTED: [TranscriptFormat; 5] = [
        TranscriptFormat::Vtt,
        TranscriptFormat::Srt,
        TranscriptFormat::YoutubeCopyPaste,
        TranscriptFormat::JsonTimestamps,
        TranscriptFormat::PlainText,
    ];

    // @returns: Stable lowercase identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vtt => "vtt",
            Self::Srt => "srt",
            Self::YoutubeCopyPaste => "youtube_copy_paste",
            Self::PlainText => "plain_text",
            Self::JsonTimestamps => "json_timestamps",
            Self::Unknown => "unknown",
        }
    }

    /// Name, description and a short example of the format
    pub fn info(&self) -> FormatInfo {
        match self {
            Self::Vtt => FormatInfo {
                name: "WebVTT",
                description: "Standard web video text track format",
                example: "WEBVTT\n\n00:00:01.000 --> 00:00:03.000\nHello world",
            },
            Self::Srt => FormatInfo {
                name: "SubRip",
                description: "Common subtitle format",
                example: "1\n00:00:01,000 --> 00:00:03,000\nHello world",
            },
            Self::YoutubeCopyPaste => FormatInfo {
                name: "YouTube Copy-Paste",
                description: "Format when copying from YouTube transcript panel",
                example: "0:00 Hello world\n0:03 Welcome to the video",
            },
            Self::PlainText => FormatInfo {
                name: "Plain Text",
                description: "Simple text without timing",
                example: "Hello world. Welcome to the video.",
            },
            Self::JsonTimestamps => FormatInfo {
                name: "JSON with Timestamps",
                description: "JSON format with timing data",
                example: r#"[{"start": 0, "end": 3, "text": "Hello world"}]"#,
            },
            Self::Unknown => FormatInfo {
                name: "Unknown",
                description: "",
                example: "",
            },
        }
    }
}

impl fmt::Display for TranscriptFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TranscriptFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "vtt" | "webvtt" => Ok(Self::Vtt),
            "srt" | "subrip" => Ok(Self::Srt),
            "youtube_copy_paste" | "youtube" => Ok(Self::YoutubeCopyPaste),
            "plain_text" | "plain" | "text" => Ok(Self::PlainText),
            "json_timestamps" | "json" => Ok(Self::JsonTimestamps),
            "unknown" => Ok(Self::Unknown),
            _ => Err(anyhow::anyhow!("Invalid transcript format: {}", s)),
        }
    }
}

/// Per-call state handed to each parser
pub struct ParseContext<'a> {
    /// Timing estimates for formats without explicit end times
    pub timing: &'a TimingConfig,
    /// Receiver for recoverable events
    pub sink: &'a mut dyn DiagnosticSink,
}

impl<'a> ParseContext<'a> {
    pub fn new(timing: &'a TimingConfig, sink: &'a mut dyn DiagnosticSink) -> Self {
        Self { timing, sink }
    }
}

/// Run the parser for `format` without validating its output
pub fn parse_with_format(
    text: &str,
    format: TranscriptFormat,
    ctx: &mut ParseContext<'_>,
) -> Vec<TranscriptSegment> {
    let text = text.trim_start_matches('\u{feff}');
    match format {
        TranscriptFormat::Vtt => vtt::parse(text, ctx),
        TranscriptFormat::Srt => srt::parse(text, ctx),
        TranscriptFormat::YoutubeCopyPaste => youtube::parse(text, ctx),
        TranscriptFormat::JsonTimestamps => json::parse(text, ctx),
        TranscriptFormat::PlainText => plain::parse(text, ctx),
        TranscriptFormat::Unknown => Vec::new(),
    }
}

/// Normalize CRLF and lone CR line endings to LF
pub(crate) fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Split text into blocks separated by blank lines
pub(crate) fn split_blocks(text: &str) -> impl Iterator<Item = &str> {
    BLOCK_SEPARATOR_REGEX
        .split(text)
        .map(str::trim)
        .filter(|block| !block.is_empty())
}

/// Trimmed, non-empty lines of a block
pub(crate) fn block_lines(block: &str) -> Vec<&str> {
    block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

/// Remove inline markup tags and HTML entities
pub(crate) fn strip_markup(line: &str) -> String {
    let without_tags = TAG_REGEX.replace_all(line, "");
    ENTITY_REGEX.replace_all(&without_tags, "").into_owned()
}
