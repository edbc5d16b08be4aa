use std::fmt;
use std::path::Path;

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::app_config::{Config, TimingConfig};
use crate::diagnostics::{DiagnosticSink, LogSink, ParseWarning};
use crate::errors::TranscriptError;
use crate::file_utils::{FileManager, TextEncoding};
use crate::formats::{detect, parse_with_format, DetectionResult, ParseContext, TranscriptFormat};
use crate::timestamp::{format_vtt_time, CUE_ARROW};
use crate::validation::{SegmentValidator, ValidationSummary};

// @module: Transcript ingestion: detection, parsing, fallback and validation

// @const: SRT-shaped leading block used by the content sniffer
static SRT_SNIFF_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\d+\s*\n\d{2}:\d{2}:\d{2},\d{3} --> \d{2}:\d{2}:\d{2},\d{3}").unwrap()
});

// @struct: Single timed transcript segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    // @field: Start time in seconds
    pub start: f64,

    // @field: End time in seconds
    pub end: f64,

    // @field: Segment text
    pub text: String,
}

impl TranscriptSegment {
    /// Creates a segment without validating it
    pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
        TranscriptSegment {
            start,
            end,
            text: text.into(),
        }
    }

    /// Length of the segment in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    // @returns: Same segment with surrounding whitespace removed from the text
    pub(crate) fn trimmed(mut self) -> Self {
        let trimmed = self.text.trim();
        if trimmed.len() != self.text.len() {
            self.text = trimmed.to_string();
        }
        self
    }
}

impl fmt::Display for TranscriptSegment {
    /// Renders the segment as a WebVTT cue
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}{}{}", format_vtt_time(self.start), CUE_ARROW, format_vtt_time(self.end))?;
        // Blank lines would terminate the cue early
        let lines: Vec<&str> = self.text.lines().filter(|l| !l.trim().is_empty()).collect();
        writeln!(f, "{}", lines.join("\n"))
    }
}

/// Everything learned while ingesting one transcript
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutcome {
    /// Validated segments, sorted by start
    pub segments: Vec<TranscriptSegment>,
    /// Detector output; for a caller-supplied format this is that format with confidence 1.0
    pub detection: DetectionResult,
    /// Parser that produced the segments
    pub format: TranscriptFormat,
    /// Whether the extension/sniff fallback chose the parser
    pub used_fallback: bool,
    /// Raw versus surviving segment counts
    pub summary: ValidationSummary,
    /// Encoding the source was decoded with, when read from bytes
    pub encoding: Option<TextEncoding>,
}

/// Stateless ingestion engine
#[derive(Debug, Clone, Default)]
pub struct TranscriptParser {
    config: Config,
}

impl TranscriptParser {
    /// Create a parser with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with the given configuration
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parse a transcript file, logging recoverable issues
    pub fn parse<P: AsRef<Path>>(&self, path: P) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        self.parse_with_sink(path, &mut LogSink)
    }

    /// Parse a transcript file, reporting recoverable issues to `sink`
    pub fn parse_with_sink<P: AsRef<Path>>(
        &self,
        path: P,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        self.parse_detailed(path, sink).map(|outcome| outcome.segments)
    }

    /// Parse a transcript file and return the full outcome
    pub fn parse_detailed<P: AsRef<Path>>(
        &self,
        path: P,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<ParseOutcome, TranscriptError> {
        let path = path.as_ref();
        let decoded = FileManager::read_transcript(path, sink)?;

        let mut outcome = self.ingest(&decoded.text, Some(path), None, sink)?;
        outcome.encoding = decoded.encoding;
        Ok(outcome)
    }

    /// Parse in-memory text; `known_format` skips detection when given
    pub fn parse_text(
        &self,
        text: &str,
        known_format: Option<TranscriptFormat>,
    ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        self.parse_text_with_sink(text, known_format, &mut LogSink)
    }

    /// Parse in-memory text, reporting recoverable issues to `sink`
    pub fn parse_text_with_sink(
        &self,
        text: &str,
        known_format: Option<TranscriptFormat>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        self.parse_text_detailed(text, known_format, sink)
            .map(|outcome| outcome.segments)
    }

    /// Parse in-memory text and return the full outcome
    pub fn parse_text_detailed(
        &self,
        text: &str,
        known_format: Option<TranscriptFormat>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<ParseOutcome, TranscriptError> {
        if text.is_empty() {
            return Err(TranscriptError::EmptyInput("<text>".to_string()));
        }
        self.ingest(text, None, known_format, sink)
    }

    fn ingest(
        &self,
        text: &str,
        path: Option<&Path>,
        known_format: Option<TranscriptFormat>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<ParseOutcome, TranscriptError> {
        let label = source_label(path);

        if let Some(format) = known_format {
            if format == TranscriptFormat::Unknown {
                return Err(TranscriptError::UnsupportedFormat(format!(
                    "no parser for format '{}' ({})",
                    format, label
                )));
            }
            debug!("Skipping detection for {}, format given as {}", label, format);
            let raw = self.run_parser(text, format, sink);
            return Ok(self.finish(raw, DetectionResult::new(format, 1.0), format, false, sink));
        }

        let detection = detect(text);
        info!(
            "Detected format: {} with confidence {:.2} for {}",
            detection.format, detection.confidence, label
        );

        if detection.confidence >= self.config.detection.min_confidence {
            let raw = self.run_parser(text, detection.format, sink);
            if !raw.is_empty() {
                info!("Successfully parsed {} segments using {} parser", raw.len(), detection.format);
                return Ok(self.finish(raw, detection, detection.format, false, sink));
            }
            warn!("{} parser produced no segments for {}, trying fallback", detection.format, label);
        } else {
            sink.record(ParseWarning::LowConfidence {
                format: detection.format,
                confidence: detection.confidence,
            });
        }

        let format = self.fallback_format(text, path, sink).inspect_err(|e| {
            log::error!("All parsing methods failed for {}: {}", label, e);
        })?;
        let raw = self.run_parser(text, format, sink);
        Ok(self.finish(raw, detection, format, true, sink))
    }

    /// Choose a parser by trusted extension, then by sniffing the leading content
    fn fallback_format(
        &self,
        text: &str,
        path: Option<&Path>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<TranscriptFormat, TranscriptError> {
        if let Some(format) = path.and_then(FileManager::transcript_extension) {
            sink.record(ParseWarning::FallbackUsed {
                format,
                reason: "file extension".to_string(),
            });
            return Ok(format);
        }

        let head: String = text.chars().take(self.config.detection.sniff_bytes).collect();
        let sniffed = if head.contains("WEBVTT") {
            Some(TranscriptFormat::Vtt)
        } else if SRT_SNIFF_REGEX.is_match(&head) {
            Some(TranscriptFormat::Srt)
        } else {
            None
        };

        match sniffed {
            Some(format) => {
                sink.record(ParseWarning::FallbackUsed {
                    format,
                    reason: "content sniffing".to_string(),
                });
                Ok(format)
            }
            None => Err(TranscriptError::UnsupportedFormat(format!(
                "could not auto-detect format for {}",
                source_label(path)
            ))),
        }
    }

    fn run_parser(
        &self,
        text: &str,
        format: TranscriptFormat,
        sink: &mut dyn DiagnosticSink,
    ) -> Vec<TranscriptSegment> {
        let mut ctx = ParseContext::new(&self.config.timing, sink);
        parse_with_format(text, format, &mut ctx)
    }

    fn finish(
        &self,
        raw: Vec<TranscriptSegment>,
        detection: DetectionResult,
        format: TranscriptFormat,
        used_fallback: bool,
        sink: &mut dyn DiagnosticSink,
    ) -> ParseOutcome {
        let (segments, summary) = SegmentValidator::new().validate(raw, sink);
        ParseOutcome {
            segments,
            detection,
            format,
            used_fallback,
            summary,
            encoding: None,
        }
    }
}

fn source_label(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "<text>".to_string())
}

/// Run the parser for `format` with default timings, without validation
pub fn parse_to_segments(text: &str, format: TranscriptFormat) -> Vec<TranscriptSegment> {
    let timing = TimingConfig::default();
    let mut sink = LogSink;
    let mut ctx = ParseContext::new(&timing, &mut sink);
    parse_with_format(text, format, &mut ctx)
}

/// Render segments as canonical WebVTT.
///
/// Text is written as is. Cue text the VTT reader discards (digit-only
/// lines, bare `[Word]` annotations, text that is only markup or entities)
/// will not come back when the output is parsed again.
pub fn segments_to_vtt(segments: &[TranscriptSegment]) -> String {
    let mut vtt = String::from("WEBVTT\n\n");
    for segment in segments {
        vtt.push_str(&segment.to_string());
        vtt.push('\n');
    }
    vtt
}

/// Convert any supported format to WebVTT, detecting the format when not given
pub fn convert_to_vtt(text: &str, format: Option<TranscriptFormat>) -> String {
    let format = format.unwrap_or_else(|| detect(text).format);
    segments_to_vtt(&parse_to_segments(text, format))
}
