/*!
 * Format detection by additive confidence heuristics.
 *
 * Formats are tried in a fixed order (VTT, SRT, YouTube copy-paste, JSON)
 * and the first one whose score clears its threshold wins. Prose that
 * matches nothing structured scores a flat 0.5, below every structured
 * threshold but still selectable.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use super::TranscriptFormat;
use crate::timestamp::is_cue_timing_line;

/// VTT is accepted strictly above this score
pub const VTT_THRESHOLD: f64 = 0.6;
/// SRT is accepted at or above this score
pub const SRT_THRESHOLD: f64 = 0.7;
/// YouTube copy-paste is accepted strictly above this score
pub const YOUTUBE_THRESHOLD: f64 = 0.6;
/// JSON timestamps are accepted strictly above this score
pub const JSON_THRESHOLD: f64 = 0.6;
/// Fixed score for prose
pub const PLAIN_TEXT_CONFIDENCE: f64 = 0.5;

const VTT_HEADER: &str = "WEBVTT";
const JSON_TIME_KEYS: [&str; 4] = ["start", "time", "timestamp", "begin"];
const JSON_TEXT_KEYS: [&str; 3] = ["text", "content", "subtitle"];
const JSON_SAMPLE_SIZE: usize = 3;

// @const: "0:00 text", "1:23:45 text"
pub(crate) static YOUTUBE_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}:\d{2}(?::\d{2})?)\s+(\S.*)$").unwrap()
});

/// Best-fit format and its advisory confidence
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DetectionResult {
    pub format: TranscriptFormat,
    pub confidence: f64,
}

impl DetectionResult {
    pub fn new(format: TranscriptFormat, confidence: f64) -> Self {
        Self { format, confidence }
    }

    /// Result for input with no usable content
    pub fn unknown() -> Self {
        Self::new(TranscriptFormat::Unknown, 0.0)
    }
}

/// Detect the transcript format of `text`
pub fn detect(text: &str) -> DetectionResult {
    let content = text.trim_start_matches('\u{feff}').trim();
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return DetectionResult::unknown();
    }

    let vtt = vtt_confidence(content, &lines);
    if vtt > VTT_THRESHOLD {
        return DetectionResult::new(TranscriptFormat::Vtt, vtt);
    }

    let srt = srt_confidence(content);
    if srt >= SRT_THRESHOLD {
        return DetectionResult::new(TranscriptFormat::Srt, srt);
    }

    let youtube = youtube_confidence(&lines);
    if youtube > YOUTUBE_THRESHOLD {
        return DetectionResult::new(TranscriptFormat::YoutubeCopyPaste, youtube);
    }

    let json = json_confidence(content);
    if json > JSON_THRESHOLD {
        return DetectionResult::new(TranscriptFormat::JsonTimestamps, json);
    }

    DetectionResult::new(TranscriptFormat::PlainText, PLAIN_TEXT_CONFIDENCE)
}

/// Header bonus plus the share of cue timing lines among the non-header lines
pub fn vtt_confidence(content: &str, lines: &[&str]) -> f64 {
    let mut confidence = 0.0;
    let has_header = content.starts_with(VTT_HEADER);
    if has_header {
        confidence += 0.4;
    }

    let counted: Vec<&str> = lines
        .iter()
        .enumerate()
        .filter(|(i, line)| !(has_header && *i == 0 && line.starts_with(VTT_HEADER)))
        .map(|(_, line)| *line)
        .collect();

    if !counted.is_empty() {
        let timing_lines = counted.iter().filter(|line| is_cue_timing_line(line)).count();
        confidence += (timing_lines as f64 / counted.len() as f64) * 0.6;
    }

    confidence.min(1.0)
}

/// Score repeating (number, timing, text, blank) blocks from the top of the text
pub fn srt_confidence(content: &str) -> f64 {
    let lines: Vec<&str> = content.lines().map(str::trim).collect();
    if lines.iter().filter(|line| !line.is_empty()).count() < 3 {
        return 0.0;
    }

    let mut confidence = 0.0;
    let mut blocks = 0usize;
    let mut i = 0;

    while i < lines.len() {
        while i < lines.len() && lines[i].is_empty() {
            i += 1;
        }
        if i >= lines.len() || !is_sequence_number(lines[i]) {
            break;
        }
        confidence += 0.2;
        i += 1;

        if i >= lines.len() || !is_cue_timing_line(lines[i]) {
            break;
        }
        confidence += 0.3;
        i += 1;

        let text_start = i;
        while i < lines.len() && !lines[i].is_empty() {
            i += 1;
        }
        if i == text_start {
            break;
        }
        blocks += 1;
    }

    if blocks > 0 {
        confidence += 0.4 * (blocks as f64 / 2.0).min(1.0);
    }

    confidence.min(1.0)
}

/// Fraction of lines carrying a copy-paste timestamp prefix
pub fn youtube_confidence(lines: &[&str]) -> f64 {
    if lines.len() < 2 {
        return 0.0;
    }

    let matching = lines
        .iter()
        .filter(|line| YOUTUBE_LINE_REGEX.is_match(line))
        .count();

    matching as f64 / lines.len() as f64
}

/// Fraction of the first few array elements that look like timed records
pub fn json_confidence(content: &str) -> f64 {
    let items = match serde_json::from_str::<Value>(content) {
        Ok(Value::Array(items)) if !items.is_empty() => items,
        _ => return 0.0,
    };

    let sample_size = items.len().min(JSON_SAMPLE_SIZE);
    let valid = items
        .iter()
        .take(sample_size)
        .filter(|item| match item.as_object() {
            Some(obj) => {
                JSON_TIME_KEYS.iter().any(|key| obj.contains_key(*key))
                    && JSON_TEXT_KEYS.iter().any(|key| obj.contains_key(*key))
            }
            None => false,
        })
        .count();

    valid as f64 / sample_size as f64
}

pub(crate) fn is_sequence_number(line: &str) -> bool {
    !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit())
}
