//! WebVTT cue parser.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::{block_lines, normalize_newlines, split_blocks, strip_markup, ParseContext, TranscriptFormat};
use crate::diagnostics::ParseWarning;
use crate::timestamp::{parse_cue_timing, CUE_ARROW};
use crate::transcript_processor::TranscriptSegment;

// @const: Stray timestamps like "0:02" mixed into cue text
static STRAY_TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+:\d+$").unwrap());

// @const: Sound annotations like "[Music]"
static ANNOTATION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[\w+\]$").unwrap());

/// Parse WebVTT content into raw segments
pub fn parse(text: &str, ctx: &mut ParseContext<'_>) -> Vec<TranscriptSegment> {
    let content = normalize_newlines(text);
    let mut segments = Vec::new();

    for block in split_blocks(&content) {
        if block.starts_with("WEBVTT") || block.starts_with("NOTE") {
            continue;
        }

        let lines = block_lines(block);
        if lines.len() < 2 {
            continue;
        }

        // The line before the timing line, if any, is a cue identifier and is ignored
        let Some(timing_idx) = lines.iter().position(|line| line.contains(CUE_ARROW)) else {
            continue;
        };

        let cue_text = clean_cue_text(&lines[timing_idx + 1..]);
        if cue_text.is_empty() {
            continue;
        }

        match parse_cue_timing(lines[timing_idx]) {
            Ok((start, end)) => segments.push(TranscriptSegment::new(start, end, cue_text)),
            Err(e) => {
                debug!("Skipped invalid VTT cue: {}", e);
                ctx.sink.record(ParseWarning::MalformedTimestamp {
                    format: TranscriptFormat::Vtt,
                    value: lines[timing_idx].to_string(),
                });
            }
        }
    }

    debug!("Parsed {} segments from VTT content", segments.len());
    segments
}

fn clean_cue_text(lines: &[&str]) -> String {
    lines
        .iter()
        .map(|line| strip_markup(line))
        .map(|line| {
            let trimmed = line.trim();
            if STRAY_TIMESTAMP_REGEX.is_match(trimmed) || ANNOTATION_REGEX.is_match(trimmed) {
                String::new()
            } else {
                trimmed.to_string()
            }
        })
        .filter(|line| !line.is_empty() && !line.bytes().all(|b| b.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join(" ")
}
