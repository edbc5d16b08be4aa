//! SubRip block parser.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::detector::is_sequence_number;
use super::{block_lines, normalize_newlines, split_blocks, strip_markup, ParseContext, TranscriptFormat};
use crate::diagnostics::ParseWarning;
use crate::timestamp::{parse_cue_timing, CUE_ARROW};
use crate::transcript_processor::TranscriptSegment;

// @const: SSA-style override directives such as {\an8}
static DIRECTIVE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").unwrap());

/// Parse SRT content into raw segments
pub fn parse(text: &str, ctx: &mut ParseContext<'_>) -> Vec<TranscriptSegment> {
    let content = normalize_newlines(text);
    let mut segments = Vec::new();

    for block in split_blocks(&content) {
        let lines = block_lines(block);
        if lines.len() < 3 {
            continue;
        }

        if !is_sequence_number(lines[0]) || !lines[1].contains(CUE_ARROW) {
            debug!("Skipped SRT block without sequence number and timing: {:?}", lines[0]);
            continue;
        }

        let text = lines[2..]
            .iter()
            .map(|line| strip_markup(&DIRECTIVE_REGEX.replace_all(line, "")))
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if text.is_empty() {
            continue;
        }

        match parse_cue_timing(&lines[1].replace(',', ".")) {
            Ok((start, end)) => segments.push(TranscriptSegment::new(start, end, text)),
            Err(e) => {
                debug!("Skipped invalid SRT block {}: {}", lines[0], e);
                ctx.sink.record(ParseWarning::MalformedTimestamp {
                    format: TranscriptFormat::Srt,
                    value: lines[1].to_string(),
                });
            }
        }
    }

    debug!("Parsed {} segments from SRT content", segments.len());
    segments
}
