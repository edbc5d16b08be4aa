//! Parser for text copied out of the YouTube transcript panel.
//!
//! Each line is `M:SS text` or `H:MM:SS text`. The format carries no end
//! times, so a segment ends where the next one starts and the last one
//! gets the configured default duration.

use log::debug;

use super::detector::YOUTUBE_LINE_REGEX;
use super::{ParseContext, TranscriptFormat};
use crate::diagnostics::ParseWarning;
use crate::timestamp::parse_youtube_time;
use crate::transcript_processor::TranscriptSegment;

/// Parse copy-paste transcript lines into raw segments
pub fn parse(text: &str, ctx: &mut ParseContext<'_>) -> Vec<TranscriptSegment> {
    let mut starts: Vec<(f64, String)> = Vec::new();

    for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let Some(caps) = YOUTUBE_LINE_REGEX.captures(line) else {
            continue;
        };
        let (Some(stamp), Some(body)) = (caps.get(1), caps.get(2)) else {
            continue;
        };

        match parse_youtube_time(stamp.as_str()) {
            Ok(start) => starts.push((start, body.as_str().trim().to_string())),
            Err(_) => ctx.sink.record(ParseWarning::MalformedTimestamp {
                format: TranscriptFormat::YoutubeCopyPaste,
                value: stamp.as_str().to_string(),
            }),
        }
    }

    let default_duration = ctx.timing.default_cue_duration_secs;
    let next_starts: Vec<Option<f64>> = starts
        .iter()
        .skip(1)
        .map(|(start, _)| Some(*start))
        .chain(std::iter::once(None))
        .collect();

    let segments: Vec<TranscriptSegment> = starts
        .into_iter()
        .zip(next_starts)
        .map(|((start, text), next)| {
            let end = next.unwrap_or(start + default_duration);
            TranscriptSegment::new(start, end, text)
        })
        .collect();

    debug!("Parsed {} segments from copy-paste content", segments.len());
    segments
}
