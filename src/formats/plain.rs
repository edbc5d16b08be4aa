//! Prose parser with reading-speed timings.
//!
//! Timings are a crude estimate (`max(words × seconds_per_word, floor)`),
//! good enough to order and window the text, not to sync it with media.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use super::ParseContext;
use crate::transcript_processor::TranscriptSegment;

// @const: Sentence terminator followed by whitespace
static SENTENCE_END_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Split prose into sentence segments with estimated timings
pub fn parse(text: &str, ctx: &mut ParseContext<'_>) -> Vec<TranscriptSegment> {
    let seconds_per_word = ctx.timing.seconds_per_word;
    let min_duration = ctx.timing.min_sentence_duration_secs;

    let mut segments = Vec::new();
    let mut current_time = 0.0;

    for sentence in split_sentences(text) {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }

        let duration = (words.len() as f64 * seconds_per_word).max(min_duration);
        segments.push(TranscriptSegment::new(current_time, current_time + duration, words.join(" ")));
        current_time += duration;
    }

    debug!("Estimated timings for {} sentences", segments.len());
    segments
}

/// Split after `.`, `!` or `?` when followed by whitespace, keeping the punctuation
pub(crate) fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut last = 0;

    for m in SENTENCE_END_REGEX.find_iter(text) {
        // The terminator is a single ASCII byte
        sentences.push(&text[last..m.start() + 1]);
        last = m.end();
    }
    sentences.push(&text[last..]);

    sentences
}
