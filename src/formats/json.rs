//! Parser for JSON arrays of timed text records.
//!
//! Key lookup is by first match in a fixed preference order, e.g.
//! `[{"start": 0, "duration": 3, "text": "Hi"}]` or
//! `[{"begin": "1.5", "stop": 4, "caption": "Hi"}]`.

use log::debug;
use serde_json::{Map, Value};

use super::ParseContext;
use crate::diagnostics::ParseWarning;
use crate::transcript_processor::TranscriptSegment;

const START_KEYS: [&str; 4] = ["start", "begin", "time", "timestamp"];
const END_KEYS: [&str; 3] = ["end", "stop", "duration"];
const TEXT_KEYS: [&str; 4] = ["text", "content", "subtitle", "caption"];

/// Parse a JSON array of records into raw segments
pub fn parse(text: &str, ctx: &mut ParseContext<'_>) -> Vec<TranscriptSegment> {
    let items = match serde_json::from_str::<Value>(text.trim_start_matches('\u{feff}')) {
        Ok(Value::Array(items)) => items,
        Ok(_) => {
            debug!("JSON transcript root is not an array");
            return Vec::new();
        }
        Err(e) => {
            debug!("Failed to parse JSON transcript: {}", e);
            return Vec::new();
        }
    };

    let default_duration = ctx.timing.default_cue_duration_secs;
    let mut segments = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let Some(record) = item.as_object() else {
            continue;
        };

        match record_to_segment(record, default_duration) {
            Ok(segment) => segments.push(segment),
            Err(detail) => ctx.sink.record(ParseWarning::InvalidRecord { index, detail }),
        }
    }

    debug!("Parsed {} segments from JSON content", segments.len());
    segments
}

fn record_to_segment(record: &Map<String, Value>, default_duration: f64) -> Result<TranscriptSegment, String> {
    let start = match first_present(record, &START_KEYS) {
        Some((key, value)) => {
            as_seconds(value).ok_or_else(|| format!("non-numeric '{}' value: {}", key, value))?
        }
        None => return Err("missing start time".to_string()),
    };

    let end = match first_present(record, &END_KEYS) {
        Some((key, value)) => {
            let seconds = as_seconds(value)
                .ok_or_else(|| format!("non-numeric '{}' value: {}", key, value))?;
            if key == "duration" { start + seconds } else { seconds }
        }
        None => start + default_duration,
    };

    let text = first_present(record, &TEXT_KEYS)
        .and_then(|(_, value)| as_text(value))
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| "missing text".to_string())?;

    Ok(TranscriptSegment::new(start, end, text))
}

// Null values count as absent
fn first_present<'a>(record: &'a Map<String, Value>, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
    keys.iter()
        .find_map(|key| record.get(*key).filter(|v| !v.is_null()).map(|v| (*key, v)))
}

fn as_seconds(value: &Value) -> Option<f64> {
    let seconds = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    seconds.filter(|seconds| seconds.is_finite())
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
