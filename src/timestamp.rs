/*!
 * Timestamp grammar shared by every parser.
 *
 * Accepted shapes for `parse_time`, chosen by colon count:
 * - `H:MM:SS[.mmm]`
 * - `M:SS[.mmm]`
 * - bare decimal seconds
 *
 * The decimal separator may be `.` or `,`. Fractions are normalized to
 * millisecond precision and the value is computed from an integer
 * millisecond total, so `"01:23:45.678"` yields exactly `5025.678`.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TimestampError;

// @const: H:MM:SS with optional fraction
static HOURS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2}):(\d{2})(?:[.,](\d+))?$").unwrap()
});

// @const: M:SS with optional fraction
static MINUTES_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+):(\d{2})(?:[.,](\d+))?$").unwrap()
});

// @const: Bare seconds
static SECONDS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)(?:[.,](\d+))?$").unwrap()
});

// @const: Cue timing line as found in VTT and SRT files
static CUE_TIMING_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\d{2}:\d{2}:\d{2}[.,]\d{3}\s*-->\s*\d{2}:\d{2}:\d{2}[.,]\d{3}",
        r"|\d{1,2}:\d{2}[.,]\d{3}\s*-->\s*\d{1,2}:\d{2}[.,]\d{3}",
        r"|\d{1,2}:\d{2}\s*-->\s*\d{1,2}:\d{2}",
    ))
    .unwrap()
});

/// Separator between the start and end of a cue timing line
pub const CUE_ARROW: &str = " --> ";

/// Parse a textual time into seconds
pub fn parse_time(value: &str) -> Result<f64, TimestampError> {
    let trimmed = value.trim();
    let malformed = || TimestampError::Malformed(trimmed.to_string());

    let (hours, minutes, seconds, fraction) = match trimmed.matches(':').count() {
        2 => {
            let caps = HOURS_REGEX.captures(trimmed).ok_or_else(malformed)?;
            let minutes = parse_component(caps.get(2).map(|m| m.as_str()), trimmed)?;
            if minutes >= 60 {
                return Err(malformed());
            }
            (
                parse_component(caps.get(1).map(|m| m.as_str()), trimmed)?,
                minutes,
                parse_component(caps.get(3).map(|m| m.as_str()), trimmed)?,
                caps.get(4).map(|m| m.as_str()),
            )
        }
        1 => {
            let caps = MINUTES_REGEX.captures(trimmed).ok_or_else(malformed)?;
            (
                0,
                parse_component(caps.get(1).map(|m| m.as_str()), trimmed)?,
                parse_component(caps.get(2).map(|m| m.as_str()), trimmed)?,
                caps.get(3).map(|m| m.as_str()),
            )
        }
        0 => {
            let caps = SECONDS_REGEX.captures(trimmed).ok_or_else(malformed)?;
            let whole = parse_component(caps.get(1).map(|m| m.as_str()), trimmed)?;
            let millis = fraction_to_millis(caps.get(2).map(|m| m.as_str()), trimmed)?;
            let total = whole
                .checked_mul(1_000)
                .and_then(|ms| ms.checked_add(millis))
                .ok_or_else(malformed)?;
            return Ok(total as f64 / 1000.0);
        }
        _ => return Err(malformed()),
    };

    if seconds >= 60 {
        return Err(malformed());
    }

    let millis = fraction_to_millis(fraction, trimmed)?;
    let total = hours
        .checked_mul(3_600_000)
        .and_then(|h| minutes.checked_mul(60_000).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(seconds * 1_000 + millis))
        .ok_or_else(malformed)?;

    Ok(total as f64 / 1000.0)
}

/// Parse a copy-paste style timestamp (`M:SS` or `H:MM:SS`, whole seconds only)
pub fn parse_youtube_time(value: &str) -> Result<f64, TimestampError> {
    let trimmed = value.trim();
    let parts = trimmed
        .split(':')
        .map(|part| parse_component(Some(part), trimmed))
        .collect::<Result<Vec<u64>, _>>()?;

    let malformed = || TimestampError::Malformed(trimmed.to_string());
    let seconds = match parts.as_slice() {
        [minutes, seconds] => minutes.checked_mul(60).and_then(|m| m.checked_add(*seconds)),
        [hours, minutes, seconds] => hours
            .checked_mul(3600)
            .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
            .and_then(|hm| hm.checked_add(*seconds)),
        _ => return Err(malformed()),
    }
    .ok_or_else(malformed)?;

    Ok(seconds as f64)
}

/// Split a `start --> end` line into seconds.
///
/// Anything after the first whitespace-separated token of the end side
/// (cue settings such as `align:start position:10%`) is ignored.
pub fn parse_cue_timing(line: &str) -> Result<(f64, f64), TimestampError> {
    let parts: Vec<&str> = line.split(CUE_ARROW).collect();
    if parts.len() != 2 {
        return Err(TimestampError::Malformed(line.trim().to_string()));
    }

    let start = parse_time(parts[0])?;
    let end_token = parts[1].split_whitespace().next().unwrap_or_default();
    let end = parse_time(end_token)?;

    Ok((start, end))
}

/// Check whether a line looks like a cue timing line
pub fn is_cue_timing_line(line: &str) -> bool {
    line.contains(CUE_ARROW) && CUE_TIMING_REGEX.is_match(line)
}

/// Format seconds as a WebVTT timestamp (HH:MM:SS.mmm), rounded to the millisecond
pub fn format_vtt_time(seconds: f64) -> String {
    let ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };
    format_millis(ms)
}

/// Format milliseconds as HH:MM:SS.mmm
pub fn format_millis(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02}.{:03}", hours, minutes, seconds, millis)
}

fn parse_component(part: Option<&str>, original: &str) -> Result<u64, TimestampError> {
    part.filter(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|p| p.parse::<u64>().ok())
        .ok_or_else(|| TimestampError::Malformed(original.to_string()))
}

// Right-pad or truncate the fractional digits to three places
fn fraction_to_millis(fraction: Option<&str>, original: &str) -> Result<u64, TimestampError> {
    match fraction {
        None => Ok(0),
        Some(digits) => {
            let truncated: String = digits.chars().take(3).collect();
            parse_component(Some(&format!("{:0<3}", truncated)), original)
        }
    }
}
