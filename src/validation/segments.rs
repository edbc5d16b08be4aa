/*!
 * Segment validation.
 *
 * A segment survives when:
 * - both timestamps are finite and non-negative
 * - start is strictly before end
 * - its text is non-empty after trimming
 *
 * Survivors are trimmed and stable-sorted by start time. Every drop is
 * reported to the diagnostic sink and never fails the call.
 */

use std::fmt;

use log::info;
use serde::Serialize;

use crate::diagnostics::{DiagnosticSink, LogSink, ParseWarning};
use crate::transcript_processor::TranscriptSegment;

/// Why a segment was excluded from the validated output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DropReason {
    /// Start or end could not be read as a number
    NonFiniteTimestamp,
    /// Start or end is below zero
    NegativeTimestamp,
    /// Start is at or after end
    InvalidTimeRange,
    /// Text is empty after trimming
    EmptyText,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DropReason::NonFiniteTimestamp => write!(f, "non-numeric timestamp"),
            DropReason::NegativeTimestamp => write!(f, "negative timestamp"),
            DropReason::InvalidTimeRange => write!(f, "invalid time range (start >= end)"),
            DropReason::EmptyText => write!(f, "empty text"),
        }
    }
}

/// Counts from one validation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ValidationSummary {
    /// Segments handed to the validator
    pub total: usize,
    /// Segments that survived
    pub valid: usize,
}

impl ValidationSummary {
    pub fn dropped(&self) -> usize {
        self.total - self.valid
    }
}

/// Stateless validator for parsed segments
#[derive(Debug, Default, Clone, Copy)]
pub struct SegmentValidator;

impl SegmentValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check a single segment
    pub fn check(segment: &TranscriptSegment) -> Result<(), DropReason> {
        if !segment.start.is_finite() || !segment.end.is_finite() {
            return Err(DropReason::NonFiniteTimestamp);
        }
        if segment.start < 0.0 || segment.end < 0.0 {
            return Err(DropReason::NegativeTimestamp);
        }
        if segment.start >= segment.end {
            return Err(DropReason::InvalidTimeRange);
        }
        if segment.text.trim().is_empty() {
            return Err(DropReason::EmptyText);
        }
        Ok(())
    }

    /// Filter, trim and sort `segments`, reporting each drop to `sink`
    pub fn validate(
        &self,
        segments: Vec<TranscriptSegment>,
        sink: &mut dyn DiagnosticSink,
    ) -> (Vec<TranscriptSegment>, ValidationSummary) {
        let total = segments.len();
        if total == 0 {
            return (segments, ValidationSummary::default());
        }

        let mut cleaned: Vec<TranscriptSegment> = segments
            .into_iter()
            .enumerate()
            .filter_map(|(index, segment)| match Self::check(&segment) {
                Ok(()) => Some(segment.trimmed()),
                Err(reason) => {
                    sink.record(ParseWarning::SegmentDropped { index, reason });
                    None
                }
            })
            .collect();

        cleaned.sort_by(|a, b| a.start.total_cmp(&b.start));

        let summary = ValidationSummary {
            total,
            valid: cleaned.len(),
        };
        info!("Validated {} segments out of {} total", summary.valid, summary.total);

        (cleaned, summary)
    }
}

/// Validate segments, logging every drop through the `log` facade
pub fn validate_segments(segments: Vec<TranscriptSegment>) -> Vec<TranscriptSegment> {
    SegmentValidator::new().validate(segments, &mut LogSink).0
}
