/*!
 * Tests for segment validation
 */

use transcript_ingest::diagnostics::{ParseWarning, SilentSink};
use transcript_ingest::transcript_processor::TranscriptSegment;
use transcript_ingest::validation::{validate_segments, DropReason, SegmentValidator, ValidationSummary};

fn seg(start: f64, end: f64, text: &str) -> TranscriptSegment {
    TranscriptSegment::new(start, end, text)
}

/// Test the documented mixed example keeps only the first segment
#[test]
fn test_validate_segments_withMixedInput_shouldKeepValidOnly() {
    let valid = validate_segments(vec![
        seg(0.0, 3.0, "a"),
        seg(-1.0, 2.0, "b"),
        seg(5.0, 4.0, "c"),
        seg(1.0, 2.0, ""),
    ]);

    assert_eq!(valid, vec![seg(0.0, 3.0, "a")]);
}

/// Test each rejection reason
#[test]
fn test_check_withEachDefect_shouldReportReason() {
    assert_eq!(SegmentValidator::check(&seg(f64::INFINITY, 1.0, "x")), Err(DropReason::NonFiniteTimestamp));
    assert_eq!(SegmentValidator::check(&seg(0.0, f64::NAN, "x")), Err(DropReason::NonFiniteTimestamp));
    assert_eq!(SegmentValidator::check(&seg(0.0, -1.0, "x")), Err(DropReason::NegativeTimestamp));
    assert_eq!(SegmentValidator::check(&seg(2.0, 2.0, "x")), Err(DropReason::InvalidTimeRange));
    assert_eq!(SegmentValidator::check(&seg(0.0, 1.0, " \t\n")), Err(DropReason::EmptyText));
    assert_eq!(SegmentValidator::check(&seg(0.0, 1.0, "ok")), Ok(()));
}

/// Test every surviving segment satisfies the invariants and output is ordered
#[test]
fn test_validate_withRandomishInput_shouldUpholdInvariants() {
    let input: Vec<TranscriptSegment> = (0..40)
        .map(|i| {
            let start = ((i * 37) % 23) as f64 - 3.0;
            let end = start + ((i % 5) as f64) - 1.0;
            let text = if i % 7 == 0 { "   " } else { " text " };
            seg(start, end, text)
        })
        .collect();

    let (valid, summary) = SegmentValidator::new().validate(input, &mut SilentSink);

    assert_eq!(summary.total, 40);
    assert_eq!(summary.valid, valid.len());
    for s in &valid {
        assert!(s.start.is_finite() && s.end.is_finite());
        assert!(s.start >= 0.0 && s.start < s.end);
        assert_eq!(s.text, "text");
    }
    assert!(valid.windows(2).all(|w| w[0].start <= w[1].start));
}

/// Test equal start times keep their input order
#[test]
fn test_validate_withEqualStarts_shouldBeStable() {
    let valid = validate_segments(vec![seg(1.0, 2.0, "first"), seg(0.0, 1.0, "zero"), seg(1.0, 3.0, "second")]);

    let texts: Vec<&str> = valid.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["zero", "first", "second"]);
}

/// Test drops are reported with their input index
#[test]
fn test_validate_withDrops_shouldRecordWarnings() {
    let mut warnings: Vec<ParseWarning> = Vec::new();

    let (_, summary) = SegmentValidator::new().validate(vec![seg(0.0, 1.0, "ok"), seg(3.0, 1.0, "bad")], &mut warnings);

    assert_eq!(summary, ValidationSummary { total: 2, valid: 1 });
    assert_eq!(warnings, vec![ParseWarning::SegmentDropped { index: 1, reason: DropReason::InvalidTimeRange }]);
}

/// Test the reason messages
#[test]
fn test_dropReason_display_shouldDescribeDefect() {
    assert_eq!(DropReason::InvalidTimeRange.to_string(), "invalid time range (start >= end)");
    assert_eq!(DropReason::EmptyText.to_string(), "empty text");
}
