/*!
 * Tests for the per-format parsers
 */

use transcript_ingest::app_config::TimingConfig;
use transcript_ingest::diagnostics::ParseWarning;
use transcript_ingest::formats::{parse_with_format, ParseContext, TranscriptFormat};
use transcript_ingest::transcript_processor::{parse_to_segments, TranscriptSegment};
use crate::common;

fn parse_collecting(text: &str, format: TranscriptFormat) -> (Vec<TranscriptSegment>, Vec<ParseWarning>) {
    let timing = TimingConfig::default();
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let segments = {
        let mut ctx = ParseContext::new(&timing, &mut warnings);
        parse_with_format(text, format, &mut ctx)
    };
    (segments, warnings)
}

/// Test VTT parsing strips voice tags and cue settings
#[test]
fn test_vtt_parse_withSample_shouldProduceCleanSegments() {
    let segments = parse_to_segments(common::SAMPLE_VTT, TranscriptFormat::Vtt);

    assert_eq!(segments, vec![
        TranscriptSegment::new(1.0, 4.0, "Hello world"),
        TranscriptSegment::new(5.0, 9.5, "Welcome to the video"),
    ]);
}

/// Test VTT cue identifiers and NOTE blocks are ignored
#[test]
fn test_vtt_parse_withIdsAndNotes_shouldSkipThem() {
    let segments = parse_to_segments(common::SAMPLE_VTT_WITH_IDS, TranscriptFormat::Vtt);

    let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["Hello world", "Welcome to the video"]);
}

/// Test VTT text cleanup of annotations, stray timestamps and entities
#[test]
fn test_vtt_parse_withNoisyCueText_shouldCleanIt() {
    let content = "WEBVTT\n\n00:00:01.000 --> 00:00:02.000\n[Music]\n0:02\nTom &amp; <b>Jerry</b>\n42\n";
    let segments = parse_to_segments(content, TranscriptFormat::Vtt);

    assert_eq!(segments, vec![TranscriptSegment::new(1.0, 2.0, "Tom  Jerry")]);
}

/// Test a malformed VTT timing drops only that cue and raises a warning
#[test]
fn test_vtt_parse_withMalformedTiming_shouldWarnAndSkip() {
    let content = "WEBVTT\n\n00:00:01.000 --> 00:99:02.000\nbad\n\n00:00:03.000 --> 00:00:04.000\ngood";
    let (segments, warnings) = parse_collecting(content, TranscriptFormat::Vtt);

    assert_eq!(segments, vec![TranscriptSegment::new(3.0, 4.0, "good")]);
    assert!(matches!(
        warnings.as_slice(),
        [ParseWarning::MalformedTimestamp { format: TranscriptFormat::Vtt, .. }]
    ));
}

/// Test CRLF line endings parse the same as LF
#[test]
fn test_vtt_parse_withCrlf_shouldMatchLf() {
    let crlf = common::SAMPLE_VTT.replace('\n', "\r\n");
    assert_eq!(
        parse_to_segments(&crlf, TranscriptFormat::Vtt),
        parse_to_segments(common::SAMPLE_VTT, TranscriptFormat::Vtt)
    );
}

/// Test SRT parsing with comma decimals, tags and multi-line text
#[test]
fn test_srt_parse_withSample_shouldProduceSegments() {
    let segments = parse_to_segments(common::SAMPLE_SRT, TranscriptFormat::Srt);

    assert_eq!(segments, vec![
        TranscriptSegment::new(1.0, 4.0, "This is a test subtitle."),
        TranscriptSegment::new(5.0, 9.0, "It contains multiple entries."),
        TranscriptSegment::new(10.0, 14.0, "For testing purposes."),
    ]);
}

/// Test SRT override directives are removed
#[test]
fn test_srt_parse_withDirectives_shouldStripThem() {
    let segments = parse_to_segments("1\n00:00:01,000 --> 00:00:02,000\n{\\an8}Top text\n", TranscriptFormat::Srt);
    assert_eq!(segments[0].text, "Top text");
}

/// Test SRT blocks without a sequence number are skipped
#[test]
fn test_srt_parse_withMissingSequence_shouldSkipBlock() {
    let content = "00:00:01,000 --> 00:00:02,000\nno number\nmore\n\n2\n00:00:03,000 --> 00:00:04,000\nkept";
    let segments = parse_to_segments(content, TranscriptFormat::Srt);

    assert_eq!(segments, vec![TranscriptSegment::new(3.0, 4.0, "kept")]);
}

/// Test copy-paste end times chain to the next start
#[test]
fn test_youtube_parse_withSample_shouldChainEndTimes() {
    let segments = parse_to_segments(common::SAMPLE_YOUTUBE, TranscriptFormat::YoutubeCopyPaste);

    assert_eq!(segments, vec![
        TranscriptSegment::new(0.0, 15.0, "Hello world"),
        TranscriptSegment::new(15.0, 3723.0, "Welcome to the video"),
        TranscriptSegment::new(3723.0, 3726.0, "Much later"),
    ]);
}

/// Test lines without a timestamp prefix are ignored
#[test]
fn test_youtube_parse_withUnstampedLines_shouldIgnoreThem() {
    let segments = parse_to_segments("0:00 Hi\nchapter heading\n0:15 Bye", TranscriptFormat::YoutubeCopyPaste);
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].end, 15.0);
}

/// Test JSON with end and duration keys
#[test]
fn test_json_parse_withSample_shouldResolveKeys() {
    let segments = parse_to_segments(common::SAMPLE_JSON, TranscriptFormat::JsonTimestamps);

    assert_eq!(segments, vec![
        TranscriptSegment::new(0.0, 3.0, "Hello world"),
        TranscriptSegment::new(4.5, 7.0, "Welcome to the video"),
    ]);
}

/// Test JSON records lacking required keys raise warnings
#[test]
fn test_json_parse_withBadRecords_shouldWarnPerRecord() {
    let (segments, warnings) = parse_collecting(r#"[{"text":"x"},{"start":1,"text":"y"}]"#, TranscriptFormat::JsonTimestamps);

    assert_eq!(segments, vec![TranscriptSegment::new(1.0, 4.0, "y")]);
    assert!(matches!(warnings.as_slice(), [ParseWarning::InvalidRecord { index: 0, .. }]));
}

/// Test plain text timing estimates
#[test]
fn test_plain_parse_withSample_shouldEstimateTimings() {
    let segments = parse_to_segments(common::SAMPLE_PLAIN, TranscriptFormat::PlainText);

    assert_eq!(segments, vec![
        TranscriptSegment::new(0.0, 1.0, "Hello world."),
        TranscriptSegment::new(1.0, 3.0, "Welcome to the video."),
        TranscriptSegment::new(3.0, 4.5, "This is important."),
    ]);
}

/// Test custom timing settings are honored
#[test]
fn test_plain_parse_withCustomTiming_shouldUseIt() {
    let timing = TimingConfig {
        seconds_per_word: 1.0,
        min_sentence_duration_secs: 0.5,
        ..TimingConfig::default()
    };
    let mut warnings: Vec<ParseWarning> = Vec::new();
    let mut ctx = ParseContext::new(&timing, &mut warnings);

    let segments = parse_with_format("One two three.", TranscriptFormat::PlainText, &mut ctx);

    assert_eq!(segments, vec![TranscriptSegment::new(0.0, 3.0, "One two three.")]);
}

/// Test the unknown format produces nothing
#[test]
fn test_parse_withUnknownFormat_shouldReturnEmpty() {
    assert!(parse_to_segments("anything", TranscriptFormat::Unknown).is_empty());
}
