/*!
 * Integration tests for the CLI controller
 */

use anyhow::Result;
use std::fs;
use transcript_ingest::app_controller::{ConvertStatus, Controller, FolderSummary, OutputFormat};
use transcript_ingest::diagnostics::SilentSink;
use transcript_ingest::formats::TranscriptFormat;
use transcript_ingest::transcript_processor::TranscriptSegment;
use crate::common;

/// Test detection through the controller
#[test]
fn test_detect_file_withSrt_shouldReportSrt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "talk.srt", common::SAMPLE_SRT)?;

    let result = Controller::new_for_test()?.detect_file(&path)?;

    assert_eq!(result.format, TranscriptFormat::Srt);
    Ok(())
}

/// Test a forced format overrides detection
#[test]
fn test_parse_file_withForcedFormat_shouldUseIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "talk.txt", common::SAMPLE_VTT_WITH_IDS)?;

    let outcome = Controller::new_for_test()?.parse_file(&path, Some(TranscriptFormat::Vtt), &mut SilentSink)?;

    assert_eq!(outcome.format, TranscriptFormat::Vtt);
    assert_eq!(outcome.segments.len(), 2);
    Ok(())
}

/// Test the three renderings
#[test]
fn test_render_withEachOutput_shouldFormatSegments() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let segments = vec![TranscriptSegment::new(0.0, 1.5, "Hi")];

    let json: serde_json::Value = serde_json::from_str(&controller.render(&segments, OutputFormat::Json)?)?;
    assert_eq!(json, serde_json::json!([{"start": 0.0, "end": 1.5, "text": "Hi"}]));

    assert_eq!(controller.render(&segments, OutputFormat::Text)?, "[00:00:00.000 - 00:00:01.500] Hi");
    assert!(controller.render(&segments, OutputFormat::Vtt)?.starts_with("WEBVTT\n\n"));
    Ok(())
}

/// Test validation report collects drop warnings
#[test]
fn test_validate_file_withBadCue_shouldListWarning() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let content = "1\n00:00:05,000 --> 00:00:01,000\nbackwards\n\n2\n00:00:06,000 --> 00:00:07,000\nfine\n";
    let path = common::create_test_file(temp_dir.path(), "talk.srt", content)?;

    let report = Controller::new_for_test()?.validate_file(&path)?;

    assert_eq!(report.outcome.summary.valid, 1);
    assert_eq!(report.outcome.summary.dropped(), 1);
    assert!(report.warnings.iter().any(|w| w.contains("invalid time range")));
    Ok(())
}

/// Test converting one file, then skipping it, then forcing it
#[test]
fn test_convert_file_withExistingOutput_shouldRespectForce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "talk.srt", common::SAMPLE_SRT)?;
    let out_dir = temp_dir.path().join("out");
    let controller = Controller::new_for_test()?;

    let expected = out_dir.join("talk.vtt");
    assert_eq!(controller.convert_file(&input, &out_dir, false)?, ConvertStatus::Written(expected.clone()));
    assert!(fs::read_to_string(&expected)?.starts_with("WEBVTT\n\n00:00:01.000 --> 00:00:04.000\n"));

    assert_eq!(controller.convert_file(&input, &out_dir, false)?, ConvertStatus::Skipped(expected.clone()));
    assert_eq!(controller.convert_file(&input, &out_dir, true)?, ConvertStatus::Written(expected));
    Ok(())
}

/// Test converting a file onto itself is refused
#[test]
fn test_convert_file_intoOwnDirectory_shouldRefuseOverwrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "talk.vtt", common::SAMPLE_VTT)?;

    let result = Controller::new_for_test()?.convert_file(&input, temp_dir.path(), true);

    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&input)?, common::SAMPLE_VTT);
    Ok(())
}

/// Test folder conversion counts converted and failed files
#[test]
fn test_convert_folder_withMixedFiles_shouldSummarize() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "a.srt", common::SAMPLE_SRT)?;
    common::create_test_file(temp_dir.path(), "b.json", common::SAMPLE_JSON)?;
    common::create_test_file(temp_dir.path(), "c.txt", "   ")?;
    common::create_test_file(temp_dir.path(), "ignored.mp4", "x")?;
    let out_dir = temp_dir.path().join("vtt");
    let controller = Controller::new_for_test()?;

    let summary = controller.convert_folder(temp_dir.path(), &out_dir, false)?;

    assert_eq!(summary, FolderSummary { converted: 2, skipped: 0, failed: 1 });
    assert!(out_dir.join("a.vtt").exists());
    assert!(out_dir.join("b.vtt").exists());

    let again = controller.convert_folder(temp_dir.path(), &out_dir, false)?;
    assert_eq!(again, FolderSummary { converted: 0, skipped: 2, failed: 1 });
    Ok(())
}

/// Test an empty folder is an error
#[test]
fn test_convert_folder_withNoTranscripts_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let out_dir = temp_dir.path().join("vtt");

    assert!(Controller::new_for_test()?.convert_folder(temp_dir.path(), &out_dir, false).is_err());
    Ok(())
}
