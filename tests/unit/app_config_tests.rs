/*!
 * Tests for application configuration
 */

use anyhow::Result;
use log::LevelFilter;
use transcript_ingest::app_config::{Config, LogLevel};
use crate::common;

/// Test the default values
#[test]
fn test_default_config_shouldHaveExpectedValues() {
    let config = Config::default();

    assert_eq!(config.detection.min_confidence, 0.2);
    assert_eq!(config.detection.sniff_bytes, 1000);
    assert_eq!(config.timing.default_cue_duration_secs, 3.0);
    assert_eq!(config.timing.seconds_per_word, 0.5);
    assert_eq!(config.timing.min_sentence_duration_secs, 1.0);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test saving and loading keeps every value
#[test]
fn test_save_and_load_config_shouldPreserveValues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.detection.min_confidence = 0.35;
    config.timing.seconds_per_word = 0.4;
    config.log_level = LogLevel::Debug;
    config.save_to_file(&path)?;

    assert_eq!(Config::from_file(&path)?, config);
    Ok(())
}

/// Test a partial file fills the rest from defaults
#[test]
fn test_from_file_withPartialJson_shouldUseDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", r#"{"timing": {"seconds_per_word": 0.25}, "log_level": "warn"}"#)?;

    let config = Config::from_file(&path)?;

    assert_eq!(config.timing.seconds_per_word, 0.25);
    assert_eq!(config.timing.default_cue_duration_secs, 3.0);
    assert_eq!(config.detection, Config::default().detection);
    assert_eq!(config.log_level.to_level_filter(), LevelFilter::Warn);
    Ok(())
}

/// Test a missing file yields defaults
#[test]
fn test_load_or_default_withMissingFile_shouldReturnDefault() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = Config::load_or_default(temp_dir.path().join("absent.json"))?;

    assert_eq!(config, Config::default());
    Ok(())
}

/// Test invalid JSON is reported
#[test]
fn test_from_file_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{not json")?;

    assert!(Config::from_file(&path).is_err());
    Ok(())
}

/// Test validation rejects out-of-range values
#[test]
fn test_validate_withBadValues_shouldFail() {
    let mut config = Config::default();
    config.detection.min_confidence = 1.5;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.detection.sniff_bytes = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.timing.default_cue_duration_secs = 0.0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.timing.seconds_per_word = f64::NAN;
    assert!(config.validate().is_err());
}
