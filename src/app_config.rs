use anyhow::{anyhow, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles loading, validating and saving the tunable values of
/// the ingestion engine. Detection thresholds per format are fixed; what can
/// be tuned here is the fallback gate, sniff window and synthetic timings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Detection settings
    #[serde(default)]
    pub detection: DetectionConfig,

    /// Synthetic timing settings for formats without explicit end times
    #[serde(default)]
    pub timing: TimingConfig,

    /// CLI output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Format detection configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DetectionConfig {
    /// Minimum confidence before the detected parser is trusted
    #[serde(default = "default_min_confidence")]
    pub min_confidence: f64,

    /// Number of leading characters inspected by the fallback sniffer
    #[serde(default = "default_sniff_bytes")]
    pub sniff_bytes: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_confidence: default_min_confidence(),
            sniff_bytes: default_sniff_bytes(),
        }
    }
}

/// Timing estimates for formats that carry no end time
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimingConfig {
    // @field: Duration given to a cue whose end cannot be inferred
    #[serde(default = "default_cue_duration_secs")]
    pub default_cue_duration_secs: f64,

    // @field: Reading-speed estimate for prose
    #[serde(default = "default_seconds_per_word")]
    pub seconds_per_word: f64,

    // @field: Floor for an estimated sentence duration
    #[serde(default = "default_min_sentence_duration_secs")]
    pub min_sentence_duration_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            default_cue_duration_secs: default_cue_duration_secs(),
            seconds_per_word: default_seconds_per_word(),
            min_sentence_duration_secs: default_min_sentence_duration_secs(),
        }
    }
}

/// Settings for human-readable CLI output
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutputConfig {
    /// Segments shown by `validate --show-segments`
    #[serde(default = "default_preview_segments")]
    pub preview_segments: usize,

    /// Characters of segment text shown before truncation
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            preview_segments: default_preview_segments(),
            preview_chars: default_preview_chars(),
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching `log` filter
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_min_confidence() -> f64 {
    0.2
}

fn default_sniff_bytes() -> usize {
    1000
}

fn default_cue_duration_secs() -> f64 {
    3.0
}

fn default_seconds_per_word() -> f64 {
    0.5
}

fn default_min_sentence_duration_secs() -> f64 {
    1.0
}

fn default_preview_segments() -> usize {
    3
}

fn default_preview_chars() -> usize {
    100
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load the configuration if the file exists, defaults otherwise
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        std::fs::write(path.as_ref(), config_json)
            .with_context(|| format!("Failed to write config to file: {}", path.as_ref().display()))
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let min_confidence = self.detection.min_confidence;
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(anyhow!(
                "detection.min_confidence must be within [0, 1], got {}",
                min_confidence
            ));
        }

        if self.detection.sniff_bytes == 0 {
            return Err(anyhow!("detection.sniff_bytes must be greater than zero"));
        }

        let durations = [
            ("timing.default_cue_duration_secs", self.timing.default_cue_duration_secs),
            ("timing.seconds_per_word", self.timing.seconds_per_word),
            ("timing.min_sentence_duration_secs", self.timing.min_sentence_duration_secs),
        ];
        for (name, value) in durations {
            if !(value.is_finite() && value > 0.0) {
                return Err(anyhow!("{} must be a positive number, got {}", name, value));
            }
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            detection: DetectionConfig::default(),
            timing: TimingConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
