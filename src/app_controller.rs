use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::diagnostics::{DiagnosticSink, LogSink, ParseWarning};
use crate::file_utils::FileManager;
use crate::formats::{detect, DetectionResult, TranscriptFormat};
use crate::timestamp::format_vtt_time;
use crate::transcript_processor::{segments_to_vtt, ParseOutcome, TranscriptParser, TranscriptSegment};

// @module: Application controller for the CLI commands

// @const: Extensions picked up when converting a folder
pub const CONVERTIBLE_EXTENSIONS: [&str; 4] = ["vtt", "srt", "txt", "json"];

/// Rendering used by the `parse` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Vtt,
    Text,
}

/// What `validate` found for one file
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub file_size: u64,
    pub extension: Option<String>,
    pub outcome: ParseOutcome,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    /// Seconds from the first start to the last end, zero without segments
    pub fn total_duration(&self) -> f64 {
        match (self.outcome.segments.first(), self.outcome.segments.last()) {
            (Some(first), Some(last)) => last.end - first.start,
            _ => 0.0,
        }
    }
}

/// Result of converting a single file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertStatus {
    Written(PathBuf),
    Skipped(PathBuf),
}

/// Counters for a folder conversion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Ingestion engine built from the configuration
    parser: TranscriptParser,
}

impl Controller {
    /// Create a controller with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let parser = TranscriptParser::with_config(config.clone());
        Ok(Self { config, parser })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Detect the format of a transcript file
    pub fn detect_file(&self, path: &Path) -> Result<DetectionResult> {
        let decoded = FileManager::read_transcript(path, &mut LogSink)?;
        let result = detect(&decoded.text);
        debug!("Detection for {:?}: {:?}", path, result);
        Ok(result)
    }

    /// Parse a file, skipping detection when `format` is given
    pub fn parse_file(
        &self,
        path: &Path,
        format: Option<TranscriptFormat>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<ParseOutcome> {
        let outcome = match format {
            None => self.parser.parse_detailed(path, sink)?,
            Some(format) => {
                let decoded = FileManager::read_transcript(path, sink)?;
                let mut outcome = self.parser.parse_text_detailed(&decoded.text, Some(format), sink)?;
                outcome.encoding = decoded.encoding;
                outcome
            }
        };
        Ok(outcome)
    }

    /// Parse a file and collect every warning raised on the way
    pub fn validate_file(&self, path: &Path) -> Result<ValidationReport> {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("Failed to read metadata for {:?}", path))?;

        let mut warnings: Vec<ParseWarning> = Vec::new();
        let outcome = self.parse_file(path, None, &mut warnings)?;
        Ok(ValidationReport {
            file_size: metadata.len(),
            extension: path.extension().map(|ext| ext.to_string_lossy().to_string()),
            outcome,
            warnings: warnings.iter().map(ToString::to_string).collect(),
        })
    }

    /// Render segments for the `parse` command
    pub fn render(&self, segments: &[TranscriptSegment], output: OutputFormat) -> Result<String> {
        match output {
            OutputFormat::Json => {
                serde_json::to_string_pretty(segments).context("Failed to serialize segments to JSON")
            }
            OutputFormat::Vtt => Ok(segments_to_vtt(segments)),
            OutputFormat::Text => Ok(segments
                .iter()
                .map(|s| format!("[{} - {}] {}", format_vtt_time(s.start), format_vtt_time(s.end), s.text))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// First few segments, text shortened to the configured width
    pub fn preview(&self, segments: &[TranscriptSegment]) -> Vec<String> {
        let max_chars = self.config.output.preview_chars;
        segments
            .iter()
            .take(self.config.output.preview_segments)
            .enumerate()
            .map(|(i, s)| {
                let text = if s.text.chars().count() > max_chars {
                    format!("{}...", s.text.chars().take(max_chars).collect::<String>())
                } else {
                    s.text.clone()
                };
                format!("{}. [{} - {}] {}", i + 1, Self::format_offset(s.start), Self::format_offset(s.end), text)
            })
            .collect()
    }

    /// Convert one file to WebVTT inside `output_dir`
    pub fn convert_file(&self, input_file: &Path, output_dir: &Path, force_overwrite: bool) -> Result<ConvertStatus> {
        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        let output_path = FileManager::generate_output_path(input_file, output_dir, "vtt");
        if output_path == input_file {
            return Err(anyhow!("Refusing to overwrite the input file {:?}; choose another output directory", input_file));
        }
        if output_path.exists() && !force_overwrite {
            warn!("Skipping {:?}, output already exists (use -f to force overwrite)", input_file);
            return Ok(ConvertStatus::Skipped(output_path));
        }

        let segments = self.parser.parse(input_file)?;
        if segments.is_empty() {
            warn!("No valid segments found in {:?}", input_file);
        }

        FileManager::ensure_dir(output_dir)?;
        FileManager::write_to_file(&output_path, &segments_to_vtt(&segments))?;
        info!("Wrote {} segments to {:?}", segments.len(), output_path);

        Ok(ConvertStatus::Written(output_path))
    }

    /// Convert every transcript below `input_dir` to WebVTT inside `output_dir`
    pub fn convert_folder(&self, input_dir: &Path, output_dir: &Path, force_overwrite: bool) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        // Earlier output must not be picked up as input
        let files: Vec<PathBuf> = FileManager::find_files(input_dir, &CONVERTIBLE_EXTENSIONS)?
            .into_iter()
            .filter(|f| !f.starts_with(output_dir))
            .collect();

        if files.is_empty() {
            return Err(anyhow!("No transcript files found in directory: {:?}", input_dir));
        }

        let folder_pb = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Converting files");

        let mut summary = FolderSummary::default();

        for file in &files {
            let file_name = file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Converting: {}", file_name));

            match self.convert_file(file, output_dir, force_overwrite) {
                Ok(ConvertStatus::Written(_)) => summary.converted += 1,
                Ok(ConvertStatus::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    error!("Error converting {}: {}", file_name, e);
                    summary.failed += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder conversion complete");

        info!(
            "Folder conversion completed: {} converted, {} skipped, {} errors in {}",
            summary.converted,
            summary.skipped,
            summary.failed,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    // Minutes and tenths of seconds, e.g. 1:05.5
    fn format_offset(seconds: f64) -> String {
        let tenths = (seconds * 10.0).round() as u64;
        format!("{}:{:02}.{}", tenths / 600, (tenths % 600) / 10, tenths % 10)
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
