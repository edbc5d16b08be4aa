/*!
 * Common test utilities for the transcript-ingest test suite
 */

#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SAMPLE_VTT: &str = "WEBVTT

00:00:01.000 --> 00:00:04.000
<v Speaker>Hello world</v>

00:00:05.000 --> 00:00:09.500 align:start
Welcome to the video
";

/// VTT with cue identifiers and a NOTE block; parses fine but scores below the VTT threshold
pub const SAMPLE_VTT_WITH_IDS: &str = "WEBVTT

NOTE produced by hand

intro
00:00:01.000 --> 00:00:04.000
Hello world

2
00:00:05.000 --> 00:00:09.500
Welcome to the video
";

pub const SAMPLE_SRT: &str = "1
00:00:01,000 --> 00:00:04,000
This is a test subtitle.

2
00:00:05,000 --> 00:00:09,000
It contains <i>multiple</i> entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
";

pub const SAMPLE_YOUTUBE: &str = "0:00 Hello world
0:15 Welcome to the video
1:02:03 Much later";

pub const SAMPLE_JSON: &str = r#"[
  {"start": 0, "end": 3, "text": "Hello world"},
  {"start": 4.5, "duration": 2.5, "text": "Welcome to the video"}
]"#;

pub const SAMPLE_PLAIN: &str = "Hello world. Welcome to the video. This is important.";

/// Routes library logging to the test output; set RUST_LOG to see it
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    create_test_bytes(dir, filename, content.as_bytes())
}

/// Creates a test file with raw bytes in the specified directory
pub fn create_test_bytes(dir: &Path, filename: &str, content: &[u8]) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}
