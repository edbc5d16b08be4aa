use anyhow::{Context, Result};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{DiagnosticSink, ParseWarning};
use crate::errors::TranscriptError;
use crate::formats::TranscriptFormat;

// @module: File reading, decoding and output helpers

// @const: UTF-8 byte order mark
const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

// @const: Windows-1252 mapping for 0x80..=0x9F, None where undefined
const CP1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'), None, Some('\u{201A}'), Some('\u{0192}'),
    Some('\u{201E}'), Some('\u{2026}'), Some('\u{2020}'), Some('\u{2021}'),
    Some('\u{02C6}'), Some('\u{2030}'), Some('\u{0160}'), Some('\u{2039}'),
    Some('\u{0152}'), None, Some('\u{017D}'), None,
    None, Some('\u{2018}'), Some('\u{2019}'), Some('\u{201C}'),
    Some('\u{201D}'), Some('\u{2022}'), Some('\u{2013}'), Some('\u{2014}'),
    Some('\u{02DC}'), Some('\u{2122}'), Some('\u{0161}'), Some('\u{203A}'),
    Some('\u{0153}'), None, Some('\u{017E}'), Some('\u{0178}'),
];

/// Text encodings tried, in order, when reading a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    Utf8,
    Utf8Bom,
    Latin1,
    Cp1252,
    Iso8859_1,
}

impl TextEncoding {
    /// Decoding order; the first encoding that succeeds wins
    pub const FALLBACK_ORDER: [TextEncoding; 5] = [
        TextEncoding::Utf8,
        TextEncoding::Utf8Bom,
        TextEncoding::Latin1,
        TextEncoding::Cp1252,
        TextEncoding::Iso8859_1,
    ];

    // @returns: Canonical encoding label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Utf8Bom => "utf-8-sig",
            Self::Latin1 => "latin-1",
            Self::Cp1252 => "cp1252",
            Self::Iso8859_1 => "iso-8859-1",
        }
    }

    /// Strictly decode `bytes`, returning None on any invalid sequence
    pub fn decode(&self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => {
                if bytes.starts_with(UTF8_BOM) {
                    return None;
                }
                std::str::from_utf8(bytes).ok().map(str::to_string)
            }
            Self::Utf8Bom => bytes
                .strip_prefix(UTF8_BOM)
                .and_then(|rest| std::str::from_utf8(rest).ok())
                .map(str::to_string),
            // C1 control bytes in "Latin-1" text are nearly always CP1252 punctuation
            Self::Latin1 => {
                if bytes.iter().any(|b| (0x80..=0x9F).contains(b)) {
                    None
                } else {
                    Some(bytes.iter().map(|&b| char::from(b)).collect())
                }
            }
            Self::Cp1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => CP1252_HIGH[(b - 0x80) as usize],
                    _ => Some(char::from(b)),
                })
                .collect(),
            Self::Iso8859_1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Result of decoding a transcript source
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedText {
    /// Decoded content
    pub text: String,
    /// Encoding that produced `text`; None when the lossy fallback was used
    pub encoding: Option<TextEncoding>,
    /// Whether replacement characters may have been substituted
    pub lossy: bool,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Read a transcript file and decode it with the encoding fallback chain
    pub fn read_transcript<P: AsRef<Path>>(
        path: P,
        sink: &mut dyn DiagnosticSink,
    ) -> std::result::Result<DecodedText, TranscriptError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| TranscriptError::io(path, e))?;

        if bytes.is_empty() {
            return Err(TranscriptError::EmptyInput(path.display().to_string()));
        }

        Self::decode_bytes(&bytes, sink)
    }

    /// Decode raw bytes, trying each encoding in turn before a lossy UTF-8 pass
    pub fn decode_bytes(
        bytes: &[u8],
        sink: &mut dyn DiagnosticSink,
    ) -> std::result::Result<DecodedText, TranscriptError> {
        if bytes.is_empty() {
            return Err(TranscriptError::EmptyInput("no bytes to decode".to_string()));
        }

        for encoding in TextEncoding::FALLBACK_ORDER {
            if let Some(text) = encoding.decode(bytes) {
                if encoding != TextEncoding::Utf8 {
                    sink.record(ParseWarning::NonDefaultEncoding { encoding });
                }
                return Ok(DecodedText {
                    text,
                    encoding: Some(encoding),
                    lossy: false,
                });
            }
        }

        // Unreachable while ISO-8859-1 stays in the chain
        let text = String::from_utf8_lossy(bytes).into_owned();
        if text.is_empty() {
            return Err(TranscriptError::DecodeFailure(
                "lossy decoding produced no text".to_string(),
            ));
        }
        sink.record(ParseWarning::LossyDecode);
        Ok(DecodedText {
            text,
            encoding: None,
            lossy: true,
        })
    }

    /// Transcript format implied by a file extension, if it is one the fallback path trusts
    pub fn transcript_extension<P: AsRef<Path>>(path: P) -> Option<TranscriptFormat> {
        let ext = path.as_ref().extension()?.to_string_lossy().to_lowercase();
        match ext.as_str() {
            "vtt" => Some(TranscriptFormat::Vtt),
            "srt" => Some(TranscriptFormat::Srt),
            _ => None,
        }
    }

    // @generates: Output path for a converted transcript
    // @params: input_file, output_dir, extension
    pub fn generate_output_path<P1: AsRef<Path>, P2: AsRef<Path>>(
        input_file: P1,
        output_dir: P2,
        extension: &str,
    ) -> PathBuf {
        let input_file = input_file.as_ref();
        let output_dir = output_dir.as_ref();

        let stem = input_file.file_stem().unwrap_or_default();

        let mut output_filename = stem.to_string_lossy().to_string();
        output_filename.push('.');
        output_filename.push_str(extension.trim_start_matches('.'));

        output_dir.join(output_filename)
    }

    /// Find files with any of the given extensions below a directory
    pub fn find_files<P: AsRef<Path>>(dir: P, extensions: &[&str]) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();

            if path.is_file() {
                if let Some(ext) = path.extension() {
                    let ext = ext.to_string_lossy();
                    if extensions
                        .iter()
                        .any(|wanted| ext.eq_ignore_ascii_case(wanted.trim_start_matches('.')))
                    {
                        result.push(path.to_path_buf());
                    }
                }
            }
        }

        result.sort();
        Ok(result)
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                Self::ensure_dir(parent)?;
            }
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }
}
