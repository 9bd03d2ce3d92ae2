//! File text extraction for tidechat.
//!
//! Turns an uploaded file into a bounded text excerpt tagged with a
//! provenance marker and the file name, ready to be appended to a user
//! message:
//!
//! - PDFs are parsed for their embedded text (`PDF_CONTENT:<name>: ...`).
//! - Everything else is treated as text with auto-detected encoding
//!   (`FILE_CONTENT:<name>: ...`).
//!
//! Excerpts are capped at a configurable character count. A file that fails
//! to extract is reported and skipped; it never aborts the rest of a batch.

use std::path::{Path, PathBuf};

use tidechat_core::ExtractError;
use tracing::warn;

/// Marker prefixed to text extracted from a PDF.
pub const PDF_MARKER: &str = "PDF_CONTENT";

/// Marker prefixed to text extracted from a plain file.
pub const TEXT_MARKER: &str = "FILE_CONTENT";

/// How a file's content is interpreted, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Text,
}

impl SourceKind {
    /// Classify a file by extension. Anything that is not a PDF is text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => Self::Pdf,
            _ => Self::Text,
        }
    }

    fn marker(self) -> &'static str {
        match self {
            Self::Pdf => PDF_MARKER,
            Self::Text => TEXT_MARKER,
        }
    }
}

/// Extract one file into a tagged excerpt of at most `max_chars` characters.
pub fn extract_file(path: &Path, max_chars: usize) -> Result<String, ExtractError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let kind = SourceKind::from_path(path);
    let text = match kind {
        SourceKind::Pdf => pdf_extract::extract_text(path).map_err(|e| ExtractError::Pdf {
            name: name.clone(),
            reason: e.to_string(),
        })?,
        SourceKind::Text => {
            let raw = std::fs::read(path).map_err(|e| ExtractError::Read {
                name: name.clone(),
                reason: e.to_string(),
            })?;
            decode_text(&raw)
        }
    };

    Ok(format!(
        "{}:{}: {}...",
        kind.marker(),
        name,
        truncate_chars(&text, max_chars)
    ))
}

/// Extract a batch of files, concatenating the excerpts with newlines.
///
/// A failing file is logged and skipped so the remaining files still make it
/// into the prompt.
pub fn extract_files(paths: &[PathBuf], max_chars: usize) -> String {
    let mut excerpts = Vec::with_capacity(paths.len());
    for path in paths {
        match extract_file(path, max_chars) {
            Ok(excerpt) => excerpts.push(excerpt),
            Err(e) => warn!(file = %path.display(), error = %e, "skipping file"),
        }
    }
    excerpts.join("\n")
}

/// True when message content carries an extracted-file excerpt.
pub fn contains_marker(content: &str) -> bool {
    content.contains(PDF_MARKER) || content.contains(TEXT_MARKER)
}

/// Decode raw bytes with an auto-detected encoding, replacing anything that
/// does not decode cleanly.
fn decode_text(raw: &[u8]) -> String {
    let (charset, _confidence, _language) = chardet::detect(raw);
    let encoding = encoding_rs::Encoding::for_label(chardet::charset2encoding(&charset).as_bytes())
        .unwrap_or(encoding_rs::UTF_8);
    let (decoded, _encoding_used, _had_errors) = encoding.decode(raw);
    decoded.into_owned()
}

/// First `max_chars` characters, respecting char boundaries.
fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
