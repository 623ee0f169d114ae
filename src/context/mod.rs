//! Context input normalization.
//!
//! Passages arrive either as plain text or base64-encoded text (the web
//! frontend encodes uploaded files). [`read_context`] handles the file
//! side, [`normalize_context`] the detection heuristic for inline text.


use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use tracing::debug;

/// A base64 candidate is only accepted when the decoded text is at least
/// this proportion of the encoded length (real base64 decodes to ~0.75x).
pub const BASE64_MIN_DECODED_RATIO: f32 = 0.7;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("failed to read context file {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("context file {path} is neither UTF-8 nor base64-encoded text")]
    NotText { path: PathBuf },
}

/// Returns the decoded form of `input` if it looks like base64-encoded
/// text, otherwise returns `input` unchanged.
///
/// Detection is strict: standard alphabet only, valid padding, decoded
/// bytes must be UTF-8, and the decoded length must clear
/// [`BASE64_MIN_DECODED_RATIO`]. Short strings made entirely of base64
/// alphabet characters can still be misclassified; callers that know the
/// input is plain text should skip normalization.
pub fn normalize_context(input: &str) -> String {
    let candidate = input.trim();
    if candidate.is_empty() {
        return input.to_string();
    }

    if let Ok(bytes) = STANDARD.decode(candidate) {
        if let Ok(decoded) = String::from_utf8(bytes) {
            if decoded.len() as f32 > candidate.len() as f32 * BASE64_MIN_DECODED_RATIO {
                debug!(
                    encoded_len = candidate.len(),
                    decoded_len = decoded.len(),
                    "Context detected as base64, using decoded form"
                );
                return decoded;
            }
        }
    }

    input.to_string()
}

/// Reads a context file as UTF-8, falling back to base64-decoding the raw
/// bytes when they are not valid UTF-8.
pub fn read_context<P: AsRef<Path>>(path: P) -> Result<String, ContextError> {
    let path = path.as_ref();
    let raw = std::fs::read(path).map_err(|e| ContextError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    match String::from_utf8(raw) {
        Ok(text) => Ok(text),
        Err(err) => {
            let raw = err.into_bytes();
            let trimmed: Vec<u8> = raw
                .iter()
                .copied()
                .filter(|b| !b.is_ascii_whitespace())
                .collect();

            STANDARD
                .decode(&trimmed)
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
                .ok_or_else(|| ContextError::NotText {
                    path: path.to_path_buf(),
                })
        }
    }
}
