//! Error types for RMP decoding, encoding and chart parsing.
//!
//! This module provides the [`RmpError`] type which covers all possible
//! errors that can occur when decrypting, re-encrypting or parsing a chart.
//!
//! ## Error Categories
//!
//! | Category | Errors | Description |
//! |----------|--------|-------------|
//! | Integrity | [`IntegrityCheckFailed`] | Ciphertext is corrupt or the salt is wrong |
//! | Encoding | [`Encoding`], [`MalformedBase64`] | Byte-level decode failures |
//! | Parsing | [`Json`] | Chart JSON is invalid |
//! | I/O | [`Io`] | DEFLATE stream errors |
//!
//! [`IntegrityCheckFailed`]: RmpError::IntegrityCheckFailed
//! [`Encoding`]: RmpError::Encoding
//! [`MalformedBase64`]: RmpError::MalformedBase64
//! [`Json`]: RmpError::Json
//! [`Io`]: RmpError::Io

use std::fmt;
use std::io;

use crate::text::EncodingError;

/// Error type for RMP operations.
///
/// Covers the whole decode/encode pipeline: the XXTEA layer, the base64
/// framing, the DEFLATE stream and the chart JSON model. Implements
/// [`std::error::Error`] for integration with the Rust error handling
/// ecosystem.
#[derive(Debug)]
pub enum RmpError {
    /// The length embedded in the decrypted payload falls outside the
    /// valid padding window.
    ///
    /// The cipher appends the exact plaintext byte length as a trailing
    /// word before encryption. After decryption that length must land
    /// within the final word's padding range (`max - 3 ..= max`). Anything
    /// else means the ciphertext is corrupt or was encrypted under a
    /// different salt.
    IntegrityCheckFailed {
        /// The length recovered from the trailing word.
        stored: usize,
        /// Maximum byte length the word array can carry.
        max: usize,
    },

    /// A byte sequence could not be decoded as UTF-8.
    ///
    /// Carries the offending byte and position, see [`EncodingError`].
    Encoding(EncodingError),

    /// A base64 payload contained a disallowed character or had a length
    /// that is not a multiple of four.
    ///
    /// The game client silently returns an empty string here; callers
    /// of this crate get an explicit error instead.
    MalformedBase64,

    /// The decrypted chart text is not valid JSON.
    Json(serde_json::Error),

    /// The DEFLATE stream could not be inflated or deflated.
    Io(io::Error),
}

impl fmt::Display for RmpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntegrityCheckFailed { stored, max } => {
                write!(
                    f,
                    "Integrity check failed: embedded length {} outside {}..={}",
                    stored,
                    max.saturating_sub(3),
                    max
                )
            }
            Self::Encoding(e) => write!(f, "{}", e),
            Self::MalformedBase64 => write!(f, "Malformed base64 input"),
            Self::Json(e) => write!(f, "Invalid chart JSON: {}", e),
            Self::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for RmpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encoding(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<EncodingError> for RmpError {
    fn from(e: EncodingError) -> Self {
        Self::Encoding(e)
    }
}

impl From<serde_json::Error> for RmpError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<io::Error> for RmpError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<base64::DecodeError> for RmpError {
    fn from(_: base64::DecodeError) -> Self {
        Self::MalformedBase64
    }
}

pub type Result<T> = std::result::Result<T, RmpError>;
