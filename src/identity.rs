//! Chart identity resolution.
//!
//! A chart's identity — name, key count, difficulty — is never stored in
//! the wire format. It is recomputed from the filename or path on load and
//! is required to derive the cipher salt. Resolution is pure string
//! parsing; nothing here touches the filesystem.

use std::fmt;

/// Secret prefix mixed into every cipher salt.
const SECRET_SALT: &str = "RMP4TT3RN";

/// Decode rule selected by a chart file's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    /// Encrypted + compressed wire format; runs the full cipher pipeline.
    Rmp,
    /// Plain chart JSON.
    Json,
    /// Unrecognized extension; decoded like [`Json`].
    ///
    /// [`Json`]: ChartFormat::Json
    Unknown,
}

impl ChartFormat {
    /// Classify an extension string. Empty or unrecognized extensions fall
    /// back deterministically to JSON handling.
    pub fn from_ext(ext: &str) -> Self {
        match ext {
            "rmp" => Self::Rmp,
            "json" => Self::Json,
            _ => Self::Unknown,
        }
    }
}

/// Canonical chart identity derived from a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartIdentity {
    /// Chart (song) name.
    pub name: String,
    /// Number of playable tracks (4, 5, 6, ...).
    pub key_count: u32,
    /// Difficulty tag, e.g. `"ez"`, `"hd"`.
    pub difficulty: String,
}

impl ChartIdentity {
    pub fn new(name: impl Into<String>, key_count: u32, difficulty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key_count,
            difficulty: difficulty.into(),
        }
    }

    /// Canonical filename stem: `{name}_{key_count}k_{difficulty}`.
    pub fn filename(&self) -> String {
        format!("{}_{}k_{}", self.name, self.key_count, self.difficulty)
    }

    /// Canonical filename with an extension appended.
    pub fn filename_with_ext(&self, ext: &str) -> String {
        format!("{}.{}", self.filename(), ext)
    }

    /// The two-segment directory-style path mixed into the salt:
    /// `{name}/{name}_{key_count}k_{difficulty}`.
    ///
    /// The client keys the cipher off this path even when it only ever saw
    /// a flat filename, so the salt must always be built from this form,
    /// never from [`filename`].
    ///
    /// [`filename`]: ChartIdentity::filename
    pub fn cipher_path(&self) -> String {
        format!("{}/{}", self.name, self.filename())
    }

    /// Cipher salt for this chart: secret prefix + cipher path.
    pub fn salt(&self) -> String {
        format!("{}{}", SECRET_SALT, self.cipher_path())
    }
}

impl fmt::Display for ChartIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.filename())
    }
}

/// A parsed filename: identity plus the format extension that was split
/// off it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub identity: ChartIdentity,
    /// Raw extension text (everything after the first `.`), possibly empty.
    pub ext: String,
    /// Decode rule derived from `ext`.
    pub format: ChartFormat,
}

/// Parse a chart identity out of a filename or path.
///
/// Accepts a bare stem (`please_4k_hd`), a filename (`please_4k_hd.rmp`)
/// or a full path in either separator convention
/// (`C:\RM\please\please_4k_hd.rmp`, `/data/please/please_4k_hd`). The
/// last path segment is split at the first `.` into stem and extension;
/// the stem splits on `_` into name, key token (default `4k`) and
/// difficulty (default `hd`). The key count is the leading digit of the
/// key token.
pub fn resolve_filename(path_or_name: &str) -> ResolvedName {
    let sep = if path_or_name.contains('\\') { '\\' } else { '/' };
    let last = path_or_name.trim().rsplit(sep).next().unwrap_or("");

    let (stem, ext) = match last.split_once('.') {
        Some((head, tail)) => (head, tail),
        None => (last, ""),
    };

    let mut parts = stem.trim().split('_');
    let name = parts.next().unwrap_or("");
    let key_token = parts.next().unwrap_or("4k");
    let difficulty = parts.next().unwrap_or("hd");
    let key_count = key_token
        .chars()
        .next()
        .and_then(|c| c.to_digit(10))
        .unwrap_or(0);

    ResolvedName {
        identity: ChartIdentity::new(name, key_count, difficulty),
        ext: ext.to_string(),
        format: ChartFormat::from_ext(ext),
    }
}
