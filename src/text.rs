//! Text/byte codec utilities.
//!
//! The RMP pipeline moves between host strings and raw byte buffers in two
//! distinct ways:
//!
//! - **UTF-8**: the cipher layer operates on the UTF-8 bytes of its text
//!   inputs. Decoding reimplements the game client's lead-byte
//!   classification so that the same inputs fail in the same places.
//! - **Latin-1**: the compression layer treats the chart JSON as a sequence
//!   of char codes, one byte per code unit. [`latin1_decode`] and
//!   [`latin1_encode`] implement that byte-for-code-unit mapping.
//!
//! The client's decoder splits its output into 32767-unit chunks to dodge
//! a fixed-size varargs limit in its host runtime. That is purely an
//! implementation concern there; here decoding is a single continuous pass
//! with identical observable behavior.

use std::fmt;

/// Error type for UTF-8 decoding.
///
/// Mirrors the three failure classes of the client's decoder, with the
/// offending byte and position attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    /// A multi-byte sequence ran past the end of the input.
    UnfinishedSequence {
        /// Offset of the lead byte of the truncated sequence.
        offset: usize,
    },
    /// A lead byte in the continuation range (`0x80..=0xBF`) or an
    /// otherwise unclassifiable byte started a sequence.
    BadLeadByte {
        /// The offending byte.
        byte: u8,
        /// Offset of the offending byte.
        offset: usize,
    },
    /// A decoded code point falls outside the valid Unicode range.
    CodePointOutOfRange {
        /// The decoded scalar value.
        value: u32,
    },
}

impl fmt::Display for EncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnfinishedSequence { offset } => {
                write!(f, "Unfinished UTF-8 octet sequence at offset {}", offset)
            }
            Self::BadLeadByte { byte, offset } => {
                write!(f, "Bad UTF-8 encoding 0x{:x} at offset {}", byte, offset)
            }
            Self::CodePointOutOfRange { value } => {
                write!(f, "Character outside valid Unicode range: 0x{:x}", value)
            }
        }
    }
}

impl std::error::Error for EncodingError {}

/// Encode a host string to its UTF-8 bytes.
///
/// Rust strings are UTF-8 already, so this is a plain copy. It exists so
/// the cipher pipeline reads the same way as the game client, which
/// has to build the multi-byte layout by hand from UTF-16 units.
pub fn utf8_encode(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

/// Decode UTF-8 bytes into a host string.
///
/// Classifies each lead byte by its high nibble the way the game client
/// does: `0..=7` single byte, `12..=13` two-byte, `14` three-byte, `15`
/// four-byte, anything else is a [`BadLeadByte`]. Continuation bytes are
/// masked with `0x3F` and not otherwise validated, matching the client.
///
/// [`BadLeadByte`]: EncodingError::BadLeadByte
pub fn utf8_decode(bytes: &[u8]) -> Result<String, EncodingError> {
    // ASCII fast path, same shortcut the client takes.
    if bytes.is_ascii() {
        return Ok(bytes.iter().map(|&b| b as char).collect());
    }

    let mut out = String::with_capacity(bytes.len());
    let mut off = 0;
    let len = bytes.len();
    while off < len {
        let lead = bytes[off];
        let start = off;
        off += 1;
        match lead >> 4 {
            0..=7 => out.push(lead as char),
            12 | 13 => {
                if off >= len {
                    return Err(EncodingError::UnfinishedSequence { offset: start });
                }
                let unit = (u32::from(lead & 0x1F) << 6) | u32::from(bytes[off] & 0x3F);
                off += 1;
                push_unit(&mut out, unit)?;
            }
            14 => {
                if off + 1 >= len {
                    return Err(EncodingError::UnfinishedSequence { offset: start });
                }
                let unit = (u32::from(lead & 0x0F) << 12)
                    | (u32::from(bytes[off] & 0x3F) << 6)
                    | u32::from(bytes[off + 1] & 0x3F);
                off += 2;
                push_unit(&mut out, unit)?;
            }
            15 => {
                if off + 2 >= len {
                    return Err(EncodingError::UnfinishedSequence { offset: start });
                }
                let rune = (u32::from(lead & 0x07) << 18)
                    | (u32::from(bytes[off] & 0x3F) << 12)
                    | (u32::from(bytes[off + 1] & 0x3F) << 6)
                    | u32::from(bytes[off + 2] & 0x3F);
                off += 3;
                // The client validates the post-surrogate offset range
                // (0..=0xFFFFF after subtracting 0x10000).
                if !(0x10000..=0x10FFFF).contains(&rune) {
                    return Err(EncodingError::CodePointOutOfRange {
                        value: rune.wrapping_sub(0x10000),
                    });
                }
                push_unit(&mut out, rune)?;
            }
            _ => {
                return Err(EncodingError::BadLeadByte {
                    byte: lead,
                    offset: start,
                });
            }
        }
    }
    Ok(out)
}

fn push_unit(out: &mut String, unit: u32) -> Result<(), EncodingError> {
    // Three-byte sequences can decode to lone surrogates, which host
    // strings cannot hold.
    match char::from_u32(unit) {
        Some(c) => {
            out.push(c);
            Ok(())
        }
        None => Err(EncodingError::CodePointOutOfRange { value: unit }),
    }
}

/// Decode bytes as one char per byte (`String.fromCharCode` semantics).
pub fn latin1_decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Encode a string as one byte per char, truncating each code point to
/// eight bits (`charCodeAt` into a `Uint8Array` semantics).
pub fn latin1_encode(s: &str) -> Vec<u8> {
    s.chars().map(|c| c as u32 as u8).collect()
}
