//! Byte ⇄ 32-bit word packing.
//!
//! The cipher operates on arrays of little-endian `u32` words. The encrypt
//! side appends one extra word carrying the exact plaintext byte length so
//! the decrypt side can strip the zero padding; the window check on that
//! length is the integrity check for the whole pipeline.

use crate::error::{Result, RmpError};

/// Pack bytes into little-endian `u32` words, zero-padding the last word.
///
/// With `embed_length`, one extra trailing word holding the exact byte
/// length is appended. Used on the encrypt side only.
pub fn pack_words(bytes: &[u8], embed_length: bool) -> Vec<u32> {
    let len = bytes.len();
    let mut n = len >> 2;
    if len & 3 != 0 {
        n += 1;
    }

    let mut words = if embed_length {
        let mut v = vec![0u32; n + 1];
        v[n] = len as u32;
        v
    } else {
        vec![0u32; n]
    };

    for (i, &b) in bytes.iter().enumerate() {
        words[i >> 2] |= u32::from(b) << ((i & 3) << 3);
    }
    words
}

/// Unpack little-endian `u32` words back into bytes.
///
/// When the array carries an embedded length word, that length must fall
/// within the final word's padding window (`max - 3 ..= max` where
/// `max = 4 * (words.len() - 1)`), otherwise the ciphertext was corrupt or
/// decrypted under the wrong salt and the call fails with
/// [`RmpError::IntegrityCheckFailed`].
pub fn unpack_words(words: &[u32], had_embedded_length: bool) -> Result<Vec<u8>> {
    if words.is_empty() {
        return Ok(Vec::new());
    }
    let mut n = words.len() << 2;
    let data_words = if had_embedded_length {
        let stored = words[words.len() - 1] as usize;
        let max = n - 4;
        if stored < max.saturating_sub(3) || stored > max {
            return Err(RmpError::IntegrityCheckFailed { stored, max });
        }
        n = stored;
        &words[..words.len() - 1]
    } else {
        words
    };

    let mut bytes = Vec::with_capacity(data_words.len() << 2);
    for word in data_words {
        bytes.extend_from_slice(&word.to_le_bytes());
    }
    bytes.truncate(n);
    Ok(bytes)
}
