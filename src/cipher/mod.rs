//! The RMP block cipher.
//!
//! Charts are encrypted with the XXTEA block cipher over little-endian
//! 32-bit word arrays, with the exact plaintext length embedded as a
//! trailing word. [`encrypt`] and [`decrypt`] are the string-level
//! operations the chart codec drives; the word-level transforms live in
//! [`xxtea`] and the packing rules in [`words`].

pub mod words;
pub mod xxtea;

pub use words::{pack_words, unpack_words};
pub use xxtea::{decrypt_words, encrypt_words, fix_key};

use crate::error::Result;
use crate::text::{utf8_decode, utf8_encode};

/// Derive the word-array key from a salt string.
fn key_words(salt: &str) -> Vec<u32> {
    fix_key(pack_words(&utf8_encode(salt), false))
}

/// Encrypt text under a salt, producing the raw cipher bytes.
///
/// Empty input passes through unchanged, matching the game client.
pub fn encrypt(data: &str, salt: &str) -> Vec<u8> {
    if data.is_empty() {
        return Vec::new();
    }
    let mut v = pack_words(&utf8_encode(data), true);
    encrypt_words(&mut v, &key_words(salt));
    // No embedded length on the way out: the ciphertext keeps every word.
    unpack_words(&v, false).unwrap_or_default()
}

/// Decrypt raw cipher bytes under a salt, recovering the plaintext.
///
/// Fails with [`RmpError::IntegrityCheckFailed`] when the embedded length
/// lands outside the padding window (corrupt input or wrong salt) and with
/// [`RmpError::Encoding`] when the recovered bytes are not valid UTF-8.
///
/// [`RmpError::IntegrityCheckFailed`]: crate::RmpError::IntegrityCheckFailed
/// [`RmpError::Encoding`]: crate::RmpError::Encoding
pub fn decrypt(data: &[u8], salt: &str) -> Result<String> {
    if data.is_empty() {
        return Ok(String::new());
    }
    let mut v = pack_words(data, false);
    decrypt_words(&mut v, &key_words(salt));
    let bytes = unpack_words(&v, true)?;
    Ok(utf8_decode(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RmpError;

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let salt = "RMP4TT3RNplease/please_4k_hd";
        for data in ["x", "hello world", "{\"signature\":\"BNDQ\",\"tempo\":128.5}"] {
            let cipher = encrypt(data, salt);
            assert_eq!(decrypt(&cipher, salt).unwrap(), data);
        }
    }

    #[test]
    fn test_empty_passthrough() {
        assert!(encrypt("", "salt").is_empty());
        assert_eq!(decrypt(&[], "salt").unwrap(), "");
    }

    #[test]
    fn test_wrong_salt_fails_integrity_check() {
        let cipher = encrypt("some chart payload", "RMP4TT3RNa/a_4k_hd");
        let err = decrypt(&cipher, "RMP4TT3RNb/b_4k_hd").unwrap_err();
        assert!(matches!(err, RmpError::IntegrityCheckFailed { .. }));
    }
}
