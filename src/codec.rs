//! The RMP wire codec.
//!
//! Maps between the encrypted `.rmp` payload and the chart's JSON text:
//!
//! ```text
//! ciphertext = base64( xxtea_encrypt( base64( deflate( bytes(json) ) ), salt ) )
//! ```
//!
//! Decoding inverts each layer in turn: base64 → XXTEA (with embedded
//! length check) → UTF-8 → base64 → inflate → JSON text. Any deviation in
//! salt composition or deflate framing produces output the game client
//! cannot read, so every layer here matches the client exactly.

use std::io::{Read, Write};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::cipher;
use crate::error::Result;
use crate::text::{latin1_decode, latin1_encode};

/// Decrypt a raw `.rmp` payload into chart JSON text.
///
/// `salt` is the chart's full cipher salt, see
/// [`ChartIdentity::salt`](crate::ChartIdentity::salt).
pub fn decrypt_chart(raw: &str, salt: &str) -> Result<String> {
    let cipher_bytes = BASE64.decode(raw.trim())?;
    let inner = cipher::decrypt(&cipher_bytes, salt)?;
    let deflated = BASE64.decode(inner.as_bytes())?;

    let mut inflated = Vec::new();
    ZlibDecoder::new(deflated.as_slice()).read_to_end(&mut inflated)?;
    Ok(latin1_decode(&inflated))
}

/// Encrypt chart JSON text into a raw `.rmp` payload.
///
/// Mirror of [`decrypt_chart`]. The client deflates with memLevel 9; the
/// zlib stream produced here inflates identically on the client side even
/// where the compressed bytes differ.
pub fn encrypt_chart(json: &str, salt: &str) -> Result<String> {
    let char_codes = latin1_encode(json);

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&char_codes)?;
    let deflated = encoder.finish()?;

    let inner = BASE64.encode(&deflated);
    let cipher_bytes = cipher::encrypt(&inner, salt);
    Ok(BASE64.encode(cipher_bytes))
}
