//! XXTEA block transforms.
//!
//! The RMP cipher is the corrected block TEA ("XXTEA") acting on the whole
//! word array as a single block:
//! - round constant `DELTA = 0x9E3779B9`
//! - `rounds = 6 + 52 / word_count`
//! - key index `(p & 3) ^ e` with `e = (sum >> 2) & 3`
//!
//! Encrypt walks the array forward `rounds` times accumulating `sum`;
//! decrypt is the exact mirror, walking backward with `sum` decremented.
//! All arithmetic is wrapping 32-bit. The only state is `sum` and the word
//! array, so both directions are fully deterministic.

const DELTA: u32 = 0x9E3779B9;

/// Pad a key word array up to the four words the mixing function indexes.
///
/// Extra words beyond four are kept; the key index only ever selects the
/// first four.
pub fn fix_key(mut key: Vec<u32>) -> Vec<u32> {
    while key.len() < 4 {
        key.push(0);
    }
    key
}

#[inline]
fn mx(sum: u32, y: u32, z: u32, p: usize, e: u32, key: &[u32]) -> u32 {
    ((z >> 5 ^ y << 2).wrapping_add(y >> 3 ^ z << 4))
        ^ ((sum ^ y).wrapping_add(key[(p & 3) ^ e as usize] ^ z))
}

/// Encrypt a word array in place. `key` must hold at least four words
/// (see [`fix_key`]). Arrays shorter than one word are left untouched.
pub fn encrypt_words(v: &mut [u32], key: &[u32]) {
    let length = v.len();
    if length == 0 {
        return;
    }
    let n = length - 1;
    let rounds = 6 + 52 / length;
    let mut sum: u32 = 0;
    let mut z = v[n];
    for _ in 0..rounds {
        sum = sum.wrapping_add(DELTA);
        let e = sum >> 2 & 3;
        for p in 0..n {
            let y = v[p + 1];
            v[p] = v[p].wrapping_add(mx(sum, y, z, p, e, key));
            z = v[p];
        }
        let y = v[0];
        v[n] = v[n].wrapping_add(mx(sum, y, z, n, e, key));
        z = v[n];
    }
}

/// Decrypt a word array in place. Exact mirror of [`encrypt_words`].
pub fn decrypt_words(v: &mut [u32], key: &[u32]) {
    let length = v.len();
    if length == 0 {
        return;
    }
    let n = length - 1;
    let rounds = 6 + 52 / length;
    let mut sum = (rounds as u32).wrapping_mul(DELTA);
    let mut y = v[0];
    while sum != 0 {
        let e = sum >> 2 & 3;
        for p in (1..=n).rev() {
            let z = v[p - 1];
            v[p] = v[p].wrapping_sub(mx(sum, y, z, p, e, key));
            y = v[p];
        }
        let z = v[n];
        v[0] = v[0].wrapping_sub(mx(sum, y, z, 0, e, key));
        y = v[0];
        sum = sum.wrapping_sub(DELTA);
    }
}
