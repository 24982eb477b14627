//! SHA-2 and HMAC helpers.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};

/// SHA-256 (one-shot).
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-512 (one-shot).
pub fn sha512(data: &[u8]) -> [u8; 64] {
    let mut hasher = Sha512::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// HMAC-SHA256 over several segments.
///
/// # Panics
///
/// This function will not panic - HMAC accepts keys of any length.
pub fn hmac_sha256(key: &[u8], segments: &[&[u8]]) -> [u8; 32] {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(key).expect("HMAC accepts keys of any length");
    for segment in segments {
        mac.update(segment);
    }
    mac.finalize().into_bytes().into()
}

/// HMAC-SHA512 over several segments.
///
/// # Panics
///
/// This function will not panic - HMAC accepts keys of any length.
pub fn hmac_sha512(key: &[u8], segments: &[&[u8]]) -> [u8; 64] {
    let mut mac =
        Hmac::<Sha512>::new_from_slice(key).expect("HMAC accepts keys of any length");
    for segment in segments {
        mac.update(segment);
    }
    mac.finalize().into_bytes().into()
}
