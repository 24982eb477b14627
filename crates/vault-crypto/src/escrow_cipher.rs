//! Symmetric escrow cipher for the debugging export/import path.
//!
//! AES-128-CBC keyed directly from the 32-byte bearer auth key: the first
//! 16 bytes are the cipher key, the last 16 the IV. There is no integrity
//! tag and no passphrase on this path; it exists for operator debugging
//! only, and the record is destroyed when an import succeeds.

use crate::errors::CryptoError;
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;

/// Bearer auth key length in bytes.
pub const AUTH_KEY_LEN: usize = 32;

/// Seal `plaintext` under a bearer auth key.
pub fn seal(auth_key: &[u8; AUTH_KEY_LEN], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes128CbcEnc::new_from_slices(&auth_key[..16], &auth_key[16..])
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

/// Open a sealed blob with the bearer auth key.
///
/// # Errors
///
/// Returns `CryptoError::DecryptionFailed` on bad padding, which is how a
/// wrong key usually (but not reliably - there is no MAC) manifests.
pub fn open(auth_key: &[u8; AUTH_KEY_LEN], ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes128CbcDec::new_from_slices(&auth_key[..16], &auth_key[16..])
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}
