//! # ECIES - Authenticated Asymmetric Encryption
//!
//! Public-key encryption of the master seed for production escrow records.
//!
//! ## Construction
//!
//! - Ephemeral secp256k1 keypair per encryption
//! - Key agreement: x coordinate of the shared point, through SHA-512;
//!   first half keys AES-256-CBC, second half keys HMAC-SHA256
//! - Integrity: HMAC over `iv || ephemeral_public_key || ciphertext`,
//!   checked in constant time before any decryption is attempted
//!
//! The envelope layout (`iv`, `ephemeralPublicKey`, `ciphertext`, `mac`)
//! is the vault's established escrow wire format; records written by
//! earlier deployments must keep decrypting.

use crate::errors::CryptoError;
use crate::hashing;
use crate::keys::{ecdh_x_coordinate, PublicKey, SecretKey, PUBLIC_KEY_LEN};
use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use subtle::ConstantTimeEq;

type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// CBC initialization vector length in bytes.
pub const IV_LEN: usize = 16;

/// Authenticated asymmetric ciphertext envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EciesEnvelope {
    /// CBC initialization vector.
    pub iv: [u8; IV_LEN],
    /// Uncompressed ephemeral public key.
    pub ephemeral_public_key: [u8; PUBLIC_KEY_LEN],
    /// AES-256-CBC ciphertext.
    pub ciphertext: Vec<u8>,
    /// HMAC-SHA256 over iv, ephemeral key, and ciphertext.
    pub mac: [u8; 32],
}

/// Encrypt `plaintext` so only the holder of `recipient`'s private key can
/// read it.
pub fn encrypt(recipient: &PublicKey, plaintext: &[u8]) -> Result<EciesEnvelope, CryptoError> {
    let ephemeral = SecretKey::generate();
    let ephemeral_public_key = ephemeral.public_key().to_uncompressed_bytes();

    let (enc_key, mac_key) = derive_keys(&ecdh_x_coordinate(recipient, &ephemeral));

    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);

    let cipher = Aes256CbcEnc::new_from_slices(&enc_key, &iv)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
    let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mac = hashing::hmac_sha256(&mac_key, &[&iv, &ephemeral_public_key, &ciphertext]);

    Ok(EciesEnvelope {
        iv,
        ephemeral_public_key,
        ciphertext,
        mac,
    })
}

/// Authenticate and decrypt an envelope with the recipient's private key.
///
/// # Errors
///
/// Returns `CryptoError::MacMismatch` when the key is wrong or any envelope
/// field was tampered with; `CryptoError::DecryptionFailed` on malformed
/// ciphertext. Neither produces partial plaintext.
pub fn decrypt(recipient_secret: &SecretKey, envelope: &EciesEnvelope) -> Result<Vec<u8>, CryptoError> {
    let ephemeral = PublicKey::from_sec1_bytes(&envelope.ephemeral_public_key)?;

    let (enc_key, mac_key) = derive_keys(&ecdh_x_coordinate(&ephemeral, recipient_secret));

    let expected = hashing::hmac_sha256(
        &mac_key,
        &[&envelope.iv, &envelope.ephemeral_public_key, &envelope.ciphertext],
    );
    if !bool::from(expected.ct_eq(&envelope.mac)) {
        return Err(CryptoError::MacMismatch);
    }

    let cipher = Aes256CbcDec::new_from_slices(&enc_key, &envelope.iv)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(&envelope.ciphertext)
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))
}

/// Split the SHA-512 of the shared x coordinate into cipher and MAC keys.
fn derive_keys(shared_x: &[u8; 32]) -> ([u8; 32], [u8; 32]) {
    let digest = hashing::sha512(shared_x);
    let mut enc_key = [0u8; 32];
    let mut mac_key = [0u8; 32];
    enc_key.copy_from_slice(&digest[..32]);
    mac_key.copy_from_slice(&digest[32..]);
    (enc_key, mac_key)
}
