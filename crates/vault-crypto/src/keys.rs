//! # secp256k1 Keys and ECDH
//!
//! Newtype wrappers over `k256` for the escrow protocol's key material.
//! Public keys travel uncompressed (65 bytes, `0x04`-prefixed) on the wire;
//! secret keys are zeroized on drop.

use crate::errors::CryptoError;
use crate::hashing;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{ProjectivePoint, PublicKey as CurvePublicKey, SecretKey as CurveSecretKey};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret key length in bytes.
pub const SECRET_KEY_LEN: usize = 32;

/// Uncompressed SEC1 public key length in bytes.
pub const PUBLIC_KEY_LEN: usize = 65;

/// secp256k1 secret scalar.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; SECRET_KEY_LEN]);

impl SecretKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let secret = CurveSecretKey::random(&mut rand::thread_rng());
        Self(secret.to_bytes().into())
    }

    /// Create from raw bytes, validating the scalar is in range.
    pub fn from_bytes(bytes: [u8; SECRET_KEY_LEN]) -> Result<Self, CryptoError> {
        CurveSecretKey::from_bytes(&bytes.into()).map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self(bytes))
    }

    /// Create from a slice of exactly [`SECRET_KEY_LEN`] bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let array: [u8; SECRET_KEY_LEN] =
            bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                expected: SECRET_KEY_LEN,
                actual: bytes.len(),
            })?;
        Self::from_bytes(array)
    }

    /// Raw scalar bytes.
    pub fn as_bytes(&self) -> &[u8; SECRET_KEY_LEN] {
        &self.0
    }

    /// Derive the matching public key.
    ///
    /// # Panics
    ///
    /// This function will not panic - the scalar was validated at
    /// construction time.
    pub fn public_key(&self) -> PublicKey {
        let secret = CurveSecretKey::from_bytes(&self.0.into())
            .expect("scalar validated at construction");
        PublicKey(secret.public_key())
    }

    fn to_curve(&self) -> CurveSecretKey {
        CurveSecretKey::from_bytes(&self.0.into()).expect("scalar validated at construction")
    }
}

// Redacted: secret scalars must never reach logs.
impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(..)")
    }
}

/// secp256k1 public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(CurvePublicKey);

impl PublicKey {
    /// Parse from SEC1 bytes (compressed or uncompressed).
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        CurvePublicKey::from_sec1_bytes(bytes)
            .map(Self)
            .map_err(|_| CryptoError::InvalidPublicKey)
    }

    /// Uncompressed SEC1 encoding (65 bytes), the protocol's wire format.
    ///
    /// # Panics
    ///
    /// This function will not panic - an uncompressed SEC1 point is always
    /// exactly 65 bytes.
    pub fn to_uncompressed_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        let encoded = self.0.to_encoded_point(false);
        let mut bytes = [0u8; PUBLIC_KEY_LEN];
        bytes.copy_from_slice(encoded.as_bytes());
        bytes
    }

    /// Compressed SEC1 encoding (33 bytes).
    ///
    /// # Panics
    ///
    /// This function will not panic - a compressed SEC1 point is always
    /// exactly 33 bytes.
    pub fn to_compressed_bytes(&self) -> [u8; 33] {
        let encoded = self.0.to_encoded_point(true);
        let mut bytes = [0u8; 33];
        bytes.copy_from_slice(encoded.as_bytes());
        bytes
    }

    fn to_curve(&self) -> CurvePublicKey {
        self.0
    }
}

/// Diffie-Hellman shared secret as SHA-256 of the compressed shared point.
///
/// This matches the convention of the original protocol's secp256k1 binding:
/// the export path uses it to make the revoke key deterministically
/// re-derivable from the auth key alone.
pub fn ecdh_shared_secret(public: &PublicKey, secret: &SecretKey) -> [u8; 32] {
    let shared = shared_point(public, secret);
    hashing::sha256(shared.to_affine().to_encoded_point(true).as_bytes())
}

/// X coordinate of the Diffie-Hellman shared point (ECIES key agreement).
///
/// # Panics
///
/// This function will not panic - a validated public key times a nonzero
/// scalar is never the point at infinity, so the x coordinate exists.
pub(crate) fn ecdh_x_coordinate(public: &PublicKey, secret: &SecretKey) -> [u8; 32] {
    let shared = shared_point(public, secret);
    let encoded = shared.to_affine().to_encoded_point(false);
    let x = encoded.x().expect("shared point is never the identity");
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(x);
    bytes
}

fn shared_point(public: &PublicKey, secret: &SecretKey) -> ProjectivePoint {
    let scalar = secret.to_curve().to_nonzero_scalar();
    ProjectivePoint::from(*public.to_curve().as_affine()) * *scalar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_key_roundtrip() {
        let secret = SecretKey::generate();
        let public = secret.public_key();
        let bytes = public.to_uncompressed_bytes();
        assert_eq!(bytes[0], 0x04);
        assert_eq!(PublicKey::from_sec1_bytes(&bytes).unwrap(), public);
    }

    #[test]
    fn test_ecdh_is_symmetric() {
        let a = SecretKey::generate();
        let b = SecretKey::generate();
        let ab = ecdh_shared_secret(&b.public_key(), &a);
        let ba = ecdh_shared_secret(&a.public_key(), &b);
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_ecdh_differs_per_pair() {
        let a = SecretKey::generate();
        let b = SecretKey::generate();
        let c = SecretKey::generate();
        assert_ne!(
            ecdh_shared_secret(&b.public_key(), &a),
            ecdh_shared_secret(&c.public_key(), &a)
        );
    }

    #[test]
    fn test_rejects_zero_scalar() {
        assert!(SecretKey::from_bytes([0u8; SECRET_KEY_LEN]).is_err());
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = SecretKey::generate();
        assert_eq!(format!("{secret:?}"), "SecretKey(..)");
    }
}
