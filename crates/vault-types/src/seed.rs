//! Master seed newtype.
//!
//! The root secret all identity key material derives from. It is held in
//! memory only, zeroized on drop, and never serialized; the only ways it
//! leaves the root context are the encrypted escrow envelopes built by the
//! recovery plugin.

use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Fixed master seed length in bytes.
pub const MASTER_SEED_LEN: usize = 32;

/// Slice had the wrong length for a master seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid master seed length: expected {MASTER_SEED_LEN}, got {0}")]
pub struct InvalidSeedLength(pub usize);

/// Root secret of the identity.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct MasterSeed([u8; MASTER_SEED_LEN]);

impl MasterSeed {
    /// Wrap raw seed bytes.
    pub fn from_bytes(bytes: [u8; MASTER_SEED_LEN]) -> Self {
        Self(bytes)
    }

    /// Wrap a byte slice, checking length.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, InvalidSeedLength> {
        let array: [u8; MASTER_SEED_LEN] = bytes
            .try_into()
            .map_err(|_| InvalidSeedLength(bytes.len()))?;
        Ok(Self(array))
    }

    /// Raw seed bytes.
    pub fn as_bytes(&self) -> &[u8; MASTER_SEED_LEN] {
        &self.0
    }
}

// Redacted: the seed must never reach logs through a stray `{:?}`.
impl std::fmt::Debug for MasterSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterSeed(..)")
    }
}
