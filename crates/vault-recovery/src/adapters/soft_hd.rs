//! Software HD derivation adapter.
//!
//! Deterministic HMAC-SHA512-chained derivation rooted at the master seed.
//! A path seed keys the root step; numeric path segments (`"m/0"`) key the
//! child steps. Same seed and path always yield the same node, which is
//! what the revoke-key construction relies on.

use crate::ports::{KeyDeriver, KeyNode, PortError};
use async_trait::async_trait;
use vault_crypto::{hashing, PublicKey, SecretKey};
use vault_types::MasterSeed;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// HD deriver rooted at an in-memory master seed.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SoftKeyDeriver {
    master: [u8; 32],
}

impl SoftKeyDeriver {
    /// Root the deriver at a master seed.
    pub fn new(seed: &MasterSeed) -> Self {
        Self {
            master: *seed.as_bytes(),
        }
    }
}

#[async_trait]
impl KeyDeriver for SoftKeyDeriver {
    async fn derive(&self, path_seed: &[u8]) -> Result<Box<dyn KeyNode>, PortError> {
        let digest = hashing::hmac_sha512(&self.master, &[path_seed]);
        Ok(Box::new(SoftKeyNode::from_digest(&digest)?))
    }
}

/// One node of the software derivation tree.
struct SoftKeyNode {
    secret: SecretKey,
    chain: [u8; 32],
}

impl SoftKeyNode {
    fn from_digest(digest: &[u8; 64]) -> Result<Self, PortError> {
        let mut key_bytes = [0u8; 32];
        key_bytes.copy_from_slice(&digest[..32]);
        let secret = SecretKey::from_bytes(key_bytes)
            .map_err(|_| PortError::new("derived scalar out of range"))?;
        key_bytes.zeroize();

        let mut chain = [0u8; 32];
        chain.copy_from_slice(&digest[32..]);
        Ok(Self { secret, chain })
    }

    fn child(&self, index: u32) -> Result<Self, PortError> {
        let index_bytes = index.to_be_bytes();
        let digest = hashing::hmac_sha512(
            &self.chain,
            &[self.secret.as_bytes().as_slice(), &index_bytes],
        );
        Self::from_digest(&digest)
    }
}

#[async_trait]
impl KeyNode for SoftKeyNode {
    async fn derive(&self, path: &str) -> Result<Box<dyn KeyNode>, PortError> {
        let mut node = Self {
            secret: self.secret.clone(),
            chain: self.chain,
        };
        for index in parse_path(path)? {
            node = node.child(index)?;
        }
        Ok(Box::new(node))
    }

    fn public_key(&self) -> PublicKey {
        self.secret.public_key()
    }
}

/// Parse `"m"` or `"m/<n>/<n>/..."` into child indices.
fn parse_path(path: &str) -> Result<Vec<u32>, PortError> {
    let mut segments = path.split('/');
    if segments.next() != Some("m") {
        return Err(PortError::new(format!("derivation path must start with m: {path}")));
    }
    segments
        .map(|s| {
            s.parse::<u32>()
                .map_err(|_| PortError::new(format!("bad derivation path segment: {s}")))
        })
        .collect()
}
