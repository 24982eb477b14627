//! Ports onto the vault's external collaborators.
//!
//! The recovery protocol calls, but does not implement, the master-seed
//! store, the HD derivation tree, the remote escrow service, the identity
//! enrollment directory, and the identity bootstrap. Each is a small async
//! trait here; production wires the real services, tests wire the
//! in-memory adapters.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use vault_crypto::PublicKey;
use vault_types::{MasterSeed, RecoveryEnvelope};

/// Failure inside an external collaborator.
///
/// Collaborators report what went wrong; the service decides which
/// protocol error it becomes.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct PortError(pub String);

impl PortError {
    /// Build a port error from any displayable cause.
    pub fn new(cause: impl std::fmt::Display) -> Self {
        Self(cause.to_string())
    }
}

/// Access to the vault's master seed.
#[async_trait]
pub trait MasterSeedAccess: Send + Sync {
    /// The current master seed, or an error if the identity is locked or
    /// not yet set up.
    async fn master_seed(&self) -> Result<MasterSeed, PortError>;
}

/// One node of the HD derivation tree.
///
/// Only the operations the escrow protocol exercises are exposed; the
/// tree's internal structure is the collaborator's business.
#[async_trait]
pub trait KeyNode: Send + Sync {
    /// Derive a child node by path (e.g. `"m/0"`).
    async fn derive(&self, path: &str) -> Result<Box<dyn KeyNode>, PortError>;

    /// Public key of this node.
    fn public_key(&self) -> PublicKey;
}

/// Deterministic key derivation rooted at the master seed.
#[async_trait]
pub trait KeyDeriver: Send + Sync {
    /// Derive the tree node for an opaque path seed (a domain-separated
    /// hash in this protocol). Same seed, same node, always.
    async fn derive(&self, path_seed: &[u8]) -> Result<Box<dyn KeyNode>, PortError>;
}

/// Ciphertext stored in an escrow record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscrowPayload {
    /// Hex-encoded AES-128-CBC blob (debugging export path).
    Symmetric(String),
    /// Hex-encoded ECIES envelope (production path).
    Asymmetric(RecoveryEnvelope),
}

/// A record in the remote escrow store, indexed by its auth public key.
///
/// The store never sees plaintext: the payload is decryptable only by the
/// holder of the matching private key material.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscrowRecord {
    /// Uncompressed auth public key, hex. Names the record.
    pub auth_public_key: String,
    /// Uncompressed revoke public key, hex. Authorizes supersession.
    pub revoke_public_key: String,
    /// Encrypted master seed.
    pub payload: EscrowPayload,
}

/// The remote escrow store.
///
/// Supersession rules (a new record may replace an old one only with a
/// derivable revoke key) are enforced by the store itself.
#[async_trait]
pub trait EscrowStore: Send + Sync {
    /// Upload a record.
    async fn store(&self, record: EscrowRecord) -> Result<(), PortError>;

    /// Fetch the record named by an auth public key, if any.
    async fn fetch(&self, auth_public_key: &str) -> Result<Option<EscrowRecord>, PortError>;

    /// Delete the record named by an auth public key.
    async fn delete(&self, auth_public_key: &str) -> Result<(), PortError>;
}

/// Identity enrollment directory (`id -> encryption public key`).
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Record that `id` of the given kind resolves to `enc_public_key_hex`.
    async fn enroll(
        &self,
        kind: &str,
        id: &str,
        enc_public_key_hex: &str,
    ) -> Result<(), PortError>;
}

/// Identity reinitialization and app navigation.
#[async_trait]
pub trait IdentityBootstrap: Send + Sync {
    /// Reinitialize the vault's identity from a recovered seed.
    ///
    /// Must be atomic: on failure the identity is either untouched or
    /// fully rolled back by the collaborator.
    async fn init_identity(&self, seed: MasterSeed) -> Result<(), PortError>;

    /// Navigate the vault into an application context.
    async fn launch(&self, uri: &str) -> Result<(), PortError>;
}

/// The full set of collaborators the plugin is wired with.
#[derive(Clone)]
pub struct RecoveryPorts {
    /// Master seed access.
    pub seed: Arc<dyn MasterSeedAccess>,
    /// HD derivation root.
    pub deriver: Arc<dyn KeyDeriver>,
    /// Remote escrow store.
    pub escrow: Arc<dyn EscrowStore>,
    /// Enrollment directory.
    pub directory: Arc<dyn IdentityDirectory>,
    /// Identity bootstrap.
    pub bootstrap: Arc<dyn IdentityBootstrap>,
}
