//! Typed views of the vault's JSON message envelopes.
//!
//! Envelopes are keyed by protocol: `{ "recovery": {...} }`,
//! `{ "IPCRouterRequest": {...} }`, `{ "DappConnectRequest": {...} }`.
//! Receivers probe for the key in `route` and deserialize the value into
//! these structs in their handlers. Unknown envelope shapes are not an
//! error anywhere; they simply match no receiver.

use serde::{Deserialize, Serialize};

/// Envelope keys receivers probe for during routing.
pub mod keys {
    /// Recovery escrow protocol envelope.
    pub const RECOVERY: &str = "recovery";
    /// Sandboxed call-forwarding envelope.
    pub const IPC_ROUTER: &str = "IPCRouterRequest";
    /// Whitelist-building connect request (root mode only).
    pub const DAPP_CONNECT: &str = "DappConnectRequest";
}

/// Body of a `recovery` envelope; the variant tag is the operation name.
///
/// `export` and `import` form the unauthenticated debugging pair; `create`
/// and `restore` form the production escrow pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryRequest {
    /// Escrow the master seed under a freshly generated bearer key.
    Export {},
    /// Claim a debugging escrow with its bearer key (hex).
    Import {
        /// Bearer auth key returned by a previous `export`.
        key: String,
    },
    /// Escrow the master seed against caller-supplied key material.
    Create {
        /// Human-chosen recovery identifier; also names the revoke path.
        id: String,
        /// Encryption key material, hex; first 32 bytes are used.
        key: String,
    },
    /// Reconstruct the identity from an escrowed envelope.
    Restore {
        /// Private counterpart of the `create`-time encryption key, hex.
        key: String,
        /// Hex-encoded ECIES envelope produced at `create` time.
        recovery: RecoveryEnvelope,
    },
}

/// Hex-encoded ECIES envelope as it travels on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryEnvelope {
    /// CBC initialization vector.
    pub iv: String,
    /// Uncompressed ephemeral public key.
    #[serde(rename = "ephemeralPublicKey")]
    pub ephemeral_public_key: String,
    /// AES-CBC ciphertext of the master seed.
    pub ciphertext: String,
    /// HMAC-SHA256 over iv, ephemeral key, and ciphertext.
    pub mac: String,
}

/// Body of an `IPCRouterRequest` envelope.
///
/// Three shapes share this struct: a forwarded call carries `target` and
/// `payload`; an init request is a forwarded call whose payload's `call`
/// field is `"init"`; a reply from a child carries `callback` and `result`
/// with no payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpcRouterRequest {
    /// Addressable URI of the sandboxed context being called.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    /// Call payload to forward; absent on replies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    /// Correlation id, set on replies from child contexts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
    /// Result value accompanying a reply.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

/// Body of a `DappConnectRequest` envelope (root mode only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DappConnectRequest {
    /// Origin being granted permission.
    pub from: String,
    /// Target the grant applies to.
    pub to: String,
}
