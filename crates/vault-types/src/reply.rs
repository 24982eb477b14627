//! Wire-level rejection type.
//!
//! Domain crates keep their own `thiserror` enums; what travels back to the
//! original sender is always this flat `{ code, message }` pair. The codes
//! are part of the protocol and stable across releases.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable rejection codes surfaced to callers.
pub mod codes {
    /// Authenticated decryption of a recovery envelope failed.
    pub const RECOVERY_DECRYPT: &str = "VAULT_ERROR_RECOVERY_DECRYPT";
    /// Decryption succeeded but identity reinitialization failed.
    pub const INIT_IDENTITY: &str = "VAULT_ERROR_INIT_IDENTITY";
    /// No escrow record exists for the presented bearer key.
    pub const RECOVERY_NOT_FOUND: &str = "VAULT_ERROR_RECOVERY_NOT_FOUND";
    /// Forwarded call addressed a target with no live sandboxed context.
    pub const IPC_UNKNOWN_TARGET: &str = "VAULT_ERROR_IPC_UNKNOWN_TARGET";
    /// Forwarded call outlived the configured reply deadline.
    pub const IPC_TIMEOUT: &str = "VAULT_ERROR_IPC_TIMEOUT";
    /// Launch policy denied context creation for the caller.
    pub const IPC_NOT_PERMITTED: &str = "VAULT_ERROR_IPC_NOT_PERMITTED";
    /// Envelope matched a receiver but its body failed to parse.
    pub const MALFORMED_REQUEST: &str = "VAULT_ERROR_MALFORMED_REQUEST";
    /// Unexpected internal failure inside a handler.
    pub const INTERNAL: &str = "VAULT_ERROR_INTERNAL";
}

/// Rejected reply sent back over the message channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{code}: {message}")]
pub struct ReplyError {
    /// Stable protocol code from [`codes`].
    pub code: String,
    /// Human-readable detail; diagnostic only, not matched on.
    pub message: String,
}

impl ReplyError {
    /// Build a rejection with the given code and detail.
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }

    /// Rejection for an envelope body that failed to deserialize.
    pub fn malformed(detail: impl std::fmt::Display) -> Self {
        Self::new(codes::MALFORMED_REQUEST, detail.to_string())
    }

    /// Rejection for an unexpected internal handler failure.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        Self::new(codes::INTERNAL, detail.to_string())
    }
}
