//! Recovery protocol errors and their wire-level mapping.

use thiserror::Error;
use vault_crypto::CryptoError;
use vault_types::{codes, ReplyError};

/// Failures of the escrow protocol.
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// Envelope could not be authenticated or decoded; nothing was mutated.
    #[error("recovery envelope could not be authenticated or decoded")]
    Decrypt,

    /// Decryption succeeded but identity reinitialization failed.
    #[error("identity reinitialization failed: {0}")]
    IdentityInit(String),

    /// No escrow record exists for the presented bearer key.
    #[error("no escrow record for the presented auth key")]
    RecordNotFound,

    /// Caller-supplied key material was unusable.
    #[error("invalid encryption key material")]
    KeyMaterial,

    /// The escrow store reported a failure.
    #[error("escrow store failure: {0}")]
    Store(String),

    /// The HD deriver reported a failure.
    #[error("key derivation failure: {0}")]
    Derivation(String),

    /// The master seed is unavailable (identity locked or absent).
    #[error("master seed unavailable: {0}")]
    SeedUnavailable(String),

    /// The enrollment directory reported a failure.
    #[error("enrollment failure: {0}")]
    Enrollment(String),

    /// A cryptographic primitive failed outside a decrypt path.
    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl From<RecoveryError> for ReplyError {
    fn from(err: RecoveryError) -> Self {
        let code = match &err {
            RecoveryError::Decrypt => codes::RECOVERY_DECRYPT,
            RecoveryError::IdentityInit(_) => codes::INIT_IDENTITY,
            RecoveryError::RecordNotFound => codes::RECOVERY_NOT_FOUND,
            RecoveryError::KeyMaterial => codes::MALFORMED_REQUEST,
            RecoveryError::Store(_)
            | RecoveryError::Derivation(_)
            | RecoveryError::SeedUnavailable(_)
            | RecoveryError::Enrollment(_)
            | RecoveryError::Crypto(_) => codes::INTERNAL,
        };
        ReplyError::new(code, err.to_string())
    }
}
