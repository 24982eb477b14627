//! # Vault Crypto - Escrow Protocol Primitives
//!
//! Cryptography exercised by the identity-recovery escrow protocol:
//!
//! - secp256k1 key wrappers and ECDH
//! - ECIES (authenticated asymmetric encryption) for production escrow
//!   envelopes
//! - an AES-128-CBC escrow cipher for the unauthenticated debugging path
//! - SHA-256 helpers for domain-separated derivation hashes
//!
//! The HD derivation tree behind the vault's `derive` operation is *not*
//! here; it stays behind a port in the recovery plugin.

// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod ecies;
pub mod errors;
pub mod escrow_cipher;
pub mod hashing;
pub mod keys;

pub use ecies::EciesEnvelope;
pub use errors::CryptoError;
pub use keys::{ecdh_shared_secret, PublicKey, SecretKey, SECRET_KEY_LEN};
