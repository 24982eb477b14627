//! # Vault Recovery - Identity-Recovery Escrow Plugin
//!
//! Lets a user encrypt their master seed against a recovery key and later
//! reconstruct their identity from the escrowed ciphertext.
//!
//! ## Operations
//!
//! | operation | tier | purpose |
//! |---|---|---|
//! | `export`  | root | debugging escrow under a fresh bearer key, no passphrase |
//! | `import`  | root | claim a debugging escrow; destroys the record on success |
//! | `create`  | root | production escrow against caller-supplied key material |
//! | `restore` | root | reconstruct identity from an escrowed envelope |
//!
//! A record moves `absent -> escrowed` via `create`/`export` and back to
//! `absent` via a successful `import`; every operation is atomic from the
//! caller's perspective, and a failed restore/import changes no state.
//!
//! The master seed, HD deriver, remote escrow store, enrollment directory,
//! and identity bootstrap are external collaborators behind the ports in
//! [`ports`]; in-memory adapters in [`adapters`] back the tests.

pub mod adapters;
pub mod envelope;
pub mod errors;
pub mod ports;
pub mod service;

pub use errors::RecoveryError;
pub use ports::{
    EscrowPayload, EscrowRecord, EscrowStore, IdentityBootstrap, IdentityDirectory, KeyDeriver,
    KeyNode, MasterSeedAccess, PortError, RecoveryPorts,
};
pub use service::{RecoveryPlugin, RecoverySettings};
