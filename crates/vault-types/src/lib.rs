//! # Vault Types - Shared Wire and Trust Types
//!
//! Common vocabulary for the vault core: the capability context attached to
//! every inbound message, the typed payloads of the vault's JSON envelopes,
//! the serializable rejection sent back to callers, and the master seed
//! newtype.
//!
//! All inter-context communication is JSON envelopes keyed by protocol
//! (`recovery`, `IPCRouterRequest`, `DappConnectRequest`); the structs here
//! are the typed views receivers parse those envelopes into.

pub mod context;
pub mod messages;
pub mod reply;
pub mod seed;

pub use context::{CapabilityContext, TrustMode};
pub use messages::{
    keys, DappConnectRequest, IpcRouterRequest, RecoveryEnvelope, RecoveryRequest,
};
pub use reply::{codes, ReplyError};
pub use seed::{InvalidSeedLength, MasterSeed, MASTER_SEED_LEN};
