//! # Vault IPC Router - Sandboxed Call Forwarding
//!
//! Lazily creates sandboxed child contexts and forwards calls to them,
//! pairing each forwarded call with its eventual reply through a
//! correlation-id table.
//!
//! ## Flow
//!
//! 1. `init` request for a target: create the sandboxed context (once per
//!    target) and wait for its readiness signal.
//! 2. Forwarded call: attach a fresh correlation id and the caller's
//!    origin, post into the child, park the caller in the pending-call
//!    table.
//! 3. Callback from the child: look up the correlation id and wake the
//!    parked caller. Stale or unknown ids are dropped silently.
//!
//! Replies are matched strictly by correlation id, so out-of-order replies
//! from a child resolve the right callers. In root mode the router also
//! records `DappConnectRequest` whitelist grants, the data behind the
//! launch policy.

pub mod adapters;
pub mod errors;
pub mod pending;
pub mod policy;
pub mod ports;
pub mod router;
pub mod uri;

pub use errors::IpcRouterError;
pub use pending::PendingCallStore;
pub use policy::{GrantWhitelist, LaunchPolicy, PermitAll};
pub use ports::{
    IpcPorts, PortError, SandboxCapabilities, SandboxChannel, SandboxHost, SandboxRequest,
    TrustGrantStore,
};
pub use router::{IpcRouterPlugin, IpcSettings};
