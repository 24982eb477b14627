//! Cross-crate integration flows.

pub mod dispatch_flows;
pub mod fixtures;
pub mod ipc_flows;
pub mod recovery_flows;
