//! Context-launch permission policies.

use crate::ports::{PortError, TrustGrantStore};
use async_trait::async_trait;
use std::sync::Arc;

/// Decides whether an origin may launch a sandboxed context for a target.
#[async_trait]
pub trait LaunchPolicy: Send + Sync {
    /// Whether `origin` may launch a context for `target`.
    async fn permits(&self, origin: &str, target: &str) -> Result<bool, PortError>;
}

/// Permit every launch.
///
/// The shipped default: whitelist enforcement is not yet switched on.
/// Swapping in [`GrantWhitelist`] is a wiring change only.
pub struct PermitAll;

#[async_trait]
impl LaunchPolicy for PermitAll {
    async fn permits(&self, _origin: &str, _target: &str) -> Result<bool, PortError> {
        Ok(true)
    }
}

/// Permit a launch only when the grant store holds `origin -> target`.
///
/// The enforcement the `DappConnectRequest` flow builds data for.
pub struct GrantWhitelist {
    grants: Arc<dyn TrustGrantStore>,
}

impl GrantWhitelist {
    /// Back the policy with a grant store.
    pub fn new(grants: Arc<dyn TrustGrantStore>) -> Self {
        Self { grants }
    }
}

#[async_trait]
impl LaunchPolicy for GrantWhitelist {
    async fn permits(&self, origin: &str, target: &str) -> Result<bool, PortError> {
        self.grants.granted(origin, target).await
    }
}
