//! Ports onto the router's external collaborators.

use crate::policy::LaunchPolicy;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Failure inside an external collaborator.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct PortError(pub String);

impl PortError {
    /// Build a port error from any displayable cause.
    pub fn new(cause: impl std::fmt::Display) -> Self {
        Self(cause.to_string())
    }
}

/// Capability grant set for a sandboxed child context.
///
/// The default is the router's explicit minimal set: storage access only
/// with user activation, same-origin, scripts. Top navigation, popups and
/// forms stay off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxCapabilities {
    /// Allow storage access, gated on user activation.
    pub storage_access_by_user_activation: bool,
    /// Treat the context as same-origin.
    pub same_origin: bool,
    /// Allow script execution.
    pub scripts: bool,
    /// Allow navigating the top-level context.
    pub top_navigation: bool,
    /// Allow opening popups.
    pub popups: bool,
    /// Allow form submission.
    pub forms: bool,
}

impl Default for SandboxCapabilities {
    fn default() -> Self {
        Self {
            storage_access_by_user_activation: true,
            same_origin: true,
            scripts: true,
            top_navigation: false,
            popups: false,
            forms: false,
        }
    }
}

/// Instruction to construct one sandboxed child context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SandboxRequest {
    /// Target identifier the context is keyed by.
    pub target: String,
    /// Full URI to load, with hosting parameters already injected.
    pub uri: String,
    /// Capability grant set for the context.
    pub capabilities: SandboxCapabilities,
}

/// Message channel into a live sandboxed context.
#[async_trait]
pub trait SandboxChannel: Send + Sync {
    /// Post a payload into the child context.
    async fn post(&self, payload: Value) -> Result<(), PortError>;
}

/// Constructor of sandboxed child contexts.
#[async_trait]
pub trait SandboxHost: Send + Sync {
    /// Construct a context for `request` and return its channel.
    async fn create(&self, request: SandboxRequest) -> Result<Arc<dyn SandboxChannel>, PortError>;
}

/// Persisted record of which origins may address which targets.
#[async_trait]
pub trait TrustGrantStore: Send + Sync {
    /// Record that `from` may address `to`.
    async fn grant(&self, from: &str, to: &str) -> Result<(), PortError>;

    /// Whether `from` may address `to`.
    async fn granted(&self, from: &str, to: &str) -> Result<bool, PortError>;
}

/// The full set of collaborators the router is wired with.
#[derive(Clone)]
pub struct IpcPorts {
    /// Sandboxed context constructor.
    pub host: Arc<dyn SandboxHost>,
    /// Whitelist storage.
    pub grants: Arc<dyn TrustGrantStore>,
    /// Context-launch permission policy.
    pub policy: Arc<dyn LaunchPolicy>,
}
