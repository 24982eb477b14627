//! Capability context: the trust tier of the channel a message arrived on.

use serde::{Deserialize, Serialize};

/// Trust tier of a message channel.
///
/// `Root` channels belong to the embedding page / vault's own top context;
/// `Sandboxed` channels belong to hosted sub-applications. Several handlers
/// (recovery, dapp-connect) are only reachable from root channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustMode {
    /// Privileged channel of the embedding page.
    Root,
    /// Channel of a hosted, sandboxed sub-application.
    Sandboxed,
}

/// Immutable per-message trust descriptor.
///
/// Constructed by the transport layer for each inbound message and discarded
/// after dispatch. Handlers never mutate it; the sender origin travels with
/// forwarded payloads so child contexts can see who is calling them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityContext {
    mode: TrustMode,
    origin: String,
}

impl CapabilityContext {
    /// Context for a message from a root-tier channel.
    pub fn root(origin: impl Into<String>) -> Self {
        Self {
            mode: TrustMode::Root,
            origin: origin.into(),
        }
    }

    /// Context for a message from a sandboxed channel.
    pub fn sandboxed(origin: impl Into<String>) -> Self {
        Self {
            mode: TrustMode::Sandboxed,
            origin: origin.into(),
        }
    }

    /// Trust tier of the originating channel.
    pub fn mode(&self) -> TrustMode {
        self.mode
    }

    /// Origin of the sender, as tagged by the transport.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Convenience predicate for root-only handlers.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.mode == TrustMode::Root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_context() {
        let ctx = CapabilityContext::root("https://vault.example");
        assert!(ctx.is_root());
        assert_eq!(ctx.mode(), TrustMode::Root);
        assert_eq!(ctx.origin(), "https://vault.example");
    }

    #[test]
    fn test_sandboxed_context() {
        let ctx = CapabilityContext::sandboxed("https://dapp.example");
        assert!(!ctx.is_root());
        assert_eq!(ctx.mode(), TrustMode::Sandboxed);
    }
}
