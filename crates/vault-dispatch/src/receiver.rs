//! The pluggable receiver contract.

use crate::dispatcher::VaultHandle;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use vault_types::{CapabilityContext, ReplyError};

/// Token naming the handler a receiver selected for a message.
///
/// Returned by [`Receiver::route`] and passed back verbatim to
/// [`Receiver::invoke`]; also used as the handler label in dispatch logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerRef(&'static str);

impl HandlerRef {
    /// Create a handler token with a stable name.
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Stable handler name.
    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// A pluggable handler provider.
///
/// Registered once at vault startup and probed for every inbound message.
#[async_trait]
pub trait Receiver: Send + Sync {
    /// Stable receiver name for diagnostics.
    fn name(&self) -> &'static str;

    /// One-time hook run when the receiver is registered.
    fn install(&self, _vault: &VaultHandle) {}

    /// Decide whether this receiver handles `message` on this channel.
    ///
    /// Must be a pure predicate + selector: the dispatcher may probe
    /// several receivers per message, so `route` must not observe-and-act.
    fn route(&self, context: &CapabilityContext, message: &Value) -> Option<HandlerRef>;

    /// Run the handler previously selected by `route`.
    async fn invoke(
        &self,
        handler: HandlerRef,
        context: &CapabilityContext,
        message: &Value,
    ) -> Result<Value, ReplyError>;
}
