//! The dispatcher: an ordered receiver list and the probe loop.

use crate::receiver::Receiver;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};
use vault_types::{CapabilityContext, ReplyError};

/// Shared vault state handed to receivers at install time.
///
/// The original implementation hung this state off a global vault object;
/// here it is an explicit value owned by the dispatcher and lent to each
/// receiver exactly once, when it registers.
#[derive(Debug, Clone)]
pub struct VaultHandle {
    vault_uri: String,
}

impl VaultHandle {
    /// Create a handle for a vault addressable at `vault_uri`.
    pub fn new(vault_uri: impl Into<String>) -> Self {
        Self {
            vault_uri: vault_uri.into(),
        }
    }

    /// Addressable URI of the vault's own root context.
    ///
    /// Receivers use this to build redirects back into the vault (e.g. the
    /// re-authentication flow on a denied context launch).
    pub fn vault_uri(&self) -> &str {
        &self.vault_uri
    }
}

/// Ordered collection of receivers plus the dispatch loop.
///
/// Owned by the single event-loop task; receivers share it only through
/// `dispatch`, so one handler runs per message and handlers never race
/// each other for the same message.
pub struct Dispatcher {
    handle: VaultHandle,
    receivers: Vec<Arc<dyn Receiver>>,
}

impl Dispatcher {
    /// Create an empty dispatcher.
    pub fn new(handle: VaultHandle) -> Self {
        Self {
            handle,
            receivers: Vec::new(),
        }
    }

    /// Append a receiver and run its install hook.
    pub fn register(&mut self, receiver: Arc<dyn Receiver>) {
        receiver.install(&self.handle);
        debug!(receiver = receiver.name(), "Receiver registered");
        self.receivers.push(receiver);
    }

    /// Number of registered receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.receivers.len()
    }

    /// Dispatch one inbound message.
    ///
    /// Probes receivers in registration order and runs the first matching
    /// handler. Returns `None` when no receiver claims the message: the
    /// message is dropped and no reply is owed to the sender.
    pub async fn dispatch(
        &self,
        context: &CapabilityContext,
        message: &Value,
    ) -> Option<Result<Value, ReplyError>> {
        for receiver in &self.receivers {
            let Some(handler) = receiver.route(context, message) else {
                continue;
            };

            debug!(
                receiver = receiver.name(),
                handler = %handler,
                mode = ?context.mode(),
                origin = context.origin(),
                "Dispatching message"
            );

            let result = receiver.invoke(handler, context, message).await;
            if let Err(e) = &result {
                warn!(
                    receiver = receiver.name(),
                    handler = %handler,
                    code = %e.code,
                    "Handler rejected request"
                );
            }
            return Some(result);
        }

        debug!(
            mode = ?context.mode(),
            origin = context.origin(),
            "Message type unrecognized, dropping"
        );
        None
    }
}
