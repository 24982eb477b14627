//! The IPC router plugin: handlers and dispatcher integration.

use crate::errors::IpcRouterError;
use crate::pending::PendingCallStore;
use crate::ports::{IpcPorts, SandboxChannel, SandboxRequest};
use crate::uri;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info};
use vault_dispatch::{HandlerRef, Receiver, VaultHandle};
use vault_types::{keys, CapabilityContext, DappConnectRequest, IpcRouterRequest, ReplyError};

const INIT: HandlerRef = HandlerRef::new("ipc.init");
const FORWARD: HandlerRef = HandlerRef::new("ipc.forward");
const CALLBACK: HandlerRef = HandlerRef::new("ipc.callback");
const DAPP_CONNECT: HandlerRef = HandlerRef::new("ipc.dapp-connect");

/// Settings the router needs beyond its collaborators.
#[derive(Debug, Clone)]
pub struct IpcSettings {
    /// Deadline for a forwarded call's reply. `None` waits forever, which
    /// is the wire-compatible but leak-prone legacy behavior.
    pub call_timeout: Option<Duration>,
    /// Capability grant set for new sandboxed contexts.
    pub sandbox: crate::ports::SandboxCapabilities,
}

impl Default for IpcSettings {
    fn default() -> Self {
        Self {
            call_timeout: Some(Duration::from_secs(30)),
            sandbox: crate::ports::SandboxCapabilities::default(),
        }
    }
}

/// Creates sandboxed child contexts and forwards calls between dapps.
pub struct IpcRouterPlugin {
    ports: IpcPorts,
    settings: IpcSettings,
    pending: PendingCallStore,
    contexts: Mutex<HashMap<String, Arc<dyn SandboxChannel>>>,
    callback_counter: AtomicU64,
    vault_uri: OnceLock<String>,
}

impl IpcRouterPlugin {
    /// Create the router with its collaborators and settings.
    pub fn new(ports: IpcPorts, settings: IpcSettings) -> Self {
        Self {
            ports,
            settings,
            pending: PendingCallStore::new(),
            contexts: Mutex::new(HashMap::new()),
            callback_counter: AtomicU64::new(0),
            vault_uri: OnceLock::new(),
        }
    }

    /// Number of calls currently awaiting replies.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.pending_count()
    }

    fn reauth_uri(&self) -> String {
        let vault_uri = self.vault_uri.get().map(String::as_str).unwrap_or_default();
        let host = vault_uri.split('#').next().unwrap_or_default();
        format!("{host}#?pinauth=v")
    }

    /// Create the sandboxed context for `target`, once.
    ///
    /// Idempotent per target: a second init finds the existing context and
    /// returns immediately. The first init parks on the child's readiness
    /// signal (`init-<target>`), registered *before* the context is
    /// constructed so a fast child cannot signal into the void.
    async fn init_context(
        &self,
        context: &CapabilityContext,
        request: IpcRouterRequest,
    ) -> Result<Value, IpcRouterError> {
        let target = request
            .target
            .ok_or_else(|| IpcRouterError::BadRequest("init without target".into()))?;

        let mut contexts = self.contexts.lock().await;
        if contexts.contains_key(&target) {
            debug!(%target, "Sandboxed context already live");
            return Ok(Value::Null);
        }

        let permitted = self
            .ports
            .policy
            .permits(context.origin(), &target)
            .await
            .map_err(|e| IpcRouterError::Grants(e.to_string()))?;
        if !permitted {
            // Intended flow: send the caller back through re-authentication
            // instead of failing outright.
            return Err(IpcRouterError::NotPermitted {
                reauth_uri: self.reauth_uri(),
            });
        }

        info!(%target, "Creating sandboxed context");
        let init_key = format!("init-{target}");
        let ready = self.pending.register(init_key.clone());

        let channel = self
            .ports
            .host
            .create(SandboxRequest {
                target: target.clone(),
                uri: uri::inject_ipc_mode(&target),
                capabilities: self.settings.sandbox.clone(),
            })
            .await
            .map_err(|e| {
                self.pending.cancel(&init_key);
                IpcRouterError::Host(e.to_string())
            })?;

        contexts.insert(target.clone(), channel);
        drop(contexts);

        self.await_reply(ready, &init_key).await?;
        debug!(%target, "Sandboxed context ready");
        Ok(Value::Null)
    }

    /// Forward a call into a live context and park until its reply.
    async fn forward_call(
        &self,
        context: &CapabilityContext,
        request: IpcRouterRequest,
    ) -> Result<Value, IpcRouterError> {
        let target = request
            .target
            .ok_or_else(|| IpcRouterError::BadRequest("forward without target".into()))?;
        let payload = request
            .payload
            .ok_or_else(|| IpcRouterError::BadRequest("forward without payload".into()))?;
        let Value::Object(mut payload) = payload else {
            return Err(IpcRouterError::BadRequest("payload must be an object".into()));
        };

        // Callers must init first; forwarding never auto-creates a context.
        let channel = self
            .contexts
            .lock()
            .await
            .get(&target)
            .cloned()
            .ok_or_else(|| IpcRouterError::UnknownTarget(target.clone()))?;

        let id = format!(
            "callback-{}",
            self.callback_counter.fetch_add(1, Ordering::SeqCst)
        );
        payload.insert("callback".to_string(), json!(id.as_str()));
        payload.insert("origin".to_string(), json!(context.origin()));

        let reply = self.pending.register(id.clone());

        channel.post(Value::Object(payload)).await.map_err(|e| {
            self.pending.cancel(&id);
            IpcRouterError::Host(e.to_string())
        })?;

        debug!(%target, callback = %id, "Forwarded call");
        self.await_reply(reply, &id).await
    }

    /// Resolve the pending call a child context is replying to.
    async fn resolve_callback(&self, request: IpcRouterRequest) -> Result<Value, IpcRouterError> {
        let Some(id) = request.callback else {
            // Reply-shaped message with no correlation id; nothing to wake.
            return Ok(Value::Null);
        };

        let result = request.result.unwrap_or(Value::Null);
        self.pending.complete(&id, result);
        Ok(Value::Null)
    }

    /// Record a whitelist grant (root mode only).
    async fn dapp_connect(&self, request: DappConnectRequest) -> Result<Value, IpcRouterError> {
        info!(from = %request.from, to = %request.to, "Whitelisting dapp connection");
        self.ports
            .grants
            .grant(&request.from, &request.to)
            .await
            .map_err(|e| IpcRouterError::Grants(e.to_string()))?;
        Ok(Value::Null)
    }

    async fn await_reply(
        &self,
        reply: oneshot::Receiver<Value>,
        key: &str,
    ) -> Result<Value, IpcRouterError> {
        match self.settings.call_timeout {
            Some(limit) => match tokio::time::timeout(limit, reply).await {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(_)) => Err(IpcRouterError::ChannelClosed(key.to_string())),
                Err(_) => {
                    self.pending.cancel(key);
                    Err(IpcRouterError::Timeout(key.to_string()))
                }
            },
            None => reply
                .await
                .map_err(|_| IpcRouterError::ChannelClosed(key.to_string())),
        }
    }
}

#[async_trait]
impl Receiver for IpcRouterPlugin {
    fn name(&self) -> &'static str {
        "ipc-router"
    }

    fn install(&self, vault: &VaultHandle) {
        // Kept for building re-authentication redirects.
        let _ = self.vault_uri.set(vault.vault_uri().to_string());
        debug!(vault_uri = vault.vault_uri(), "IPC router installed");
    }

    fn route(&self, context: &CapabilityContext, message: &Value) -> Option<HandlerRef> {
        if context.is_root() && message.get(keys::DAPP_CONNECT).is_some() {
            return Some(DAPP_CONNECT);
        }

        let request = message.get(keys::IPC_ROUTER)?;
        if request.get("payload").is_none() {
            return Some(CALLBACK);
        }
        let call = request.get("payload").and_then(|p| p.get("call"));
        if call.and_then(Value::as_str) == Some("init") {
            return Some(INIT);
        }
        Some(FORWARD)
    }

    async fn invoke(
        &self,
        handler: HandlerRef,
        context: &CapabilityContext,
        message: &Value,
    ) -> Result<Value, ReplyError> {
        if handler == DAPP_CONNECT {
            let request: DappConnectRequest = message
                .get(keys::DAPP_CONNECT)
                .cloned()
                .and_then(|v| serde_json::from_value(v).ok())
                .ok_or_else(|| ReplyError::malformed("bad DappConnectRequest body"))?;
            return self.dapp_connect(request).await.map_err(ReplyError::from);
        }

        let request: IpcRouterRequest = message
            .get(keys::IPC_ROUTER)
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .ok_or_else(|| ReplyError::malformed("bad IPCRouterRequest body"))?;

        let result = if handler == INIT {
            self.init_context(context, request).await
        } else if handler == FORWARD {
            self.forward_call(context, request).await
        } else {
            self.resolve_callback(request).await
        };

        result.map_err(ReplyError::from)
    }
}
