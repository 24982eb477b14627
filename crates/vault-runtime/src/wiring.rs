//! Vault assembly.

use crate::config::{ConfigError, VaultConfig};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use vault_dispatch::{Dispatcher, VaultHandle};
use vault_ipc_router::{IpcPorts, IpcRouterPlugin, IpcSettings};
use vault_recovery::{RecoveryPlugin, RecoveryPorts};
use vault_types::{CapabilityContext, ReplyError};

/// The assembled vault core.
///
/// One instance per vault process; the transport layer feeds every
/// inbound message through [`Vault::dispatch`].
pub struct Vault {
    dispatcher: Dispatcher,
}

impl Vault {
    /// Dispatch one inbound message.
    ///
    /// `None` means no receiver recognized the message; it is dropped and
    /// the sender is owed no reply.
    pub async fn dispatch(
        &self,
        context: &CapabilityContext,
        message: &Value,
    ) -> Option<Result<Value, ReplyError>> {
        self.dispatcher.dispatch(context, message).await
    }

    /// Number of installed receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.dispatcher.receiver_count()
    }
}

/// Build a vault from configuration and collaborator ports.
///
/// Registration order is the probe order: recovery first, then the IPC
/// router, matching the boot sequence of the original vault.
pub fn build_vault(
    config: &VaultConfig,
    recovery: RecoveryPorts,
    ipc: IpcPorts,
) -> Result<Vault, ConfigError> {
    config.validate()?;

    let mut dispatcher = Dispatcher::new(VaultHandle::new(&config.vault_uri));

    dispatcher.register(Arc::new(RecoveryPlugin::new(
        recovery,
        vault_recovery::RecoverySettings {
            home_app: config.apps.user_home.clone(),
            enroll_kind: config.recovery.enroll_kind.clone(),
        },
    )));

    dispatcher.register(Arc::new(IpcRouterPlugin::new(
        ipc,
        IpcSettings {
            call_timeout: config.ipc.call_timeout,
            sandbox: config.ipc.sandbox.clone(),
        },
    )));

    info!(
        receivers = dispatcher.receiver_count(),
        vault_uri = %config.vault_uri,
        "Vault assembled"
    );

    Ok(Vault { dispatcher })
}
