//! # Vault Configuration
//!
//! Plain configuration structs with sane defaults and a validation pass
//! for the values that have no usable default.

use std::time::Duration;
use thiserror::Error;
use vault_ipc_router::SandboxCapabilities;

/// Complete vault configuration.
#[derive(Debug, Clone, Default)]
pub struct VaultConfig {
    /// Addressable URI of the vault's own root context.
    pub vault_uri: String,
    /// Application URIs the vault navigates to.
    pub apps: AppsConfig,
    /// IPC router configuration.
    pub ipc: IpcConfig,
    /// Recovery plugin configuration.
    pub recovery: RecoveryConfig,
}

impl VaultConfig {
    /// Validate configuration before wiring.
    ///
    /// # Returns
    ///
    /// Returns `Err` if:
    /// - the vault URI is empty
    /// - the user home application URI is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vault_uri.is_empty() {
            return Err(ConfigError::MissingVaultUri);
        }
        if self.apps.user_home.is_empty() {
            return Err(ConfigError::MissingHomeApp);
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The vault's own URI is not set.
    #[error("vault_uri is not set; the vault cannot build redirects to itself")]
    MissingVaultUri,
    /// The user's home application URI is not set.
    #[error("apps.user_home is not set; recovery cannot navigate after restore")]
    MissingHomeApp,
}

/// Application URIs.
#[derive(Debug, Clone, Default)]
pub struct AppsConfig {
    /// The user's home application, launched after a successful restore
    /// or import.
    pub user_home: String,
}

/// IPC router configuration.
#[derive(Debug, Clone)]
pub struct IpcConfig {
    /// Reply deadline for forwarded calls. `None` waits forever (the
    /// legacy behavior, which leaks a pending entry per lost reply).
    pub call_timeout: Option<Duration>,
    /// Capability grant set for new sandboxed contexts.
    pub sandbox: SandboxCapabilities,
}

impl Default for IpcConfig {
    fn default() -> Self {
        Self {
            call_timeout: Some(Duration::from_secs(30)),
            sandbox: SandboxCapabilities::default(),
        }
    }
}

/// Recovery plugin configuration.
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Enrollment namespace recorded with `create`.
    pub enroll_kind: String,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            enroll_kind: "uri".to_string(),
        }
    }
}
