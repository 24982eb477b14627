//! Shared fixtures: a fully wired vault on in-memory collaborators.

use std::sync::Arc;
use vault_ipc_router::adapters::memory::{MemoryTrustGrantStore, RecordingSandboxHost};
use vault_ipc_router::{IpcPorts, PermitAll};
use vault_recovery::adapters::memory::{
    MemoryEscrowStore, MemoryIdentityDirectory, RecordingBootstrap, StaticSeedAccess,
};
use vault_recovery::adapters::soft_hd::SoftKeyDeriver;
use vault_recovery::RecoveryPorts;
use vault_runtime::{build_vault, AppsConfig, Vault, VaultConfig};
use vault_types::{CapabilityContext, MasterSeed};

/// The vault's own URI in every fixture.
pub const VAULT_URI: &str = "https://vault.example/#";

/// The user's home application in every fixture.
pub const HOME_APP: &str = "https://home.example/#";

/// A wired vault plus handles onto its in-memory collaborators.
pub struct TestVault {
    pub vault: Vault,
    pub seed: MasterSeed,
    pub escrow: Arc<MemoryEscrowStore>,
    pub directory: Arc<MemoryIdentityDirectory>,
    pub bootstrap: Arc<RecordingBootstrap>,
    pub host: Arc<RecordingSandboxHost>,
    pub grants: Arc<MemoryTrustGrantStore>,
}

impl TestVault {
    /// Wire a vault with default configuration and a fixed seed.
    pub fn new() -> Self {
        Self::with_config(default_config())
    }

    /// Wire a vault with custom configuration.
    pub fn with_config(config: VaultConfig) -> Self {
        let seed = MasterSeed::from_bytes([0x5Eu8; 32]);
        let escrow = Arc::new(MemoryEscrowStore::default());
        let directory = Arc::new(MemoryIdentityDirectory::default());
        let bootstrap = Arc::new(RecordingBootstrap::default());
        let host = Arc::new(RecordingSandboxHost::default());
        let grants = Arc::new(MemoryTrustGrantStore::default());

        let recovery = RecoveryPorts {
            seed: Arc::new(StaticSeedAccess::new(seed.clone())),
            deriver: Arc::new(SoftKeyDeriver::new(&seed)),
            escrow: escrow.clone(),
            directory: directory.clone(),
            bootstrap: bootstrap.clone(),
        };
        let ipc = IpcPorts {
            host: host.clone(),
            grants: grants.clone(),
            policy: Arc::new(PermitAll),
        };

        let vault = build_vault(&config, recovery, ipc).expect("fixture config is valid");

        Self {
            vault,
            seed,
            escrow,
            directory,
            bootstrap,
            host,
            grants,
        }
    }
}

impl Default for TestVault {
    fn default() -> Self {
        Self::new()
    }
}

/// Default fixture configuration.
pub fn default_config() -> VaultConfig {
    VaultConfig {
        vault_uri: VAULT_URI.to_string(),
        apps: AppsConfig {
            user_home: HOME_APP.to_string(),
        },
        ..VaultConfig::default()
    }
}

/// Root-tier context from the embedding page.
pub fn root() -> CapabilityContext {
    CapabilityContext::root("https://page.example")
}

/// Sandboxed-tier context from a hosted dapp.
pub fn sandboxed() -> CapabilityContext {
    CapabilityContext::sandboxed("https://caller.example")
}
