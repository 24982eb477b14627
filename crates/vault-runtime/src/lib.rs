//! # Vault Runtime - Configuration and Wiring
//!
//! Assembles the vault core: validates configuration, builds the
//! dispatcher, installs the recovery and IPC router plugins, and exposes
//! the single `dispatch` entry point the transport layer feeds inbound
//! messages into.

pub mod config;
pub mod telemetry;
pub mod wiring;

pub use config::{AppsConfig, ConfigError, IpcConfig, RecoveryConfig, VaultConfig};
pub use wiring::{build_vault, Vault};
