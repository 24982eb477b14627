//! # Identity Vault Test Suite
//!
//! Unified test crate containing cross-crate integration flows:
//!
//! ```text
//! tests/src/integration/
//! ├── recovery_flows.rs   # escrow round-trips through the wired vault
//! ├── ipc_flows.rs        # init / forward / callback choreography
//! └── dispatch_flows.rs   # routing, trust tiers, fall-through
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p vault-tests
//! cargo test -p vault-tests integration::recovery_flows::
//! ```

#![allow(dead_code)]

pub mod integration;
