//! In-memory collaborator implementations.

use crate::ports::{PortError, SandboxChannel, SandboxHost, SandboxRequest, TrustGrantStore};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Trust grant store backed by a map of `target -> granted origins`.
#[derive(Default)]
pub struct MemoryTrustGrantStore {
    grants: RwLock<HashMap<String, HashSet<String>>>,
}

#[async_trait]
impl TrustGrantStore for MemoryTrustGrantStore {
    async fn grant(&self, from: &str, to: &str) -> Result<(), PortError> {
        self.grants
            .write()
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string());
        Ok(())
    }

    async fn granted(&self, from: &str, to: &str) -> Result<bool, PortError> {
        Ok(self
            .grants
            .read()
            .get(to)
            .is_some_and(|origins| origins.contains(from)))
    }
}

/// Sandbox channel that records every posted payload.
pub struct RecordingChannel {
    posted: Mutex<Vec<Value>>,
}

impl RecordingChannel {
    fn new() -> Self {
        Self {
            posted: Mutex::new(Vec::new()),
        }
    }

    /// Payloads posted into this context, in order.
    pub fn posted(&self) -> Vec<Value> {
        self.posted.lock().clone()
    }
}

#[async_trait]
impl SandboxChannel for RecordingChannel {
    async fn post(&self, payload: Value) -> Result<(), PortError> {
        self.posted.lock().push(payload);
        Ok(())
    }
}

/// Sandbox host that records created contexts instead of spawning them.
#[derive(Default)]
pub struct RecordingSandboxHost {
    created: Mutex<Vec<SandboxRequest>>,
    channels: Mutex<HashMap<String, Arc<RecordingChannel>>>,
}

impl RecordingSandboxHost {
    /// Creation requests seen so far, in order.
    pub fn created(&self) -> Vec<SandboxRequest> {
        self.created.lock().clone()
    }

    /// The channel created for `target`, if any.
    pub fn channel(&self, target: &str) -> Option<Arc<RecordingChannel>> {
        self.channels.lock().get(target).cloned()
    }
}

#[async_trait]
impl SandboxHost for RecordingSandboxHost {
    async fn create(&self, request: SandboxRequest) -> Result<Arc<dyn SandboxChannel>, PortError> {
        let channel = Arc::new(RecordingChannel::new());
        self.channels
            .lock()
            .insert(request.target.clone(), channel.clone());
        self.created.lock().push(request);
        Ok(channel)
    }
}
