//! In-memory collaborator implementations.

use crate::ports::{
    EscrowRecord, EscrowStore, IdentityBootstrap, IdentityDirectory, MasterSeedAccess, PortError,
};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use vault_types::{MasterSeed, MASTER_SEED_LEN};

/// Seed access backed by a fixed in-memory seed.
pub struct StaticSeedAccess {
    seed: MasterSeed,
}

impl StaticSeedAccess {
    /// Wrap a seed.
    pub fn new(seed: MasterSeed) -> Self {
        Self { seed }
    }
}

#[async_trait]
impl MasterSeedAccess for StaticSeedAccess {
    async fn master_seed(&self) -> Result<MasterSeed, PortError> {
        Ok(self.seed.clone())
    }
}

/// Escrow store backed by a vector, insertion-ordered.
#[derive(Default)]
pub struct MemoryEscrowStore {
    records: RwLock<Vec<EscrowRecord>>,
}

impl MemoryEscrowStore {
    /// Snapshot of all records, in insertion order.
    pub fn records(&self) -> Vec<EscrowRecord> {
        self.records.read().clone()
    }
}

#[async_trait]
impl EscrowStore for MemoryEscrowStore {
    async fn store(&self, record: EscrowRecord) -> Result<(), PortError> {
        let mut records = self.records.write();
        records.retain(|r| r.auth_public_key != record.auth_public_key);
        records.push(record);
        Ok(())
    }

    async fn fetch(&self, auth_public_key: &str) -> Result<Option<EscrowRecord>, PortError> {
        Ok(self
            .records
            .read()
            .iter()
            .find(|r| r.auth_public_key == auth_public_key)
            .cloned())
    }

    async fn delete(&self, auth_public_key: &str) -> Result<(), PortError> {
        self.records
            .write()
            .retain(|r| r.auth_public_key != auth_public_key);
        Ok(())
    }
}

/// Enrollment directory backed by a vector of `(kind, id, key)` rows.
#[derive(Default)]
pub struct MemoryIdentityDirectory {
    entries: RwLock<Vec<(String, String, String)>>,
}

impl MemoryIdentityDirectory {
    /// The enrolled key for `(kind, id)`, most recent wins.
    pub fn lookup(&self, kind: &str, id: &str) -> Option<String> {
        self.entries
            .read()
            .iter()
            .rev()
            .find(|(k, i, _)| k == kind && i == id)
            .map(|(_, _, key)| key.clone())
    }
}

#[async_trait]
impl IdentityDirectory for MemoryIdentityDirectory {
    async fn enroll(
        &self,
        kind: &str,
        id: &str,
        enc_public_key_hex: &str,
    ) -> Result<(), PortError> {
        self.entries.write().push((
            kind.to_string(),
            id.to_string(),
            enc_public_key_hex.to_string(),
        ));
        Ok(())
    }
}

/// Bootstrap collaborator that records calls instead of acting on them.
///
/// Can be primed to fail identity initialization, for exercising the
/// `IdentityInit` failure path.
#[derive(Default)]
pub struct RecordingBootstrap {
    initialized: Mutex<Vec<[u8; MASTER_SEED_LEN]>>,
    launched: Mutex<Vec<String>>,
    fail_init: AtomicBool,
}

impl RecordingBootstrap {
    /// Seeds passed to `init_identity`, in call order.
    pub fn initialized(&self) -> Vec<[u8; MASTER_SEED_LEN]> {
        self.initialized.lock().clone()
    }

    /// URIs passed to `launch`, in call order.
    pub fn launches(&self) -> Vec<String> {
        self.launched.lock().clone()
    }

    /// Make subsequent `init_identity` calls fail (or succeed again).
    pub fn fail_init(&self, fail: bool) {
        self.fail_init.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl IdentityBootstrap for RecordingBootstrap {
    async fn init_identity(&self, seed: MasterSeed) -> Result<(), PortError> {
        if self.fail_init.load(Ordering::SeqCst) {
            return Err(PortError::new("identity storage rejected the seed"));
        }
        self.initialized.lock().push(*seed.as_bytes());
        Ok(())
    }

    async fn launch(&self, uri: &str) -> Result<(), PortError> {
        self.launched.lock().push(uri.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::EscrowPayload;

    fn record(auth: &str) -> EscrowRecord {
        EscrowRecord {
            auth_public_key: auth.to_string(),
            revoke_public_key: "revoke".to_string(),
            payload: EscrowPayload::Symmetric("blob".to_string()),
        }
    }

    #[tokio::test]
    async fn test_store_replaces_same_auth_key() {
        let store = MemoryEscrowStore::default();
        store.store(record("a")).await.unwrap();
        store.store(record("a")).await.unwrap();
        assert_eq!(store.records().len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_and_delete() {
        let store = MemoryEscrowStore::default();
        store.store(record("a")).await.unwrap();

        assert!(store.fetch("a").await.unwrap().is_some());
        assert!(store.fetch("b").await.unwrap().is_none());

        store.delete("a").await.unwrap();
        assert!(store.fetch("a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_directory_latest_enrollment_wins() {
        let directory = MemoryIdentityDirectory::default();
        directory.enroll("uri", "id", "old").await.unwrap();
        directory.enroll("uri", "id", "new").await.unwrap();
        assert_eq!(directory.lookup("uri", "id").as_deref(), Some("new"));
        assert_eq!(directory.lookup("uri", "other"), None);
    }
}
