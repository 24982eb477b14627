//! The recovery plugin: handlers and dispatcher integration.

use crate::envelope;
use crate::errors::RecoveryError;
use crate::ports::{EscrowPayload, EscrowRecord, RecoveryPorts};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info};
use vault_crypto::{ecdh_shared_secret, escrow_cipher, hashing, SecretKey};
use vault_dispatch::{HandlerRef, Receiver, VaultHandle};
use vault_types::{keys, CapabilityContext, MasterSeed, RecoveryRequest, ReplyError};

const EXPORT: HandlerRef = HandlerRef::new("recovery.export");
const IMPORT: HandlerRef = HandlerRef::new("recovery.import");
const CREATE: HandlerRef = HandlerRef::new("recovery.create");
const RESTORE: HandlerRef = HandlerRef::new("recovery.restore");

/// Settings the plugin needs beyond its collaborators.
#[derive(Debug, Clone)]
pub struct RecoverySettings {
    /// URI of the user's home application, launched after a successful
    /// restore or import.
    pub home_app: String,
    /// Enrollment kind recorded with `create` (the directory's namespace
    /// for recovery identifiers).
    pub enroll_kind: String,
}

impl Default for RecoverySettings {
    fn default() -> Self {
        Self {
            home_app: String::new(),
            enroll_kind: "uri".to_string(),
        }
    }
}

/// Vault recovery actions provider plugin.
pub struct RecoveryPlugin {
    ports: RecoveryPorts,
    settings: RecoverySettings,
}

impl RecoveryPlugin {
    /// Create the plugin with its collaborators and settings.
    pub fn new(ports: RecoveryPorts, settings: RecoverySettings) -> Self {
        Self { ports, settings }
    }

    /// Debugging escrow: seal the master seed under a fresh bearer key.
    ///
    /// There is no passphrase on this path; whoever holds the returned
    /// auth key can claim the record via `import`, which destroys it.
    async fn export(&self) -> Result<Value, RecoveryError> {
        let seed = self
            .ports
            .seed
            .master_seed()
            .await
            .map_err(|e| RecoveryError::SeedUnavailable(e.to_string()))?;

        let auth_key = SecretKey::generate();
        let auth_public = auth_key.public_key();

        // The revoke key is the auth key's shared secret with itself, so it
        // stays re-derivable from the bearer secret alone.
        let revoke_key = SecretKey::from_bytes(ecdh_shared_secret(&auth_public, &auth_key))
            .map_err(|e| RecoveryError::Derivation(e.to_string()))?;

        let sealed = escrow_cipher::seal(
            auth_key.as_bytes(),
            hex::encode(seed.as_bytes()).as_bytes(),
        )?;

        info!("Uploading debugging escrow record");
        self.ports
            .escrow
            .store(EscrowRecord {
                auth_public_key: hex::encode(auth_public.to_uncompressed_bytes()),
                revoke_public_key: hex::encode(revoke_key.public_key().to_uncompressed_bytes()),
                payload: EscrowPayload::Symmetric(hex::encode(sealed)),
            })
            .await
            .map_err(|e| RecoveryError::Store(e.to_string()))?;

        Ok(json!({ "authkey": hex::encode(auth_key.as_bytes()) }))
    }

    /// Claim a debugging escrow with its bearer key.
    ///
    /// The record is deleted only after identity reinitialization
    /// succeeds, so a failed import leaves the escrow intact.
    async fn import(&self, key_hex: &str) -> Result<Value, RecoveryError> {
        let key_bytes: [u8; 32] = hex::decode(key_hex)
            .ok()
            .and_then(|b| b.try_into().ok())
            .ok_or(RecoveryError::Decrypt)?;
        let auth_key = SecretKey::from_bytes(key_bytes).map_err(|_| RecoveryError::Decrypt)?;
        let auth_public_hex = hex::encode(auth_key.public_key().to_uncompressed_bytes());

        let record = self
            .ports
            .escrow
            .fetch(&auth_public_hex)
            .await
            .map_err(|e| RecoveryError::Store(e.to_string()))?
            .ok_or(RecoveryError::RecordNotFound)?;

        let EscrowPayload::Symmetric(blob_hex) = record.payload else {
            // A production record cannot be opened through the debugging path.
            return Err(RecoveryError::Decrypt);
        };

        let blob = hex::decode(blob_hex).map_err(|_| RecoveryError::Decrypt)?;
        let seed_hex =
            escrow_cipher::open(auth_key.as_bytes(), &blob).map_err(|_| RecoveryError::Decrypt)?;
        let seed_bytes = hex::decode(seed_hex).map_err(|_| RecoveryError::Decrypt)?;
        let seed = MasterSeed::from_slice(&seed_bytes).map_err(|_| RecoveryError::Decrypt)?;

        self.ports
            .bootstrap
            .init_identity(seed)
            .await
            .map_err(|e| RecoveryError::IdentityInit(e.to_string()))?;

        // Identity is live; burn the record so the bearer key is single-use.
        self.ports
            .escrow
            .delete(&auth_public_hex)
            .await
            .map_err(|e| RecoveryError::Store(e.to_string()))?;

        self.ports
            .bootstrap
            .launch(&self.settings.home_app)
            .await
            .map_err(|e| RecoveryError::IdentityInit(e.to_string()))?;

        Ok(json!({ "ok": true }))
    }

    /// Production escrow against caller-supplied key material.
    async fn create(&self, id: &str, key_hex: &str) -> Result<Value, RecoveryError> {
        let seed = self
            .ports
            .seed
            .master_seed()
            .await
            .map_err(|e| RecoveryError::SeedUnavailable(e.to_string()))?;

        let key_bytes = hex::decode(key_hex).map_err(|_| RecoveryError::KeyMaterial)?;
        if key_bytes.len() < 32 {
            return Err(RecoveryError::KeyMaterial);
        }
        let enc_key =
            SecretKey::from_slice(&key_bytes[..32]).map_err(|_| RecoveryError::KeyMaterial)?;
        let enc_public = enc_key.public_key();

        let auth_key = SecretKey::generate();
        let auth_public = auth_key.public_key();

        // Revocation authority binds to both the root secret and the chosen
        // id: a sub-key of a path derived from a domain-separated hash.
        let revoke_hash = hashing::sha256(format!("recovery/{id}").as_bytes());
        let revoke_node = self
            .ports
            .deriver
            .derive(&revoke_hash)
            .await
            .map_err(|e| RecoveryError::Derivation(e.to_string()))?
            .derive("m/0")
            .await
            .map_err(|e| RecoveryError::Derivation(e.to_string()))?;
        let revoke_public = revoke_node.public_key();

        let cipher = vault_crypto::ecies::encrypt(&enc_public, seed.as_bytes())?;

        info!(id, "Uploading recovery data");
        self.ports
            .escrow
            .store(EscrowRecord {
                auth_public_key: hex::encode(auth_public.to_uncompressed_bytes()),
                revoke_public_key: hex::encode(revoke_public.to_uncompressed_bytes()),
                payload: EscrowPayload::Asymmetric(envelope::to_wire(&cipher)),
            })
            .await
            .map_err(|e| RecoveryError::Store(e.to_string()))?;

        self.ports
            .directory
            .enroll(
                &self.settings.enroll_kind,
                id,
                &hex::encode(enc_public.to_uncompressed_bytes()),
            )
            .await
            .map_err(|e| RecoveryError::Enrollment(e.to_string()))?;

        Ok(json!({ "authkey": hex::encode(auth_key.as_bytes()) }))
    }

    /// Reconstruct the identity from an escrowed envelope.
    async fn restore(
        &self,
        key_hex: &str,
        wire: &vault_types::RecoveryEnvelope,
    ) -> Result<Value, RecoveryError> {
        let key_bytes = hex::decode(key_hex).map_err(|_| RecoveryError::Decrypt)?;
        if key_bytes.len() < 32 {
            return Err(RecoveryError::Decrypt);
        }
        let enc_key =
            SecretKey::from_slice(&key_bytes[..32]).map_err(|_| RecoveryError::Decrypt)?;

        let cipher = envelope::from_wire(wire)?;
        let plaintext =
            vault_crypto::ecies::decrypt(&enc_key, &cipher).map_err(|_| RecoveryError::Decrypt)?;
        let seed = MasterSeed::from_slice(&plaintext).map_err(|_| RecoveryError::Decrypt)?;

        self.ports
            .bootstrap
            .init_identity(seed)
            .await
            .map_err(|e| RecoveryError::IdentityInit(e.to_string()))?;

        self.ports
            .bootstrap
            .launch(&self.settings.home_app)
            .await
            .map_err(|e| RecoveryError::IdentityInit(e.to_string()))?;

        Ok(json!({ "ok": true }))
    }
}

#[async_trait]
impl Receiver for RecoveryPlugin {
    fn name(&self) -> &'static str {
        "recovery"
    }

    fn install(&self, vault: &VaultHandle) {
        debug!(vault_uri = vault.vault_uri(), "Recovery plugin installed");
    }

    fn route(&self, context: &CapabilityContext, message: &Value) -> Option<HandlerRef> {
        if !context.is_root() {
            return None;
        }
        let recovery = message.get(keys::RECOVERY)?;

        if recovery.get("export").is_some() {
            return Some(EXPORT);
        }
        if recovery.get("import").is_some() {
            return Some(IMPORT);
        }
        if recovery.get("create").is_some() {
            return Some(CREATE);
        }
        if recovery.get("restore").is_some() {
            return Some(RESTORE);
        }
        None
    }

    async fn invoke(
        &self,
        _handler: HandlerRef,
        _context: &CapabilityContext,
        message: &Value,
    ) -> Result<Value, ReplyError> {
        let body = message
            .get(keys::RECOVERY)
            .ok_or_else(|| ReplyError::malformed("missing recovery body"))?;
        let request: RecoveryRequest =
            serde_json::from_value(body.clone()).map_err(ReplyError::malformed)?;

        let result = match &request {
            RecoveryRequest::Export {} => self.export().await,
            RecoveryRequest::Import { key } => self.import(key).await,
            RecoveryRequest::Create { id, key } => self.create(id, key).await,
            RecoveryRequest::Restore { key, recovery } => self.restore(key, recovery).await,
        };

        result.map_err(ReplyError::from)
    }
}
