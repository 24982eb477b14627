//! # Recovery Escrow Flows
//!
//! The escrow protocol end to end through the wired vault: create/restore
//! round-trips, tamper rejection, export/import symmetry, and the trust
//! boundary on the recovery envelope.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{root, sandboxed, TestVault, HOME_APP};
    use serde_json::{json, Value};
    use vault_crypto::SecretKey;
    use vault_recovery::EscrowPayload;
    use vault_types::codes;

    async fn dispatch(vault: &TestVault, body: Value) -> Option<Result<Value, vault_types::ReplyError>> {
        vault.vault.dispatch(&root(), &json!({ "recovery": body })).await
    }

    #[tokio::test]
    async fn test_create_restore_recovers_master_seed() {
        let fix = TestVault::new();
        let enc_key = SecretKey::generate();

        let reply = dispatch(
            &fix,
            json!({ "create": { "id": "my laptop", "key": hex::encode(enc_key.as_bytes()) } }),
        )
        .await
        .expect("recovery envelope is routed")
        .expect("create succeeds");

        let auth_key = reply["authkey"].as_str().expect("authkey returned");
        assert_eq!(auth_key.len(), 64);

        let EscrowPayload::Asymmetric(wire) = fix.escrow.records()[0].payload.clone() else {
            panic!("create stores an asymmetric envelope");
        };

        dispatch(
            &fix,
            json!({ "restore": {
                "key": hex::encode(enc_key.as_bytes()),
                "recovery": serde_json::to_value(&wire).unwrap(),
            }}),
        )
        .await
        .expect("routed")
        .expect("restore succeeds");

        assert_eq!(fix.bootstrap.initialized(), vec![*fix.seed.as_bytes()]);
        assert_eq!(fix.bootstrap.launches(), vec![HOME_APP]);
    }

    #[tokio::test]
    async fn test_restore_rejects_wrong_key_without_state_change() {
        let fix = TestVault::new();
        let enc_key = SecretKey::generate();

        dispatch(
            &fix,
            json!({ "create": { "id": "a", "key": hex::encode(enc_key.as_bytes()) } }),
        )
        .await
        .unwrap()
        .unwrap();
        let EscrowPayload::Asymmetric(wire) = fix.escrow.records()[0].payload.clone() else {
            panic!("create stores an asymmetric envelope");
        };

        let reply = dispatch(
            &fix,
            json!({ "restore": {
                "key": hex::encode(SecretKey::generate().as_bytes()),
                "recovery": serde_json::to_value(&wire).unwrap(),
            }}),
        )
        .await
        .unwrap()
        .unwrap_err();

        assert_eq!(reply.code, codes::RECOVERY_DECRYPT);
        assert!(fix.bootstrap.initialized().is_empty());
        assert!(fix.bootstrap.launches().is_empty());
    }

    #[tokio::test]
    async fn test_restore_rejects_bit_flipped_mac() {
        let fix = TestVault::new();
        let enc_key = SecretKey::generate();

        dispatch(
            &fix,
            json!({ "create": { "id": "a", "key": hex::encode(enc_key.as_bytes()) } }),
        )
        .await
        .unwrap()
        .unwrap();
        let EscrowPayload::Asymmetric(mut wire) = fix.escrow.records()[0].payload.clone() else {
            panic!("create stores an asymmetric envelope");
        };

        // Flip one nibble of the MAC field.
        let flipped = if wire.mac.starts_with('0') { "1" } else { "0" };
        wire.mac.replace_range(0..1, flipped);

        let reply = dispatch(
            &fix,
            json!({ "restore": {
                "key": hex::encode(enc_key.as_bytes()),
                "recovery": serde_json::to_value(&wire).unwrap(),
            }}),
        )
        .await
        .unwrap()
        .unwrap_err();

        assert_eq!(reply.code, codes::RECOVERY_DECRYPT);
        assert!(fix.bootstrap.initialized().is_empty());
    }

    #[tokio::test]
    async fn test_authkeys_are_fresh_and_revoke_keys_deterministic() {
        let fix = TestVault::new();
        let enc_key_hex = hex::encode(SecretKey::generate().as_bytes());

        let mut auth_keys = Vec::new();
        for _ in 0..2 {
            let reply = dispatch(
                &fix,
                json!({ "create": { "id": "same id", "key": enc_key_hex.as_str() } }),
            )
            .await
            .unwrap()
            .unwrap();
            auth_keys.push(reply["authkey"].as_str().unwrap().to_string());
        }

        assert_ne!(auth_keys[0], auth_keys[1], "auth keys never repeat");

        let records = fix.escrow.records();
        assert_eq!(
            records[0].revoke_public_key, records[1].revoke_public_key,
            "same id and seed derive the same revoke key"
        );
    }

    #[tokio::test]
    async fn test_export_import_roundtrip_burns_record() {
        let fix = TestVault::new();

        let reply = dispatch(&fix, json!({ "export": {} }))
            .await
            .unwrap()
            .unwrap();
        let auth_key = reply["authkey"].as_str().unwrap().to_string();
        assert_eq!(fix.escrow.records().len(), 1);

        dispatch(&fix, json!({ "import": { "key": auth_key.clone() } }))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(fix.bootstrap.initialized(), vec![*fix.seed.as_bytes()]);
        assert_eq!(fix.bootstrap.launches(), vec![HOME_APP]);
        assert!(fix.escrow.records().is_empty(), "record is single-use");

        let reply = dispatch(&fix, json!({ "import": { "key": auth_key } }))
            .await
            .unwrap()
            .unwrap_err();
        assert_eq!(reply.code, codes::RECOVERY_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_recovery_unreachable_from_sandboxed_channel() {
        let fix = TestVault::new();

        let reply = fix
            .vault
            .dispatch(&sandboxed(), &json!({ "recovery": { "export": {} } }))
            .await;

        assert!(
            reply.is_none(),
            "recovery envelopes on sandboxed channels match no receiver"
        );
        assert!(fix.escrow.records().is_empty());
    }

    #[tokio::test]
    async fn test_create_enrolls_recovery_id() {
        let fix = TestVault::new();
        let enc_key = SecretKey::generate();

        dispatch(
            &fix,
            json!({ "create": { "id": "my phone", "key": hex::encode(enc_key.as_bytes()) } }),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(
            fix.directory.lookup("uri", "my phone").as_deref(),
            Some(hex::encode(enc_key.public_key().to_uncompressed_bytes()).as_str())
        );
    }
}
