//! # Dispatch Flows
//!
//! Routing behavior of the wired vault: capability scoping, probe order,
//! and the ignore-unknown-protocol policy.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{root, sandboxed, TestVault};
    use serde_json::json;

    #[tokio::test]
    async fn test_unknown_envelope_produces_no_reply() {
        let fix = TestVault::new();

        // Shapes other vault components own (storage, versioning) fall
        // through every receiver without error.
        for message in [
            json!({ "version": {} }),
            json!({ "store.set": { "key": "k", "value": "v" } }),
            json!({ "login": null }),
            json!("not even an object"),
        ] {
            assert!(fix.vault.dispatch(&root(), &message).await.is_none());
            assert!(fix.vault.dispatch(&sandboxed(), &message).await.is_none());
        }
    }

    #[tokio::test]
    async fn test_unknown_recovery_operation_is_dropped() {
        let fix = TestVault::new();

        // A recovery envelope with an unrecognized operation matches no
        // handler; protocol evolution must not break old vaults.
        let reply = fix
            .vault
            .dispatch(&root(), &json!({ "recovery": { "rotate": {} } }))
            .await;
        assert!(reply.is_none());
    }

    #[tokio::test]
    async fn test_trust_tier_scopes_handlers() {
        let fix = TestVault::new();

        // Same message, different channel tiers: recovery answers only on
        // root channels.
        let message = json!({ "recovery": { "export": {} } });
        assert!(fix.vault.dispatch(&sandboxed(), &message).await.is_none());
        assert!(fix.vault.dispatch(&root(), &message).await.is_some());
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected_not_dropped() {
        let fix = TestVault::new();

        // The shape routes (a `create` key exists) but the body is missing
        // required fields: the caller gets a rejection, not silence.
        let reply = fix
            .vault
            .dispatch(&root(), &json!({ "recovery": { "create": { "id": 7 } } }))
            .await
            .expect("envelope shape is recognized")
            .expect_err("body fails validation");

        assert_eq!(reply.code, vault_types::codes::MALFORMED_REQUEST);
    }

    #[tokio::test]
    async fn test_handler_rejection_does_not_wedge_dispatcher() {
        let fix = TestVault::new();

        let bad = json!({ "IPCRouterRequest": {
            "target": "https://nowhere.example/#", "payload": { "call": "ping" },
        }});
        for _ in 0..3 {
            let reply = fix
                .vault
                .dispatch(&sandboxed(), &bad)
                .await
                .unwrap()
                .unwrap_err();
            assert_eq!(reply.code, vault_types::codes::IPC_UNKNOWN_TARGET);
        }

        // A well-formed message still gets through afterwards.
        assert!(fix
            .vault
            .dispatch(
                &root(),
                &json!({ "DappConnectRequest": { "from": "a", "to": "b" } })
            )
            .await
            .unwrap()
            .is_ok());
    }
}
