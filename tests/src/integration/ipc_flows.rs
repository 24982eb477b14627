//! # IPC Router Flows
//!
//! The init / forward / callback choreography end to end through the
//! wired vault, including the whitelist-building connect flow.

#[cfg(test)]
mod tests {
    use crate::integration::fixtures::{root, sandboxed, TestVault};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;
    use vault_ipc_router::TrustGrantStore;
    use vault_types::{codes, CapabilityContext, ReplyError};

    const TARGET: &str = "https://app.example/#wallet?tab=send";

    async fn dispatch(
        fix: &TestVault,
        ctx: &CapabilityContext,
        message: Value,
    ) -> Option<Result<Value, ReplyError>> {
        fix.vault.dispatch(ctx, &message).await
    }

    fn init_message() -> Value {
        json!({ "IPCRouterRequest": { "target": TARGET, "payload": { "call": "init" } } })
    }

    fn callback_message(id: &str, result: Value) -> Value {
        json!({ "IPCRouterRequest": { "callback": id, "result": result } })
    }

    async fn wait_until(cond: impl Fn() -> bool) {
        for _ in 0..1000 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("condition not reached");
    }

    /// Drive an init to completion by answering its readiness signal.
    async fn init_ready(fix: &Arc<TestVault>) {
        let vault = fix.clone();
        let task =
            tokio::spawn(async move { dispatch(&vault, &sandboxed(), init_message()).await });

        wait_until(|| !fix.host.created().is_empty()).await;
        dispatch(
            fix,
            &sandboxed(),
            callback_message(&format!("init-{TARGET}"), json!(true)),
        )
        .await
        .unwrap()
        .unwrap();

        task.await.unwrap().unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_full_call_choreography() {
        let fix = Arc::new(TestVault::new());
        init_ready(&fix).await;

        // The child was created with hosting parameters injected.
        let created = fix.host.created();
        assert_eq!(created.len(), 1);
        assert!(created[0].uri.contains("ipc-mode"));

        // Forward a call; the child sees it with correlation id and origin.
        let vault = fix.clone();
        let caller = tokio::spawn(async move {
            dispatch(
                &vault,
                &sandboxed(),
                json!({ "IPCRouterRequest": { "target": TARGET, "payload": { "call": "getAddress" } } }),
            )
            .await
        });

        let channel = fix.host.channel(TARGET).unwrap();
        wait_until(|| !channel.posted().is_empty()).await;

        let posted = channel.posted()[0].clone();
        assert_eq!(posted["call"], "getAddress");
        assert_eq!(posted["origin"], "https://caller.example");
        let id = posted["callback"].as_str().unwrap().to_string();

        // The child replies; the parked caller gets exactly that result.
        dispatch(
            &fix,
            &sandboxed(),
            callback_message(&id, json!({ "address": "0xabc" })),
        )
        .await
        .unwrap()
        .unwrap();

        let reply = caller.await.unwrap().unwrap().unwrap();
        assert_eq!(reply, json!({ "address": "0xabc" }));
    }

    #[tokio::test]
    async fn test_double_init_creates_one_context() {
        let fix = Arc::new(TestVault::new());
        init_ready(&fix).await;

        dispatch(&fix, &sandboxed(), init_message())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(fix.host.created().len(), 1);
    }

    #[tokio::test]
    async fn test_forward_without_init_is_unknown_target() {
        let fix = TestVault::new();

        let reply = dispatch(
            &fix,
            &sandboxed(),
            json!({ "IPCRouterRequest": { "target": TARGET, "payload": { "call": "ping" } } }),
        )
        .await
        .unwrap()
        .unwrap_err();

        assert_eq!(reply.code, codes::IPC_UNKNOWN_TARGET);
    }

    #[tokio::test]
    async fn test_stale_callback_fires_no_continuation() {
        let fix = TestVault::new();

        let reply = dispatch(
            &fix,
            &sandboxed(),
            callback_message("callback-777", json!("too late")),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(reply, Value::Null);
    }

    #[tokio::test]
    async fn test_dapp_connect_records_grant_in_root_mode_only() {
        let fix = TestVault::new();
        let message = json!({ "DappConnectRequest": {
            "from": "https://caller.example", "to": TARGET,
        }});

        // Sandboxed channels cannot build whitelist entries.
        assert!(dispatch(&fix, &sandboxed(), message.clone()).await.is_none());
        assert!(!fix
            .grants
            .granted("https://caller.example", TARGET)
            .await
            .unwrap());

        dispatch(&fix, &root(), message).await.unwrap().unwrap();
        assert!(fix
            .grants
            .granted("https://caller.example", TARGET)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_ipc_router_reachable_from_root_mode() {
        let fix = Arc::new(TestVault::new());

        // Root-tier callers use the same forwarding protocol.
        let vault = fix.clone();
        let task = tokio::spawn(async move { dispatch(&vault, &root(), init_message()).await });

        wait_until(|| !fix.host.created().is_empty()).await;
        dispatch(
            &fix,
            &root(),
            callback_message(&format!("init-{TARGET}"), json!(true)),
        )
        .await
        .unwrap()
        .unwrap();

        task.await.unwrap().unwrap().unwrap();
        assert_eq!(fix.host.created().len(), 1);
    }
}
