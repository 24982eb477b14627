//! Pending-call table: correlation ids to parked callers.
//!
//! Every forwarded call parks its caller here under a correlation id;
//! the matching callback wakes exactly that caller. Readiness signals use
//! the same table under `init-<target>` keys.

use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::debug;

struct PendingCall {
    sender: oneshot::Sender<Value>,
    registered_at: Instant,
}

/// Table statistics, for diagnostics.
#[derive(Debug, Default)]
pub struct PendingStats {
    /// Calls registered over the table's lifetime.
    pub registered: AtomicU64,
    /// Calls completed by a matching callback.
    pub completed: AtomicU64,
    /// Callbacks dropped for stale or unknown ids.
    pub stale_dropped: AtomicU64,
}

/// Map of outstanding correlation ids to their parked callers.
#[derive(Default)]
pub struct PendingCallStore {
    pending: DashMap<String, PendingCall>,
    stats: PendingStats,
}

impl PendingCallStore {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a caller under `id` and return the receiver it waits on.
    ///
    /// Re-registering an id replaces the previous entry; the replaced
    /// caller's receiver resolves as closed.
    pub fn register(&self, id: impl Into<String>) -> oneshot::Receiver<Value> {
        let id = id.into();
        let (tx, rx) = oneshot::channel();
        self.pending.insert(
            id.clone(),
            PendingCall {
                sender: tx,
                registered_at: Instant::now(),
            },
        );
        self.stats.registered.fetch_add(1, Ordering::Relaxed);
        debug!(callback = %id, "Registered pending call");
        rx
    }

    /// Wake the caller parked under `id` with `result`.
    ///
    /// Returns `false` for a stale or unknown id: duplicate and late
    /// replies are dropped without waking anyone.
    pub fn complete(&self, id: &str, result: Value) -> bool {
        let Some((_, call)) = self.pending.remove(id) else {
            self.stats.stale_dropped.fetch_add(1, Ordering::Relaxed);
            debug!(callback = %id, "Callback for stale or unknown id, dropping");
            return false;
        };

        let waited = call.registered_at.elapsed();
        if call.sender.send(result).is_ok() {
            self.stats.completed.fetch_add(1, Ordering::Relaxed);
            debug!(callback = %id, waited_ms = waited.as_millis(), "Completed pending call");
            true
        } else {
            // Caller gave up (timeout raced the callback).
            self.stats.stale_dropped.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Withdraw the entry for `id`, if any.
    pub fn cancel(&self, id: &str) -> bool {
        self.pending.remove(id).is_some()
    }

    /// Number of callers currently parked.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Lifetime statistics.
    pub fn stats(&self) -> &PendingStats {
        &self.stats
    }
}
