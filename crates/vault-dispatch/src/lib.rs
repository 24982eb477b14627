//! # Vault Dispatch - Capability-Scoped Message Dispatcher
//!
//! Routes inbound messages to pluggable receivers based on the trust tier
//! of the channel they arrived on.
//!
//! ## Contract
//!
//! - Receivers are probed in registration order; the first whose `route`
//!   returns a handler wins, and exactly that one handler runs.
//! - `route` is a pure predicate + selector. It may be called for
//!   messages a receiver will never handle and must have no side effects.
//! - A message no receiver claims is logged and dropped without a reply.
//!   This is deliberate protocol-evolution tolerance, not a failure.
//! - Handler failures come back as rejected replies to the original
//!   sender; they never tear down the dispatcher or block later messages.

pub mod dispatcher;
pub mod receiver;

pub use dispatcher::{Dispatcher, VaultHandle};
pub use receiver::{HandlerRef, Receiver};
