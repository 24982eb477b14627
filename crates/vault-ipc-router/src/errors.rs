//! IPC router errors and their wire-level mapping.

use thiserror::Error;
use vault_types::{codes, ReplyError};

/// Failures of the call-forwarding protocol.
#[derive(Debug, Error)]
pub enum IpcRouterError {
    /// A forwarded call addressed a target with no live context.
    #[error("no sandboxed context for target {0}")]
    UnknownTarget(String),

    /// A forwarded call outlived the configured reply deadline.
    #[error("reply deadline elapsed for {0}")]
    Timeout(String),

    /// The launch policy denied context creation for this caller.
    #[error("context launch not permitted; re-authenticate at {reauth_uri}")]
    NotPermitted {
        /// Where the caller should be sent to re-authenticate.
        reauth_uri: String,
    },

    /// The request named no usable target.
    #[error("malformed router request: {0}")]
    BadRequest(String),

    /// A waiting caller's reply channel was dropped.
    #[error("reply channel closed for {0}")]
    ChannelClosed(String),

    /// The sandbox host failed to create or post into a context.
    #[error("sandbox host failure: {0}")]
    Host(String),

    /// The trust grant store or launch policy failed.
    #[error("trust grant failure: {0}")]
    Grants(String),
}

impl From<IpcRouterError> for ReplyError {
    fn from(err: IpcRouterError) -> Self {
        let code = match &err {
            IpcRouterError::UnknownTarget(_) => codes::IPC_UNKNOWN_TARGET,
            IpcRouterError::Timeout(_) => codes::IPC_TIMEOUT,
            IpcRouterError::NotPermitted { .. } => codes::IPC_NOT_PERMITTED,
            IpcRouterError::BadRequest(_) => codes::MALFORMED_REQUEST,
            IpcRouterError::ChannelClosed(_)
            | IpcRouterError::Host(_)
            | IpcRouterError::Grants(_) => codes::INTERNAL,
        };
        ReplyError::new(code, err.to_string())
    }
}
