//! Transport seam to the render service.
//!
//! The backend only ever issues [`RpcRequest`]s through this trait; the
//! concrete transport (websocket, in-process test double) lives behind it.

use serde_json::Value;

use crate::protocol::RpcRequest;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The connection failed or dropped mid-call.
    Transport(String),
    /// The service answered with an application-level error.
    Remote { code: i64, message: String },
    /// The service answered, but not with the shape this build expects.
    Decode(String),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Transport(msg) => write!(f, "session transport failed: {msg}"),
            SessionError::Remote { code, message } => {
                write!(f, "render service error {code}: {message}")
            }
            SessionError::Decode(msg) => write!(f, "render service reply invalid: {msg}"),
        }
    }
}

impl std::error::Error for SessionError {}

#[allow(async_fn_in_trait)]
pub trait RemoteSession {
    /// Sends one request and waits for its reply.
    async fn call(&mut self, request: &RpcRequest) -> Result<Value, SessionError>;
}
