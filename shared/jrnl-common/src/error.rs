//! Dispatch Errors
//!
//! Two layers: [`DispatchError`] aborts a send before any request is made,
//! [`DeliveryFailureReason`] describes why a single target was not reached and
//! is always collected into a [`crate::DispatchResult`] instead of returned.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Pre-flight errors that abort a send with no side effects.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Message was blank after trimming.
    #[error("Message is empty")]
    EmptyMessage,

    /// The registry holds no targets.
    #[error("No Discord webhooks configured")]
    NoTargetsConfigured,

    /// The requested target id is not in the registry.
    #[error("Selected webhook not found")]
    TargetNotFound(Uuid),

    /// The payload could not be serialized.
    #[error("Failed to encode message: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Dispatch result type.
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Why delivery to one target failed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DeliveryFailureReason {
    /// Endpoint is not an absolute `http`/`https` URL.
    #[error("Invalid webhook URL")]
    InvalidEndpoint,

    /// Connection, DNS, or timeout failure.
    #[error("Connection failed: {0}")]
    TransportError(String),

    /// Endpoint answered with a non-2xx status.
    #[error("HTTP error: {0}")]
    HttpStatus(u16),

    /// Endpoint answered with something that is not a usable HTTP response.
    #[error("Invalid response from webhook endpoint")]
    InvalidResponse,
}
