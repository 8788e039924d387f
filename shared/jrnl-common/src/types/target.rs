//! Webhook Target Types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A configured webhook endpoint with a display name.
///
/// The serialized form (`{ "id", "name", "endpoint" }`) is also the persisted
/// form, so field names must stay stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookTarget {
    /// Stable identifier, assigned once at creation.
    pub id: Uuid,
    /// Display label, usually the channel name.
    pub name: String,
    /// Delivery URL. Only checked when sending.
    pub endpoint: String,
}

impl WebhookTarget {
    /// Create a target with a fresh id.
    pub fn new(name: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            endpoint: endpoint.into(),
        }
    }
}
