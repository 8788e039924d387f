//! Dispatch Types
//!
//! The outgoing payload and the aggregate outcome of a send.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DeliveryFailureReason;

/// Body posted to every webhook endpoint.
///
/// Discord accepts a bare `content` field; no embeds or attachments are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMessage {
    pub content: String,
}

impl WebhookMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// One target that could not be reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryFailure {
    pub target_id: Uuid,
    pub target_name: String,
    pub reason: DeliveryFailureReason,
}

/// Aggregate outcome of a send.
///
/// Failures are kept in the order the targets were listed when the send began.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchResult {
    /// Every addressed target accepted the message.
    Delivered { attempted: usize },
    /// At least one target accepted and at least one failed.
    PartiallyDelivered {
        attempted: usize,
        failures: Vec<DeliveryFailure>,
    },
    /// No addressed target accepted the message.
    TotallyFailed { failures: Vec<DeliveryFailure> },
}

impl DispatchResult {
    /// Classify the failures collected from `attempted` deliveries.
    pub fn from_failures(attempted: usize, failures: Vec<DeliveryFailure>) -> Self {
        if failures.is_empty() {
            Self::Delivered { attempted }
        } else if failures.len() >= attempted {
            Self::TotallyFailed { failures }
        } else {
            Self::PartiallyDelivered {
                attempted,
                failures,
            }
        }
    }

    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }

    /// Number of targets the send addressed.
    pub fn attempted(&self) -> usize {
        match self {
            Self::Delivered { attempted } | Self::PartiallyDelivered { attempted, .. } => {
                *attempted
            }
            Self::TotallyFailed { failures } => failures.len(),
        }
    }

    /// Number of targets that accepted the message.
    pub fn delivered(&self) -> usize {
        self.attempted().saturating_sub(self.failures().len())
    }

    pub fn failures(&self) -> &[DeliveryFailure] {
        match self {
            Self::Delivered { .. } => &[],
            Self::PartiallyDelivered { failures, .. } | Self::TotallyFailed { failures } => {
                failures
            }
        }
    }

    /// Human-readable description, one failing target per line.
    pub fn summary(&self) -> String {
        let (header, failures) = match self {
            Self::Delivered { attempted: 1 } => {
                return "Message delivered to 1 webhook".to_string();
            }
            Self::Delivered { attempted } => {
                return format!("Message delivered to {attempted} webhooks");
            }
            Self::PartiallyDelivered { failures, .. } => ("Some webhooks failed:", failures),
            Self::TotallyFailed { failures } => ("All webhooks failed:", failures),
        };

        let lines = failures
            .iter()
            .map(|f| format!("{}: {}", f.target_name, f.reason))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{header}\n{lines}")
    }
}
