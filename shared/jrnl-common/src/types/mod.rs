//! Shared Types

pub mod dispatch;
pub mod target;

pub use dispatch::{DeliveryFailure, DispatchResult, WebhookMessage};
pub use target::WebhookTarget;
