//! `jrnl` Common Library
//!
//! Webhook targets, the outgoing message payload, and dispatch outcomes shared
//! by the registry, the dispatch engine, and whatever presents them.

pub mod error;
pub mod types;

pub use error::{DeliveryFailureReason, DispatchError, Result};
pub use types::*;
