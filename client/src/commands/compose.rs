//! Compose Commands

use jrnl_common::DispatchResult;
use serde::Serialize;
use tracing::{debug, error};
use uuid::Uuid;

use crate::AppState;

/// Outcome of a send, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct SendResponse {
    pub result: DispatchResult,
    pub summary: String,
}

impl From<DispatchResult> for SendResponse {
    fn from(result: DispatchResult) -> Self {
        let summary = result.summary();
        Self { result, summary }
    }
}

/// Send a message to one target, or to all targets when `target` is `None`.
pub async fn send_message(
    state: &AppState,
    content: String,
    target: Option<Uuid>,
) -> Result<SendResponse, String> {
    debug!(broadcast = target.is_none(), "Sending message");

    let result = state
        .dispatcher
        .send(&content, target)
        .await
        .map_err(|e| {
            error!("Failed to send message: {}", e);
            e.to_string()
        })?;

    Ok(result.into())
}

/// Send a message to whatever the composer currently has selected.
pub async fn send_to_selection(state: &AppState, content: String) -> Result<SendResponse, String> {
    let target = state.selection.lock().await.selected();
    send_message(state, content, target).await
}
