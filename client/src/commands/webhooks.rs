//! Webhook Commands
//!
//! Listing, editing, and selecting webhook targets.

use jrnl_common::WebhookTarget;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::AppState;

/// Add request from the settings form.
#[derive(Debug, Deserialize)]
pub struct AddWebhookRequest {
    pub name: String,
    pub endpoint: String,
}

/// Edit request from the settings form. Missing fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateWebhookRequest {
    pub id: Uuid,
    pub name: Option<String>,
    pub endpoint: Option<String>,
}

/// Current composer selection.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionInfo {
    /// Selected target id, `None` when sending to all targets.
    pub selected: Option<Uuid>,
    pub label: String,
}

fn required(value: &str, field: &str) -> Result<String, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(value.to_string())
}

/// List all webhook targets in order.
pub fn get_webhooks(state: &AppState) -> Vec<WebhookTarget> {
    state.store.list()
}

/// Add a webhook target.
pub async fn add_webhook(
    state: &AppState,
    request: AddWebhookRequest,
) -> Result<WebhookTarget, String> {
    let name = required(&request.name, "Channel name")?;
    let endpoint = required(&request.endpoint, "Webhook URL")?;

    let target = state.store.add(name, endpoint);
    info!(webhook_id = %target.id, "Webhook added");

    let mut selection = state.selection.lock().await;
    selection.reconcile(&state.store.list());
    Ok(target)
}

/// Edit a webhook target's name and/or URL.
pub async fn update_webhook(
    state: &AppState,
    request: UpdateWebhookRequest,
) -> Result<WebhookTarget, String> {
    let mut target = state
        .store
        .get(request.id)
        .ok_or_else(|| "Webhook not found".to_string())?;

    if let Some(name) = request.name {
        target.name = required(&name, "Channel name")?;
    }
    if let Some(endpoint) = request.endpoint {
        target.endpoint = required(&endpoint, "Webhook URL")?;
    }

    // A concurrent delete between get and update makes this a no-op.
    if !state.store.update(target.clone()) {
        return Err("Webhook not found".to_string());
    }
    debug!(webhook_id = %target.id, "Webhook updated");
    Ok(target)
}

/// Delete the targets at the given list positions (0-based).
pub async fn delete_webhooks(state: &AppState, positions: Vec<usize>) -> usize {
    let removed = state.store.delete(positions);
    info!(removed, "Webhooks deleted");

    let mut selection = state.selection.lock().await;
    selection.reconcile(&state.store.list());
    removed
}

async fn selection_info(state: &AppState) -> SelectionInfo {
    let targets = state.store.list();
    let selection = state.selection.lock().await;
    SelectionInfo {
        selected: selection.selected(),
        label: selection.label(&targets),
    }
}

pub async fn get_selection(state: &AppState) -> SelectionInfo {
    selection_info(state).await
}

pub async fn select_next_webhook(state: &AppState) -> SelectionInfo {
    let targets = state.store.list();
    state.selection.lock().await.select_next(&targets);
    selection_info(state).await
}

pub async fn select_previous_webhook(state: &AppState) -> SelectionInfo {
    let targets = state.store.list();
    state.selection.lock().await.select_previous(&targets);
    selection_info(state).await
}

/// Select a target by its 1-based list number.
pub async fn select_webhook_number(
    state: &AppState,
    number: usize,
) -> Result<SelectionInfo, String> {
    let targets = state.store.list();
    if !state
        .selection
        .lock()
        .await
        .select_number(&targets, number)
    {
        return Err(format!("No webhook number {number}"));
    }
    Ok(selection_info(state).await)
}

/// Select a target by id.
pub async fn select_webhook(state: &AppState, id: Uuid) -> Result<SelectionInfo, String> {
    if state.store.get(id).is_none() {
        return Err("Webhook not found".to_string());
    }
    state.selection.lock().await.select(id);
    Ok(selection_info(state).await)
}

/// Selection the composer opens on: `to` when given, otherwise the current
/// selection, falling back to the first target when nothing is selected.
pub async fn start_compose(state: &AppState, to: Option<Uuid>) -> Result<SelectionInfo, String> {
    if let Some(id) = to {
        return select_webhook(state, id).await;
    }

    let targets = state.store.list();
    {
        let mut selection = state.selection.lock().await;
        if selection.selected().is_none() {
            selection.select_next(&targets);
        }
    }
    Ok(selection_info(state).await)
}

/// Send subsequent messages to every target.
pub async fn select_all_webhooks(state: &AppState) -> SelectionInfo {
    state.selection.lock().await.select_all();
    selection_info(state).await
}
