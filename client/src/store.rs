//! Webhook Store
//!
//! The registry of configured webhook targets. The in-memory list lives in a
//! `watch` channel so collaborators can subscribe to snapshots; every mutation
//! rewrites the whole list to storage while the channel's write lock is held,
//! which keeps the observable list and the persisted blob in step.
//!
//! Storage failures never escape this module: a bad blob loads as an empty
//! registry and a failed write leaves the in-memory list authoritative.

use std::collections::HashSet;
use std::sync::Arc;

use jrnl_common::WebhookTarget;
use tokio::sync::watch;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::storage::KeyValueStorage;

/// Storage key for the serialized target list.
pub const WEBHOOKS_KEY: &str = "discord_webhooks";

/// Persisted, observable list of webhook targets.
pub struct WebhookStore {
    storage: Arc<dyn KeyValueStorage>,
    targets: watch::Sender<Vec<WebhookTarget>>,
}

impl WebhookStore {
    /// Open the store, loading whatever the storage currently holds.
    pub fn load(storage: Arc<dyn KeyValueStorage>) -> Self {
        let targets = load_targets(storage.as_ref());
        debug!(count = targets.len(), "Loaded webhook targets");
        let (tx, _rx) = watch::channel(targets);
        Self {
            storage,
            targets: tx,
        }
    }

    /// Current snapshot in list order.
    pub fn list(&self) -> Vec<WebhookTarget> {
        self.targets.borrow().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<WebhookTarget> {
        self.targets.borrow().iter().find(|t| t.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.targets.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.borrow().is_empty()
    }

    /// Receive a new snapshot after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<WebhookTarget>> {
        self.targets.subscribe()
    }

    /// Append a target with a fresh id.
    pub fn add(&self, name: impl Into<String>, endpoint: impl Into<String>) -> WebhookTarget {
        let target = WebhookTarget::new(name, endpoint);
        self.targets.send_modify(|list| {
            list.push(target.clone());
            self.persist(list);
        });
        debug!(webhook_id = %target.id, "Added webhook target");
        target
    }

    /// Replace the target with the same id. Returns `false` (and changes
    /// nothing) when no target matches.
    pub fn update(&self, target: WebhookTarget) -> bool {
        let id = target.id;
        let updated = self.targets.send_if_modified(|list| {
            let Some(slot) = list.iter_mut().find(|t| t.id == id) else {
                return false;
            };
            *slot = target;
            self.persist(list);
            true
        });
        if !updated {
            debug!(webhook_id = %id, "Ignoring update for unknown webhook target");
        }
        updated
    }

    /// Remove the targets at the given list positions. Positions past the end
    /// are ignored. Returns how many targets were removed.
    pub fn delete(&self, positions: impl IntoIterator<Item = usize>) -> usize {
        let positions: HashSet<usize> = positions.into_iter().collect();
        let mut removed = 0;
        self.targets.send_if_modified(|list| {
            let before = list.len();
            let mut index = 0;
            list.retain(|_| {
                let keep = !positions.contains(&index);
                index += 1;
                keep
            });
            removed = before - list.len();
            if removed == 0 {
                return false;
            }
            self.persist(list);
            true
        });
        debug!(removed, "Deleted webhook targets");
        removed
    }

    /// Replace the whole list, e.g. after a reorder.
    pub fn save(&self, targets: Vec<WebhookTarget>) {
        self.targets.send_modify(|list| {
            *list = targets;
            self.persist(list);
        });
    }

    /// Write `targets` to storage. Failures are logged and swallowed.
    fn persist(&self, targets: &[WebhookTarget]) {
        let json = match serde_json::to_vec(targets) {
            Ok(json) => json,
            Err(e) => {
                error!(error = %e, "Failed to serialize webhook targets");
                return;
            }
        };
        if let Err(e) = self.storage.set(WEBHOOKS_KEY, &json) {
            error!(error = %e, "Failed to persist webhook targets, keeping in-memory list");
        }
    }
}

fn load_targets(storage: &dyn KeyValueStorage) -> Vec<WebhookTarget> {
    match storage.get(WEBHOOKS_KEY) {
        Ok(Some(bytes)) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            warn!("Corrupt webhook list, starting empty: {e}");
            Vec::new()
        }),
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!("Failed to read webhook list, starting empty: {e}");
            Vec::new()
        }
    }
}
