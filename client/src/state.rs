//! Application State
//!
//! The explicitly constructed store + dispatcher pair handed to every command.

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::Client as HttpClient;
use tokio::sync::Mutex;

use crate::config::Config;
use crate::dispatch::Dispatcher;
use crate::selection::Selection;
use crate::storage::{FileStorage, KeyValueStorage};
use crate::store::WebhookStore;

/// Application state shared across commands.
pub struct AppState {
    /// Registry of webhook targets.
    pub store: Arc<WebhookStore>,
    /// Sends messages to the registry's targets.
    pub dispatcher: Dispatcher,
    /// Composer's active target.
    pub selection: Mutex<Selection>,
}

impl AppState {
    /// Build state backed by files in the configured data directory.
    pub fn new(config: &Config) -> Result<Self> {
        let storage = FileStorage::open(&config.data_dir).with_context(|| {
            format!(
                "Failed to open data directory {}",
                config.data_dir.display()
            )
        })?;

        let http = HttpClient::builder()
            .timeout(config.http_timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_storage(
            Arc::new(storage),
            http,
            config.max_in_flight,
        ))
    }

    /// Build state over any storage backend.
    pub fn with_storage(
        storage: Arc<dyn KeyValueStorage>,
        http: HttpClient,
        max_in_flight: usize,
    ) -> Self {
        let store = Arc::new(WebhookStore::load(storage));
        let selection = Selection::first_of(&store.list());
        let dispatcher = Dispatcher::new(http, store.clone(), max_in_flight);

        Self {
            store,
            dispatcher,
            selection: Mutex::new(selection),
        }
    }
}
