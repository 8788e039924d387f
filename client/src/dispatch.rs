//! Webhook Dispatch
//!
//! Delivers one message to one target or to every registered target and
//! classifies the aggregate outcome. Deliveries are independent: a failure on
//! one target never stops the others, and nothing is retried here.
//!
//! Endpoint URLs embed the webhook token, so they are never logged.

use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{self, StreamExt};
use jrnl_common::{
    DeliveryFailure, DeliveryFailureReason, DispatchError, DispatchResult, Result,
    WebhookMessage, WebhookTarget,
};
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

use crate::store::WebhookStore;

/// Sends messages to the targets held by a [`WebhookStore`].
#[derive(Clone)]
pub struct Dispatcher {
    http: reqwest::Client,
    store: Arc<WebhookStore>,
    max_in_flight: usize,
}

impl Dispatcher {
    pub fn new(http: reqwest::Client, store: Arc<WebhookStore>, max_in_flight: usize) -> Self {
        Self {
            http,
            store,
            max_in_flight: max_in_flight.max(1),
        }
    }

    /// Send `content` to the target with id `target`, or to every target when
    /// `target` is `None`.
    ///
    /// Only pre-flight problems are returned as errors; no request has been
    /// made when one is. Per-target failures are reported in the result.
    pub async fn send(&self, content: &str, target: Option<Uuid>) -> Result<DispatchResult> {
        let content = content.trim();
        if content.is_empty() {
            return Err(DispatchError::EmptyMessage);
        }

        // Snapshot: edits made while this send is in flight do not change
        // which targets it addresses.
        let targets = self.store.list();
        if targets.is_empty() {
            return Err(DispatchError::NoTargetsConfigured);
        }

        let addressed = match target {
            Some(id) => vec![targets
                .into_iter()
                .find(|t| t.id == id)
                .ok_or(DispatchError::TargetNotFound(id))?],
            None => targets,
        };

        let body = Bytes::from(serde_json::to_vec(&WebhookMessage::new(content))?);

        debug!(
            targets = addressed.len(),
            broadcast = target.is_none(),
            "Dispatching message"
        );

        let http = &self.http;
        let deliveries: Vec<_> = addressed
            .iter()
            .map(|target| {
                let body = body.clone();
                async move {
                    deliver(http, target, body)
                        .await
                        .err()
                        .map(|reason| DeliveryFailure {
                            target_id: target.id,
                            target_name: target.name.clone(),
                            reason,
                        })
                }
            })
            .collect();
        let failures: Vec<DeliveryFailure> = stream::iter(deliveries)
            .buffered(self.max_in_flight)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .flatten()
            .collect();

        let result = DispatchResult::from_failures(addressed.len(), failures);
        info!(
            attempted = result.attempted(),
            delivered = result.delivered(),
            "Dispatch finished"
        );
        Ok(result)
    }
}

/// POST the payload to a single target.
async fn deliver(
    http: &reqwest::Client,
    target: &WebhookTarget,
    body: Bytes,
) -> std::result::Result<(), DeliveryFailureReason> {
    let result = post(http, &target.endpoint, body).await;
    match &result {
        Ok(()) => debug!(webhook_id = %target.id, "Webhook delivery succeeded"),
        Err(reason) => warn!(
            webhook_id = %target.id,
            name = %target.name,
            error = %reason,
            "Webhook delivery failed"
        ),
    }
    result
}

async fn post(
    http: &reqwest::Client,
    endpoint: &str,
    body: Bytes,
) -> std::result::Result<(), DeliveryFailureReason> {
    let url = parse_endpoint(endpoint)?;

    let response = http
        .post(url)
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .map_err(classify_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(DeliveryFailureReason::HttpStatus(status.as_u16()));
    }
    Ok(())
}

/// Accept only absolute `http`/`https` URLs with a host.
fn parse_endpoint(endpoint: &str) -> std::result::Result<Url, DeliveryFailureReason> {
    let url = Url::parse(endpoint).map_err(|_| DeliveryFailureReason::InvalidEndpoint)?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(DeliveryFailureReason::InvalidEndpoint);
    }
    Ok(url)
}

/// Map a client error onto a failure reason.
///
/// Failures before a connection exists (refused, DNS, timeout) are transport
/// errors; failures after the request went out are malformed responses.
fn classify_error(e: reqwest::Error) -> DeliveryFailureReason {
    // The URL carries the webhook token.
    let e = e.without_url();
    if e.is_builder() {
        DeliveryFailureReason::InvalidEndpoint
    } else if e.is_connect() || e.is_timeout() || e.is_redirect() {
        DeliveryFailureReason::TransportError(error_chain(&e))
    } else if e.is_request() || e.is_body() || e.is_decode() {
        DeliveryFailureReason::InvalidResponse
    } else {
        DeliveryFailureReason::TransportError(error_chain(&e))
    }
}

/// Render an error with its sources, e.g. `error sending request: connection refused`.
fn error_chain(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
