//! HTTP delivery of revalidation signals.
//!
//! [`RevalidationWebhook`] POSTs `{ "path": ... }` to a configured URL.
//! Each signal gets a single attempt; failures are returned to the caller.

use std::time::Duration;

use crate::bus::RevalidationSignal;

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error type for webhook delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

/// Client for the renderer's revalidation endpoint.
pub struct RevalidationWebhook {
    client: reqwest::Client,
    url: String,
}

impl RevalidationWebhook {
    pub fn new(url: impl Into<String>) -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Body sent for a signal.
    pub fn payload(signal: &RevalidationSignal) -> serde_json::Value {
        serde_json::json!({ "path": signal.path })
    }

    /// Send one signal. No retries.
    pub async fn send(&self, signal: &RevalidationSignal) -> Result<(), WebhookError> {
        let response = self
            .client
            .post(&self.url)
            .json(&Self::payload(signal))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}
