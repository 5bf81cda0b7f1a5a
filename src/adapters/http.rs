use crate::core::encoding;
use crate::core::response::{self, classify_error};
use crate::core::{
    DispatchFailure, Dispatcher, PingReport, SubmissionOutcome, SubmissionRequest,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_PING_TIMEOUT: Duration = Duration::from_secs(10);

/// Posts submissions to the script checker webhook with `reqwest`.
pub struct WebhookDispatcher {
    client: Client,
    request_timeout: Duration,
    ping_timeout: Duration,
}

impl WebhookDispatcher {
    pub fn new(request_timeout: Duration, ping_timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            request_timeout,
            ping_timeout,
        }
    }
}

impl Default for WebhookDispatcher {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TIMEOUT, DEFAULT_PING_TIMEOUT)
    }
}

#[async_trait]
impl Dispatcher for WebhookDispatcher {
    async fn submit(&self, endpoint: &str, request: &SubmissionRequest) -> SubmissionOutcome {
        let body = match encoding::encode(request) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("❌ Could not build {} request: {}", request.encoding, e);
                return SubmissionOutcome::Failed(DispatchFailure::Other {
                    detail: e.to_string(),
                });
            }
        };

        tracing::info!(
            "📤 Submitting '{}' ({} bytes) to {} using {} upload",
            request.project_title,
            request.file_bytes.len(),
            request.environment,
            request.encoding
        );
        tracing::debug!("POST {} as {}", endpoint, request.user_email);

        let builder = self
            .client
            .post(endpoint)
            .timeout(self.request_timeout);

        let response = match body.apply(builder).send().await {
            Ok(response) => response,
            Err(e) => {
                let failure = classify_error(&e);
                tracing::warn!("❌ Submission did not complete: {}", e);
                return SubmissionOutcome::Failed(failure);
            }
        };

        let status = response.status().as_u16();
        tracing::debug!("Webhook response status: {}", status);

        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("❌ Failed to read webhook response: {}", e);
                return SubmissionOutcome::Failed(classify_error(&e));
            }
        };

        let outcome = response::interpret(status, &text);
        if outcome.is_success() {
            tracing::info!("✅ Script submitted (HTTP {})", status);
        } else {
            tracing::warn!("❌ Webhook rejected submission with HTTP {}", status);
        }
        outcome
    }

    async fn ping(&self, endpoint: &str) -> Result<PingReport> {
        let timestamp = chrono::Utc::now().timestamp_millis() as f64 / 1000.0;
        let payload = serde_json::json!({
            "test": "connection",
            "timestamp": timestamp.to_string(),
        });

        tracing::debug!("Testing webhook connection to {}", endpoint);
        let response = self
            .client
            .post(endpoint)
            .timeout(self.ping_timeout)
            .json(&payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::info!("🔍 Connection test answered with HTTP {}", status);

        Ok(PingReport {
            status,
            body_preview: response::preview(&body),
        })
    }
}
