//! Generator implementations behind the `DescriptionGenerator` seam.
//!
//! `HttpGenerator` is what a remote dashboard uses: one POST to the
//! generate-description endpoint, one response, no retry. `LocalGenerator`
//! runs the same pipeline in-process and is what the endpoint itself is
//! built on.

use super::{build_prompt, parse_generated, DescriptionGenerator, GeneratedDescription};
use crate::generator::CompletionBackend;
use crate::{AtelierError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Calls the generate-description endpoint over HTTP
pub struct HttpGenerator {
    http: Client,
    endpoint: String,
}

impl HttpGenerator {
    /// `base_url` is the admin server root, e.g. `http://127.0.0.1:3000`
    pub fn new(base_url: &str, request_timeout_ms: u64) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(request_timeout_ms))
            .build()
            .map_err(|e| AtelierError::BackendError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            endpoint: format!(
                "{}/api/generate-description",
                base_url.trim_end_matches('/')
            ),
        })
    }
}

#[async_trait]
impl DescriptionGenerator for HttpGenerator {
    async fn generate(
        &self,
        title: &str,
        kind: &str,
        tools: &[String],
    ) -> Result<GeneratedDescription> {
        debug!(target: "generator", %title, %kind, "POST {}", self.endpoint);

        let body = json!({ "title": title, "type": kind, "tools": tools });
        let resp = self
            .http
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| AtelierError::BackendError(format!("generation request failed: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            return resp.json::<GeneratedDescription>().await.map_err(|e| {
                AtelierError::GenerationFailed(format!("malformed generation response: {e}"))
            });
        }

        // Failure payloads carry { error } or { error, details }
        let payload: serde_json::Value = resp.json().await.unwrap_or_default();
        let error = payload
            .get("error")
            .and_then(|v| v.as_str())
            .unwrap_or("generation failed")
            .to_string();
        if status == StatusCode::BAD_REQUEST {
            return Err(AtelierError::ValidationError(error));
        }
        let details = payload
            .get("details")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown error");
        Err(AtelierError::GenerationFailed(format!("{error}: {details}")))
    }
}

/// Runs prompt → backend → extraction in-process
pub struct LocalGenerator {
    backend: Arc<dyn CompletionBackend>,
}

impl LocalGenerator {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl DescriptionGenerator for LocalGenerator {
    async fn generate(
        &self,
        title: &str,
        kind: &str,
        tools: &[String],
    ) -> Result<GeneratedDescription> {
        if title.trim().is_empty() || kind.trim().is_empty() {
            return Err(AtelierError::ValidationError(
                "Title and type are required".to_string(),
            ));
        }

        let prompt = build_prompt(title, kind, tools);
        let text = self.backend.complete(&prompt).await?;
        parse_generated(&text)
    }
}
