//! Text-completion backend.
//!
//! `OpenAiBackend` talks to any OpenAI-compatible server: it prefers the
//! Responses API and falls back to Chat Completions when that endpoint is
//! missing or unusable. The backend returns raw assistant text; shape
//! validation of the generated copy happens in `extract`.

use crate::{AtelierError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Configuration for `OpenAiBackend` loaded from environment variables
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String, // e.g., http://localhost:8000/v1
    pub model: String,
    pub api_key: Option<String>,
    pub request_timeout_ms: u64,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("LLM_BASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "http://localhost:8000/v1".to_string()),
            model: std::env::var("LLM_MODEL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "gpt-4o-mini".to_string()),
            api_key: std::env::var("LLM_API_KEY").ok().filter(|s| !s.is_empty()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30_000),
            temperature: std::env::var("LLM_TEMPERATURE")
                .ok()
                .and_then(|v| v.parse::<f32>().ok())
                .unwrap_or(0.7),
            max_output_tokens: std::env::var("LLM_MAX_OUTPUT_TOKENS")
                .ok()
                .and_then(|v| v.parse::<u32>().ok())
                .unwrap_or(1024),
        }
    }
}

/// Produces raw completion text for a prompt. Exactly one completion per
/// call; no streaming.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// HTTP backend for OpenAI-compatible servers
#[derive(Clone)]
pub struct OpenAiBackend {
    http: Client,
    cfg: BackendConfig,
}

impl OpenAiBackend {
    pub fn new(cfg: BackendConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.request_timeout_ms))
            .build()
            .map_err(|e| AtelierError::BackendError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http, cfg })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(BackendConfig::default())
    }

    async fn complete_via_chat(&self, prompt: &str) -> Result<String> {
        let chat_url = format!(
            "{}/chat/completions",
            self.cfg.base_url.trim_end_matches('/')
        );
        debug!(target: "generator", "POST {} via Chat Completions", chat_url);

        let mut req = self
            .http
            .post(&chat_url)
            .header("content-type", "application/json");
        if let Some(key) = &self.cfg.api_key {
            req = req.bearer_auth(key);
        }

        let body = json!({
            "model": self.cfg.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": self.cfg.max_output_tokens,
            "temperature": self.cfg.temperature,
        });

        let resp = req
            .json(&body)
            .send()
            .await
            .map_err(|e| AtelierError::BackendError(format!("Chat Completions HTTP error: {e}")))?;
        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            error!(target: "generator", %status, body = %text, "Chat Completions error");
            return Err(AtelierError::BackendError(format!(
                "Chat Completions error: status={} body={}",
                status, text
            )));
        }

        let val: serde_json::Value = resp.json().await.map_err(|e| {
            AtelierError::BackendError(format!("Failed to parse Chat Completions JSON: {e}"))
        })?;
        extract_text_from_chat_completions(&val).ok_or_else(|| {
            AtelierError::BackendError(
                "Missing choices[0].message.content in chat completions".into(),
            )
        })
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, prompt: &str) -> Result<String> {
        // Try Responses API first
        let responses_url = format!("{}/responses", self.cfg.base_url.trim_end_matches('/'));
        debug!(target: "generator", "POST {} via Responses API", responses_url);

        let mut req = self
            .http
            .post(&responses_url)
            .header("content-type", "application/json");
        if let Some(key) = &self.cfg.api_key {
            req = req.bearer_auth(key);
        }

        let body = json!({
            "model": self.cfg.model,
            "input": prompt,
            // The Responses API uses max_output_tokens
            "max_output_tokens": self.cfg.max_output_tokens,
            "temperature": self.cfg.temperature,
        });

        match req.json(&body).send().await {
            Ok(resp) => {
                if resp.status().is_success() {
                    let val: serde_json::Value = resp.json().await.map_err(|e| {
                        AtelierError::BackendError(format!("Failed to parse Responses JSON: {e}"))
                    })?;
                    if let Some(text) = extract_text_from_responses(&val) {
                        return Ok(text);
                    }
                    // fallthrough to chat if we couldn't parse
                } else if resp.status() == StatusCode::NOT_FOUND {
                    // Endpoint missing; try chat fallback
                } else {
                    let status = resp.status();
                    let body = resp.text().await.unwrap_or_default();
                    warn!(target: "generator", %status, body = %body, "Responses API error; trying chat.completions fallback");
                }
            }
            Err(err) => {
                // Fallback on network error
                warn!(target: "generator", error = %err, "Responses API request failed; trying chat.completions fallback");
            }
        }

        self.complete_via_chat(prompt).await
    }
}

/// Backend returning fixed text; used by tests and offline development
pub struct CannedBackend {
    text: String,
}

impl CannedBackend {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
impl CompletionBackend for CannedBackend {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(self.text.clone())
    }
}

fn extract_text_from_chat_completions(v: &serde_json::Value) -> Option<String> {
    v.get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(|s| s.to_string())
}

fn extract_text_from_responses(v: &serde_json::Value) -> Option<String> {
    // Prefer a direct output_text if present
    if let Some(s) = v.get("output_text").and_then(|x| x.as_str()) {
        if !s.is_empty() {
            return Some(s.to_string());
        }
    }
    // Otherwise, try unified output array schema
    if let Some(arr) = v.get("output").and_then(|x| x.as_array()) {
        let mut acc = String::new();
        for item in arr {
            if let Some(contents) = item.get("content").and_then(|c| c.as_array()) {
                for c in contents {
                    if let Some(t) = c
                        .get("text")
                        .and_then(|t| t.get("value"))
                        .and_then(|v| v.as_str())
                    {
                        acc.push_str(t);
                    } else if let Some(t) = c.get("text").and_then(|v| v.as_str()) {
                        acc.push_str(t);
                    }
                }
            }
        }
        if !acc.is_empty() {
            return Some(acc);
        }
    }
    // Some implementations return choices like chat
    extract_text_from_chat_completions(v)
}
