use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::config::UpstreamConfig;
use crate::utils::http::get_http_client;

/// Raw outcome of one outbound call; status handling is the route's job.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: u16,
    pub reason: String,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait ImageUpstream: Send + Sync {
    fn provider(&self) -> &str;

    async fn post_chat(&self, payload: &Value) -> Result<UpstreamReply>;
}

pub fn compose_prompt(system_prompt: Option<&str>, prompt: &str) -> String {
    match system_prompt.filter(|value| !value.is_empty()) {
        Some(system_prompt) => format!("{system_prompt}\n\nUser prompt: {prompt}"),
        None => prompt.to_string(),
    }
}

pub fn build_chat_payload(model: &str, content: &str) -> Value {
    json!({
        "model": model,
        "messages": [
            { "role": "user", "content": content }
        ]
    })
}

pub fn truncate_for_log(value: &str, limit: usize) -> String {
    if value.chars().count() <= limit {
        return value.to_string();
    }
    let truncated: String = value.chars().take(limit).collect();
    format!("{truncated}... (truncated)")
}

fn summarize_payload(payload: &Value) -> String {
    let model = payload
        .get("model")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    let message_count = payload
        .get("messages")
        .and_then(|v| v.as_array())
        .map(|messages| messages.len())
        .unwrap_or(0);
    let content_chars = payload
        .pointer("/messages/0/content")
        .and_then(|v| v.as_str())
        .map(|content| content.chars().count())
        .unwrap_or(0);

    format!(
        "model={}, messages={}, content_chars={}",
        model, message_count, content_chars
    )
}

/// Pulls a readable message out of an upstream error body for the logs.
pub fn summarize_error_body(body: &str) -> (Option<String>, String) {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return (None, "empty response body".to_string());
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        let message = value
            .pointer("/error/message")
            .and_then(|v| v.as_str())
            .map(|v| v.to_string())
            .or_else(|| {
                value
                    .get("message")
                    .and_then(|v| v.as_str())
                    .map(|v| v.to_string())
            });
        return (message, truncate_for_log(&value.to_string(), 2000));
    }

    (None, truncate_for_log(trimmed, 2000))
}

/// Parses a successful upstream body. A plain-text URL is accepted as a JSON string.
pub fn parse_upstream_body(body: &str) -> Result<Value> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => Ok(value),
        Err(err) => {
            let trimmed = body.trim();
            if trimmed.starts_with("http") {
                Ok(Value::String(trimmed.to_string()))
            } else {
                Err(anyhow!("Invalid JSON from AI service: {err}"))
            }
        }
    }
}

pub struct HttpUpstream {
    config: UpstreamConfig,
}

impl HttpUpstream {
    pub fn new(config: UpstreamConfig) -> Self {
        HttpUpstream { config }
    }
}

#[async_trait]
impl ImageUpstream for HttpUpstream {
    fn provider(&self) -> &str {
        "chat-completions"
    }

    async fn post_chat(&self, payload: &Value) -> Result<UpstreamReply> {
        debug!("Upstream request: {}", summarize_payload(payload));

        let response = get_http_client()
            .post(&self.config.url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("customerId", &self.config.customer_id)
            .json(payload)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(
            "Upstream response received: status={}, body_chars={}",
            status,
            body.chars().count()
        );

        Ok(UpstreamReply {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
            body,
        })
    }
}
