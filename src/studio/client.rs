use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tracing::debug;

use crate::relay::upstream::truncate_for_log;
use crate::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::utils::http::get_http_client;

/// Where the studio sends generation requests.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, request: &ImageGenerationRequest) -> Result<ImageGenerationResponse>;
}

/// Talks to a running relay over HTTP.
pub struct ProxyClient {
    endpoint: String,
}

impl ProxyClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        ProxyClient {
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl GenerationBackend for ProxyClient {
    async fn generate(&self, request: &ImageGenerationRequest) -> Result<ImageGenerationResponse> {
        let response = get_http_client()
            .post(&self.endpoint)
            .json(request)
            .send()
            .await?;

        // Failure responses carry the same JSON shape, so the status alone decides nothing.
        let status = response.status();
        let body = response.text().await?;
        debug!("Relay responded with status={} body_chars={}", status, body.len());
        serde_json::from_str::<ImageGenerationResponse>(&body).map_err(|err| {
            anyhow!(
                "Unexpected response from image service ({}): {} [{}]",
                status,
                truncate_for_log(body.trim(), 200),
                err
            )
        })
    }
}
