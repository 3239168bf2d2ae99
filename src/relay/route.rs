use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tracing::{error, info, warn};

use super::error::RelayError;
use super::extract::extract_image_url;
use super::upstream::{
    build_chat_payload, compose_prompt, parse_upstream_body, summarize_error_body,
    truncate_for_log, ImageUpstream,
};
use crate::types::{
    Dimensions, ImageGenerationRequest, ImageGenerationResponse, ResponseMetadata,
    DEFAULT_DIMENSION,
};
use crate::utils::timing::{complete_request_timer, log_upstream_timing, start_request_timer};

pub const GENERATE_IMAGE_PATH: &str = "/generate-image";

pub struct RelayState {
    pub upstream: Arc<dyn ImageUpstream>,
    pub default_model: String,
}

pub fn router(state: Arc<RelayState>) -> Router {
    Router::new()
        .route(GENERATE_IMAGE_PATH, post(generate_image))
        .route("/health", get(get_health))
        .with_state(state)
}

pub async fn get_health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `POST /generate-image`: relays one prompt and normalizes the reply.
///
/// The body is read as raw bytes so malformed JSON produces the same
/// `{success:false,error}` shape as every other failure.
pub async fn generate_image(State(state): State<Arc<RelayState>>, body: Bytes) -> Response {
    let request = match serde_json::from_slice::<ImageGenerationRequest>(&body) {
        Ok(request) => request,
        Err(err) => {
            error!("Image generation error: invalid request body: {err}");
            return RelayError::from(err).into_response();
        }
    };

    let mut timer = start_request_timer(
        GENERATE_IMAGE_PATH,
        request.prompt.as_deref(),
        request.model.as_deref(),
    );

    match relay_generation(&state, request).await {
        Ok(response) => {
            complete_request_timer(&mut timer, "success", None);
            Json(response).into_response()
        }
        Err(err) => {
            complete_request_timer(&mut timer, "error", Some(err.to_string()));
            err.into_response()
        }
    }
}

async fn relay_generation(
    state: &RelayState,
    request: ImageGenerationRequest,
) -> Result<ImageGenerationResponse, RelayError> {
    let prompt = request.prompt.unwrap_or_default();
    if prompt.trim().is_empty() {
        return Err(RelayError::Validation("Prompt is required".to_string()));
    }

    let width = request.width.unwrap_or(DEFAULT_DIMENSION);
    let height = request.height.unwrap_or(DEFAULT_DIMENSION);
    let model = request
        .model
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| state.default_model.clone());

    let final_prompt = compose_prompt(request.system_prompt.as_deref(), &prompt);
    let payload = build_chat_payload(&model, &final_prompt);

    let (reply, generation_time) = log_upstream_timing(
        state.upstream.provider(),
        &model,
        "generate-image",
        Some(json!({ "width": width, "height": height })),
        || state.upstream.post_chat(&payload),
    )
    .await;
    let reply = reply.map_err(|err| {
        error!("Image generation error: {err}");
        RelayError::from(err)
    })?;

    if !reply.is_success() {
        let (message, body_summary) = summarize_error_body(&reply.body);
        warn!(
            "AI API error: status={}, message={:?}, body={}",
            reply.status, message, body_summary
        );
        return Err(RelayError::UpstreamStatus {
            status: reply.status,
            reason: reply.reason,
        });
    }

    let data = parse_upstream_body(&reply.body).map_err(|err| {
        error!("Image generation error: {err}");
        RelayError::from(err)
    })?;

    let Some((strategy, image_url)) = extract_image_url(&data) else {
        warn!(
            "No image URL in response: {}",
            truncate_for_log(&data.to_string(), 2000)
        );
        return Err(RelayError::MissingImageUrl);
    };
    info!(
        "Image generated via {} in {:.3}s (model={}, {}x{})",
        strategy, generation_time, model, width, height
    );

    Ok(ImageGenerationResponse::success(
        image_url,
        generation_time,
        ResponseMetadata {
            model,
            prompt,
            dimensions: Dimensions { width, height },
        },
    ))
}
