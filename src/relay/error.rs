use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::types::ImageGenerationResponse;

pub const GENERIC_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("{0}")]
    Validation(String),

    #[error("Failed to generate image: {status} {reason}")]
    UpstreamStatus { status: u16, reason: String },

    #[error("No image URL received from AI service")]
    MissingImageUrl,

    #[error("{0}")]
    Internal(String),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn client_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

impl From<anyhow::Error> for RelayError {
    fn from(err: anyhow::Error) -> Self {
        RelayError::Internal(err.to_string())
    }
}

impl From<serde_json::Error> for RelayError {
    fn from(err: serde_json::Error) -> Self {
        RelayError::Internal(err.to_string())
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let body = ImageGenerationResponse::failure(self.client_message());
        (self.status_code(), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_bad_request() {
        let err = RelayError::Validation("Prompt is required".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.client_message(), "Prompt is required");
    }

    #[test]
    fn upstream_status_message_names_the_status() {
        let err = RelayError::UpstreamStatus {
            status: 502,
            reason: "Bad Gateway".into(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to generate image: 502 Bad Gateway");
    }

    #[test]
    fn empty_internal_message_becomes_generic() {
        let err = RelayError::Internal("  ".into());
        assert_eq!(err.client_message(), GENERIC_ERROR_MESSAGE);
    }
}
