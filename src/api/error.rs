//! API error responses

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;
use thiserror::Error;

use crate::generate::{
    GenerateError, INVALID_REQUEST_MESSAGE, MISSING_API_KEY_MESSAGE, NO_IMAGE_MESSAGE,
    PROVIDER_FAILED_MESSAGE,
};
use crate::openrouter::ProviderError;

/// Message for bodies over the configured size limit
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "De afbeeldingen zijn te groot";

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors surfaced by the generate routes
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Validation(#[from] GenerateError),

    #[error("request body too large")]
    PayloadTooLarge,

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("no image in provider response")]
    NoImage,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Provider(ProviderError::NotConfigured) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Provider(ProviderError::Api { status, .. }) => *status,
            ApiError::Provider(ProviderError::Request(_) | ProviderError::EmptyBody) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::NoImage => StatusCode::BAD_GATEWAY,
        }
    }

    /// User-facing text
    pub fn message(&self) -> String {
        match self {
            ApiError::Validation(_) => INVALID_REQUEST_MESSAGE.to_string(),
            ApiError::PayloadTooLarge => PAYLOAD_TOO_LARGE_MESSAGE.to_string(),
            ApiError::Provider(ProviderError::NotConfigured) => MISSING_API_KEY_MESSAGE.to_string(),
            ApiError::Provider(ProviderError::Api {
                message: Some(message),
                ..
            }) => message.clone(),
            ApiError::Provider(_) => PROVIDER_FAILED_MESSAGE.to_string(),
            ApiError::NoImage => NO_IMAGE_MESSAGE.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status(),
            Json(ErrorResponse {
                error: self.message(),
            }),
        )
            .into_response()
    }
}
