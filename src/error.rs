// src/error.rs
use std::time::Duration;

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::message::ErrorResponse;
use crate::services::completion::CompletionError;

pub const MISSING_KEY: &str = "API key is missing.";
pub const INVALID_KEY: &str = "Invalid API key.";
pub const INVALID_MESSAGE: &str = "Message is required and must be a non-empty string.";
pub const BODY_TOO_LARGE: &str = "Request body is too large.";
pub const CLIENT_RATE_LIMITED: &str = "Too many requests from this IP, please try again later.";
pub const UPSTREAM_RATE_LIMITED: &str = "The AI service is busy right now. Please try again later.";
pub const UPSTREAM_FAILED: &str = "Failed to get a response from the AI.";
pub const NOT_FOUND: &str = "Endpoint not found.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("missing api key")]
    MissingApiKey,
    #[error("invalid api key")]
    InvalidApiKey,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("request body too large")]
    PayloadTooLarge,
    #[error("client rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },
    #[error("endpoint not found")]
    NotFound,
    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MissingApiKey => (StatusCode::UNAUTHORIZED, MISSING_KEY.to_string()),
            AppError::InvalidApiKey => (StatusCode::FORBIDDEN, INVALID_KEY.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::PayloadTooLarge => {
                (StatusCode::PAYLOAD_TOO_LARGE, BODY_TOO_LARGE.to_string())
            }
            AppError::RateLimited { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, CLIENT_RATE_LIMITED.to_string())
            }
            AppError::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND.to_string()),
            AppError::Completion(CompletionError::RateLimited) => {
                tracing::warn!("upstream rate limit hit");
                (StatusCode::TOO_MANY_REQUESTS, UPSTREAM_RATE_LIMITED.to_string())
            }
            AppError::Completion(err) => {
                // Details stay in the logs.
                tracing::error!(error = %err, "completion request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, UPSTREAM_FAILED.to_string())
            }
        };

        let mut response = (status, Json(ErrorResponse { error: message })).into_response();

        if let AppError::RateLimited { retry_after } = self {
            // Round up so clients never retry a moment too early.
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs.max(1)));
        }

        response
    }
}
