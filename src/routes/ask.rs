use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::Value;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::{
    error::{AppError, INVALID_MESSAGE},
    message::{AskRequest, AskResponse, HealthResponse},
    state::SharedState,
};

#[instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn ask_handler(
    State(state): State<SharedState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AskResponse>, AppError> {
    let Json(body) = payload.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            debug!(%rejection, "rejected ask body");
            AppError::BadRequest(INVALID_MESSAGE.to_string())
        }
    })?;

    let request = AskRequest::from_body(body)
        .ok_or_else(|| AppError::BadRequest(INVALID_MESSAGE.to_string()))?;
    let message = request
        .text()
        .ok_or_else(|| AppError::BadRequest(INVALID_MESSAGE.to_string()))?;

    info!(chars = message.chars().count(), "forwarding question");
    let reply = state
        .completions
        .complete(&state.system_prompt, message)
        .await?;

    Ok(Json(AskResponse { response: reply }))
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

pub async fn not_found_handler() -> AppError {
    AppError::NotFound
}
