// src/routes/mod.rs
pub mod ask;
pub mod middleware;

use std::iter::once;

use crate::state::SharedState;
use ask::{ask_handler, health_handler, not_found_handler};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue, Method, header},
    middleware::from_fn_with_state,
    routing::{get, post},
};
use middleware::{API_KEY_HEADER, api_key_middleware, rate_limit_middleware};
use tower_http::cors::{Any, CorsLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

/// Largest accepted request body.
pub const BODY_LIMIT_BYTES: usize = 100 * 1024;

pub fn create_router(state: SharedState) -> Router {
    let ask = post(ask_handler)
        .route_layer(from_fn_with_state(state.clone(), api_key_middleware));

    Router::new()
        .route("/", get(health_handler))
        .route("/health", get(health_handler))
        .route("/ask-ai", ask)
        .fallback(not_found_handler)
        .method_not_allowed_fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(from_fn_with_state(state.clone(), rate_limit_middleware))
        .layer(cors_layer(&state.config.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(SetSensitiveRequestHeadersLayer::new(once(HeaderName::from_static(
            API_KEY_HEADER,
        ))))
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(API_KEY_HEADER)]);

    // `*` cannot go into an origin list.
    if origins.is_empty() || origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}
