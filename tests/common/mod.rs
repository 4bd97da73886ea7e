#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use ask_ai_relay::config::{Config, RateLimitConfig};
use ask_ai_relay::routes::create_router;
use ask_ai_relay::state::AppState;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use serde::de::DeserializeOwned;

pub const API_KEY: &str = "test-key";
pub const UPSTREAM_KEY: &str = "sk-test";
pub const BIO: &str = "Casey writes network drivers in Rust.";

/// Nothing listens here, so any upstream call fails fast.
pub const DEAD_UPSTREAM: &str = "http://127.0.0.1:1/v1";

pub fn config(upstream: &str, max_requests: u32) -> Config {
    Config {
        port: 0,
        api_key: API_KEY.to_string(),
        openai_api_key: UPSTREAM_KEY.to_string(),
        openai_base_url: upstream.to_string(),
        allowed_origins: vec!["https://portfolio.example".to_string()],
        rate_limit: RateLimitConfig {
            max_requests,
            window: Duration::from_secs(60),
        },
        trust_proxy: false,
        biography: BIO.to_string(),
    }
}

pub fn app(upstream: &str) -> Router {
    app_with_limit(upstream, 1_000)
}

pub fn app_with_limit(upstream: &str, max_requests: u32) -> Router {
    create_router(Arc::new(AppState::new(config(upstream, max_requests))))
}

pub fn ask(body: &str, key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/ask-ai")
        .header("content-type", "application/json");
    if let Some(key) = key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn json_body<T: DeserializeOwned>(response: Response<Body>) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Serve `app` on an ephemeral port and return its `/v1` base URL.
async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/v1")
}

/// Upstream that checks auth and the system prompt, then echoes the question back.
pub async fn echo_upstream() -> String {
    use axum::{Json, http::HeaderMap, http::StatusCode, routing::post};
    use serde_json::{Value, json};

    let app = Router::new().route(
        "/v1/chat/completions",
        post(|headers: HeaderMap, Json(req): Json<Value>| async move {
            let authorized = headers
                .get("authorization")
                .is_some_and(|v| v == format!("Bearer {UPSTREAM_KEY}").as_str());
            if !authorized {
                return (StatusCode::UNAUTHORIZED, Json(json!({"error": "bad key"})));
            }

            let system = req["messages"][0]["content"].as_str().unwrap_or_default();
            if req["messages"][0]["role"] != "system" || !system.contains(BIO) {
                return (StatusCode::BAD_REQUEST, Json(json!({"error": "no bio"})));
            }

            let question = req["messages"][1]["content"].as_str().unwrap_or_default();
            (
                StatusCode::OK,
                Json(json!({
                    "model": req["model"],
                    "choices": [{
                        "index": 0,
                        "message": {
                            "role": "assistant",
                            "content": format!("  You asked: {question}\n"),
                        },
                        "finish_reason": "stop"
                    }]
                })),
            )
        }),
    );
    serve(app).await
}

/// Upstream that always answers with `status` and `body`.
pub async fn fixed_upstream(status: axum::http::StatusCode, body: serde_json::Value) -> String {
    use axum::{Json, routing::post};

    let app = Router::new().route(
        "/v1/chat/completions",
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );
    serve(app).await
}
