// src/message.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /ask-ai`. `message` is kept loose so a wrong type can be told apart
/// from a malformed body.
#[derive(Debug)]
pub struct AskRequest {
    pub message: Option<Value>,
}

impl AskRequest {
    /// Only a JSON object is a request body; arrays and scalars are rejected.
    pub fn from_body(body: Value) -> Option<Self> {
        let Value::Object(mut fields) = body else {
            return None;
        };
        Some(Self {
            message: fields.remove("message"),
        })
    }

    /// The trimmed message, if it is a non-blank string.
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_ref()
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
            message: "API is running!".to_string(),
        }
    }
}
