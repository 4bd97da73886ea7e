// src/state.rs
use std::sync::Arc;

use crate::config::Config;
use crate::services::biography::system_prompt;
use crate::services::completion::CompletionClient;
use crate::services::rate_limiter::RateLimiter;

pub type SharedState = Arc<AppState>;

#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub system_prompt: String,
    pub completions: CompletionClient,
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            system_prompt: system_prompt(&config.biography),
            completions: CompletionClient::new(&config.openai_api_key, &config.openai_base_url),
            limiter: RateLimiter::new(config.rate_limit),
            config,
        }
    }
}
