// src/config.rs
use std::time::Duration;

use thiserror::Error;

use crate::services::biography;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 100;
pub const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
    #[error("failed to read biography from {path}: {source}")]
    Biography {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("biography at {0} is empty")]
    EmptyBiography(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
        }
    }
}

/// Process-wide settings, read once at startup.
#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub api_key: String,
    pub openai_api_key: String,
    pub openai_base_url: String,
    /// Empty means any origin is allowed.
    pub allowed_origins: Vec<String>,
    pub rate_limit: RateLimitConfig,
    pub trust_proxy: bool,
    pub biography: String,
}

// Keys stay out of Debug output, it ends up in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("openai_base_url", &self.openai_base_url)
            .field("allowed_origins", &self.allowed_origins)
            .field("rate_limit", &self.rate_limit)
            .field("trust_proxy", &self.trust_proxy)
            .field("biography_len", &self.biography.len())
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Load settings from the environment, picking up a `.env` file if there is one.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| dotenvy::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("API_KEY").ok_or(ConfigError::Missing("API_KEY"))?;
        let openai_api_key = get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        let port = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;

        let max_requests = parse_or(
            "RATE_LIMIT_MAX_REQUESTS",
            get("RATE_LIMIT_MAX_REQUESTS"),
            DEFAULT_RATE_LIMIT_MAX_REQUESTS,
        )?;
        if max_requests == 0 {
            return Err(ConfigError::Invalid {
                name: "RATE_LIMIT_MAX_REQUESTS",
                value: "0".to_string(),
            });
        }

        let window_secs: u64 = parse_or(
            "RATE_LIMIT_WINDOW_SECS",
            get("RATE_LIMIT_WINDOW_SECS"),
            DEFAULT_RATE_LIMIT_WINDOW_SECS,
        )?;
        if window_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "RATE_LIMIT_WINDOW_SECS",
                value: "0".to_string(),
            });
        }

        let trust_proxy = match get("TRUST_PROXY") {
            None => false,
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid {
                name: "TRUST_PROXY",
                value: v,
            })?,
        };

        let allowed_origins = get("ALLOWED_ORIGIN")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let openai_base_url = get("OPENAI_BASE_URL")
            .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let biography = biography::load(get("BIOGRAPHY_PATH").as_deref())?;

        Ok(Self {
            port,
            api_key,
            openai_api_key,
            openai_base_url,
            allowed_origins,
            rate_limit: RateLimitConfig {
                max_requests,
                window: Duration::from_secs(window_secs),
            },
            trust_proxy,
            biography,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_only_keys_are_set() {
        let config =
            Config::from_lookup(lookup(&[("API_KEY", "k"), ("OPENAI_API_KEY", "sk")])).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.rate_limit, RateLimitConfig::default());
        assert!(config.allowed_origins.is_empty());
        assert!(!config.trust_proxy);
        assert_eq!(config.openai_base_url, DEFAULT_OPENAI_BASE_URL);
        assert!(!config.biography.is_empty());
    }

    #[test]
    fn missing_service_key_is_an_error() {
        let err = Config::from_lookup(lookup(&[("OPENAI_API_KEY", "sk")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("API_KEY")));

        // Blank counts as unset.
        let err = Config::from_lookup(lookup(&[("API_KEY", "k"), ("OPENAI_API_KEY", "  ")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing("OPENAI_API_KEY")));
    }

    #[test]
    fn parses_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("API_KEY", "k"),
            ("OPENAI_API_KEY", "sk"),
            ("PORT", "8080"),
            ("ALLOWED_ORIGIN", "https://a.example, https://b.example,"),
            ("RATE_LIMIT_MAX_REQUESTS", "5"),
            ("RATE_LIMIT_WINDOW_SECS", "60"),
            ("TRUST_PROXY", "true"),
            ("OPENAI_BASE_URL", "http://127.0.0.1:9000/v1/"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.rate_limit.window, Duration::from_secs(60));
        assert!(config.trust_proxy);
        assert_eq!(config.openai_base_url, "http://127.0.0.1:9000/v1");
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = Config::from_lookup(lookup(&[
            ("API_KEY", "k"),
            ("OPENAI_API_KEY", "sk"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));

        let err = Config::from_lookup(lookup(&[
            ("API_KEY", "k"),
            ("OPENAI_API_KEY", "sk"),
            ("RATE_LIMIT_WINDOW_SECS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "RATE_LIMIT_WINDOW_SECS",
                ..
            }
        ));
    }

    #[test]
    fn rejects_zero_request_budget() {
        let err = Config::from_lookup(lookup(&[
            ("API_KEY", "k"),
            ("OPENAI_API_KEY", "sk"),
            ("RATE_LIMIT_MAX_REQUESTS", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "RATE_LIMIT_MAX_REQUESTS",
                ..
            }
        ));
    }

    #[test]
    fn rejects_unparsable_trust_proxy() {
        let err = Config::from_lookup(lookup(&[
            ("API_KEY", "k"),
            ("OPENAI_API_KEY", "sk"),
            ("TRUST_PROXY", "maybe"),
        ]))
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                name: "TRUST_PROXY",
                ..
            }
        ));

        let config = Config::from_lookup(lookup(&[
            ("API_KEY", "k"),
            ("OPENAI_API_KEY", "sk"),
            ("TRUST_PROXY", "OFF"),
        ]))
        .unwrap();
        assert!(!config.trust_proxy);
    }

    #[test]
    fn wildcard_origin_is_kept() {
        let config = Config::from_lookup(lookup(&[
            ("API_KEY", "k"),
            ("OPENAI_API_KEY", "sk"),
            ("ALLOWED_ORIGIN", "*"),
        ]))
        .unwrap();
        assert_eq!(config.allowed_origins, vec!["*"]);
    }

    #[test]
    fn debug_output_hides_keys() {
        let config = Config::from_lookup(lookup(&[
            ("API_KEY", "super-secret"),
            ("OPENAI_API_KEY", "sk-hidden"),
        ]))
        .unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(!debug.contains("sk-hidden"));
    }
}
