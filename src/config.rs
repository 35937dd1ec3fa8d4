//! Service configuration loaded from the environment.

use crate::{Error, Result};
use std::time::Duration;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 15 * 60;
const DEFAULT_RATE_LIMIT_MAX: usize = 100;
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_VISION_MODEL: &str = "gpt-4-vision-preview";
const DEFAULT_OPENAI_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub chat_model: String,
    pub vision_model: String,
    pub openai_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    pub rate_limit: RateLimitConfig,
    /// When set, `/api/ai/*` requires a matching `X-API-Key` header.
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_secs(DEFAULT_RATE_LIMIT_WINDOW_SECS),
            max_requests: DEFAULT_RATE_LIMIT_MAX,
        }
    }
}

impl Config {
    /// Load `.env` (if present) and read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_api_key = var("OPENAI_API_KEY")
            .ok_or_else(|| Error::Config("OPENAI_API_KEY not set".to_string()))?;

        Ok(Self {
            openai_api_key,
            openai_base_url: var("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            chat_model: var("OPENAI_CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            vision_model: var("OPENAI_VISION_MODEL")
                .unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
            openai_timeout: Duration::from_secs(parse_or(
                "OPENAI_TIMEOUT_SECS",
                var("OPENAI_TIMEOUT_SECS"),
                DEFAULT_OPENAI_TIMEOUT_SECS,
            )?),
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or("PORT", var("PORT"), DEFAULT_PORT)?,
            cors_origin: var("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            rate_limit: RateLimitConfig {
                window: Duration::from_secs(parse_or(
                    "RATE_LIMIT_WINDOW_SECS",
                    var("RATE_LIMIT_WINDOW_SECS"),
                    DEFAULT_RATE_LIMIT_WINDOW_SECS,
                )?),
                max_requests: parse_or("RATE_LIMIT_MAX", var("RATE_LIMIT_MAX"), DEFAULT_RATE_LIMIT_MAX)?,
            },
            api_key: var("API_KEY"),
        })
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid {} '{}': {}", key, value, e))),
    }
}
