use std::{env, fmt, time::Duration};

use reqwest::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CHAT_PATH: &str = "/chat";
const HEALTH_PATH: &str = "/health";
const RESET_MEMORY_PATH: &str = "/reset-memory";

/// Philosopher API configuration sourced from the environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiConfigError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        let parsed =
            Url::parse(&base_url).map_err(|err| ApiConfigError::InvalidBaseUrl(err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiConfigError::InvalidBaseUrl(format!(
                "unsupported scheme {}",
                parsed.scheme()
            )));
        }

        Ok(Self { base_url, timeout })
    }

    pub fn from_env() -> Result<Self, ApiConfigError> {
        let base_url = env::var("PHILOAGENTS_API_URL")
            .map(|value| value.trim().to_string())
            .ok()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = env::var("PHILOAGENTS_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        Self::new(base_url, timeout)
    }

    pub fn chat_url(&self) -> String {
        format!("{}{}", self.base_url, CHAT_PATH)
    }

    pub fn health_url(&self) -> String {
        format!("{}{}", self.base_url, HEALTH_PATH)
    }

    pub fn reset_memory_url(&self) -> String {
        format!("{}{}", self.base_url, RESET_MEMORY_PATH)
    }
}

#[derive(Debug)]
pub enum ApiConfigError {
    InvalidBaseUrl(String),
    ClientBuild(String),
}

impl fmt::Display for ApiConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBaseUrl(message) => {
                write!(f, "invalid PHILOAGENTS_API_URL: {}", message)
            }
            Self::ClientBuild(message) => write!(f, "client build failure: {}", message),
        }
    }
}

impl std::error::Error for ApiConfigError {}
