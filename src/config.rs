//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

/// Greeting placed at the top of every new conversation.
pub const DEFAULT_GREETING: &str =
    "Hello, I'm your Alzheimer's Health Assistant 🤖. How can I help you today?";

/// Where and how to reach the remote assessment service.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Base URL, without trailing slash (e.g. `http://localhost:5000`).
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl GatewayConfig {
    /// Load from `CARE_ASSIST_BASE_URL` and `CARE_ASSIST_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let base_url = std::env::var("CARE_ASSIST_BASE_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.base_url);
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                key: "CARE_ASSIST_BASE_URL".to_string(),
                message: format!("expected an http(s) URL, got {base_url:?}"),
            });
        }

        let timeout = match std::env::var("CARE_ASSIST_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
                    key: "CARE_ASSIST_TIMEOUT_SECS".to_string(),
                    message: format!("{e}"),
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => defaults.timeout,
        };

        Ok(Self { base_url, timeout })
    }

    /// Full URL for an API path such as `/api/predict`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Conversation-level settings.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// First assistant message in the log.
    pub greeting: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}

impl AssistantConfig {
    /// Load from `CARE_ASSIST_GREETING`, falling back to the default greeting.
    pub fn from_env() -> Self {
        let greeting = std::env::var("CARE_ASSIST_GREETING")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GREETING.to_string());
        Self { greeting }
    }
}
