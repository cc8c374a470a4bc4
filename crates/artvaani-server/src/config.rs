//! Server configuration
//!
//! Read once at startup from the shuttle secret store.

use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/reverse";
pub const DEFAULT_GEOCODER_USER_AGENT: &str = "ArtVaani-Verification/1.0";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub gemini_api_key: String,
    pub gemini_model: String,
    /// Bearer token for `/artvaani/*`; `None` disables auth
    pub api_key: Option<String>,
    pub geocoder_url: String,
    pub geocoder_user_agent: String,
    pub http_timeout: Duration,
}

impl ServerConfig {
    pub fn from_secrets(secrets: &shuttle_runtime::SecretStore) -> Result<Self> {
        Self::from_lookup(|key| secrets.get(key))
    }

    /// Build from any key lookup (secret store, environment, test map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let gemini_api_key = get("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?;

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("HTTP_TIMEOUT_SECS is not a number: {}", raw))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            gemini_api_key,
            gemini_model: get("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            api_key: get("ARTVAANI_API_KEY"),
            geocoder_url: get("GEOCODER_URL").unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string()),
            geocoder_user_agent: get("GEOCODER_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_GEOCODER_USER_AGENT.to_string()),
            http_timeout: Duration::from_secs(http_timeout),
        })
    }
}
