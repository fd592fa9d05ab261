//! Settings Models
//!
//! Application configuration and settings data structures.

use contract_risk_llm::{ProviderConfig, ProviderType, ProxyConfig};
use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, AppResult};

/// Application configuration stored in config.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// LLM provider: "gemini" or "anthropic"
    pub provider: ProviderType,
    /// Model for the provider
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Base URL override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Maximum tokens to generate per request
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Whole-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Optional outbound proxy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::Gemini,
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: None,
            max_tokens: 8192,
            temperature: 0.2,
            request_timeout_secs: default_request_timeout_secs(),
            proxy: None,
        }
    }
}

/// Partial update applied by `config set`. The proxy is edited in the file.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub provider: Option<ProviderType>,
    pub model: Option<String>,
    pub api_key_env: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub request_timeout_secs: Option<u64>,
}

impl SettingsUpdate {
    /// True when the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.provider.is_none()
            && self.model.is_none()
            && self.api_key_env.is_none()
            && self.base_url.is_none()
            && self.max_tokens.is_none()
            && self.temperature.is_none()
            && self.request_timeout_secs.is_none()
    }
}

impl AppConfig {
    /// Apply a partial update to the configuration
    pub fn apply_update(&mut self, update: SettingsUpdate) {
        if let Some(provider) = update.provider {
            self.provider = provider;
        }
        if let Some(model) = update.model {
            self.model = model;
        }
        if let Some(env) = update.api_key_env {
            self.api_key_env = env;
        }
        if let Some(base_url) = update.base_url {
            // An empty string clears the override
            self.base_url = Some(base_url).filter(|url| !url.trim().is_empty());
        }
        if let Some(max_tokens) = update.max_tokens {
            self.max_tokens = max_tokens;
        }
        if let Some(temperature) = update.temperature {
            self.temperature = temperature;
        }
        if let Some(timeout) = update.request_timeout_secs {
            self.request_timeout_secs = timeout;
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }

        if self.api_key_env.trim().is_empty() {
            return Err("api_key_env must name an environment variable".to_string());
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!(
                "Invalid temperature: {}. Must be between 0 and 2",
                self.temperature
            ));
        }

        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }

        if self.request_timeout_secs < 5 {
            return Err("request_timeout_secs must be at least 5 seconds".to_string());
        }

        Ok(())
    }

    /// Resolve the API key from the environment and build the provider config.
    pub fn provider_config(&self) -> AppResult<ProviderConfig> {
        let api_key = std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AppError::config(format!(
                    "Environment variable {} is not set",
                    self.api_key_env
                ))
            })?;
        Ok(self.to_provider_config(api_key))
    }

    /// Build the provider config with an explicit API key.
    pub fn to_provider_config(&self, api_key: impl Into<String>) -> ProviderConfig {
        ProviderConfig {
            provider: self.provider,
            api_key: Some(api_key.into()),
            base_url: self.base_url.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            timeout_secs: self.request_timeout_secs,
            proxy: self.proxy.clone(),
        }
    }
}
