//! Application State
//!
//! Loaded configuration plus the factory that wires a provider, the LLM-backed
//! analyst and the review pipeline together.

use std::path::PathBuf;
use std::sync::Arc;

use contract_risk_core::ContractAnalyst;
use contract_risk_llm::{create_provider, LlmProvider};

use crate::models::settings::AppConfig;
use crate::services::analyst::LlmContractAnalyst;
use crate::services::review::ReviewPipeline;
use crate::storage::ConfigService;
use crate::utils::error::AppResult;

/// Application state for one process
pub struct AppState {
    config: ConfigService,
}

impl AppState {
    /// Load configuration from `config_path`, or from the default location
    pub fn load(config_path: Option<PathBuf>) -> AppResult<Self> {
        let config = match config_path {
            Some(path) => ConfigService::with_path(path)?,
            None => ConfigService::new()?,
        };
        Ok(Self { config })
    }

    pub fn config(&self) -> &AppConfig {
        self.config.get_config()
    }

    pub fn config_service(&self) -> &ConfigService {
        &self.config
    }

    pub fn config_service_mut(&mut self) -> &mut ConfigService {
        &mut self.config
    }

    /// Build the configured provider. Fails if the API key is not in the environment.
    pub fn provider(&self) -> AppResult<Arc<dyn LlmProvider>> {
        let provider_config = self.config().provider_config()?;
        let provider = create_provider(provider_config)?;
        tracing::info!(
            provider = provider.name(),
            model = provider.model(),
            "Using LLM provider"
        );
        Ok(provider)
    }

    /// Build the configured analyst on top of [`AppState::provider`].
    pub fn analyst(&self) -> AppResult<Arc<dyn ContractAnalyst>> {
        Ok(Arc::new(LlmContractAnalyst::new(self.provider()?)))
    }

    /// Build a fresh review pipeline on top of the configured analyst.
    pub fn pipeline(&self) -> AppResult<ReviewPipeline> {
        Ok(ReviewPipeline::new(self.analyst()?))
    }
}
