//! Provider configuration from the environment
//!
//! The demo binaries call `dotenv` first, then build their model provider
//! from `OPENAI_API_KEY` and friends. Setting `AZURE_OPENAI_ENDPOINT` routes
//! completions through an Azure deployment instead of the standard endpoint.

use std::env;
use std::sync::Arc;

use async_openai::config::{AzureConfig, OpenAIConfig};
use async_openai::Client;

use crate::error::{AgentsError, Result};
use crate::model::{ModelProvider, OpenAIProvider};

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_AZURE_API_VERSION: &str = "2025-03-01-preview";

/// Azure-specific endpoint settings.
#[derive(Debug, Clone)]
pub struct AzureSettings {
    pub endpoint: String,
    pub deployment: String,
    pub api_version: String,
}

/// Everything needed to construct a model provider.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub api_key: String,
    pub model: String,
    pub azure: Option<AzureSettings>,
}

impl ProviderSettings {
    /// Read settings from the process environment.
    ///
    /// `OPENAI_API_KEY` is required. `OPENAI_MODEL` overrides the default
    /// model; `AZURE_OPENAI_ENDPOINT` (with optional
    /// `AZURE_OPENAI_DEPLOYMENT` and `AZURE_OPENAI_API_VERSION`) switches to
    /// an Azure deployment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|k| !k.is_empty())
            .ok_or(AgentsError::MissingApiKey {
                var: "OPENAI_API_KEY",
            })?;

        let azure = lookup("AZURE_OPENAI_ENDPOINT")
            .filter(|e| !e.is_empty())
            .map(|endpoint| AzureSettings {
                endpoint,
                deployment: lookup("AZURE_OPENAI_DEPLOYMENT")
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_version: lookup("AZURE_OPENAI_API_VERSION")
                    .unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string()),
            });

        let model = lookup("OPENAI_MODEL")
            .filter(|m| !m.is_empty())
            .or_else(|| azure.as_ref().map(|a| a.deployment.clone()))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        Ok(Self {
            api_key,
            model,
            azure,
        })
    }

    /// Build the provider these settings describe.
    pub fn provider(&self) -> Arc<dyn ModelProvider> {
        match &self.azure {
            Some(azure) => {
                let config = AzureConfig::new()
                    .with_api_base(&azure.endpoint)
                    .with_api_key(&self.api_key)
                    .with_deployment_id(&azure.deployment)
                    .with_api_version(&azure.api_version);
                Arc::new(OpenAIProvider::with_client(
                    Client::with_config(config),
                    &azure.deployment,
                ))
            }
            None => {
                let config = OpenAIConfig::new().with_api_key(&self.api_key);
                Arc::new(OpenAIProvider::with_client(
                    Client::with_config(config),
                    &self.model,
                ))
            }
        }
    }
}
