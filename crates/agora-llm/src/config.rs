// Model client configuration: one YAML document describes the provider,
// the model, and sampling defaults. Read once at session start.

use crate::azure_openai::AzureOpenAIClient;
use crate::openai::OpenAIClient;
use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse};
use crate::types::Message;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Provider-specific connection settings, tagged by the `provider` key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum ProviderDetails {
    OpenAI {
        /// Override for OpenAI-compatible endpoints
        #[serde(skip_serializing_if = "Option::is_none")]
        base_url: Option<String>,
    },
    #[serde(rename = "azure_openai")]
    AzureOpenAI {
        endpoint: String,
        api_version: String,
    },
}

/// Contents of the model configuration document.
///
/// ```yaml
/// provider: openai
/// model: gpt-4o-mini
/// api_key_env: OPENAI_API_KEY
/// temperature: 0.7
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(flatten)]
    pub provider: ProviderDetails,

    pub model: String,

    /// Inline key; prefer `api_key_env` outside of tests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Name of the environment variable holding the key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ModelConfig {
    pub fn from_yaml_str(doc: &str) -> Result<Self> {
        serde_yaml::from_str(doc).context("Failed to parse model config document")
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let doc = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model config from {}", path.display()))?;
        Self::from_yaml_str(&doc)
    }

    /// Resolve the API key: inline value first, then the named env var.
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }
        if let Some(var) = &self.api_key_env {
            return std::env::var(var)
                .with_context(|| format!("Environment variable {} is not set", var));
        }
        Err(anyhow!("Model config needs api_key or api_key_env"))
    }

    pub fn provider_name(&self) -> &'static str {
        match self.provider {
            ProviderDetails::OpenAI { .. } => "openai",
            ProviderDetails::AzureOpenAI { .. } => "azure_openai",
        }
    }
}

/// Factory for creating chat clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    pub fn create_chat_client(config: &ModelConfig) -> Result<Arc<dyn ChatClient>> {
        match &config.provider {
            ProviderDetails::OpenAI { base_url } => {
                let mut client = OpenAIClient::new(config.resolve_api_key()?)?;
                if let Some(url) = base_url {
                    client = client.with_base_url(url.clone());
                }
                Ok(Arc::new(client))
            }
            ProviderDetails::AzureOpenAI { endpoint, api_version } => {
                let client = AzureOpenAIClient::builder()
                    .api_key(config.resolve_api_key()?)
                    .endpoint(endpoint.clone())
                    .api_version(api_version.clone())
                    .build()?;
                Ok(Arc::new(client))
            }
        }
    }
}

/// A chat client bundled with its configured model name and sampling
/// defaults. Cheap to clone; this is what agents hold.
#[derive(Clone)]
pub struct ModelClient {
    client: Arc<dyn ChatClient>,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl ModelClient {
    pub fn new(client: Arc<dyn ChatClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let client = ClientFactory::create_chat_client(config)?;
        Ok(Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let config = ModelConfig::from_yaml_file(path)?;
        Self::from_config(&config)
    }

    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn client(&self) -> &Arc<dyn ChatClient> {
        &self.client
    }

    /// Options pre-seeded with the configured sampling defaults
    pub fn options(&self) -> ChatOptions {
        let mut options = ChatOptions::new();
        if let Some(temp) = self.temperature {
            options = options.temperature(temp);
        }
        if let Some(tokens) = self.max_tokens {
            options = options.max_tokens(tokens);
        }
        options
    }

    /// Request against the configured model with default options
    pub fn request(&self, messages: Vec<Message>) -> ChatRequest {
        ChatRequest::new(self.model.clone(), messages).with_options(self.options())
    }

    /// One-shot non-streaming completion with default options
    pub async fn chat(&self, messages: Vec<Message>) -> Result<ChatResponse> {
        self.client.chat(self.request(messages)).await
    }
}

impl std::fmt::Debug for ModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelClient")
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_provider_name() {
        let config = ModelConfig {
            provider: ProviderDetails::OpenAI { base_url: None },
            model: "gpt-4o-mini".to_string(),
            api_key: Some("test-key".to_string()),
            api_key_env: None,
            temperature: None,
            max_tokens: None,
        };
        assert_eq!(config.provider_name(), "openai");
    }

    #[test]
    fn test_azure_provider_name() {
        let config = ModelConfig {
            provider: ProviderDetails::AzureOpenAI {
                endpoint: "https://my-resource.openai.azure.com".to_string(),
                api_version: "2024-02-15-preview".to_string(),
            },
            model: "my-gpt4-deployment".to_string(),
            api_key: Some("test-key".to_string()),
            api_key_env: None,
            temperature: None,
            max_tokens: None,
        };
        assert_eq!(config.provider_name(), "azure_openai");
    }

    #[test]
    fn test_inline_api_key_wins_over_env() {
        let config = ModelConfig {
            provider: ProviderDetails::OpenAI { base_url: None },
            model: "gpt-4o-mini".to_string(),
            api_key: Some("inline-key".to_string()),
            api_key_env: Some("AGORA_UNSET_TEST_VAR".to_string()),
            temperature: None,
            max_tokens: None,
        };
        assert_eq!(config.resolve_api_key().unwrap(), "inline-key");
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let config = ModelConfig {
            provider: ProviderDetails::OpenAI { base_url: None },
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            api_key_env: None,
            temperature: None,
            max_tokens: None,
        };
        assert!(config.resolve_api_key().is_err());
    }
}
