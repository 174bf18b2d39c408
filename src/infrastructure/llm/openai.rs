use async_trait::async_trait;
use rig::client::{CompletionClient, ProviderClient};
use rig::completion::Prompt;
use rig::providers::openai;
use std::time::Duration;

use crate::domain::{ports::ChatService, DomainError};
use crate::infrastructure::config::LlmConfig;

/// Chat completion through the OpenAI provider.
///
/// The system instruction is sent as the agent preamble and the question as
/// the single user message; the first choice's text comes back.
pub struct OpenAiChat {
    model: String,
    temperature: f64,
    timeout: Duration,
}

impl OpenAiChat {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: 0.7,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: config.temperature,
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ChatService for OpenAiChat {
    async fn complete_with_system(
        &self,
        system: &str,
        prompt: &str,
    ) -> Result<String, DomainError> {
        let client = openai::Client::from_env();
        let agent = client
            .agent(&self.model)
            .preamble(system)
            .temperature(self.temperature)
            .build();

        tokio::time::timeout(self.timeout, agent.prompt(prompt))
            .await
            .map_err(|_| DomainError::timeout("Chat completion timed out"))?
            .map_err(|e| DomainError::external(e.to_string()))
    }
}
