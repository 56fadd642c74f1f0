//! LLM-backed completion executor.
//!
//! Production implementation of [`CompletionExecutor`] on top of rig's
//! OpenAI-compatible provider. Tests and embedding applications supply
//! their own implementations instead.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::openai;

use crate::models::CompletionExecutor;

/// Completion executor backed by a rig provider client.
pub struct RigCompletionExecutor {
    client: openai::Client,
    model: String,
}

impl RigCompletionExecutor {
    /// Create an executor for the given API key and model identifier.
    pub fn new(api_key: &str, model: impl Into<String>) -> Self {
        let model = model.into();
        tracing::info!("Completion executor using model {}", model);
        Self {
            client: openai::Client::new(api_key).expect("failed to construct OpenAI client"),
            model,
        }
    }
}

#[async_trait]
impl CompletionExecutor for RigCompletionExecutor {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f64,
    ) -> anyhow::Result<String> {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(system_prompt)
            .temperature(temperature)
            .build();

        let response = agent
            .prompt(user_prompt)
            .await
            .map_err(|e| anyhow::anyhow!("Completion request failed: {}", e))?;

        Ok(response)
    }
}
