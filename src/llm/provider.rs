use async_trait::async_trait;
use crate::config::LLMConfig;
use crate::types::{AppResult, LLMProvider, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

pub struct LLM {
    adapter: Box<dyn LLMAdapter>,
}

impl LLM {
    pub fn new(config: &LLMConfig) -> Self {
        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| config.provider.default_api_base().to_string());

        // Both supported providers speak the OpenAI chat-completions wire format
        let adapter: Box<dyn LLMAdapter> = match config.provider {
            LLMProvider::OpenAI | LLMProvider::OpenRouter => Box::new(
                crate::llm::openai::OpenAIAdapter::with_base_url(&config.api_key, &api_base),
            ),
        };

        Self { adapter }
    }
}

#[async_trait]
impl LLMAdapter for LLM {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }
}
