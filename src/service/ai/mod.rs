mod error;
mod model;
pub mod parser;
pub mod prompt;

pub use error::AiError;
pub use model::AiOutcome;

use reqwest::Client;

use crate::{config::AiConfig, utils::http::create_ai_client};

use model::{ChatMessage, ChatRequest, ChatResponse};

/// OpenRouter-backed contract generator.
#[derive(Clone)]
pub struct AiService {
    client: Client,
    config: AiConfig,
}

impl AiService {
    pub fn new(config: AiConfig) -> Self {
        info!("Initializing AI service with model {}", config.model);
        Self {
            client: create_ai_client(),
            config,
        }
    }

    pub async fn generate_contract(&self, description: &str) -> Result<AiOutcome, AiError> {
        let messages = vec![
            ChatMessage::system(prompt::GENERATION_SYSTEM_PROMPT),
            ChatMessage::user(prompt::generation_prompt(description)),
        ];

        self.request_completion(messages).await
    }

    pub async fn optimize_contract(
        &self,
        current_code: &str,
        request: &str,
    ) -> Result<AiOutcome, AiError> {
        let messages = vec![
            ChatMessage::system(prompt::OPTIMIZATION_SYSTEM_PROMPT),
            ChatMessage::user(prompt::optimization_prompt(current_code, request)),
        ];

        self.request_completion(messages).await
    }

    async fn request_completion(&self, messages: Vec<ChatMessage>) -> Result<AiOutcome, AiError> {
        let request = ChatRequest::new(&self.config.model, messages);

        debug!("Requesting completion from {}", self.config.model);
        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|body| {
                    body.get("error")?
                        .get("message")?
                        .as_str()
                        .map(String::from)
                })
                .unwrap_or_else(|| format!("API request failed: {}", status));
            return Err(AiError::Api(message));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| AiError::Request(e.to_string()))?;

        let content = completion
            .choices
            .first()
            .map(|choice| choice.message.content.as_str())
            .ok_or(AiError::EmptyCompletion)?;

        debug!("Completion used {} tokens", completion.usage.total_tokens);
        Ok(parser::parse_completion(content, completion.usage.total_tokens))
    }
}
