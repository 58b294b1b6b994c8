use serde::{Deserialize, Serialize};

/// What a completion turned into after parsing and validation. Only a
/// `Contract` may ever reach the compile and deploy path; everything else
/// stays a chat message.
#[derive(Debug, Clone, PartialEq)]
pub enum AiOutcome {
    Contract {
        code: String,
        explanation: String,
        tokens_used: u32,
    },
    Message {
        content: String,
        tokens_used: u32,
    },
}

impl AiOutcome {
    pub fn tokens_used(&self) -> u32 {
        match self {
            AiOutcome::Contract { tokens_used, .. } => *tokens_used,
            AiOutcome::Message { tokens_used, .. } => *tokens_used,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    #[allow(dead_code)]
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// OpenRouter chat completion request. The sampling parameters are tuned
/// low so regenerations of the same idea stay close to deterministic.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub repetition_penalty: f32,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: 0.1,
            top_p: 0.2,
            frequency_penalty: 0.3,
            presence_penalty: 0.3,
            repetition_penalty: 1.2,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
    pub usage: ChatUsage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatUsage {
    pub total_tokens: u32,
}
