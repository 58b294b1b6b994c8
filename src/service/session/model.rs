use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::service::chain::DeploymentOutcome;

/// Optimization passes a session gets before the flow moves on to
/// deployment.
pub const MAX_OPTIMIZATIONS: u32 = 3;

pub const WELCOME_MESSAGE: &str = "👋 Welcome to TEN dApp Generator! I'll help you create a privacy-focused smart contract for the TEN Network.\n\nPlease describe your dApp idea in detail. For example:\n- What's the main purpose?\n- What features do you need?\n- What kind of data needs to be private?\n\nI'll generate a secure smart contract based on your requirements.";

/// Wizard phase. The flow is DESCRIPTION, optionally a few OPTIMIZATION
/// loops, then WALLET and COMPLETE. Errors stay messages and never get a
/// phase of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowState {
    Description,
    Optimization,
    Wallet,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    System,
    User,
    Contract,
    Error,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub char_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
}

impl Message {
    fn new(kind: MessageKind, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            content: content.into(),
            metadata: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageKind::System, content)
    }

    pub fn user(content: impl Into<String>, char_count: usize) -> Self {
        let mut message = Self::new(MessageKind::User, content);
        message.metadata = Some(MessageMetadata {
            char_count: Some(char_count),
            ..Default::default()
        });
        message
    }

    pub fn contract(content: impl Into<String>) -> Self {
        Self::new(MessageKind::Contract, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(MessageKind::Error, content)
    }

    pub fn with_tokens(mut self, tokens_used: u32) -> Self {
        self.metadata.get_or_insert_with(Default::default).tokens_used = Some(tokens_used);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentStatus {
    Idle,
    Deploying,
    Deployed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentState {
    pub status: DeploymentStatus,
    pub address: Option<String>,
    pub error: Option<String>,
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abi: Option<String>,
}

impl DeploymentState {
    pub fn deploying() -> Self {
        Self {
            status: DeploymentStatus::Deploying,
            address: None,
            error: None,
            tx_hash: None,
            abi: None,
        }
    }

    pub fn deployed(outcome: &DeploymentOutcome) -> Self {
        Self {
            status: DeploymentStatus::Deployed,
            address: Some(outcome.address.clone()),
            error: None,
            tx_hash: Some(outcome.tx_hash.clone()),
            abi: Some(outcome.abi.to_string()),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: DeploymentStatus::Error,
            address: None,
            error: Some(error.into()),
            tx_hash: None,
            abi: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationRecord {
    pub description: String,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationLog {
    pub attempts: u32,
    pub remaining: u32,
    pub history: Vec<OptimizationRecord>,
}

impl Default for OptimizationLog {
    fn default() -> Self {
        Self {
            attempts: 0,
            remaining: MAX_OPTIMIZATIONS,
            history: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub total: u32,
}

/// Branch choice offered once a contract exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractAction {
    Deploy,
    Optimize,
    ExitOptimization,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub user_id: String,
    pub messages: Vec<Message>,
    pub current_state: FlowState,
    pub contract: Option<String>,
    pub deployment: Option<DeploymentState>,
    pub user_address: Option<String>,
    pub optimizations: OptimizationLog,
    pub token_usage: TokenUsage,
    pub generation_attempts: u32,
}

/// State transitions. Everything that mutates a session goes through
/// `WizardState::apply`, so the transition rules live in one place.
#[derive(Debug, Clone)]
pub enum Action {
    AddMessage(Message),
    SetMessages(Vec<Message>),
    SetFlow(FlowState),
    SetContract(String),
    SetUserAddress(String),
    SetDeployment(DeploymentState),
    AddOptimization { description: String, result: String },
    UpdateTokenUsage { tokens_used: u32 },
    Reset,
}

impl WizardState {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            messages: vec![Message::system(WELCOME_MESSAGE)],
            current_state: FlowState::Description,
            contract: None,
            deployment: None,
            user_address: None,
            optimizations: OptimizationLog::default(),
            token_usage: TokenUsage::default(),
            generation_attempts: 0,
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::AddMessage(message) => self.messages.push(message),
            Action::SetMessages(messages) => self.messages = messages,
            Action::SetFlow(state) => self.current_state = state,
            Action::SetContract(code) => self.contract = Some(code),
            Action::SetUserAddress(address) => self.user_address = Some(address),
            Action::SetDeployment(deployment) => self.deployment = Some(deployment),
            Action::AddOptimization { description, result } => {
                self.optimizations.attempts += 1;
                self.optimizations.remaining = self.optimizations.remaining.saturating_sub(1);
                self.optimizations
                    .history
                    .push(OptimizationRecord { description, result });
            }
            Action::UpdateTokenUsage { tokens_used } => {
                self.token_usage.total = self.token_usage.total.saturating_add(tokens_used);
            }
            Action::Reset => {
                let user_id = std::mem::take(&mut self.user_id);
                *self = WizardState::new(&user_id);
            }
        }
    }
}
