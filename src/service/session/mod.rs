mod error;
mod model;

pub use error::SessionError;
pub use model::{
    Action, ContractAction, DeploymentState, DeploymentStatus, FlowState, Message, MessageKind,
    MessageMetadata, OptimizationLog, OptimizationRecord, TokenUsage, WizardState,
    MAX_OPTIMIZATIONS, WELCOME_MESSAGE,
};

use uuid::Uuid;

use crate::service::{
    ai::{AiError, AiOutcome, AiService},
    chain::ChainService,
    quota::{self, QuotaService, RequestKind},
};
use crate::storage::MemoryCache;

/// Character cap for the initial description input.
pub const DESCRIPTION_MAX_CHARS: usize = 1_000;
/// Character cap for an optimization request.
pub const OPTIMIZATION_MAX_CHARS: usize = 400;

const SESSION_LIMIT_MESSAGE: &str = "Token limit reached. Cannot generate more content.";

/// Drives one wizard conversation per session. Sessions live in process
/// memory only; a restart starts everyone over, which is acceptable for a
/// flow that takes minutes.
#[derive(Clone)]
pub struct SessionService {
    sessions: MemoryCache<WizardState>,
    quota: QuotaService,
    ai: AiService,
    chain: ChainService,
}

impl SessionService {
    pub fn new(
        cache_capacity: usize,
        quota: QuotaService,
        ai: AiService,
        chain: ChainService,
    ) -> Self {
        info!("Initializing session service");
        Self {
            sessions: MemoryCache::new(cache_capacity),
            quota,
            ai,
            chain,
        }
    }

    pub fn create(&self, user_id: &str) -> (String, WizardState) {
        let session_id = Uuid::new_v4().to_string();
        let state = WizardState::new(user_id);
        self.sessions.set(&session_id, &state);
        debug!("Created session {} for user {}", session_id, user_id);
        (session_id, state)
    }

    pub fn get(&self, session_id: &str) -> Option<WizardState> {
        self.sessions.get(session_id)
    }

    pub fn reset(&self, session_id: &str) -> Result<WizardState, SessionError> {
        let mut state = self.load(session_id)?;
        state.apply(Action::Reset);
        self.save(session_id, &state);
        Ok(state)
    }

    fn load(&self, session_id: &str) -> Result<WizardState, SessionError> {
        self.sessions.get(session_id).ok_or(SessionError::NotFound)
    }

    fn save(&self, session_id: &str, state: &WizardState) {
        self.sessions.set(session_id, state);
    }

    /// Token class for the next request. Regenerations after a failed
    /// attempt get the smaller retry envelope.
    fn request_kind(state: &WizardState) -> RequestKind {
        match state.current_state {
            FlowState::Optimization => RequestKind::Optimization,
            _ if state.generation_attempts > 0 => RequestKind::Retry,
            _ => RequestKind::Initial,
        }
    }

    /// Handles one chat input: admission checks, the user's message, the
    /// model round trip and the resulting transition. Quota denials come
    /// back as error messages in the transcript, not as `Err`.
    pub async fn submit(&self, session_id: &str, input: &str) -> Result<WizardState, SessionError> {
        let mut state = self.load(session_id)?;

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyInput);
        }

        let max_chars = match state.current_state {
            FlowState::Description if state.contract.is_some() => {
                return Err(SessionError::Phase(
                    "A contract is already generated; deploy it or request an optimization"
                        .to_string(),
                ));
            }
            FlowState::Description => DESCRIPTION_MAX_CHARS,
            FlowState::Optimization => OPTIMIZATION_MAX_CHARS,
            FlowState::Wallet | FlowState::Complete => {
                return Err(SessionError::Phase(
                    "The contract is past the drafting phase".to_string(),
                ));
            }
        };
        if input.chars().count() > max_chars {
            return Err(SessionError::InputTooLong(max_chars));
        }

        let kind = Self::request_kind(&state);

        if !quota::can_make_request(state.token_usage.total, kind) {
            state.apply(Action::AddMessage(Message::error(SESSION_LIMIT_MESSAGE)));
            self.save(session_id, &state);
            return Ok(state);
        }

        let required = quota::estimate_request_tokens(trimmed, kind);
        let status = self.quota.check_tokens(&state.user_id, required).await?;
        if !status.can_use {
            state.apply(Action::AddMessage(Message::error(format!(
                "Token limit reached. Your daily allowance resets in {}.",
                quota::format_time_until(status.next_reset_time)
            ))));
            self.save(session_id, &state);
            return Ok(state);
        }

        state.apply(Action::AddMessage(Message::user(
            trimmed,
            input.chars().count(),
        )));
        self.save(session_id, &state);

        let outcome = match state.current_state {
            FlowState::Optimization => {
                let contract = state.contract.clone().ok_or_else(|| {
                    SessionError::Phase("No contract available to optimize".to_string())
                })?;
                self.ai.optimize_contract(&contract, trimmed).await
            }
            _ => self.ai.generate_contract(trimmed).await,
        };

        self.handle_outcome(session_id, trimmed, outcome).await
    }

    /// Applies a completed model round trip to the session. Split from
    /// `submit` so flow scenarios are testable without a live model.
    pub(crate) async fn handle_outcome(
        &self,
        session_id: &str,
        input: &str,
        outcome: Result<AiOutcome, AiError>,
    ) -> Result<WizardState, SessionError> {
        let mut state = self.load(session_id)?;

        if state.current_state == FlowState::Description {
            state.generation_attempts += 1;
        }

        let outcome = match outcome {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("AI request failed: {}", e);
                state.apply(Action::AddMessage(Message::error(format!(
                    "Error: {}\n\nPlease try again or try rephrasing your request.",
                    e
                ))));
                self.save(session_id, &state);
                return Ok(state);
            }
        };

        let tokens_used = outcome.tokens_used();
        state.apply(Action::UpdateTokenUsage { tokens_used });
        if let Err(e) = self.quota.record_usage(&state.user_id, tokens_used).await {
            // The transcript survives a metering failure; the usage write is
            // retried implicitly by the next request.
            warn!("Failed to record token usage for {}: {}", state.user_id, e);
        }

        match outcome {
            AiOutcome::Contract { code, explanation, .. } => {
                if state.current_state == FlowState::Optimization {
                    state.apply(Action::AddOptimization {
                        description: input.to_string(),
                        result: code.clone(),
                    });
                    state.apply(Action::AddMessage(
                        Message::system(format!(
                            "✅ Contract optimized successfully!\n\n{}",
                            explanation
                        ))
                        .with_tokens(tokens_used),
                    ));
                    state.apply(Action::SetContract(code));
                    if state.optimizations.remaining == 0 {
                        state.apply(Action::SetFlow(FlowState::Wallet));
                    }
                } else {
                    state.apply(Action::AddMessage(
                        Message::system(format!(
                            "✅ Contract generated successfully! Here are the key features:\n\n{}\n\nPlease review the contract below and choose whether to deploy it or optimize it further.",
                            explanation
                        ))
                        .with_tokens(tokens_used),
                    ));
                    state.apply(Action::SetContract(code));
                }
            }
            AiOutcome::Message { content, .. } => {
                state.apply(Action::AddMessage(
                    Message::system(content).with_tokens(tokens_used),
                ));
            }
        }

        self.save(session_id, &state);
        Ok(state)
    }

    /// Branch choice once a contract exists: deploy it, refine it, or
    /// step back out of the optimization loop.
    pub fn choose(
        &self,
        session_id: &str,
        action: ContractAction,
    ) -> Result<WizardState, SessionError> {
        let mut state = self.load(session_id)?;

        match action {
            ContractAction::Deploy => {
                if state.contract.is_none() {
                    return Err(SessionError::Phase(
                        "Generate a contract before deploying".to_string(),
                    ));
                }
                state.apply(Action::SetFlow(FlowState::Wallet));
            }
            ContractAction::Optimize => {
                if state.contract.is_none() {
                    return Err(SessionError::Phase(
                        "Generate a contract before optimizing".to_string(),
                    ));
                }
                if state.optimizations.remaining == 0 {
                    return Err(SessionError::Phase(
                        "No optimization attempts remaining".to_string(),
                    ));
                }
                state.apply(Action::AddMessage(Message::system(
                    "Please describe the changes you would like to make to the contract.",
                )));
                state.apply(Action::SetFlow(FlowState::Optimization));
            }
            ContractAction::ExitOptimization => {
                if state.current_state != FlowState::Optimization {
                    return Err(SessionError::Phase(
                        "Not in the optimization flow".to_string(),
                    ));
                }
                state.apply(Action::SetFlow(FlowState::Description));
                state.apply(Action::AddMessage(Message::system(
                    "What would you like to do with your contract?",
                )));
            }
        }

        self.save(session_id, &state);
        Ok(state)
    }

    /// Deploys the session's contract and hands ownership to the user's
    /// wallet. The address is validated before anything touches the
    /// network; chain failures surface as transcript messages.
    pub async fn deploy(
        &self,
        session_id: &str,
        wallet_address: &str,
    ) -> Result<WizardState, SessionError> {
        let mut state = self.load(session_id)?;

        let contract = match state.contract.clone() {
            Some(contract) => contract,
            None => {
                return Err(SessionError::Phase(
                    "Generate a contract before deploying".to_string(),
                ));
            }
        };
        if state
            .deployment
            .as_ref()
            .is_some_and(|d| d.status == DeploymentStatus::Deploying)
        {
            return Err(SessionError::Phase(
                "Deployment already in progress".to_string(),
            ));
        }

        let wallet_address = wallet_address.trim();
        if !ChainService::validate_address(wallet_address) {
            state.apply(Action::AddMessage(Message::error(
                "Deployment failed: Invalid address format",
            )));
            state.apply(Action::SetDeployment(DeploymentState::failed(
                "Invalid address format",
            )));
            self.save(session_id, &state);
            return Ok(state);
        }

        if !self.chain.is_wallet_ready().await {
            state.apply(Action::AddMessage(Message::error(
                "Deployment failed: Deployer wallet is not ready",
            )));
            state.apply(Action::SetDeployment(DeploymentState::failed(
                "Deployer wallet is not ready",
            )));
            self.save(session_id, &state);
            return Ok(state);
        }

        state.apply(Action::SetDeployment(DeploymentState::deploying()));
        self.save(session_id, &state);

        let outcome = match self.chain.deploy(&contract).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Deployment failed: {}", e);
                state.apply(Action::AddMessage(Message::error(format!(
                    "Deployment failed: {}",
                    e
                ))));
                state.apply(Action::SetDeployment(DeploymentState::failed(e.to_string())));
                self.save(session_id, &state);
                return Ok(state);
            }
        };

        let abi_pretty = serde_json::to_string_pretty(&outcome.abi)
            .unwrap_or_else(|_| outcome.abi.to_string());
        state.apply(Action::AddMessage(Message::system(format!(
            "✅ Contract deployed successfully!\n\nContract Address: {}\n\n🚀 To interact with this dApp on TEN Network:\n\n1. Visit TEN Gateway at https://testnet.ten.xyz\n2. Add TEN Network to your wallet\n3. Import your contract using the ABI below.",
            outcome.address
        ))));
        state.apply(Action::AddMessage(Message::contract(abi_pretty)));
        state.apply(Action::SetDeployment(DeploymentState::deployed(&outcome)));
        self.save(session_id, &state);

        if let Err(e) = self.chain.transfer_ownership(&outcome.address, wallet_address).await {
            error!("Ownership transfer failed: {}", e);
            state.apply(Action::AddMessage(Message::error(format!(
                "Deployment failed: {}",
                e
            ))));
            state.apply(Action::SetDeployment(DeploymentState::failed(e.to_string())));
            self.save(session_id, &state);
            return Ok(state);
        }

        state.apply(Action::SetUserAddress(wallet_address.to_string()));
        state.apply(Action::AddMessage(Message::system(format!(
            "✅ Ownership transferred to {}. Your dApp is ready!",
            wallet_address
        ))));
        state.apply(Action::SetFlow(FlowState::Complete));
        self.save(session_id, &state);

        Ok(state)
    }
}
