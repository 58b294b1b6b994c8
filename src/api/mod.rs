mod error;
mod model;

pub use error::ApiError;

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    service::{chain::WalletStatus, compiler::CompiledContract, quota},
    state::AppState,
    storage::UserRecord,
    utils::storage_key,
};

use model::{
    AuthRequest, ChatRequest, CompileRequest, ContractActionRequest, CreateSessionRequest,
    DeployRequest, EstimateRequest, EstimateResponse, ResetRequest, SessionQuery,
    SessionResponse, StoreStatus, UserQuery, UserUpdateRequest,
};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/auth/discord", post(discord_auth))
        .route("/api/user", get(get_user).put(put_user))
        .route("/api/compile", post(compile))
        .route("/api/session", post(create_session).get(get_session))
        .route("/api/chat", post(chat))
        .route("/api/contract/action", post(contract_action))
        .route("/api/deploy", post(deploy))
        .route("/api/deploy/estimate", post(estimate_deploy))
        .route("/api/reset", post(reset))
        .route("/api/store/status", get(store_status))
        .route("/api/chain/status", get(chain_status))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Completes the Discord OAuth code flow. The upstream failure detail goes
/// to the log; the caller only learns that authentication failed.
async fn discord_auth(
    State(state): State<AppState>,
    Json(payload): Json<AuthRequest>,
) -> Result<Json<UserRecord>, ApiError> {
    match state.services.auth.login(&payload.code).await {
        Ok(record) => Ok(Json(record)),
        Err(e) => {
            error!("Discord login failed: {}", e);
            Err(ApiError::Internal("Authentication failed".to_string()))
        }
    }
}

/// Looks up a user record, applying the lazy usage-window reset on the way
/// out so a stale record is never served.
async fn get_user(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Json<Value>, ApiError> {
    let user_id = query
        .user_id
        .ok_or_else(|| ApiError::BadRequest("userId is required".to_string()))?;
    let key = storage_key(&user_id);

    let record = match state.store.get_user(&key).await? {
        Some(mut record) => {
            let now = Utc::now();
            if quota::refresh_window(&mut record, now) {
                record.last_updated = Some(now);
                state.store.upsert_user(&key, &record).await?;
                debug!("Reset usage window for {} on read", user_id);
            }
            Some(record)
        }
        None => None,
    };

    Ok(Json(json!({ "data": record })))
}

async fn put_user(
    State(state): State<AppState>,
    Json(payload): Json<UserUpdateRequest>,
) -> Result<Json<UserRecord>, ApiError> {
    let key = storage_key(&payload.user_id);

    match payload.user_data {
        Some(mut record) => {
            record.last_updated = Some(Utc::now());
            state.store.upsert_user(&key, &record).await?;
            Ok(Json(record))
        }
        None => {
            if state.store.get_user(&key).await?.is_none() {
                return Err(ApiError::NotFound("User not found".to_string()));
            }
            let record = state
                .services
                .quota
                .record_usage(&payload.user_id, payload.token_usage)
                .await?;
            Ok(Json(record))
        }
    }
}

async fn compile(
    State(state): State<AppState>,
    Json(payload): Json<CompileRequest>,
) -> Result<Json<CompiledContract>, ApiError> {
    let compiled = state.services.compiler.compile(&payload.source_code).await?;
    Ok(Json(compiled))
}

async fn create_session(
    State(state): State<AppState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let user_id = payload.user_id.trim();
    if user_id.is_empty() {
        return Err(ApiError::BadRequest("userId is required".to_string()));
    }

    let (session_id, wizard) = state.services.session.create(user_id);
    Ok(Json(SessionResponse {
        session_id,
        state: wizard,
    }))
}

async fn get_session(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session_id = query
        .session_id
        .ok_or_else(|| ApiError::BadRequest("sessionId is required".to_string()))?;
    let wizard = state
        .services
        .session
        .get(&session_id)
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;

    Ok(Json(SessionResponse {
        session_id,
        state: wizard,
    }))
}

async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let wizard = state
        .services
        .session
        .submit(&payload.session_id, &payload.input)
        .await?;

    Ok(Json(SessionResponse {
        session_id: payload.session_id,
        state: wizard,
    }))
}

async fn contract_action(
    State(state): State<AppState>,
    Json(payload): Json<ContractActionRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let wizard = state
        .services
        .session
        .choose(&payload.session_id, payload.action)?;

    Ok(Json(SessionResponse {
        session_id: payload.session_id,
        state: wizard,
    }))
}

async fn deploy(
    State(state): State<AppState>,
    Json(payload): Json<DeployRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let wizard = state
        .services
        .session
        .deploy(&payload.session_id, &payload.wallet_address)
        .await?;

    Ok(Json(SessionResponse {
        session_id: payload.session_id,
        state: wizard,
    }))
}

/// Prices the session's current contract without deploying it.
async fn estimate_deploy(
    State(state): State<AppState>,
    Json(payload): Json<EstimateRequest>,
) -> Result<Json<EstimateResponse>, ApiError> {
    let wizard = state
        .services
        .session
        .get(&payload.session_id)
        .ok_or_else(|| ApiError::NotFound("Session not found".to_string()))?;
    let contract = wizard.contract.ok_or_else(|| {
        ApiError::BadRequest("Generate a contract before estimating deployment cost".to_string())
    })?;

    let estimated_cost = state.services.chain.estimate_deploy_cost(&contract).await?;
    Ok(Json(EstimateResponse { estimated_cost }))
}

async fn reset(
    State(state): State<AppState>,
    Json(payload): Json<ResetRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let wizard = state.services.session.reset(&payload.session_id)?;

    Ok(Json(SessionResponse {
        session_id: payload.session_id,
        state: wizard,
    }))
}

/// Reports the active storage backend and whether it currently accepts
/// writes (probed with a sentinel upsert).
async fn store_status(State(state): State<AppState>) -> Json<StoreStatus> {
    let writable = match state.store.probe().await {
        Ok(()) => true,
        Err(e) => {
            warn!("Store probe failed: {}", e);
            false
        }
    };

    Json(StoreStatus {
        backend: state.store.backend(),
        writable,
    })
}

/// Deployer wallet readiness: balance and whether the RPC endpoint reports
/// the expected chain id.
async fn chain_status(State(state): State<AppState>) -> Result<Json<WalletStatus>, ApiError> {
    let status = state.services.chain.wallet_status().await?;
    Ok(Json(status))
}
