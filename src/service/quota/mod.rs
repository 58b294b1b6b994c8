mod model;

pub use model::{RequestBudget, RequestKind, TokenStatus, RESET_WINDOW_HOURS, TOTAL_MAX_TOKENS};

use chrono::{DateTime, Duration, Utc};

use crate::{
    storage::{StorageError, StoreManager, UserRecord},
    utils::{seconds_to_human_readable, storage_key},
};

/// Session-local admission check against the per-class budget. Runs before
/// the storage round trip so an obviously exhausted session never touches
/// the store.
pub fn can_make_request(current_usage: u32, kind: RequestKind) -> bool {
    TOTAL_MAX_TOKENS.saturating_sub(current_usage) >= kind.budget().total
}

/// Worst-case token estimate for one request: roughly four characters per
/// input token plus the class's prompt and output ceilings.
pub fn estimate_request_tokens(input: &str, kind: RequestKind) -> u32 {
    let budget = kind.budget();
    (input.chars().count() as u32).div_ceil(4) + budget.system_prompt + budget.ai_output
}

/// Applies the rolling-window reset if it is due. Returns true when the
/// record changed and needs to be written back.
pub fn refresh_window(record: &mut UserRecord, now: DateTime<Utc>) -> bool {
    if now - record.last_token_reset >= Duration::hours(RESET_WINDOW_HOURS) {
        record.token_usage = 0;
        record.last_token_reset = now;
        true
    } else {
        false
    }
}

pub fn format_time_until(next_reset_time: DateTime<Utc>) -> String {
    let seconds = (next_reset_time - Utc::now()).num_seconds();
    if seconds <= 0 {
        return "Ready to reset".to_string();
    }
    seconds_to_human_readable(seconds as u64)
}

/// Storage-backed token metering. Windows reset lazily: whoever reads or
/// writes a record first after expiry applies the reset, so no background
/// job is needed.
#[derive(Clone)]
pub struct QuotaService {
    store: StoreManager,
}

impl QuotaService {
    pub fn new(store: StoreManager) -> Self {
        info!("Initializing quota service");
        Self { store }
    }

    /// Checks whether `required_tokens` fit into the user's remaining
    /// allowance. Unknown users get the full allowance; an expired window
    /// is reset to zero and written back before the check.
    pub async fn check_tokens(
        &self,
        user_id: &str,
        required_tokens: u32,
    ) -> Result<TokenStatus, StorageError> {
        let key = storage_key(user_id);
        let now = Utc::now();

        let mut record = match self.store.get_user(&key).await? {
            Some(record) => record,
            None => {
                return Ok(TokenStatus {
                    can_use: required_tokens <= TOTAL_MAX_TOKENS,
                    remaining_tokens: TOTAL_MAX_TOKENS,
                    next_reset_time: now + Duration::hours(RESET_WINDOW_HOURS),
                });
            }
        };

        if refresh_window(&mut record, now) {
            record.last_updated = Some(now);
            self.store.upsert_user(&key, &record).await?;
            debug!("Reset usage window for {}", user_id);
        }

        let remaining = TOTAL_MAX_TOKENS.saturating_sub(record.token_usage);
        Ok(TokenStatus {
            can_use: remaining >= required_tokens,
            remaining_tokens: remaining,
            next_reset_time: record.last_token_reset + Duration::hours(RESET_WINDOW_HOURS),
        })
    }

    /// Adds `tokens_used` to the user's window, creating the record on
    /// first use. An expired window is reset first, so the new window
    /// starts seeded with this request's usage.
    pub async fn record_usage(
        &self,
        user_id: &str,
        tokens_used: u32,
    ) -> Result<UserRecord, StorageError> {
        let key = storage_key(user_id);
        let now = Utc::now();

        let mut record = match self.store.get_user(&key).await? {
            Some(record) => record,
            None => UserRecord::new(user_id, "", None),
        };

        refresh_window(&mut record, now);
        record.token_usage = record.token_usage.saturating_add(tokens_used);
        record.last_updated = Some(now);
        self.store.upsert_user(&key, &record).await?;

        Ok(record)
    }
}
