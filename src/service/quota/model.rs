use chrono::{DateTime, Utc};
use serde::Serialize;

/// Rolling allowance per user across all request classes.
pub const TOTAL_MAX_TOKENS: u32 = 17_500;

/// Hours before a user's usage window resets.
pub const RESET_WINDOW_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestBudget {
    #[allow(dead_code)]
    pub user_input: u32,
    pub system_prompt: u32,
    pub ai_output: u32,
    pub total: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// First generation attempt in a session.
    Initial,
    /// Regeneration after a failed or rejected attempt.
    Retry,
    /// Refinement of an existing contract.
    Optimization,
}

impl RequestKind {
    /// Per-request ceilings, used both for the admission check and for the
    /// pre-flight estimate. `total` is a rounded envelope, not the sum of
    /// the parts.
    pub fn budget(self) -> RequestBudget {
        match self {
            RequestKind::Initial => RequestBudget {
                user_input: 250,
                system_prompt: 500,
                ai_output: 6_000,
                total: 7_000,
            },
            RequestKind::Retry => RequestBudget {
                user_input: 250,
                system_prompt: 500,
                ai_output: 2_000,
                total: 3_000,
            },
            RequestKind::Optimization => RequestBudget {
                user_input: 100,
                system_prompt: 300,
                ai_output: 2_000,
                total: 2_500,
            },
        }
    }
}

/// Outcome of a storage-backed allowance check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenStatus {
    pub can_use: bool,
    pub remaining_tokens: u32,
    pub next_reset_time: DateTime<Utc>,
}
