use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-user record held in the config store. Timestamps are RFC 3339 so the
/// record stays readable in the Vercel dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
    pub token_usage: u32,
    pub last_token_reset: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl UserRecord {
    pub fn new(id: impl Into<String>, username: impl Into<String>, avatar: Option<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            avatar,
            token_usage: 0,
            last_token_reset: Utc::now(),
            last_updated: None,
        }
    }
}
