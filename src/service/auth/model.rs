use serde::Deserialize;

/// The slice of a Discord `users/@me` response we keep.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscordUser {
    pub id: String,
    pub username: String,
    /// Avatar hash, not a URL.
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}
