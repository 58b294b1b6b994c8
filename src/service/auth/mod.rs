mod error;
mod model;

pub use error::AuthError;
pub use model::DiscordUser;

use chrono::Utc;
use reqwest::Client;

use crate::{
    config::DiscordConfig,
    service::quota,
    storage::{StoreManager, UserRecord},
    utils::{http::create_api_client, storage_key},
};

use model::TokenResponse;

const DISCORD_TOKEN_URL: &str = "https://discord.com/api/oauth2/token";
const DISCORD_USER_URL: &str = "https://discord.com/api/users/@me";
const DISCORD_CDN_AVATARS: &str = "https://cdn.discordapp.com/avatars";

/// Discord OAuth login. Exchanges the authorization code, fetches the
/// profile and keeps the user's store record in step.
#[derive(Clone)]
pub struct AuthService {
    client: Client,
    config: DiscordConfig,
    store: StoreManager,
}

impl AuthService {
    pub fn new(config: DiscordConfig, store: StoreManager) -> Self {
        info!("Initializing auth service");
        Self {
            client: create_api_client(),
            config,
            store,
        }
    }

    /// Completes the OAuth code flow and returns the user's record,
    /// creating it on first login. A returning login also applies the
    /// lazy usage-window reset.
    pub async fn login(&self, code: &str) -> Result<UserRecord, AuthError> {
        let discord_user = self.exchange_code(code).await?;
        let key = storage_key(&discord_user.id);

        match self.store.get_user(&key).await? {
            Some(mut record) => {
                let now = Utc::now();
                if quota::refresh_window(&mut record, now) {
                    record.last_updated = Some(now);
                    self.store.upsert_user(&key, &record).await?;
                    debug!("Reset usage window for {} on login", record.id);
                }
                Ok(record)
            }
            None => {
                let record = UserRecord::new(
                    discord_user.id.clone(),
                    discord_user.username,
                    avatar_url(&discord_user.id, discord_user.avatar.as_deref()),
                );
                info!("Creating user record for {}", record.id);
                self.store.upsert_user(&key, &record).await?;
                Ok(record)
            }
        }
    }

    async fn exchange_code(&self, code: &str) -> Result<DiscordUser, AuthError> {
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];

        let response = self
            .client
            .post(DISCORD_TOKEN_URL)
            .form(&params)
            .send()
            .await?;
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenExchange(body));
        }
        let token: TokenResponse = response.json().await?;

        let response = self
            .client
            .get(DISCORD_USER_URL)
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(AuthError::Profile(response.status().to_string()));
        }

        Ok(response.json::<DiscordUser>().await?)
    }
}

fn avatar_url(user_id: &str, avatar_hash: Option<&str>) -> Option<String> {
    avatar_hash.map(|hash| format!("{}/{}/{}.png", DISCORD_CDN_AVATARS, user_id, hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_avatar_url() {
        assert_eq!(
            avatar_url("123", Some("a1b2c3")),
            Some("https://cdn.discordapp.com/avatars/123/a1b2c3.png".to_string())
        );
        assert_eq!(avatar_url("123", None), None);
    }
}
