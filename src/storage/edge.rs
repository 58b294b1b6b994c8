use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;

use crate::utils::http::create_api_client;

use super::{model::UserRecord, StorageError, UserStore};

const VERCEL_API_BASE: &str = "https://api.vercel.com/v1/edge-config";

/// Vercel Edge Config backed user store. Reads go through the low-latency
/// connection URL, writes through the Vercel management API.
#[derive(Clone)]
pub struct EdgeStore {
    client: Client,
    connection_url: String,
    config_id: String,
    write_token: String,
}

impl EdgeStore {
    pub fn new(connection_url: String, config_id: String, write_token: String) -> Self {
        info!("Initializing EdgeStore...");
        Self {
            client: create_api_client(),
            connection_url: connection_url.trim_end_matches('/').to_string(),
            config_id,
            write_token,
        }
    }

    /// Read URL for a single item. The connection URL may carry a
    /// `?token=` query, which has to stay behind the item path.
    fn item_url(&self, key: &str) -> String {
        match self.connection_url.split_once('?') {
            Some((base, query)) => {
                format!("{}/item/{}?{}", base.trim_end_matches('/'), key, query)
            }
            None => format!("{}/item/{}", self.connection_url, key),
        }
    }

    fn items_url(&self) -> String {
        format!("{}/{}/items", VERCEL_API_BASE, self.config_id)
    }
}

#[async_trait]
impl UserStore for EdgeStore {
    async fn get_user(&self, key: &str) -> Result<Option<UserRecord>, StorageError> {
        let response = self.client.get(self.item_url(key)).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json::<UserRecord>().await?)),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(StorageError::Remote(format!(
                    "Read for {} failed with {}: {}",
                    key, status, body
                )))
            }
        }
    }

    async fn upsert_user(&self, key: &str, record: &UserRecord) -> Result<(), StorageError> {
        let body = json!({
            "items": [{
                "operation": "upsert",
                "key": key,
                "value": record,
            }]
        });

        let response = self
            .client
            .patch(self.items_url())
            .bearer_auth(&self.write_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Remote(format!(
                "Write for {} failed with {}: {}",
                key, status, body
            )));
        }

        debug!("Upserted {} into the config store", key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(connection_url: &str) -> EdgeStore {
        EdgeStore::new(
            connection_url.to_string(),
            "ecfg_test123".to_string(),
            "vercel-token".to_string(),
        )
    }

    #[test]
    fn test_item_url_with_embedded_token() {
        let store = store("https://edge-config.vercel.com/ecfg_test123?token=abc");
        assert_eq!(
            store.item_url("discord_user_42"),
            "https://edge-config.vercel.com/ecfg_test123/item/discord_user_42?token=abc"
        );
    }

    #[test]
    fn test_item_url_without_query() {
        let store = store("https://edge-config.vercel.com/ecfg_test123/");
        assert_eq!(
            store.item_url("test"),
            "https://edge-config.vercel.com/ecfg_test123/item/test"
        );
    }

    #[test]
    fn test_items_url() {
        let store = store("https://edge-config.vercel.com/ecfg_test123");
        assert_eq!(
            store.items_url(),
            "https://api.vercel.com/v1/edge-config/ecfg_test123/items"
        );
    }
}
