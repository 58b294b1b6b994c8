mod edge;
mod error;
mod memory;
mod model;

pub use edge::EdgeStore;
pub use error::StorageError;
pub use memory::{MemoryCache, MemoryStore};
pub use model::UserRecord;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::StoreConfig;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, key: &str) -> Result<Option<UserRecord>, StorageError>;
    async fn upsert_user(&self, key: &str, record: &UserRecord) -> Result<(), StorageError>;
}

/// Front door for user persistence. Picks the Edge Config backend when it
/// is fully configured and the in-memory store otherwise, so the service
/// runs without any remote credentials.
#[derive(Clone)]
pub struct StoreManager {
    store: Arc<dyn UserStore>,
    backend: &'static str,
}

impl StoreManager {
    pub fn new(config: &StoreConfig) -> Self {
        match config.edge() {
            Some((connection_url, config_id, write_token)) => {
                info!("Using the Edge Config store");
                Self {
                    store: Arc::new(EdgeStore::new(connection_url, config_id, write_token)),
                    backend: "edge-config",
                }
            }
            None => {
                if config.is_partial() {
                    warn!("Incomplete Edge Config credentials; falling back to the in-memory store");
                } else {
                    info!("Using the in-memory store");
                }
                Self::in_memory(config.memory_capacity)
            }
        }
    }

    pub fn in_memory(capacity: usize) -> Self {
        Self {
            store: Arc::new(MemoryStore::new(capacity)),
            backend: "memory",
        }
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }

    pub async fn get_user(&self, key: &str) -> Result<Option<UserRecord>, StorageError> {
        self.store.get_user(key).await
    }

    pub async fn upsert_user(&self, key: &str, record: &UserRecord) -> Result<(), StorageError> {
        self.store.upsert_user(key, record).await
    }

    /// Writes a sentinel record to verify the backend accepts writes.
    pub async fn probe(&self) -> Result<(), StorageError> {
        let record = UserRecord::new("test", "connectivity-probe", None);
        self.store.upsert_user("test", &record).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(id: &str) -> UserRecord {
        UserRecord::new(id, "tester", Some("https://cdn.example/avatar.png".to_string()))
    }

    #[tokio::test]
    async fn test_memory_round_trip() {
        let manager = StoreManager::in_memory(10);
        let record = sample_record("42");

        manager.upsert_user("discord_user_42", &record).await.unwrap();
        let loaded = manager.get_user("discord_user_42").await.unwrap();

        assert_eq!(loaded, Some(record));
    }

    #[tokio::test]
    async fn test_missing_user_is_none() {
        let manager = StoreManager::in_memory(10);
        assert_eq!(manager.get_user("discord_user_unknown").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing_record() {
        let manager = StoreManager::in_memory(10);
        let mut record = sample_record("42");

        manager.upsert_user("discord_user_42", &record).await.unwrap();
        record.token_usage = 500;
        manager.upsert_user("discord_user_42", &record).await.unwrap();

        let loaded = manager.get_user("discord_user_42").await.unwrap().unwrap();
        assert_eq!(loaded.token_usage, 500);
    }

    #[tokio::test]
    async fn test_probe_succeeds_on_memory() {
        let manager = StoreManager::in_memory(10);
        manager.probe().await.unwrap();
        assert_eq!(manager.backend(), "memory");
    }
}
