use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

use super::{model::UserRecord, StorageError, UserStore};

#[derive(Clone, Debug)]
pub struct MemoryCache<T: Clone> {
    cache: Arc<DashMap<String, T>>,
}

impl<T: Clone> MemoryCache<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: Arc::new(DashMap::with_capacity(capacity)),
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        self.cache.get(key).map(|value| value.value().clone())
    }

    pub fn set(&self, key: &str, value: &T) {
        self.cache.insert(key.to_string(), value.clone());
    }
}

/// In-memory user store. Used when the remote config store is not
/// configured; records do not survive a restart.
#[derive(Clone)]
pub struct MemoryStore {
    users: MemoryCache<UserRecord>,
}

impl MemoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            users: MemoryCache::new(capacity),
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn get_user(&self, key: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.users.get(key))
    }

    async fn upsert_user(&self, key: &str, record: &UserRecord) -> Result<(), StorageError> {
        self.users.set(key, record);
        Ok(())
    }
}
