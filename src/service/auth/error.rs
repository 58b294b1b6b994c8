use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Failed to get token: {0}")]
    TokenExchange(String),
    #[error("Failed to get user info: {0}")]
    Profile(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("Request error: {0}")]
    Request(String),
}

impl From<reqwest::Error> for AuthError {
    fn from(error: reqwest::Error) -> Self {
        AuthError::Request(error.to_string())
    }
}
