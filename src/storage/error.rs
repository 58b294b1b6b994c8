#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Config store error: {0}")]
    Remote(String),
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Other error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for StorageError {
    fn from(error: reqwest::Error) -> Self {
        StorageError::Remote(error.to_string())
    }
}
