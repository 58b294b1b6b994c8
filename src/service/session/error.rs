use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,
    #[error("Input is required")]
    EmptyInput,
    #[error("Input exceeds the {0} character limit")]
    InputTooLong(usize),
    /// The request does not fit the session's current phase.
    #[error("{0}")]
    Phase(String),
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
