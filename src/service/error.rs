use crate::storage::StorageError;

use super::{
    ai::AiError, auth::AuthError, chain::ChainError, compiler::CompilerError,
    session::SessionError,
};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("AI error: {0}")]
    Ai(#[from] AiError),

    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Compiler error: {0}")]
    Compiler(#[from] CompilerError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
