use crate::service::compiler::CompilerError;

#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error(transparent)]
    Compiler(#[from] CompilerError),
    #[error("Invalid provider URL: {0}")]
    Provider(String),
    #[error("Invalid deployer key: {0}")]
    Wallet(String),
    #[error("Invalid address format")]
    InvalidAddress,
    #[error("Invalid bytecode in compiler output")]
    InvalidBytecode,
    /// Deployment-path failure, shown to the user behind a
    /// "Deployment failed:" prefix.
    #[error("{0}")]
    Deployment(String),
    #[error("Transfer failed: {0}")]
    Transfer(String),
    #[error("Current wallet is not the contract owner")]
    NotOwner,
    #[error("RPC error: {0}")]
    Rpc(String),
    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
