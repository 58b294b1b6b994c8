#[derive(Debug, thiserror::Error)]
pub enum CompilerError {
    #[error("Source code is required")]
    EmptySource,
    /// First error-severity diagnostic from solc, shown verbatim.
    #[error("{0}")]
    Compilation(String),
    #[error("No contract found in compilation output")]
    MissingContract,
    #[error("Compiler request error: {0}")]
    Request(String),
}

impl From<reqwest::Error> for CompilerError {
    fn from(error: reqwest::Error) -> Self {
        CompilerError::Request(error.to_string())
    }
}
