#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// Error surfaced by the completion API, shown to the user verbatim.
    #[error("{0}")]
    Api(String),
    #[error("Empty completion from model")]
    EmptyCompletion,
    #[error("Request error: {0}")]
    Request(String),
}

impl From<reqwest::Error> for AiError {
    fn from(error: reqwest::Error) -> Self {
        AiError::Request(error.to_string())
    }
}
