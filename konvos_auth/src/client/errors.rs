use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The backend answered with a non-2xx status; `message` is its `error` field
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Request error: {0}")]
    Request(String),

    #[error("Session cache error: {0}")]
    Cache(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Request(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Cache(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Cache(err.to_string())
    }
}
